use std::fs;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::model::config::StoreConfig;
use crate::ops::TaskManager;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over real record files in a temp dir. Keep the TempDir alive
/// for as long as the App is used.
pub fn app_with_records(tasks_csv: &str, subtasks_csv: &str) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.csv"), tasks_csv).unwrap();
    fs::write(tmp.path().join("subtasks.csv"), subtasks_csv).unwrap();
    let manager = TaskManager::open(StoreConfig::in_dir(tmp.path())).unwrap();
    (tmp, App::new(manager, Theme::default()))
}
