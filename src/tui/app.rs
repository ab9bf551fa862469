use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::load_store_config;
use crate::model::task::{SubtaskId, TaskId};
use crate::ops::{TaskError, TaskManager};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a title into the status row
    Input,
    /// Waiting for y/n on a delete
    Confirm,
}

/// One visible line of the checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Task(TaskId),
    Subtask { id: SubtaskId, task_id: TaskId },
}

impl Row {
    /// Stable key used to find the row again after a rebuild
    pub fn key(&self) -> String {
        match self {
            Row::Task(id) => format!("task:{}", id),
            Row::Subtask { id, .. } => format!("subtask:{}", id),
        }
    }

    /// The task this row belongs to
    pub fn task_id(&self) -> TaskId {
        match self {
            Row::Task(id) => *id,
            Row::Subtask { task_id, .. } => *task_id,
        }
    }
}

/// What a submitted title creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    NewTask,
    NewSubtask { task_id: TaskId },
}

/// What `y` confirms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(TaskId),
    DeleteSubtask(SubtaskId),
}

/// Main application state
pub struct App {
    pub manager: TaskManager,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Flattened visible rows, rebuilt after every change
    pub rows: Vec<Row>,
    /// Index into `rows`
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Tasks whose subtasks are hidden
    pub collapsed: HashSet<TaskId>,
    /// Help overlay visible
    pub show_help: bool,
    pub edit_buffer: String,
    /// Byte offset into `edit_buffer`
    pub edit_cursor: usize,
    pub input_target: Option<InputTarget>,
    pub confirm_action: Option<ConfirmAction>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

impl App {
    pub fn new(manager: TaskManager, theme: Theme) -> Self {
        let skipped = manager.load_report().skipped_count();
        let mut app = App {
            manager,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            show_key_hints: true,
            rows: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            collapsed: HashSet::new(),
            show_help: false,
            edit_buffer: String::new(),
            edit_cursor: 0,
            input_target: None,
            confirm_action: None,
            status_message: None,
            status_is_error: false,
        };
        if skipped > 0 {
            app.set_error(format!(
                "skipped {} malformed row(s), see `tl recovery`",
                skipped
            ));
        }
        app.rebuild_rows();
        app
    }

    /// Rebuild `rows` from the manager, keeping the cursor on the same entity
    /// when it still exists.
    pub fn rebuild_rows(&mut self) {
        let selected = self.cursor_row().map(|row| row.key());

        let mut rows = Vec::new();
        for task in self.manager.list_tasks() {
            rows.push(Row::Task(task.id));
            if self.collapsed.contains(&task.id) {
                continue;
            }
            for sub in self.manager.subtasks_of(task.id) {
                rows.push(Row::Subtask {
                    id: sub.id,
                    task_id: task.id,
                });
            }
        }
        self.rows = rows;

        if let Some(key) = selected
            && self.select_key(&key)
        {
            return;
        }
        self.clamp_cursor();
    }

    /// Move the cursor to the row with this key. Returns false if not visible.
    pub fn select_key(&mut self, key: &str) -> bool {
        match self.rows.iter().position(|row| row.key() == key) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    pub fn cursor_row(&self) -> Option<Row> {
        self.rows.get(self.cursor).copied()
    }

    /// Done/total counts for a task's subtasks
    pub fn subtask_progress(&self, task_id: TaskId) -> (usize, usize) {
        self.manager
            .subtasks_of(task_id)
            .fold((0, 0), |(done, total), s| {
                (done + usize::from(s.completed), total + 1)
            })
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = true;
    }

    /// Show a failed store call in the status row; the view is rebuilt either way.
    pub fn report<T>(&mut self, result: Result<T, TaskError>) -> Option<T> {
        let out = match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.set_error(format!("error: {}", e));
                None
            }
        };
        self.rebuild_rows();
        out
    }
}

/// Restore cursor and collapse state from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let Some(ui_state) = read_ui_state(app.manager.data_dir()) else {
        return;
    };

    app.collapsed = ui_state.collapsed;
    app.rebuild_rows();
    if let Some(key) = ui_state.cursor {
        app.select_key(&key);
    }
    app.scroll_offset = ui_state.scroll_offset;
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    // Ids of deleted tasks are dropped
    let collapsed = app
        .collapsed
        .iter()
        .copied()
        .filter(|id| app.manager.get_task(*id).is_some())
        .collect();

    let ui_state = UiState {
        cursor: app.cursor_row().map(|row| row.key()),
        scroll_offset: app.scroll_offset,
        collapsed,
    };

    if let Err(e) = write_ui_state(app.manager.data_dir(), &ui_state) {
        eprintln!("warning: could not save UI state: {}", e);
    }
}

/// Run the TUI application against the task files in `data_dir`
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (config, store_config) = load_store_config(data_dir)?;
    let manager = TaskManager::open(store_config)?;

    let mut app = App::new(manager, Theme::from_config(&config.ui));
    app.show_key_hints = config.ui.show_key_hints;

    // Restore saved UI state
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save UI state after leaving the alternate screen so warnings are visible
    save_ui_state(&app);

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
