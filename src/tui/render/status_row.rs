use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ConfirmAction, InputTarget, Mode};
use crate::util::unicode::display_width;

const NAVIGATE_HINTS: &str = "a add  s sub  space toggle  d delete  ? help  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint): (Vec<Span>, Option<&str>) = match app.mode {
        Mode::Navigate => match &app.status_message {
            Some(msg) => {
                let color = if app.status_is_error {
                    app.theme.red
                } else {
                    app.theme.green
                };
                (
                    vec![Span::styled(format!(" {}", msg), Style::default().fg(color).bg(bg))],
                    None,
                )
            }
            None if app.show_key_hints => (vec![Span::styled(format!(" {}", NAVIGATE_HINTS), dim)], None),
            None => (Vec::new(), None),
        },
        Mode::Input => {
            let label = match app.input_target {
                Some(InputTarget::NewSubtask { task_id }) => match app.manager.get_task(task_id) {
                    Some(task) => format!(" New subtask for \"{}\": ", task.title),
                    None => " New subtask: ".to_string(),
                },
                _ => " New task: ".to_string(),
            };
            let cursor = app.edit_cursor.min(app.edit_buffer.len());
            let (before, after) = app.edit_buffer.split_at(cursor);
            let text = Style::default().fg(app.theme.text_bright).bg(bg);
            (
                vec![
                    Span::styled(label, Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(before.to_string(), text),
                    Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
                    Span::styled(after.to_string(), text),
                ],
                Some("Enter save  Esc cancel"),
            )
        }
        Mode::Confirm => {
            let question = match app.confirm_action {
                Some(ConfirmAction::DeleteTask(id)) => {
                    let title = app.manager.get_task(id).map_or("", |t| t.title.as_str());
                    let (_, total) = app.subtask_progress(id);
                    if total > 0 {
                        format!(" Delete \"{}\" and {} subtask(s)?", title, total)
                    } else {
                        format!(" Delete \"{}\"?", title)
                    }
                }
                Some(ConfirmAction::DeleteSubtask(id)) => {
                    let title = app.manager.get_subtask(id).map_or("", |s| s.title.as_str());
                    format!(" Delete subtask \"{}\"?", title)
                }
                None => String::new(),
            };
            (
                vec![Span::styled(question, Style::default().fg(app.theme.red).bg(bg))],
                Some("y delete  any other key cancels"),
            )
        }
    };

    // Right-aligned hint when it fits
    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, dim));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
