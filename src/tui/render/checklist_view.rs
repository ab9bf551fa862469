use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Row};
use crate::util::unicode::{display_width, truncate_to_width};

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Render the checklist content area
pub fn render_checklist_view(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.rows.is_empty() {
        let empty = Paragraph::new(" No tasks yet. Press a to add one.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor on screen
    let visible_height = area.height as usize;
    app.clamp_cursor();
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }
    let max_scroll = app.rows.len().saturating_sub(visible_height);
    app.scroll_offset = app.scroll_offset.min(max_scroll);

    let width = area.width as usize;
    let lines: Vec<Line> = app
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible_height)
        .filter_map(|(idx, row)| render_row(app, *row, idx == app.cursor, width))
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

fn render_row(app: &App, row: Row, is_cursor: bool, width: usize) -> Option<Line<'static>> {
    let theme = &app.theme;
    let bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };

    let (indent, completed, title, suffix) = match row {
        Row::Task(id) => {
            let task = app.manager.get_task(id)?;
            let (done, total) = app.subtask_progress(id);
            let marker = if total == 0 {
                "  "
            } else if app.collapsed.contains(&id) {
                "\u{25B8} "
            } else {
                "\u{25BE} "
            };
            let suffix = if total > 0 {
                format!("  {}/{}", done, total)
            } else {
                String::new()
            };
            (marker.to_string(), task.completed, task.title.clone(), suffix)
        }
        Row::Subtask { id, .. } => {
            let sub = app.manager.get_subtask(id)?;
            ("    ".to_string(), sub.completed, sub.title.clone(), String::new())
        }
    };

    let mut spans: Vec<Span> = Vec::new();
    let gutter_style = Style::default().fg(theme.selection_border).bg(bg);
    spans.push(Span::styled(if is_cursor { "\u{258E}" } else { " " }, gutter_style));
    spans.push(Span::styled(indent, Style::default().fg(theme.dim).bg(bg)));

    let box_color = if completed { theme.green } else { theme.text };
    spans.push(Span::styled(
        format!("{} ", checkbox(completed)),
        Style::default().fg(box_color).bg(bg),
    ));

    let mut title_style = Style::default().fg(theme.row_color(completed)).bg(bg);
    if completed {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
    }
    if is_cursor {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    // Title gets whatever the prefix and counter leave over
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let budget = width.saturating_sub(used + display_width(&suffix));
    spans.push(Span::styled(truncate_to_width(&title, budget), title_style));
    if !suffix.is_empty() {
        spans.push(Span::styled(suffix, Style::default().fg(theme.dim).bg(bg)));
    }

    // Pad cursor line
    if is_cursor {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        if content_width < width {
            spans.push(Span::styled(
                " ".repeat(width - content_width),
                Style::default().bg(bg),
            ));
        }
    }

    Some(Line::from(spans))
}
