use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, InputTarget, Mode, Row};
use crate::util::unicode;

/// Open the title prompt for a new task or subtask
pub(super) fn begin_input(app: &mut App, target: InputTarget) {
    app.edit_buffer.clear();
    app.edit_cursor = 0;
    app.input_target = Some(target);
    app.mode = Mode::Input;
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Enter) => confirm_input(app),
        (_, KeyCode::Esc) => cancel_input(app),

        // Jump to start/end of line
        (_, KeyCode::Home) => app.edit_cursor = 0,
        (_, KeyCode::End) => app.edit_cursor = app.edit_buffer.len(),
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => app.edit_cursor = 0,
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = app.edit_buffer.len();
        }
        // Kill to start of line
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_buffer.drain(..app.edit_cursor);
            app.edit_cursor = 0;
        }

        // Word movement
        (m, KeyCode::Left) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
        }
        (m, KeyCode::Right) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_right(&app.edit_buffer, app.edit_cursor);
        }
        (_, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = next;
            }
        }

        // Word backspace (Alt or Ctrl)
        (m, KeyCode::Backspace)
            if m.contains(KeyModifiers::ALT) || m.contains(KeyModifiers::CONTROL) =>
        {
            let new_pos = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.drain(new_pos..app.edit_cursor);
            app.edit_cursor = new_pos;
        }
        (_, KeyCode::Backspace) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(prev..app.edit_cursor);
                app.edit_cursor = prev;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(app.edit_cursor..next);
            }
        }

        // Type character
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn cancel_input(app: &mut App) {
    app.edit_buffer.clear();
    app.edit_cursor = 0;
    app.input_target = None;
    app.mode = Mode::Navigate;
}

/// Create the entity. Blank input creates nothing.
fn confirm_input(app: &mut App) {
    let title = std::mem::take(&mut app.edit_buffer);
    let target = app.input_target.take();
    app.edit_cursor = 0;
    app.mode = Mode::Navigate;

    if title.trim().is_empty() {
        return;
    }

    match target {
        Some(InputTarget::NewTask) => {
            let result = app.manager.add_task(title);
            if let Some(task) = app.report(result) {
                app.select_key(&Row::Task(task.id).key());
            }
        }
        Some(InputTarget::NewSubtask { task_id }) => {
            // The new row is only visible if its task is expanded
            app.collapsed.remove(&task_id);
            let result = app.manager.add_subtask(task_id, title);
            if let Some(sub) = app.report(result) {
                app.select_key(
                    &Row::Subtask {
                        id: sub.id,
                        task_id,
                    }
                    .key(),
                );
            }
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::tui::app::{Mode, Row};
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::app_with_records;

    const TASKS: &str = "id,title,completed\n1,Trip,False\n";
    const SUBTASKS: &str = "id,task_id,title,completed\n";

    #[test]
    fn a_adds_task_and_selects_it() {
        let (tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Input);
        type_str(&mut app, "Pack, \"light\"");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        let task = app.manager.get_task(2).unwrap();
        assert_eq!(task.title, "Pack, \"light\"");
        assert_eq!(app.cursor_row(), Some(Row::Task(2)));
        let on_disk = std::fs::read_to_string(tmp.path().join("tasks.csv")).unwrap();
        assert!(on_disk.contains("2,\"Pack, \"\"light\"\"\",False"));
    }

    #[test]
    fn s_adds_subtask_to_task_under_cursor() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        app.collapsed.insert(1);
        press(&mut app, KeyCode::Char('s'));
        type_str(&mut app, "Passport");
        press(&mut app, KeyCode::Enter);

        let sub = app.manager.get_subtask(1).unwrap();
        assert_eq!(sub.task_id, 1);
        assert!(!app.collapsed.contains(&1));
        assert_eq!(app.cursor_row(), Some(Row::Subtask { id: 1, task_id: 1 }));
    }

    #[test]
    fn blank_input_creates_nothing() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.manager.list_tasks().len(), 1);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert!(app.manager.list_subtasks().is_empty());
    }

    #[test]
    fn esc_cancels() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "never mind");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.edit_buffer.is_empty());
        assert_eq!(app.manager.list_tasks().len(), 1);
        assert!(!app.should_quit);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "ok e\u{301}");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.edit_buffer, "ok ");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.edit_buffer, "ok");
        assert_eq!(app.edit_cursor, 2);
    }
}
