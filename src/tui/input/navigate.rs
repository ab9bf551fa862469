use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, ConfirmAction, InputTarget, Mode, Row};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Any key dismisses the last status message
    app.status_message = None;

    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        // Quit
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => {
            app.should_quit = true;
        }
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
        }

        // Cursor movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            if app.cursor + 1 < app.rows.len() {
                app.cursor += 1;
            }
        }
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => {
            app.cursor = 0;
        }
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = app.rows.len().saturating_sub(1);
        }

        // Collapse / expand
        (_, KeyCode::Char('h')) | (_, KeyCode::Left) => collapse_current(app),
        (_, KeyCode::Char('l')) | (_, KeyCode::Right) => expand_current(app),

        // Mutations
        (_, KeyCode::Char(' ')) | (_, KeyCode::Char('x')) => toggle_current(app),
        (_, KeyCode::Char('a')) => begin_input(app, InputTarget::NewTask),
        (_, KeyCode::Char('s')) => {
            if let Some(row) = app.cursor_row() {
                begin_input(
                    app,
                    InputTarget::NewSubtask {
                        task_id: row.task_id(),
                    },
                );
            }
        }
        (_, KeyCode::Char('d')) => {
            let action = match app.cursor_row() {
                Some(Row::Task(id)) => ConfirmAction::DeleteTask(id),
                Some(Row::Subtask { id, .. }) => ConfirmAction::DeleteSubtask(id),
                None => return,
            };
            app.confirm_action = Some(action);
            app.mode = Mode::Confirm;
        }
        (_, KeyCode::Char('r')) => {
            let result = app.manager.reload().map(|report| report.skipped_count());
            if let Some(skipped) = app.report(result) {
                if skipped > 0 {
                    app.set_error(format!(
                        "skipped {} malformed row(s), see `tl recovery`",
                        skipped
                    ));
                } else {
                    app.set_status("reloaded");
                }
            }
        }
        _ => {}
    }
}

fn toggle_current(app: &mut App) {
    let result = match app.cursor_row() {
        Some(Row::Task(id)) => app.manager.toggle_task(id),
        Some(Row::Subtask { id, .. }) => app.manager.toggle_subtask(id),
        None => return,
    };
    app.report(result);
}

/// Collapse the task under the cursor, moving up from a subtask to its task
fn collapse_current(app: &mut App) {
    let Some(row) = app.cursor_row() else {
        return;
    };
    let task_id = row.task_id();
    app.collapsed.insert(task_id);
    app.rebuild_rows();
    app.select_key(&Row::Task(task_id).key());
}

fn expand_current(app: &mut App) {
    if let Some(Row::Task(id)) = app.cursor_row()
        && app.collapsed.remove(&id)
    {
        app.rebuild_rows();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::tui::app::{ConfirmAction, Mode, Row};
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::app_with_records;

    const TASKS: &str = "id,title,completed\n1,Trip,False\n2,Groceries,False\n";
    const SUBTASKS: &str = "id,task_id,title,completed\n1,1,Passport,False\n";

    #[test]
    fn movement_stays_in_bounds() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn space_toggles_and_persists() {
        let (tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.manager.get_subtask(1).unwrap().completed);
        let on_disk = std::fs::read_to_string(tmp.path().join("subtasks.csv")).unwrap();
        assert!(on_disk.contains("1,1,Passport,True"));

        press(&mut app, KeyCode::Char('x'));
        assert!(!app.manager.get_subtask(1).unwrap().completed);
    }

    #[test]
    fn d_asks_before_deleting() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(app.confirm_action, Some(ConfirmAction::DeleteTask(1)));
        assert_eq!(app.manager.list_tasks().len(), 2);
    }

    #[test]
    fn collapse_from_subtask_selects_parent() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.cursor_row(), Some(Row::Task(1)));
        assert_eq!(app.rows.len(), 2);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.rows.len(), 3);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let (_tmp, mut app) = app_with_records(TASKS, SUBTASKS);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn empty_list_ignores_row_keys() {
        let (_tmp, mut app) = app_with_records("id,title,completed\n", "id,task_id,title,completed\n");
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mode, Mode::Navigate);
    }
}
