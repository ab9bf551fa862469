use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => {
            let action = app.confirm_action.take();
            app.mode = Mode::Navigate;
            match action {
                Some(ConfirmAction::DeleteTask(id)) => confirm_delete_task(app, id),
                Some(ConfirmAction::DeleteSubtask(id)) => confirm_delete_subtask(app, id),
                None => {}
            }
        }
        // Anything else cancels
        _ => {
            app.confirm_action = None;
            app.mode = Mode::Navigate;
        }
    }
}

fn confirm_delete_task(app: &mut App, id: i64) {
    let result = app.manager.delete_task(id);
    if let Some(Some(removed)) = app.report(result) {
        app.collapsed.remove(&id);
        app.set_status(format!(
            "deleted \"{}\" and {} subtask(s)",
            removed.task.title,
            removed.subtasks.len()
        ));
    }
}

fn confirm_delete_subtask(app: &mut App, id: i64) {
    let result = app.manager.delete_subtask(id);
    if let Some(Some(removed)) = app.report(result) {
        app.set_status(format!("deleted \"{}\"", removed.title));
    }
}
