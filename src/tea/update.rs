//! Update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute. Workflow mutations go straight
//! to the store, which persists synchronously; only clipboard access and
//! quitting are deferred to the runtime as commands.

use crossterm::event::{KeyCode, KeyEvent};

use crate::templates;
use crate::workflow::{StepPatch, StepStatus, DEFAULT_NAME};
use crate::{ylog, ylog_debug, ylog_warn};

use super::command::Command;
use super::message::Message;
use super::model::{
    ConfirmKind, EditTarget, InputKind, Mode, Model, Notification, NotificationLevel,
};

pub const COPY_FAILED: &str = "Copy failed. Select the text and copy manually.";
pub const NO_PROMPT: &str = "No prompt to copy yet. Add text first.";

/// Helper to set an error notification and mark model as dirty.
fn set_error(model: &mut Model, message: String) {
    ylog_warn!("UI Error: {}", message);
    model.notification = Some(Notification {
        level: NotificationLevel::Error,
        message,
    });
    model.dirty = true;
}

fn set_info(model: &mut Model, message: impl Into<String>) {
    model.notification = Some(Notification::info(message));
    model.dirty = true;
}

/// Surface a failed write from the last store mutation, if any.
fn check_persist(model: &mut Model) {
    if let Some(err) = model.store.take_persist_error() {
        set_error(model, format!("Failed to save workflow: {}", err));
    }
}

/// Model + Message → Commands
///
/// This function:
/// 1. Takes the current model and an input message
/// 2. Mutates the model state (and sets dirty flag)
/// 3. Returns a list of commands (side effects) to execute
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            model.notification = None; // Clear notification on any key press
            model.dirty = true; // Keyboard input always triggers render
            match model.mode {
                Mode::List => update_list_mode(model, key, &mut cmds),
                Mode::Input(kind) => update_input_mode(model, key, kind),
                Mode::Templates => update_template_mode(model, key),
                Mode::Confirm(kind) => update_confirm_mode(model, key, kind),
            }
            check_persist(model);
        }

        Message::Resize(_, _) => {
            model.dirty = true; // Resize triggers re-render
        }

        // Command completion callbacks
        Message::Copied(ack) => {
            ylog_debug!("Message::Copied");
            set_info(model, ack);
        }

        Message::CopyFailed(err) => {
            ylog_warn!("Message::CopyFailed err={}", err);
            set_error(model, COPY_FAILED.to_string());
        }
    }

    cmds
}

fn update_list_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            model.store.advance();
        }

        KeyCode::Char('k') | KeyCode::Up => {
            model.store.retreat();
        }

        KeyCode::Char('a') => {
            model.draft = StepPatch::default();
            model.edit_target = Some(EditTarget::New);
            model.input_buffer.clear();
            model.mode = Mode::Input(InputKind::Title);
        }

        KeyCode::Char('e') => {
            if let Some(step) = model.store.workflow().current_step() {
                let id = step.id;
                model.draft = StepPatch::default()
                    .title(step.title.clone())
                    .tab(step.tab.clone())
                    .instructions(step.instructions.clone())
                    .notes(step.notes.clone());
                model.edit_target = Some(EditTarget::Existing(id));
                model.mode = Mode::Input(InputKind::Title);
                load_field_buffer(model, InputKind::Title);
            }
        }

        KeyCode::Char('t') => {
            model.template_selected = 0;
            model.mode = Mode::Templates;
        }

        KeyCode::Char('x') | KeyCode::Char(' ') => {
            model.store.toggle_current_done();
        }

        KeyCode::Char('s') => set_current_status(model, StepStatus::Active),

        KeyCode::Char('p') => set_current_status(model, StepStatus::Pending),

        KeyCode::Char('d') => {
            if let Some(step) = model.store.workflow().current_step() {
                let kind = ConfirmKind::DeleteStep(step.id);
                if model.config.confirm_destructive {
                    model.mode = Mode::Confirm(kind);
                } else {
                    apply_confirmed(model, kind);
                }
            }
        }

        KeyCode::Char('C') => {
            if model.config.confirm_destructive {
                model.mode = Mode::Confirm(ConfirmKind::ClearAll);
            } else {
                apply_confirmed(model, ConfirmKind::ClearAll);
            }
        }

        KeyCode::Char('r') => {
            model.store.reset_all_statuses();
            set_info(model, "All steps reset to pending.");
        }

        KeyCode::Char('n') => {
            model.input_buffer = model.store.workflow().name().to_string();
            model.mode = Mode::Input(InputKind::Name);
        }

        KeyCode::Char('y') => {
            let payload = model
                .store
                .workflow()
                .current_index()
                .and_then(|i| model.store.workflow().prompt_payload(i))
                .map(str::to_string);
            match payload {
                Some(text) => cmds.push(Command::Copy {
                    text,
                    ack: "Prompt copied.".to_string(),
                }),
                None => set_error(model, NO_PROMPT.to_string()),
            }
        }

        KeyCode::Char('Y') => {
            cmds.push(Command::Copy {
                text: model.store.export_summary(),
                ack: "Plan copied to your clipboard.".to_string(),
            });
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }

        _ => {}
    }
}

fn set_current_status(model: &mut Model, status: StepStatus) {
    if let Some(index) = model.store.workflow().current_index() {
        model.store.set_step_status(index, status);
    }
}

fn update_input_mode(model: &mut Model, key: KeyEvent, kind: InputKind) {
    match key.code {
        KeyCode::Enter => {
            if kind == InputKind::Name {
                submit_name(model);
                return;
            }

            // Store current field value before submitting
            store_current_field(model, kind);
            model.input_buffer.clear();
            model.mode = Mode::List;
            submit_draft(model);
        }

        KeyCode::Tab => {
            // Cycle to next input field (store current, load next)
            if let Some(next_kind) = kind.next() {
                store_current_field(model, kind);
                model.mode = Mode::Input(next_kind);
                load_field_buffer(model, next_kind);
            }
        }

        KeyCode::Esc => {
            model.input_buffer.clear();
            model.draft = StepPatch::default();
            model.edit_target = None;
            model.mode = Mode::List;
        }

        KeyCode::Backspace => {
            model.input_buffer.pop();
        }

        KeyCode::Char(c) => {
            model.input_buffer.push(c);
        }

        _ => {}
    }
}

fn submit_name(model: &mut Model) {
    let value = std::mem::take(&mut model.input_buffer);
    let name = value.trim();
    let name = if name.is_empty() { DEFAULT_NAME } else { name };
    model.mode = Mode::List;
    if model.store.set_name(name) {
        ylog!("Workflow renamed to {:?}", name);
    }
}

fn submit_draft(model: &mut Model) {
    let draft = std::mem::take(&mut model.draft);
    match model.edit_target.take() {
        Some(EditTarget::New) => {
            let id = model.store.create_step_with(draft);
            ylog!("Step added id={}", id.short());
        }
        Some(EditTarget::Existing(id)) => {
            if model.store.update_step(id, &draft) {
                ylog!("Step edited id={}", id.short());
            } else {
                ylog_debug!("Edit of step {} changed nothing", id.short());
            }
        }
        None => {}
    }
}

/// Store current input buffer into the matching draft field.
fn store_current_field(model: &mut Model, kind: InputKind) {
    let value = std::mem::take(&mut model.input_buffer);
    match kind {
        InputKind::Title => model.draft.title = Some(value),
        InputKind::Tab => model.draft.tab = Some(value),
        InputKind::Instructions => model.draft.instructions = Some(value),
        InputKind::Notes => model.draft.notes = Some(value),
        InputKind::Name => {}
    }
}

/// Load the matching draft field into input buffer.
fn load_field_buffer(model: &mut Model, kind: InputKind) {
    let field = match kind {
        InputKind::Title => &model.draft.title,
        InputKind::Tab => &model.draft.tab,
        InputKind::Instructions => &model.draft.instructions,
        InputKind::Notes => &model.draft.notes,
        InputKind::Name => &None,
    };
    model.input_buffer = field.clone().unwrap_or_default();
}

fn update_template_mode(model: &mut Model, key: KeyEvent) {
    let count = templates::all().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 {
                model.template_selected = (model.template_selected + 1) % count;
            }
        }

        KeyCode::Char('k') | KeyCode::Up => {
            if count > 0 {
                model.template_selected = model
                    .template_selected
                    .checked_sub(1)
                    .unwrap_or(count - 1);
            }
        }

        KeyCode::Enter => {
            model.mode = Mode::List;
            if let Some(template) = templates::all().get(model.template_selected) {
                model.store.create_step(Some(template));
                set_info(model, format!("Added \"{}\" to your plan.", template.title));
            }
        }

        KeyCode::Esc | KeyCode::Char('q') => {
            model.mode = Mode::List;
        }

        _ => {}
    }
}

fn update_confirm_mode(model: &mut Model, key: KeyEvent, kind: ConfirmKind) {
    model.mode = Mode::List;
    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) {
        apply_confirmed(model, kind);
    }
}

fn apply_confirmed(model: &mut Model, kind: ConfirmKind) {
    match kind {
        ConfirmKind::DeleteStep(id) => {
            if let Some(step) = model.store.remove_step(id) {
                set_info(model, format!("Removed \"{}\".", step.display_title()));
            }
        }
        ConfirmKind::ClearAll => {
            model.store.clear_all();
            set_info(model, "Workflow cleared.");
        }
    }
}
