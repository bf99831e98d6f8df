use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};

use crate::clipboard;
use crate::config::Config;
use crate::render::RenderState;
use crate::tea::{update, Command, Message, Model};
use crate::workflow::WorkflowStore;
use crate::{ylog_debug, ylog_warn, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct LogicThread;

impl LogicThread {
    /// Own the store and drive the update loop until quit or shutdown.
    pub fn run(
        store: WorkflowStore,
        config: Config,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        ylog_debug!(
            "LogicThread::run key={} steps={}",
            store.key(),
            store.workflow().len()
        );
        let mut model = Model::new(store, config);
        send_state(&state_tx, &model);
        model.dirty = false;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }

            let msg = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Message::Key(key),
                Event::Resize(w, h) => Message::Resize(w, h),
                _ => continue,
            };

            if dispatch(&mut model, msg) {
                shutdown.store(true, Ordering::Relaxed);
                break;
            }

            if model.dirty {
                send_state(&state_tx, &model);
                model.dirty = false;
            }
        }

        ylog_debug!(
            "LogicThread exiting rev={} steps={}",
            model.store.revision(),
            model.store.workflow().len()
        );
        Ok(())
    }
}

/// What the runtime does after executing a command.
enum Effect {
    /// Feed this message back through `update`.
    Next(Message),
    Quit,
}

/// Feed one message through `update`, executing the commands it produces
/// and any follow-up messages they yield. Returns `true` on quit.
pub fn dispatch(model: &mut Model, msg: Message) -> bool {
    let mut queue = VecDeque::from([msg]);
    while let Some(msg) = queue.pop_front() {
        for cmd in update(model, msg) {
            match execute_command(model, cmd) {
                Effect::Next(follow_up) => queue.push_back(follow_up),
                Effect::Quit => return true,
            }
        }
    }
    false
}

fn execute_command(model: &mut Model, cmd: Command) -> Effect {
    match cmd {
        Command::Copy { text, ack } => {
            ylog_debug!("Command::Copy bytes={}", text.len());
            match clipboard::copy(&text, &model.config) {
                Ok(method) => {
                    ylog_debug!("Copied via {:?}", method);
                    Effect::Next(Message::Copied(ack))
                }
                Err(e) => {
                    ylog_warn!("Clipboard copy failed: {}", e);
                    Effect::Next(Message::CopyFailed(e.to_string()))
                }
            }
        }

        Command::Quit => {
            ylog_debug!("Command::Quit");
            Effect::Quit
        }
    }
}

fn send_state(state_tx: &Sender<RenderState>, model: &Model) {
    let _ = state_tx.try_send(model.snapshot());
}
