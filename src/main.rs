use std::io::{self, stdout, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use yit::app::LogicThread;
use yit::config::Config;
use yit::render::RenderState;
use yit::storage::{validate_key, FileStore};
use yit::workflow::{StepPatch, StepStatus, WorkflowStore};
use yit::{clipboard, templates, ui, ylog, Error, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// yit - guided step-by-step workflow tracker
#[derive(Parser, Debug)]
#[command(name = "yit")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    YIT_DEBUG=1     Enable debug logging (alternative to --debug)\n    YIT_HOME=DIR    Use DIR instead of ~/.yit")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.yit/yit.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Storage key of the workflow to open
    #[arg(short = 'k', long)]
    pub key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Step fields settable from the command line.
#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct FieldArgs {
    /// Step title
    #[arg(long)]
    pub title: Option<String>,

    /// Tool or browser tab the step happens in
    #[arg(long)]
    pub tab: Option<String>,

    /// Prompt or instructions to reuse
    #[arg(long)]
    pub instructions: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl FieldArgs {
    fn into_patch(self) -> StepPatch {
        StepPatch {
            title: self.title,
            tab: self.tab,
            instructions: self.instructions,
            notes: self.notes,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List steps with their status
    List,

    /// Show one step in full (defaults to the current step)
    Show {
        /// 1-based step number
        step: Option<usize>,
    },

    /// Append a step and make it current
    Add {
        /// Prefill from a template (see `yit templates`)
        #[arg(long)]
        template: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Change fields of an existing step
    Edit {
        /// 1-based step number
        step: usize,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Set a step's status
    Status {
        /// 1-based step number
        step: usize,

        /// pending, active or done
        status: StepStatus,
    },

    /// Toggle the current step done and move on
    Done,

    /// Move to the next step
    Next,

    /// Move to the previous step
    Prev,

    /// Make a step current
    Select {
        /// 1-based step number
        step: usize,
    },

    /// Delete a step
    Remove {
        /// 1-based step number
        step: usize,
    },

    /// Set every step back to pending
    Reset,

    /// Delete every step and restart the workflow
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Rename the workflow
    Rename {
        name: String,
    },

    /// List the prompt templates
    Templates,

    /// Print the plain-text summary of the workflow
    Export {
        /// Also put it on the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Copy a step's prompt to the clipboard
    Copy {
        /// 1-based step number
        step: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    yit::log::init_with_debug(cli.debug, &Config::yit_dir()?);

    let config = Config::load_or_default();
    let key = cli
        .key
        .clone()
        .unwrap_or_else(|| config.effective_storage_key().to_string());
    let mut store = open_store(&config, &key)?;

    match cli.command {
        Some(Command::Clear { yes: false }) if config.confirm_destructive => {
            if !confirm(&format!(
                "This will delete all {} step(s) in '{}'.",
                store.workflow().len(),
                store.workflow().name()
            ))? {
                println!("\nClear cancelled.");
                return Ok(());
            }
            run_command(Command::Clear { yes: true }, &mut store, &config, &mut stdout())
        }
        Some(command) => run_command(command, &mut store, &config, &mut stdout()),
        None => run_tui(store, config, cli.debug),
    }
}

fn open_store(config: &Config, key: &str) -> Result<WorkflowStore> {
    validate_key(key)?;
    let storage = FileStore::new(config.data_path()?);
    Ok(WorkflowStore::open(Box::new(storage), key))
}

fn confirm(warning: &str) -> Result<bool> {
    println!("\x1b[33mWarning: {}\x1b[0m", warning);
    print!("Continue? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Resolve a 1-based step number from the command line.
fn step_index(store: &WorkflowStore, step: usize) -> Result<usize> {
    let len = store.workflow().len();
    if step == 0 || step > len {
        return Err(Error::StepNotFound(format!(
            "{} (workflow has {} step(s))",
            step, len
        )));
    }
    Ok(step - 1)
}

fn run_command(
    command: Command,
    store: &mut WorkflowStore,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    ylog!("CLI command: {:?} key={}", command, store.key());

    match command {
        Command::List => print_list(store, out)?,

        Command::Show { step } => {
            let index = match step {
                Some(n) => step_index(store, n)?,
                None => match store.workflow().current_index() {
                    Some(i) => i,
                    None => {
                        writeln!(out, "{}", yit::workflow::EMPTY_SUMMARY)?;
                        return Ok(());
                    }
                },
            };
            print_step(store, index, out)?;
        }

        Command::Add { template, fields } => {
            let template = template.as_deref().map(templates::require).transpose()?;
            let patch = fields.into_patch();
            let id = match template {
                Some(t) => {
                    let id = store.create_step(Some(t));
                    if !patch.is_empty() {
                        store.update_step(id, &patch);
                    }
                    id
                }
                None => store.create_step_with(patch),
            };
            let workflow = store.workflow();
            if let (Some(index), Some(step)) = (workflow.resolve(id), workflow.step(id)) {
                writeln!(out, "Added step {}: {}", index + 1, step.display_title())?;
            }
        }

        Command::Edit { step, fields } => {
            let index = step_index(store, step)?;
            let patch = fields.into_patch();
            if patch.is_empty() {
                return Err(Error::Validation(
                    "nothing to change; pass --title, --tab, --instructions or --notes"
                        .to_string(),
                ));
            }
            if store.update_step(index, &patch) {
                writeln!(out, "Updated step {}", step)?;
            } else {
                writeln!(out, "Step {} unchanged", step)?;
            }
        }

        Command::Status { step, status } => {
            let index = step_index(store, step)?;
            store.set_step_status(index, status);
            writeln!(out, "Step {} is now {}", step, status.label())?;
        }

        Command::Done => {
            let Some(index) = store.workflow().current_index() else {
                writeln!(out, "{}", yit::workflow::EMPTY_SUMMARY)?;
                return Ok(());
            };
            store.toggle_current_done();
            let status = store.workflow().steps()[index].status;
            writeln!(out, "Step {} is now {}", index + 1, status.label())?;
            print_current(store, out)?;
        }

        Command::Next => {
            if !store.advance() {
                writeln!(out, "Already at the last step")?;
            }
            print_current(store, out)?;
        }

        Command::Prev => {
            if !store.retreat() {
                writeln!(out, "Already at the first step")?;
            }
            print_current(store, out)?;
        }

        Command::Select { step } => {
            let index = step_index(store, step)?;
            store.select(index);
            print_current(store, out)?;
        }

        Command::Remove { step } => {
            let index = step_index(store, step)?;
            if let Some(removed) = store.remove_step(index) {
                writeln!(out, "Removed step {}: {}", step, removed.display_title())?;
            }
        }

        Command::Reset => {
            store.reset_all_statuses();
            writeln!(out, "All steps reset to pending")?;
        }

        Command::Clear { .. } => {
            store.clear_all();
            writeln!(out, "Workflow cleared")?;
        }

        Command::Rename { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::Validation("workflow name cannot be empty".to_string()));
            }
            store.set_name(name);
            writeln!(out, "Workflow renamed to '{}'", name)?;
        }

        Command::Templates => {
            for template in templates::all() {
                writeln!(out, "{:<18} {} ({})", template.id, template.title, template.category)?;
                writeln!(out, "{:<18} {}", "", template.description)?;
            }
        }

        Command::Export { copy } => {
            let summary = store.export_summary();
            writeln!(out, "{}", summary)?;
            if copy {
                clipboard::copy(&summary, config)?;
                writeln!(out, "\nPlan copied to your clipboard.")?;
            }
        }

        Command::Copy { step } => {
            let index = step_index(store, step)?;
            let Some(prompt) = store.workflow().prompt_payload(index) else {
                return Err(Error::Validation(
                    "No prompt to copy yet. Add text first.".to_string(),
                ));
            };
            clipboard::copy(prompt, config)?;
            writeln!(out, "Prompt copied.")?;
        }
    }

    if let Some(err) = store.take_persist_error() {
        eprintln!("Warning: failed to save workflow: {}", err);
    }
    Ok(())
}

fn print_list(store: &WorkflowStore, out: &mut impl Write) -> Result<()> {
    let workflow = store.workflow();
    writeln!(out, "{}", workflow.name())?;
    writeln!(out, "{}", workflow.progress())?;
    if workflow.is_empty() {
        writeln!(out, "\n{}", yit::workflow::EMPTY_SUMMARY)?;
        return Ok(());
    }
    writeln!(out)?;
    for (i, step) in workflow.steps().iter().enumerate() {
        let marker = if workflow.current_index() == Some(i) { ">" } else { " " };
        writeln!(
            out,
            "{} {:>3}. {:<12} {}",
            marker,
            i + 1,
            step.status.label(),
            step.display_title()
        )?;
    }
    Ok(())
}

fn print_step(store: &WorkflowStore, index: usize, out: &mut impl Write) -> Result<()> {
    let workflow = store.workflow();
    let Some(step) = workflow.steps().get(index) else {
        return Err(Error::StepNotFound((index + 1).to_string()));
    };
    let or_none = |s: &str| {
        if s.trim().is_empty() {
            "(none)".to_string()
        } else {
            s.to_string()
        }
    };
    writeln!(
        out,
        "Step {} of {}: {}",
        index + 1,
        workflow.len(),
        step.display_title()
    )?;
    writeln!(out, "Status: {}", step.status.label())?;
    writeln!(out, "Tab:    {}", or_none(&step.tab))?;
    writeln!(out, "Prompt:\n{}", or_none(&step.instructions))?;
    writeln!(out, "Notes:\n{}", or_none(&step.notes))?;
    Ok(())
}

fn print_current(store: &WorkflowStore, out: &mut impl Write) -> Result<()> {
    let workflow = store.workflow();
    if let (Some(i), Some(step)) = (workflow.current_index(), workflow.current_step()) {
        writeln!(
            out,
            "Current: step {} of {}: {}",
            i + 1,
            workflow.len(),
            step.display_title()
        )?;
    }
    Ok(())
}

fn run_tui(store: WorkflowStore, config: Config, debug: bool) -> Result<()> {
    if debug {
        ylog!("yit starting (debug mode enabled)");
    } else {
        ylog!("yit starting");
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let (state_tx, state_rx) = crossbeam_channel::bounded::<RenderState>(1);

    let shutdown_clone = shutdown.clone();
    let logic_handle =
        thread::spawn(move || LogicThread::run(store, config, state_tx, shutdown_clone));

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let logic_result = logic_handle
        .join()
        .unwrap_or_else(|_| Err(Error::Validation("logic thread panicked".to_string())));
    restore_terminal(&mut terminal)?;
    ylog!("yit exiting");
    if debug {
        if let Some(path) = yit::log::log_path() {
            eprintln!("Debug log: {}", path.display());
        }
    }
    result.and(logic_result)
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
