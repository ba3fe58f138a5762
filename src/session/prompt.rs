use super::engine::Session;
use super::mode::Mode;
use crate::ui;
use anyhow::Result;
use crossterm::style::Stylize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Editor, Helper};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Line editor settings
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub history_path: Option<PathBuf>,
    pub history_size: usize,
}

/// Feeds rustyline's Tab completion from the session
struct ShellHelper {
    session: Rc<RefCell<Session>>,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let width = crossterm::terminal::size()
            .map(|(w, _)| w as usize)
            .unwrap_or(80);
        let completion = self.session.borrow_mut().complete(&line[..pos], width);
        let pairs = completion
            .suggestions
            .into_iter()
            .map(|s| Pair {
                display: s.display,
                replacement: s.text,
            })
            .collect();
        Ok((completion.start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Interactive loop. Owns the session (and its mode stack) until `quit` or Ctrl-D.
pub fn run_interactive(session: Session, options: &PromptOptions) -> Result<()> {
    println!("{}", "Vyom shell".bold().magenta());
    println!("Type 'help' for available commands, 'quit' to exit. Tab completes.");
    println!();
    run(session, options, false)
}

/// Keep prompting until every sub-dialogue is closed and the session is back
/// at Root. Used when a one-shot command needs the user to pick something.
pub fn run_until_root(session: Session, options: &PromptOptions) -> Result<()> {
    run(session, options, true)
}

fn at_root(session: &Session) -> bool {
    session.modes().is_at_base() && session.modes().base() == Mode::Root
}

fn run(session: Session, options: &PromptOptions, until_root: bool) -> Result<()> {
    let session = Rc::new(RefCell::new(session.with_echo(true)));

    let mut builder = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(false);
    if options.history_size > 0 {
        builder = builder.max_history_size(options.history_size)?;
    }
    let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::with_config(builder.build())?;
    rl.set_helper(Some(ShellHelper {
        session: Rc::clone(&session),
    }));

    if let Some(path) = &options.history_path {
        // Missing on first run
        let _ = rl.load_history(path);
    }

    let outcome = loop {
        if until_root && at_root(&session.borrow()) {
            break Ok(());
        }

        let prompt = session.borrow().prompt();
        match rl.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                let mut session = session.borrow_mut();
                session.execute(&line, None);
                for message in session.take_messages() {
                    ui::print_message(&message);
                }
                if !session.is_running() {
                    break Ok(());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C - drop the line, keep the session
                println!();
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D - exit gracefully
                println!();
                break Ok(());
            }
            Err(err) => break Err(err.into()),
        }
    };

    // Ctrl-D mid-dialogue or quitting after a failed flush
    session.borrow_mut().discard_pending();

    if let Some(path) = &options.history_path {
        if let Err(e) = rl.save_history(path) {
            tracing::warn!(error = %e, "failed to save history");
        }
    }
    outcome
}
