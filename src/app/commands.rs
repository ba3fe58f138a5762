use super::cli::CliCommand;
use super::config::{AppConfig, PersistentState, UserConfig};
use super::timespec::{parse_time_spec, parse_volume};
use crate::player::RemotePlayer;
use crate::session::{self, Command, PromptOptions, Session};
use anyhow::Result;
use std::sync::Arc;

/// Everything a top-level command needs
pub struct Context {
    pub app: AppConfig,
    pub remote: Arc<dyn RemotePlayer>,
    pub config: UserConfig,
    pub state: PersistentState,
}

impl Context {
    fn session(&self) -> Session {
        Session::new(Arc::clone(&self.remote)).with_state(self.state.clone(), self.app.state_path())
    }

    fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            history_path: Some(self.app.history_path()),
            history_size: self.config.history_size,
        }
    }
}

/// Route a parsed CLI command to its entry point
pub fn dispatch(ctx: &Context, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Shell => shell(ctx),
        CliCommand::GenerateConfig => generate_config(),
        CliCommand::AddQueue { query } => queue(ctx, Command::AddQueue(query.join(" "))),
        CliCommand::SetQueue { query } => queue(ctx, Command::SetQueue(query.join(" "))),
        CliCommand::AddFolder { path } => one_shot(ctx, Command::AddFolder(path)),
        CliCommand::Mount { path } => one_shot(ctx, Command::Mount(path)),
        CliCommand::Folders => one_shot(ctx, Command::Folders),
        CliCommand::Sync => one_shot(ctx, Command::Sync),
        CliCommand::Pause => one_shot(ctx, Command::Pause),
        CliCommand::Resume => one_shot(ctx, Command::Resume),
        CliCommand::Stop => one_shot(ctx, Command::Stop),
        CliCommand::Next => one_shot(ctx, Command::Next),
        CliCommand::Prev => one_shot(ctx, Command::Prev),
        CliCommand::Seek { time } => one_shot(ctx, Command::Seek(parse_time_spec(&time)?)),
        CliCommand::Volume { level } => one_shot(ctx, Command::Volume(parse_volume(&level)?)),
        CliCommand::Status => one_shot(ctx, Command::Status),
    }
}

/// Interactive prompt; owns its mode stack until the user quits
pub fn shell(ctx: &Context) -> Result<()> {
    session::run_interactive(ctx.session(), &ctx.prompt_options())
}

/// `add-queue`/`set-queue`: resolve right away, and only prompt if the
/// query needs disambiguating or the queue is built line by line.
pub fn queue(ctx: &Context, command: Command) -> Result<()> {
    let mut session = ctx.session().with_echo(true);
    session.run(command, None)?;
    if session.modes().is_at_base() && session.mode() == session::Mode::Root {
        return Ok(());
    }
    session::run_until_root(session, &ctx.prompt_options())
}

/// Any other command: one remote call and a confirmation line
pub fn one_shot(ctx: &Context, command: Command) -> Result<()> {
    ctx.session().with_echo(true).run(command, None)
}

pub fn generate_config() -> Result<()> {
    print!("{}", AppConfig::default_config_toml()?);
    Ok(())
}
