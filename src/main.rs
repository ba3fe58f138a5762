use anyhow::Result;
use clap::Parser;
use vyomsh::app::cli::{Args, CliCommand};
use vyomsh::app::commands::{self, Context};
use vyomsh::app::config::AppConfig;
use vyomsh::app::logging;
use vyomsh::player;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let args = Args::parse();

    // 1. Logging goes to a file, the terminal belongs to the prompt 📝
    let app = AppConfig::new();
    let _log_guard = logging::init(app.dir());

    // 2. Config + saved state, CLI flags win over config.toml
    let (mut config, state) = app.load();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    tracing::info!(host = %config.host, port = config.port, "starting");

    // 3. Connect lazily; nothing talks to MPD until a command needs it 🔌
    let remote = player::get_player(&config, &state);
    let ctx = Context {
        app,
        remote,
        config,
        state,
    };

    commands::dispatch(&ctx, args.command.unwrap_or(CliCommand::Shell))
}
