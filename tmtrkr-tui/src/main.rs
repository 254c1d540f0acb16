mod api;
mod app;
mod bootstrap;
mod cli;
mod config;
mod format;
mod logging;
mod runtime;
mod session_store;
mod types;
mod ui;

use anyhow::{bail, Context, Result};
use api::ApiClient;
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::TrackerConfig;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use session_store::Session;
use std::io;
use time::UtcOffset;
use tracing::{info, warn};

fn main() -> Result<()> {
    // The local offset can only be read while the process is single-threaded.
    let detected_offset = UtcOffset::current_local_offset().ok();

    // Load environment variables from .env.tui
    dotenvy::from_filename(".env.tui").ok();

    let cli = Cli::parse();
    let config = TrackerConfig::load()?;
    logging::init(&config.log_level)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(run(cli.command.unwrap_or(Commands::Run), config, detected_offset))
}

async fn run(command: Commands, config: TrackerConfig, detected_offset: Option<UtcOffset>) -> Result<()> {
    match command {
        Commands::ConfigPath => {
            let path = TrackerConfig::ensure_exists()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Login { user } => login(&config, &user).await,
        Commands::Logout => logout(&config).await,
        Commands::Users => list_users(&config).await,
        Commands::Dev => {
            let client = ApiClient::dev()?;
            run_tui(&config, detected_offset, &client, None, true).await
        }
        Commands::Run => {
            let Some(session) = session_store::load_session()? else {
                bail!("Not logged in. Run `tmtrkr-tui login <user>` first.");
            };
            let client = ApiClient::new(&config.api_url, Some(session.token))?;
            run_tui(&config, detected_offset, &client, Some(session.name), false).await
        }
    }
}

async fn login(config: &TrackerConfig, user: &str) -> Result<()> {
    let client = ApiClient::new(&config.api_url, None)?;
    let token = client
        .issue_token(user)
        .await
        .with_context(|| format!("Failed to log in as {} at {}", user, config.api_url))?;
    session_store::save_session(&Session {
        name: user.to_string(),
        token,
    })?;
    info!(user, "session saved");
    println!("Logged in as {}.", user);
    Ok(())
}

async fn logout(config: &TrackerConfig) -> Result<()> {
    if let Some(session) = session_store::load_session()? {
        let client = ApiClient::new(&config.api_url, Some(session.token))?;
        if let Err(e) = client.logout().await {
            warn!(error = %e, "server logout failed");
            eprintln!("Warning: server logout failed: {}", e);
        }
    }
    session_store::clear_session()?;
    println!("Logged out.");
    Ok(())
}

async fn list_users(config: &TrackerConfig) -> Result<()> {
    let token = session_store::load_session()?.map(|s| s.token);
    let client = ApiClient::new(&config.api_url, token)?;
    for user in client.get_users().await? {
        println!("{}\t{}", user.id, user.name);
    }
    Ok(())
}

async fn run_tui(
    config: &TrackerConfig,
    detected_offset: Option<UtcOffset>,
    client: &ApiClient,
    user: Option<String>,
    dev_mode: bool,
) -> Result<()> {
    let mut app = App::new(config, config.local_zone(detected_offset)?);
    app.user = user;
    app.dev_mode = dev_mode;

    info!(dev_mode, api_url = %config.api_url, "starting");
    bootstrap::initialize_app_state(&mut app, client).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
