mod actions;
mod app;
mod config;
mod editor;
mod navigator;
mod panels;
mod request;
mod rows;
mod schema_rows;
mod state;
mod swagger;
mod types;
mod ui;
mod viewport;

use app::App;
use color_eyre::Result;
use config::Config;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
};
use std::io;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "swagger-nav-tui.log";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // The terminal belongs to the UI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::load()?;

    // A source given on the command line replaces the configured one for this session
    if let Some(source) = std::env::args().nth(1) {
        config::validate_source(&source).map_err(|e| color_eyre::eyre::eyre!(e))?;
        let base_url = std::env::args().nth(2);
        if let Some(base_url) = &base_url {
            config::validate_base_url(base_url).map_err(|e| color_eyre::eyre::eyre!(e))?;
        }
        config.set_spec_source(source, base_url);
    }
    tracing::info!(
        spec_source = ?config.server.spec_source,
        base_url = ?config.server.base_url,
        "starting"
    );

    let terminal = ratatui::init();
    execute!(io::stdout(), EnableBracketedPaste)?;
    let app_result = App::new(config).run(terminal).await;
    if let Err(e) = execute!(io::stdout(), DisableBracketedPaste) {
        tracing::warn!(error = %e, "could not disable bracketed paste");
    }
    ratatui::restore();
    app_result
}
