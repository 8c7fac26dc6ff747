pub mod app;
pub mod branding;
pub mod color;
mod config;
pub mod context;
pub mod error;
pub mod layout;
pub mod logging;
pub mod storage;
pub mod theme;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by higher-level integrations and CLI bindings.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting API Portal");

    let mut app = app::App::new();
    app.start()?;

    tracing::info!("portal shut down cleanly");
    Ok(())
}
