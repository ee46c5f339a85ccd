mod app;
mod appearance;
mod config;
mod error;
mod logging;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;
    tracing::info!("starting alarmist");

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
