mod app;
mod config;
mod field;
mod input;
mod policy;
mod render;
mod sim;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::Settings::parse();
    config::init_logging(settings.log_file.as_deref())?;
    app::run(settings).await
}
