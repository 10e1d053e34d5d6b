use anyhow::Result;
use colored::Colorize;
use nifty_option_chain::api_server_axum;
use nifty_option_chain::app_config::AppConfig;
use nifty_option_chain::logging;
use nifty_option_chain::NSEClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    println!("{}", "=".repeat(60).blue());
    println!("{}", "NIFTY Option Chain".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    let app_config = AppConfig::from_env();
    app_config.validate()?;

    // One client for the life of the process, handed to the router state
    let client = NSEClient::new()?;
    info!(url = client.url(), "Upstream configured");

    api_server_axum::start_server(&app_config, client).await
}
