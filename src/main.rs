use clap::Parser;
use flightdeck::core::config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "flightdeck", about = "Terminal client for the flight assistant")]
struct Args {
    /// Backend base URL (overrides config file and FLIGHTDECK_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to flightdeck.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("flightdeck.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("flightdeck: {e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(&file_config, args.base_url.as_deref());

    log::info!("Flightdeck starting up, backend: {}", resolved.base_url);

    flightdeck::tui::run(resolved)
}
