//! Region Ping Tester - Main CLI Application
//!
//! Pings a game-server region with the system ping utility and streams each
//! round-trip time as it arrives. Ctrl-C stops the test cleanly.

use clap::Parser;
use region_ping_tester::{app::App, cli::Cli, error::AppError};
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if cli.version {
        println!("{}", Cli::version_info());
        return;
    }

    let use_color = !cli.json && cli.use_colors();
    let verbose = cli.verbose || cli.debug;

    if let Err(message) = cli.validate() {
        let error = AppError::config(message);
        eprintln!("{}", error.format_for_console(use_color));
        process::exit(error.exit_code());
    }

    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("{}", e.format_for_console(use_color));
            if verbose {
                eprintln!();
                eprintln!("{}", e.user_friendly_message());
            }
            process::exit(e.exit_code());
        }
    }
}
