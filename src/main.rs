use clap::Parser;
use hardena::cli::Cli;
use hardena::ui;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    if let Err(e) = hardena::run_command(cli).await {
        eprintln!("{}", ui::error(&format!("Error: {}", e)));
        process::exit(1);
    }
}
