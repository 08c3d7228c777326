// Linescope - Serial Port Line Monitor
use clap::Parser;
use linescope::cli::args::Args;
use linescope::cli::commands::execute_command;
use linescope::domain::error::LinescopeError;

#[tokio::main]
async fn main() -> Result<(), LinescopeError> {
    let args = Args::parse();

    match execute_command(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
