use crate::cli::args::{Args, Command, ConfigCommand};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::event::SessionEvent;
use crate::core::session::SerialSession;
use crate::domain::config::LinescopeConfig;
use crate::domain::error::LinescopeError;
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::ports::list_ports;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Execute CLI command
pub async fn execute_command(args: Args) -> Result<(), LinescopeError> {
    let writer = ConsoleWriter::new(args.output.clone());

    let config_manager = ConfigManager::new()?;
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(Path::new(config_path))?
    } else {
        config_manager.load_config()?
    };

    if !args.quiet {
        let directive = if args.verbose {
            "linescope=debug,info".to_string()
        } else {
            format!("linescope={},warn", config.log_level)
        };
        init_logging(&directive).map_err(|e| LinescopeError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;
    }

    match args.command {
        Command::List => {
            writer.write_ports(&list_ports())?;
            Ok(())
        }
        Command::Monitor { port, baud } => {
            let baud = baud.unwrap_or(config.default_baud);
            monitor(&writer, &config, &port, baud).await
        }
        Command::Send { data, port, baud } => {
            let baud = baud.unwrap_or(config.default_baud);
            send_once(&writer, &config, &port, baud, &data).await
        }
        Command::Config { command } => {
            execute_config_command(command, &writer, &config, &config_manager)
        }
        Command::Version => {
            writer.write_message(&format!("linescope {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

fn execute_config_command(
    command: ConfigCommand,
    writer: &ConsoleWriter,
    config: &LinescopeConfig,
    config_manager: &ConfigManager,
) -> Result<(), LinescopeError> {
    match command {
        ConfigCommand::Show => {
            let rendered = toml::to_string_pretty(config).map_err(|e| LinescopeError::Config {
                message: format!("Failed to serialize config: {}", e),
            })?;
            writer.write_message(&rendered)?;
            Ok(())
        }
        ConfigCommand::Init { output } => {
            let path = match &output {
                Some(path) => PathBuf::from(path),
                None => config_manager.get_global_config_path().clone(),
            };
            config_manager.save_config_to_path(&path, &LinescopeConfig::default())?;
            writer.write_message(&format!(
                "Wrote default configuration to {}",
                path.display()
            ))?;
            Ok(())
        }
    }
}

/// Interactive session host: incoming events to stdout, stdin lines to the
/// port, until Ctrl+C or stdin EOF. The session is force-closed on the way
/// out.
async fn monitor(
    writer: &ConsoleWriter,
    config: &LinescopeConfig,
    port: &str,
    baud: u32,
) -> Result<(), LinescopeError> {
    let (mut session, mut events) =
        SerialSession::new(config.event_buffer, &config.timestamp_format);

    let outcome = session.open(port, baud).await;
    if !outcome.success {
        writer.write_error(&outcome.message)?;
        return Err(LinescopeError::Session {
            message: outcome.message,
        });
    }
    writer.write_message(&outcome.message)?;

    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Data(data)) => {
                    writer.write_message(&format!("[{}] {}", data.timestamp, data.data))?;
                }
                Some(SessionEvent::Error(error)) => {
                    writer.write_error(&error.message)?;
                }
                None => break,
            },
            line = stdin_lines.next_line() => match line {
                Ok(Some(line)) => {
                    let outcome = session.write(&line).await;
                    if !outcome.success {
                        writer.write_error(&outcome.message)?;
                    }
                }
                Ok(None) => break,
                Err(e) => return Err(e.into()),
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let outcome = session.close().await;
    writer.write_message(&outcome.message)?;
    Ok(())
}

/// One-shot host: open, write one line, close.
async fn send_once(
    writer: &ConsoleWriter,
    config: &LinescopeConfig,
    port: &str,
    baud: u32,
    data: &str,
) -> Result<(), LinescopeError> {
    // Receiver must stay alive for the session's lifetime even though a
    // one-shot send never reads events
    let (mut session, _events) =
        SerialSession::new(config.event_buffer, &config.timestamp_format);

    let outcome = session.open(port, baud).await;
    if !outcome.success {
        writer.write_error(&outcome.message)?;
        return Err(LinescopeError::Session {
            message: outcome.message,
        });
    }

    let outcome = session.write(data).await;
    if !outcome.success {
        writer.write_error(&outcome.message)?;
        let _ = session.close().await;
        return Err(LinescopeError::Session {
            message: outcome.message,
        });
    }
    writer.write_message(&outcome.message)?;

    let outcome = session.close().await;
    writer.write_message(&outcome.message)?;
    Ok(())
}
