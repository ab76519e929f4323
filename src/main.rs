/*!
 * Spike CLI - resilient calls against a line-protocol service
 */

use clap::{Parser, Subcommand};
use spike::{
    config::{ClientConfig, LogLevel},
    csv_import::CsvImporter,
    error::{Result, SpikeError, EXIT_SUCCESS},
    logging, LineService,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spike")]
#[command(version, about = "Resilient client for line-protocol services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Service endpoint (host:port)
    #[arg(short = 'e', long, global = true)]
    endpoint: Option<String>,

    /// Total number of attempts per operation
    #[arg(short = 'a', long, global = true)]
    attempts: Option<u32>,

    /// Pause between attempts in milliseconds
    #[arg(long, global = true)]
    cooldown_ms: Option<u64>,

    /// Log level, by name (warn) or description ("Warnings and errors")
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Write logs to a file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one line and print the reply
    Send {
        /// Request line
        message: String,
    },

    /// Check the service answers PING with PONG
    Ping,

    /// Send every request line of a CSV file (message[,expected reply])
    Import {
        /// Request file
        file: PathBuf,

        /// Leading lines to ignore (e.g. a header)
        #[arg(long, default_value_t = 0)]
        skip_lines: usize,

        /// Column delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },

    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Output path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match cli.command {
        Commands::Send { message } => {
            let mut service = LineService::from_config(&config)?;
            let reply = service.send(&message)?;
            println!("{}", reply);
        }
        Commands::Ping => {
            let mut service = LineService::from_config(&config)?;
            service.ping()?;
            println!("PONG from {}", config.endpoint);
        }
        Commands::Import {
            file,
            skip_lines,
            delimiter,
        } => {
            let importer = CsvImporter::with_delimiter(delimiter)?;
            let mut service = LineService::from_config(&config)?;
            let counters = service.send_batch(&file, &importer, skip_lines)?;
            println!("{}", counters);
            if counters.failed > 0 {
                return Err(SpikeError::BatchIncomplete {
                    failed: counters.failed,
                    total: counters.total(),
                });
            }
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                return Err(SpikeError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            config.to_file(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Defaults, then the config file, then command-line flags
fn effective_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    if let Some(ref endpoint) = cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(attempts) = cli.attempts {
        config.retry_attempts = attempts;
    }
    if let Some(cooldown_ms) = cli.cooldown_ms {
        config.retry_cooldown_ms = cooldown_ms;
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = LogLevel::parse_or(level, config.log_level);
    }
    if cli.verbose {
        config.verbose = true;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file.clone();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "spike",
            "--endpoint",
            "10.0.0.5:9000",
            "--attempts",
            "5",
            "--cooldown-ms",
            "10",
            "-v",
            "send",
            "hello",
        ]);

        let config = effective_config(&cli).unwrap();
        assert_eq!(config.endpoint, "10.0.0.5:9000");
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_cooldown_ms, 10);
        assert!(config.verbose);
        assert!(matches!(cli.command, Commands::Send { ref message } if message == "hello"));
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spike.toml");
        std::fs::write(&path, "endpoint = \"file.host:1000\"\nretry_attempts = 2\n").unwrap();

        let cli = Cli::parse_from([
            "spike",
            "--config",
            path.to_str().unwrap(),
            "--attempts",
            "7",
            "ping",
        ]);

        let config = effective_config(&cli).unwrap();
        assert_eq!(config.endpoint, "file.host:1000");
        assert_eq!(config.retry_attempts, 7);
    }

    #[test]
    fn test_log_level_flag() {
        let cli = Cli::parse_from(["spike", "--log-level", "Warnings and errors", "ping"]);
        assert_eq!(effective_config(&cli).unwrap().log_level, LogLevel::Warn);

        let cli = Cli::parse_from(["spike", "--log-level", "TRACE", "ping"]);
        assert_eq!(effective_config(&cli).unwrap().log_level, LogLevel::Trace);

        let cli = Cli::parse_from(["spike", "--log-level", "loud", "ping"]);
        assert_eq!(effective_config(&cli).unwrap().log_level, LogLevel::Info);
    }

    #[test]
    fn test_import_command_parses() {
        let cli = Cli::parse_from([
            "spike",
            "import",
            "requests.csv",
            "--skip-lines",
            "1",
            "--delimiter",
            ";",
        ]);
        match cli.command {
            Commands::Import {
                file,
                skip_lines,
                delimiter,
            } => {
                assert_eq!(file, PathBuf::from("requests.csv"));
                assert_eq!(skip_lines, 1);
                assert_eq!(delimiter, ';');
            }
            _ => panic!("Expected import command"),
        }
    }

    #[test]
    fn test_zero_attempts_flag_rejected() {
        let cli = Cli::parse_from(["spike", "--attempts", "0", "ping"]);
        assert!(matches!(effective_config(&cli), Err(SpikeError::Config(_))));
    }
}
