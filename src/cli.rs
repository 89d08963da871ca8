use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use crate::error::{ScenarioPadError, ScenarioPadResult};
use crate::scenario::DEFAULT_STORAGE_KEY;
use crate::storage::validate_key;

#[derive(Parser, Debug)]
#[command(
    name = "scenariopad",
    about = "Author small input/output scenario datasets in the terminal",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the persisted dataset
    #[arg(long, env = "SCENARIOPAD_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage key the dataset is saved under
    #[arg(long, default_value = DEFAULT_STORAGE_KEY, global = true)]
    pub storage_key: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Output file for logs (interactive mode only)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// How long notifications stay visible, in milliseconds
    #[arg(long, default_value = "3000")]
    pub notification_ms: u64,

    /// Use an in-process clipboard instead of the system one
    #[arg(long)]
    pub memory_clipboard: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive editor (default)
    Tui,

    /// Write the dataset as pretty JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Replace the dataset with a JSON document
    Import {
        /// Input file, or `-` for stdin
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Remove the persisted dataset so the next start uses the sample
    Reset,

    /// Print the location of the persisted dataset
    Path,
}

/// Settings resolved once from the command line and environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub log_level: tracing::Level,
    pub log_file: PathBuf,
    pub notification_ttl: Duration,
    pub memory_clipboard: bool,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Tui)
    }

    /// Validate CLI configuration and return appropriate error if invalid
    pub fn validate(&self) -> ScenarioPadResult<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(ScenarioPadError::cli(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.log_level
            ))),
        }

        validate_key(&self.storage_key)?;

        if self.notification_ms == 0 {
            return Err(ScenarioPadError::cli(
                "Notification duration must be greater than 0".to_string(),
            ));
        }

        if let Some(ref data_dir) = self.data_dir {
            if data_dir.exists() && !data_dir.is_dir() {
                return Err(ScenarioPadError::cli(format!(
                    "Data path is not a directory: {}",
                    data_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Get log level as tracing::Level
    pub fn get_tracing_level(&self) -> tracing::Level {
        match self.log_level.as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }

    pub fn resolve(&self) -> ScenarioPadResult<AppConfig> {
        self.validate()?;
        let data_dir = self.data_dir.clone().unwrap_or_else(default_data_dir);
        let log_file = self
            .log_file
            .clone()
            .unwrap_or_else(|| data_dir.join("scenariopad.log"));
        Ok(AppConfig {
            data_dir,
            storage_key: self.storage_key.clone(),
            log_level: self.get_tracing_level(),
            log_file,
            notification_ttl: Duration::from_millis(self.notification_ms),
            memory_clipboard: self.memory_clipboard,
        })
    }
}

pub fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("scenariopad"),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".scenariopad"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["scenariopad", "--data-dir", "/tmp/sp"]).unwrap();
        assert_eq!(cli.command(), Commands::Tui);
        let config = cli.resolve().unwrap();
        assert_eq!(config.storage_key, "jsonPromptData");
        assert_eq!(config.notification_ttl, Duration::from_millis(3000));
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.log_file, PathBuf::from("/tmp/sp/scenariopad.log"));
        assert!(!config.memory_clipboard);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["scenariopad", "export", "-o", "out.json"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Export {
                output: Some(PathBuf::from("out.json"))
            }
        );

        let cli = Cli::try_parse_from(["scenariopad", "import", "-"]).unwrap();
        assert_eq!(cli.command(), Commands::Import { file: PathBuf::from("-") });

        assert!(Cli::try_parse_from(["scenariopad", "import"]).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cli = Cli::try_parse_from(["scenariopad", "--log-level", "loud"]).unwrap();
        assert!(matches!(cli.validate(), Err(ScenarioPadError::Cli(_))));

        let cli = Cli::try_parse_from(["scenariopad", "--storage-key", "../x"]).unwrap();
        assert!(matches!(cli.validate(), Err(ScenarioPadError::InvalidStorageKey(_))));

        let cli = Cli::try_parse_from(["scenariopad", "--notification-ms", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_tracing_level() {
        let cli = Cli::try_parse_from(["scenariopad", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.get_tracing_level(), tracing::Level::DEBUG);
    }
}
