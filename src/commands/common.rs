//! Common bootstrap logic shared by the raceday subcommands.

use camino::Utf8PathBuf;
use clap::Args;
use clap::ValueEnum;
use ohno::bail;
use raceday::Result;
use raceday::config::Config;
use raceday::index::RaceDayIndex;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

/// Common arguments shared by every raceday subcommand
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Dataset root holding the year/month/day tree
    #[arg(long, value_name = "PATH", env = "RACEDAY_DATA_ROOT")]
    pub data_root: Option<Utf8PathBuf>,

    /// Directory for the persisted index [default: <data-root>/cache]
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Path to configuration file [default: raceday.toml]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

pub struct Common {
    pub service: RaceDayIndex,
}

impl Common {
    /// Create the index service from flags and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or no dataset
    /// root is supplied.
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let config = Config::load(args.config.as_deref())?;

        let data_root = args
            .data_root
            .clone()
            .or_else(|| config.data_root.as_deref().map(Utf8PathBuf::from));
        let Some(data_root) = data_root else {
            bail!("no dataset root: pass --data-root, set RACEDAY_DATA_ROOT, or set data_root in raceday.toml");
        };

        let cache_dir = args
            .cache_dir
            .clone()
            .or_else(|| config.cache_dir.as_deref().map(Utf8PathBuf::from))
            .unwrap_or_else(|| data_root.join("cache"));

        Ok(Self {
            service: RaceDayIndex::new(data_root, cache_dir, config.pace),
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        if log_level == LogLevel::None {
            return;
        }

        let level = match log_level {
            LogLevel::None => return, // Already checked above, but being explicit
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug) || matches!(log_level, LogLevel::Trace))
            .init();
    }
}
