use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use sse::ConnectionSettings;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(env: &str) -> Result<RustEnv, Self::Err> {
        match env.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Number of events each stream connection may have queued before further events are dropped for it
    #[arg(long, env, default_value_t = 32)]
    pub stream_buffer_capacity: usize,

    /// Consecutive dropped events after which a stream connection is evicted
    #[arg(long, env, default_value_t = 3)]
    pub max_rejected_deliveries: u32,

    /// Seconds between keep-alive comments on idle event streams
    #[arg(long, env, default_value_t = 15)]
    pub keep_alive_interval_secs: u64,

    /// Deployment environment this instance runs in
    #[arg(
        short,
        long,
        env,
        default_value_t = RustEnv::Development,
        value_parser = clap::builder::PossibleValuesParser::new([
            "DEVELOPMENT", "PRODUCTION", "STAGING",
            "development", "production", "staging"
        ])
            .map(|s| s.parse::<RustEnv>().unwrap()),
        )]
    pub runtime_env: RustEnv,

    /// Group used when a stream request does not name one
    #[arg(long, env, default_value = "")]
    default_group: String,
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    pub fn set_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }

    /// Keep-alive period for idle streams, never shorter than one second.
    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_interval_secs.max(1))
    }

    /// Delivery tuning handed to the broadcaster's connection sets.
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            buffer_capacity: self.stream_buffer_capacity,
            max_rejected_deliveries: self.max_rejected_deliveries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["hotwire_rs"]);

        assert_eq!(config.log_level_filter, LevelFilter::Info);
        assert_eq!(config.default_group(), "");
        assert_eq!(config.keep_alive_interval(), Duration::from_secs(15));
        assert_eq!(config.connection_settings(), ConnectionSettings::default());
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://localhost:3000"]
        );
    }

    #[test]
    fn test_stream_options_from_flags() {
        let config = Config::parse_from([
            "hotwire_rs",
            "--stream-buffer-capacity",
            "8",
            "--max-rejected-deliveries",
            "5",
            "--keep-alive-interval-secs",
            "30",
            "--default-group",
            "lobby",
            "--log-level-filter",
            "DEBUG",
        ]);

        assert_eq!(
            config.connection_settings(),
            ConnectionSettings {
                buffer_capacity: 8,
                max_rejected_deliveries: 5,
            }
        );
        assert_eq!(config.keep_alive_interval(), Duration::from_secs(30));
        assert_eq!(config.default_group(), "lobby");
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn test_runtime_env_parsing() {
        assert_eq!("Staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("qa".parse::<RustEnv>(), Err(RustEnvParseError));

        let config = Config::parse_from(["hotwire_rs", "--runtime-env", "PRODUCTION"]);
        assert!(config.is_production());
        assert_eq!(config.runtime_env().to_string(), "production");
    }

    #[test]
    fn test_zero_keep_alive_interval_is_clamped() {
        let config = Config::parse_from(["hotwire_rs", "--keep-alive-interval-secs", "0"]);
        assert_eq!(config.keep_alive_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let result = Config::try_parse_from(["hotwire_rs", "--log-level-filter", "LOUD"]);
        assert!(result.is_err());
    }
}
