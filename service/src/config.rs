use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Placeholder CORS origin meaning "any origin".
pub const ANY_ORIGIN: &str = "*";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
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
    /// A list of full CORS origin URLs that are allowed to receive server responses.
    /// Use `*` to allow any origin.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = ANY_ORIGIN
    )]
    pub allowed_origins: Vec<String>,

    /// Directory of static assets (the demo dashboard) served at `/`
    #[arg(long, env, default_value = "public")]
    pub static_dir: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 3000)]
    pub port: u16,

    /// Milliseconds between heartbeat events
    #[arg(long, env, default_value_t = 5000)]
    pub heartbeat_interval_ms: u64,

    /// Milliseconds between simulated feed price ticks
    #[arg(long, env, default_value_t = 2000)]
    pub feed_interval_ms: u64,

    /// Ticker symbol reported by the simulated feed
    #[arg(long, env, default_value = "DEMO")]
    pub feed_symbol: String,

    /// Starting price of the simulated feed
    #[arg(long, env, default_value_t = 100.0)]
    pub feed_initial_price: f64,

    /// The simulated price never drops below this value
    #[arg(long, env, default_value_t = 50.0)]
    pub feed_price_floor: f64,

    /// Width of one random-walk step; each tick moves the price by up to half of it either way
    #[arg(long, env, default_value_t = 10.0)]
    pub feed_max_step: f64,

    /// Milliseconds a single subscriber write may take before the subscriber is dropped
    #[arg(long, env, default_value_t = 1000)]
    pub send_timeout_ms: u64,

    /// Number of frames buffered per subscriber before writes start to wait
    #[arg(long, env, default_value_t = 64)]
    pub subscriber_buffer: usize,

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

    /// Set the Rust runtime environment to use.
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
}

impl Default for Config {
    /// Built-in defaults only, ignoring the process arguments. Handy for tests,
    /// where the harness owns the command line.
    fn default() -> Self {
        Config::parse_from([env!("CARGO_PKG_NAME")])
    }
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

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == ANY_ORIGIN)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed_interval_ms)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_env_parses_case_insensitively() {
        assert_eq!("PRODUCTION".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("nope".parse::<RustEnv>(), Err(RustEnvParseError));
    }

    #[test]
    fn test_cli_overrides_feed_and_timeout_settings() {
        let config = Config::parse_from([
            "sse_broadcast",
            "--heartbeat-interval-ms",
            "250",
            "--feed-price-floor",
            "10.5",
            "--send-timeout-ms",
            "20",
            "--allowed-origins",
            "http://a.test,http://b.test",
        ]);

        assert_eq!(config.heartbeat_interval(), Duration::from_millis(250));
        assert_eq!(config.feed_price_floor, 10.5);
        assert_eq!(config.send_timeout(), Duration::from_millis(20));
        assert_eq!(
            config.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_runtime_env_flag_controls_is_production() {
        let config = Config::parse_from(["sse_broadcast", "--runtime-env", "production"]);
        assert!(config.is_production());
    }
}
