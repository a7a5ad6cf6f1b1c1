use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
};

use sim_core::SimConfig;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TICK_INTERVAL_MS: u64 = 2_000;
const DEFAULT_INITIAL_PRICE: f64 = 150.0;
const DEFAULT_FLOOR_PRICE: f64 = 10.0;
const DEFAULT_MAX_STEP: f64 = 2.5;
const DEFAULT_STARTING_WALLET: f64 = 50_000.0;
const DEFAULT_ANALYSIS_URL: &str = "http://127.0.0.1:8000";

const MAX_TICK_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub tick_interval_ms: u64,
    pub initial_price: f64,
    pub floor_price: f64,
    pub max_step: f64,
    pub starting_wallet: f64,
    pub price_seed: Option<u64>,
    pub analysis_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidTickInterval,
    InvalidInitialPrice,
    InvalidFloorPrice,
    InvalidMaxStep,
    InvalidStartingWallet,
    InvalidPriceSeed,
    InvalidAnalysisUrl,
    NonUnicodeEnvVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "FINSIGHT_ADDR is not a valid socket address: {err}")
            }
            Self::InvalidTickInterval => {
                write!(
                    f,
                    "FINSIGHT_TICK_INTERVAL_MS must be an integer between 1 and {MAX_TICK_INTERVAL_MS}"
                )
            }
            Self::InvalidInitialPrice => {
                write!(f, "FINSIGHT_INITIAL_PRICE must be a finite positive number")
            }
            Self::InvalidFloorPrice => {
                write!(f, "FINSIGHT_FLOOR_PRICE must be a finite positive number")
            }
            Self::InvalidMaxStep => {
                write!(f, "FINSIGHT_MAX_STEP must be a finite non-negative number")
            }
            Self::InvalidStartingWallet => {
                write!(
                    f,
                    "FINSIGHT_STARTING_WALLET must be a finite non-negative number"
                )
            }
            Self::InvalidPriceSeed => {
                write!(f, "FINSIGHT_PRICE_SEED must be an unsigned integer")
            }
            Self::InvalidAnalysisUrl => {
                write!(f, "FINSIGHT_ANALYSIS_URL must not be empty or whitespace")
            }
            Self::NonUnicodeEnvVar(key) => {
                write!(f, "{key} contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env_value("FINSIGHT_ADDR")? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
        };

        let tick_interval_ms = match env_value("FINSIGHT_TICK_INTERVAL_MS")? {
            Some(value) => {
                let parsed: u64 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidTickInterval)?;
                if parsed == 0 || parsed > MAX_TICK_INTERVAL_MS {
                    return Err(ConfigError::InvalidTickInterval);
                }
                parsed
            }
            None => DEFAULT_TICK_INTERVAL_MS,
        };

        let initial_price = parse_f64_env(
            "FINSIGHT_INITIAL_PRICE",
            DEFAULT_INITIAL_PRICE,
            |value| value.is_finite() && value > 0.0,
            ConfigError::InvalidInitialPrice,
        )?;

        let floor_price = parse_f64_env(
            "FINSIGHT_FLOOR_PRICE",
            DEFAULT_FLOOR_PRICE,
            |value| value.is_finite() && value > 0.0,
            ConfigError::InvalidFloorPrice,
        )?;

        let max_step = parse_f64_env(
            "FINSIGHT_MAX_STEP",
            DEFAULT_MAX_STEP,
            |value| value.is_finite() && value >= 0.0,
            ConfigError::InvalidMaxStep,
        )?;

        let starting_wallet = parse_f64_env(
            "FINSIGHT_STARTING_WALLET",
            DEFAULT_STARTING_WALLET,
            |value| value.is_finite() && value >= 0.0,
            ConfigError::InvalidStartingWallet,
        )?;

        let price_seed = match env_value("FINSIGHT_PRICE_SEED")? {
            Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidPriceSeed)?),
            None => None,
        };

        let analysis_url = match env_value("FINSIGHT_ANALYSIS_URL")? {
            Some(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidAnalysisUrl);
                }
                value
            }
            None => DEFAULT_ANALYSIS_URL.to_owned(),
        };

        Ok(Self {
            listen_addr,
            tick_interval_ms,
            initial_price,
            floor_price,
            max_step,
            starting_wallet,
            price_seed,
            analysis_url,
        })
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            tick_interval_ms: self.tick_interval_ms,
            max_step: self.max_step,
            floor_price: self.floor_price,
            initial_price: self.initial_price,
            starting_wallet: self.starting_wallet,
            ..SimConfig::default()
        }
    }
}

fn env_value(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicodeEnvVar(key)),
    }
}

fn parse_f64_env(
    key: &'static str,
    default_value: f64,
    is_valid: fn(f64) -> bool,
    invalid_error: ConfigError,
) -> Result<f64, ConfigError> {
    match env_value(key)? {
        Some(value) => {
            let parsed = match value.parse::<f64>() {
                Ok(parsed) => parsed,
                Err(_) => return Err(invalid_error),
            };
            if !is_valid(parsed) {
                return Err(invalid_error);
            }
            Ok(parsed)
        }
        None => Ok(default_value),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex};

    use super::{Config, ConfigError};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_KEYS: [&str; 8] = [
        "FINSIGHT_ADDR",
        "FINSIGHT_TICK_INTERVAL_MS",
        "FINSIGHT_INITIAL_PRICE",
        "FINSIGHT_FLOOR_PRICE",
        "FINSIGHT_MAX_STEP",
        "FINSIGHT_STARTING_WALLET",
        "FINSIGHT_PRICE_SEED",
        "FINSIGHT_ANALYSIS_URL",
    ];

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_env_baseline() -> Vec<EnvVarGuard> {
        ALL_KEYS.iter().map(|key| EnvVarGuard::unset(key)).collect()
    }

    #[test]
    fn defaults_match_the_simulator_parameters() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.tick_interval_ms, 2_000);
        assert_eq!(config.initial_price, 150.0);
        assert_eq!(config.floor_price, 10.0);
        assert_eq!(config.max_step, 2.5);
        assert_eq!(config.starting_wallet, 50_000.0);
        assert_eq!(config.price_seed, None);
        assert_eq!(config.analysis_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn sim_config_carries_the_overridden_parameters() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();
        let _interval = EnvVarGuard::set("FINSIGHT_TICK_INTERVAL_MS", "500");
        let _price = EnvVarGuard::set("FINSIGHT_INITIAL_PRICE", "99.5");
        let _wallet = EnvVarGuard::set("FINSIGHT_STARTING_WALLET", "1000");

        let sim_config = Config::from_env().unwrap().sim_config();

        assert_eq!(sim_config.tick_interval_ms, 500);
        assert_eq!(sim_config.initial_price, 99.5);
        assert_eq!(sim_config.starting_wallet, 1_000.0);
        assert_eq!(sim_config.history_capacity, 50);
    }

    #[test]
    fn uses_listen_address_override_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();
        let _guard = EnvVarGuard::set("FINSIGHT_ADDR", "127.0.0.1:9090");

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
    }

    #[test]
    fn returns_error_for_invalid_listen_address() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();
        let _guard = EnvVarGuard::set("FINSIGHT_ADDR", "not-an-addr");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidListenAddr(_)));
    }

    #[test]
    fn rejects_zero_and_oversized_tick_intervals() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();

        {
            let _guard = EnvVarGuard::set("FINSIGHT_TICK_INTERVAL_MS", "0");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidTickInterval
            ));
        }
        {
            let _guard = EnvVarGuard::set("FINSIGHT_TICK_INTERVAL_MS", "120000");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidTickInterval
            ));
        }
    }

    #[test]
    fn rejects_non_finite_and_non_positive_prices() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();

        {
            let _guard = EnvVarGuard::set("FINSIGHT_INITIAL_PRICE", "NaN");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidInitialPrice
            ));
        }
        {
            let _guard = EnvVarGuard::set("FINSIGHT_FLOOR_PRICE", "-10");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidFloorPrice
            ));
        }
    }

    #[test]
    fn parses_an_explicit_price_seed() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();
        let _guard = EnvVarGuard::set("FINSIGHT_PRICE_SEED", "42");

        let config = Config::from_env().unwrap();

        assert_eq!(config.price_seed, Some(42));
    }

    #[test]
    fn rejects_a_non_integer_price_seed() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();
        let _guard = EnvVarGuard::set("FINSIGHT_PRICE_SEED", "lucky");

        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidPriceSeed
        ));
    }

    #[test]
    fn rejects_a_blank_analysis_url() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();
        let _guard = EnvVarGuard::set("FINSIGHT_ANALYSIS_URL", "   ");

        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidAnalysisUrl
        ));
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_env_var() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_env_baseline();
        let previous = env::var_os("FINSIGHT_ADDR");
        env::set_var(
            "FINSIGHT_ADDR",
            std::ffi::OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        );

        let err = Config::from_env().unwrap_err();

        match previous {
            Some(value) => env::set_var("FINSIGHT_ADDR", value),
            None => env::remove_var("FINSIGHT_ADDR"),
        }

        assert!(matches!(err, ConfigError::NonUnicodeEnvVar("FINSIGHT_ADDR")));
    }
}
