//! Configuration resolution from the process environment
//!
//! The entry point calls [`load_env_file`] once, then [`OracleConfig::from_env`].
//! Any [`ConfigError`] returned here is fatal at startup.

use crate::{
    constants::{
        DEFAULT_POLL_INTERVAL_SECS, DEFAULT_QUERY_TIMEOUT_SECS, FACTORY_ADDRESS_KEY,
        POLL_INTERVAL_KEY, QUERY_TIMEOUT_KEY, THE_GRAPH_URL_KEY,
    },
    error::ConfigError,
};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Lookup options for a single environment variable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOptions {
    /// Absence is an error when set
    pub required: bool,
    /// Returned when the variable is absent and not required
    pub fallback: String,
}

impl EnvOptions {
    pub fn required() -> Self {
        Self {
            required: true,
            fallback: String::new(),
        }
    }

    pub fn optional(fallback: impl Into<String>) -> Self {
        Self {
            required: false,
            fallback: fallback.into(),
        }
    }
}

/// Loads `key=value` pairs from `path` into the process environment
///
/// Variables already present in the environment are left untouched.
///
/// # Returns
/// The path that was loaded, or [`ConfigError::EnvFile`] if the file is
/// missing or unreadable
pub fn load_env_file(path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
    let path = path.as_ref().to_path_buf();
    dotenvy::from_path(&path).map_err(|source| ConfigError::EnvFile {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "Loaded environment file");
    Ok(path)
}

/// Resolves a single environment variable
///
/// A present variable is returned as-is, whatever the options say. An absent
/// one is either an error (`required`) or the fallback.
pub fn get(key: &str, options: &EnvOptions) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotUnicode(raw)) => Err(ConfigError::invalid(
            key,
            &raw.to_string_lossy(),
            "value is not valid unicode",
        )),
        Err(env::VarError::NotPresent) if options.required => Err(ConfigError::missing(key)),
        Err(env::VarError::NotPresent) => Ok(options.fallback.clone()),
    }
}

/// Resolves an optional whole number of seconds, rejecting zero
fn get_secs(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    let raw = get(key, &EnvOptions::optional(default_secs.to_string()))?;
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, &raw, format!("{e}")))?;

    if secs == 0 {
        return Err(ConfigError::invalid(key, &raw, "must be greater than zero"));
    }

    Ok(Duration::from_secs(secs))
}

/// Rejects a zero duration, which the polling loop cannot run with
fn non_zero(key: &str, duration: Duration) -> Result<Duration, ConfigError> {
    if duration.is_zero() {
        return Err(ConfigError::invalid(
            key,
            &format!("{:?}", duration),
            "must be greater than zero",
        ));
    }
    Ok(duration)
}

/// Immutable configuration handed to the watcher at construction
///
/// Interval and timeout are always non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    factory_address: String,
    the_graph_url: String,
    poll_interval: Duration,
    request_timeout: Duration,
}

impl OracleConfig {
    /// Builds a configuration with default interval and timeout
    pub fn new(factory_address: impl Into<String>, the_graph_url: impl Into<String>) -> Self {
        Self {
            factory_address: factory_address.into(),
            the_graph_url: the_graph_url.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Result<Self, ConfigError> {
        self.poll_interval = non_zero(POLL_INTERVAL_KEY, poll_interval)?;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Result<Self, ConfigError> {
        self.request_timeout = non_zero(QUERY_TIMEOUT_KEY, request_timeout)?;
        Ok(self)
    }

    /// DEX factory contract address
    pub fn factory_address(&self) -> &str {
        &self.factory_address
    }

    /// GraphQL endpoint URL of the indexing service
    pub fn the_graph_url(&self) -> &str {
        &self.the_graph_url
    }

    /// Fixed period between query starts
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Upper bound on a single query round trip
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Reads the configuration from the process environment
    ///
    /// Required keys are resolved first and in order; the first missing one
    /// stops resolution.
    pub fn from_env() -> Result<Self, ConfigError> {
        let factory_address = get(FACTORY_ADDRESS_KEY, &EnvOptions::required())?;
        let the_graph_url = get(THE_GRAPH_URL_KEY, &EnvOptions::required())?;

        Ok(Self {
            factory_address,
            the_graph_url,
            poll_interval: get_secs(POLL_INTERVAL_KEY, DEFAULT_POLL_INTERVAL_SECS)?,
            request_timeout: get_secs(QUERY_TIMEOUT_KEY, DEFAULT_QUERY_TIMEOUT_SECS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_oracle_env() {
        for key in [
            FACTORY_ADDRESS_KEY,
            THE_GRAPH_URL_KEY,
            POLL_INTERVAL_KEY,
            QUERY_TIMEOUT_KEY,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_get_present_ignores_options() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        env::set_var("ORACLE_TEST_PRESENT", "value");

        assert_eq!(
            get("ORACLE_TEST_PRESENT", &EnvOptions::required()).unwrap(),
            "value"
        );
        assert_eq!(
            get("ORACLE_TEST_PRESENT", &EnvOptions::optional("fallback")).unwrap(),
            "value"
        );

        env::remove_var("ORACLE_TEST_PRESENT");
    }

    #[test]
    fn test_get_absent_optional_returns_fallback() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        env::remove_var("ORACLE_TEST_ABSENT");

        assert_eq!(
            get("ORACLE_TEST_ABSENT", &EnvOptions::optional("fallback")).unwrap(),
            "fallback"
        );
        assert_eq!(
            get("ORACLE_TEST_ABSENT", &EnvOptions::default()).unwrap(),
            ""
        );
    }

    #[test]
    fn test_get_absent_required_fails() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        env::remove_var("ORACLE_TEST_REQUIRED");

        let err = get("ORACLE_TEST_REQUIRED", &EnvOptions::required()).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingRequired { ref key } if key == "ORACLE_TEST_REQUIRED")
        );
    }

    #[test]
    fn test_from_env_with_required_vars() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_oracle_env();
        env::set_var(FACTORY_ADDRESS_KEY, "0xabc");
        env::set_var(THE_GRAPH_URL_KEY, "http://mock-endpoint");

        let config = OracleConfig::from_env().expect("should resolve config");
        assert_eq!(config.factory_address(), "0xabc");
        assert_eq!(config.the_graph_url(), "http://mock-endpoint");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));

        clear_oracle_env();
    }

    #[test]
    fn test_from_env_reads_optional_overrides() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_oracle_env();
        env::set_var(FACTORY_ADDRESS_KEY, "0xabc");
        env::set_var(THE_GRAPH_URL_KEY, "http://mock-endpoint");
        env::set_var(POLL_INTERVAL_KEY, "5");
        env::set_var(QUERY_TIMEOUT_KEY, "3");

        let config = OracleConfig::from_env().unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(3));

        clear_oracle_env();
    }

    #[test]
    fn test_from_env_stops_at_first_missing_key() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_oracle_env();
        // An unusable optional value must not be reached
        env::set_var(POLL_INTERVAL_KEY, "not-a-number");

        let err = OracleConfig::from_env().unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingRequired { ref key } if key == FACTORY_ADDRESS_KEY)
        );

        env::set_var(FACTORY_ADDRESS_KEY, "0xabc");
        let err = OracleConfig::from_env().unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingRequired { ref key } if key == THE_GRAPH_URL_KEY)
        );

        clear_oracle_env();
    }

    #[test]
    fn test_from_env_rejects_zero_interval() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_oracle_env();
        env::set_var(FACTORY_ADDRESS_KEY, "0xabc");
        env::set_var(THE_GRAPH_URL_KEY, "http://mock-endpoint");
        env::set_var(POLL_INTERVAL_KEY, "0");

        let err = OracleConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == POLL_INTERVAL_KEY));

        clear_oracle_env();
    }

    #[test]
    fn test_builder_rejects_zero_durations() {
        let config = OracleConfig::new("0xabc", "http://mock-endpoint");

        let err = config
            .clone()
            .with_poll_interval(Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == POLL_INTERVAL_KEY));

        let err = config
            .clone()
            .with_request_timeout(Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == QUERY_TIMEOUT_KEY));

        let config = config
            .with_poll_interval(Duration::from_millis(250))
            .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_env_file() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        env::remove_var("ORACLE_TEST_FROM_FILE");
        env::set_var("ORACLE_TEST_PRESET", "kept");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ORACLE_TEST_FROM_FILE=loaded").unwrap();
        writeln!(file, "ORACLE_TEST_PRESET=overwritten").unwrap();

        let loaded = load_env_file(file.path()).unwrap();
        assert_eq!(loaded, file.path());
        assert_eq!(env::var("ORACLE_TEST_FROM_FILE").unwrap(), "loaded");
        assert_eq!(env::var("ORACLE_TEST_PRESET").unwrap(), "kept");

        env::remove_var("ORACLE_TEST_FROM_FILE");
        env::remove_var("ORACLE_TEST_PRESET");
    }

    #[test]
    fn test_load_missing_env_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(".env");

        let err = load_env_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { ref path, .. } if path == &missing));
    }
}
