//! Cartpay configuration loaded from environment variables.
//!
//! Both binaries read the same configuration; each uses the parts it needs.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional (a warning is logged when the default is used)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT_SHOPPING` - REST gateway port (default: 9051)
//! - `PORT_PAYMENT` - gRPC payment service port (default: 9061)
//! - `MONGO_URI` - Document store connection string (default: mongodb://localhost:9071)
//! - `SHOPPING_DB_NAME` - Database holding products (default: `shopping_db`)
//! - `PAYMENT_DB_NAME` - Database holding payments (default: `payment_db`)
//! - `PAYMENT_SERVICE_BASE_URI` - Address of the payment service (default: <http://localhost:9061>)
//! - `CLEANUP_INTERVAL_SECS` - Period of the cleanup pass (default: 86400)
//!
//! ## Optional (silent)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Cartpay application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address both servers bind to
    pub host: IpAddr,
    /// Port of the REST gateway
    pub shopping_port: u16,
    /// Port of the gRPC payment service
    pub payment_port: u16,
    /// Document store connection URI (may contain credentials)
    pub mongo_uri: SecretString,
    /// Logical database for products
    pub shopping_db_name: String,
    /// Logical database for payments
    pub payment_db_name: String,
    /// Base address of the payment service, used by clients
    pub payment_service_base_uri: String,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Period of the background cleanup pass
    pub cleanup_interval: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Variables that were missing and fell back to their defaults
    pub defaulted: Vec<&'static str>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `JWT_SECRET` is missing or fails validation
    /// (length, placeholder detection, entropy check), or if any value cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as missing.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader::new(lookup);

        let host = parse_var("HOST", &env.or_default("HOST", "0.0.0.0"))?;
        let shopping_port = parse_var("PORT_SHOPPING", &env.or_default("PORT_SHOPPING", "9051"))?;
        let payment_port = parse_var("PORT_PAYMENT", &env.or_default("PORT_PAYMENT", "9061"))?;
        let mongo_uri = SecretString::from(env.or_default("MONGO_URI", "mongodb://localhost:9071"));
        let shopping_db_name = env.or_default("SHOPPING_DB_NAME", "shopping_db");
        let payment_db_name = env.or_default("PAYMENT_DB_NAME", "payment_db");
        let payment_service_base_uri =
            env.or_default("PAYMENT_SERVICE_BASE_URI", "http://localhost:9061");

        let interval_secs: u64 = parse_var(
            "CLEANUP_INTERVAL_SECS",
            &env.or_default("CLEANUP_INTERVAL_SECS", "86400"),
        )?;
        if interval_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CLEANUP_INTERVAL_SECS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        // The signing secret never falls back to a default.
        let jwt_secret = env.required_secret("JWT_SECRET")?;

        Ok(Self {
            host,
            shopping_port,
            payment_port,
            mongo_uri,
            shopping_db_name,
            payment_db_name,
            payment_service_base_uri,
            jwt_secret,
            cleanup_interval: Duration::from_secs(interval_secs),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            defaulted: env.defaulted,
        })
    }

    /// Returns the socket address for the REST gateway.
    #[must_use]
    pub const fn shopping_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.shopping_port)
    }

    /// Returns the socket address for the gRPC payment service.
    #[must_use]
    pub const fn payment_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.payment_port)
    }

    /// Log a warning for every variable that fell back to its default.
    ///
    /// Called once tracing is initialized, since configuration is loaded first.
    pub fn warn_defaults(&self) {
        for key in &self.defaulted {
            tracing::warn!(variable = %key, "Environment variable not set, using default");
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reads variables and remembers which ones were defaulted.
struct EnvReader<F> {
    lookup: F,
    defaulted: Vec<&'static str>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    const fn new(lookup: F) -> Self {
        Self {
            lookup,
            defaulted: Vec::new(),
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    fn or_default(&mut self, key: &'static str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| {
            self.defaulted.push(key);
            default.to_string()
        })
    }

    /// Load and validate a secret.
    fn required_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self
            .optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
        let secret = SecretString::from(value);
        validate_secret_length(&secret, key)?;
        validate_secret_strength(secret.expose_secret(), key)?;
        Ok(secret)
    }
}

/// Parse a variable, reporting the variable name on failure.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_only_secret_set() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", STRONG_SECRET)])).unwrap();

        assert_eq!(config.shopping_port, 9051);
        assert_eq!(config.payment_port, 9061);
        assert_eq!(config.mongo_uri.expose_secret(), "mongodb://localhost:9071");
        assert_eq!(config.shopping_db_name, "shopping_db");
        assert_eq!(config.payment_db_name, "payment_db");
        assert_eq!(config.payment_service_base_uri, "http://localhost:9061");
        assert_eq!(config.cleanup_interval, Duration::from_secs(86_400));
        assert!(config.sentry_dsn.is_none());

        assert!(config.defaulted.contains(&"MONGO_URI"));
        assert!(config.defaulted.contains(&"PORT_SHOPPING"));
        assert!(!config.defaulted.contains(&"JWT_SECRET"));
    }

    #[test]
    fn test_explicit_values_are_not_reported_as_defaulted() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", STRONG_SECRET),
            ("HOST", "127.0.0.1"),
            ("PORT_SHOPPING", "8080"),
            ("PAYMENT_DB_NAME", "payments_test"),
            ("CLEANUP_INTERVAL_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.shopping_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.payment_addr().to_string(), "127.0.0.1:9061");
        assert_eq!(config.payment_db_name, "payments_test");
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
        assert!(!config.defaulted.contains(&"HOST"));
        assert!(!config.defaulted.contains(&"PORT_SHOPPING"));
        assert!(config.defaulted.contains(&"PORT_PAYMENT"));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", STRONG_SECRET),
            ("SHOPPING_DB_NAME", ""),
        ]))
        .unwrap();
        assert_eq!(config.shopping_db_name, "shopping_db");
        assert!(config.defaulted.contains(&"SHOPPING_DB_NAME"));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "JWT_SECRET"));
    }

    #[test]
    fn test_placeholder_secret_rejected() {
        let err = Config::from_lookup(lookup(&[(
            "JWT_SECRET",
            "your-secret-key-your-secret-key-your",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", STRONG_SECRET),
            ("PORT_PAYMENT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "PORT_PAYMENT"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", STRONG_SECRET),
            ("CLEANUP_INTERVAL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_length_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_secret_length(&secret, "TEST_VAR").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", STRONG_SECRET),
            ("MONGO_URI", "mongodb://admin:hunter2@db:27017"),
        ]))
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("shopping_db"));
        assert!(!debug_output.contains(STRONG_SECRET));
        assert!(!debug_output.contains("hunter2"));
    }
}
