use std::path::PathBuf;
use std::time::Duration;

/// Default bound on nested schema evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default timeout for one CLI validation run (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Engine options for one validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Depth of nested `evaluate` calls before `SchemaError::DepthExceeded`.
    pub max_depth: usize,
    /// When false, `format` is annotation-only and never produces violations.
    pub assert_formats: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            assert_formats: true,
        }
    }
}

impl ValidatorConfig {
    /// Load engine options from environment.
    ///
    /// - `JSONSCHEMA_MAX_DEPTH` (optional, default 256): positive integer
    /// - `JSONSCHEMA_ASSERT_FORMATS` (optional, default false): `true` or `false`
    ///
    /// Unlike [`Default`], `format` is annotation-only unless asked for, which
    /// is how the `validate-jsonschema` command has always reported it.
    pub fn from_env() -> Result<Self, String> {
        let max_depth = match std::env::var("JSONSCHEMA_MAX_DEPTH") {
            Ok(val) => match val.parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => return Err("JSONSCHEMA_MAX_DEPTH must be a positive integer".to_string()),
            },
            Err(_) => DEFAULT_MAX_DEPTH,
        };

        let assert_formats = match std::env::var("JSONSCHEMA_ASSERT_FORMATS") {
            Ok(val) => val
                .parse::<bool>()
                .map_err(|_| "JSONSCHEMA_ASSERT_FORMATS must be true or false".to_string())?,
            Err(_) => false,
        };

        Ok(Self {
            max_depth,
            assert_formats,
        })
    }
}

/// Configuration for the `validate-jsonschema` binary.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub validator: ValidatorConfig,
    pub timeout: Duration,
    pub registry_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from environment.
    ///
    /// Reads everything [`ValidatorConfig::from_env`] reads, plus:
    /// - `JSONSCHEMA_TIMEOUT_SECS` (optional, default 30): max seconds per run
    /// - `JSONSCHEMA_REGISTRY_DIR` (optional): directory of `*.json` schemas for `$ref`
    pub fn from_env() -> Result<Self, String> {
        let validator = ValidatorConfig::from_env()?;

        let timeout_secs = match std::env::var("JSONSCHEMA_TIMEOUT_SECS") {
            Ok(val) => match val.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err("JSONSCHEMA_TIMEOUT_SECS must be a positive integer".to_string()),
            },
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let registry_dir = std::env::var_os("JSONSCHEMA_REGISTRY_DIR").map(PathBuf::from);

        Ok(Self {
            validator,
            timeout: Duration::from_secs(timeout_secs),
            registry_dir,
        })
    }
}
