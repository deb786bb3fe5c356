use mm_core::GameMode;
use mm_core::game::round::ORDER_PRESETS;
use mm_core::model::hand::HandSize;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "config/market.yaml";
const DEFAULT_STARTING_BUDGET: f64 = 500.0;
const DEFAULT_ROUND_SECONDS: u32 = 20;
const DEFAULT_LOG_PATH: &str = "logs/market-maker.jsonl";

/// Root configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AppConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// An explicit path must exist; without one the default location is
    /// tried and built-in defaults apply when it is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_path(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.game.validate()?;
        self.display.validate()?;
        self.logging.normalize();
        self.logging.validate()?;
        self.outputs.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_starting_budget")]
    pub starting_budget: f64,
    /// Shown to the player only; nothing enforces it.
    #[serde(default = "default_round_seconds")]
    pub round_seconds: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub default_mode: Option<GameMode>,
    #[serde(default)]
    pub hand_size: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_budget: DEFAULT_STARTING_BUDGET,
            round_seconds: DEFAULT_ROUND_SECONDS,
            seed: None,
            default_mode: None,
            hand_size: None,
        }
    }
}

impl GameConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.starting_budget.is_finite() || self.starting_budget <= 0.0 {
            return Err(ValidationError::InvalidField {
                field: "game.starting_budget".to_string(),
                message: "starting budget must be a positive number".to_string(),
            });
        }

        if self.round_seconds == 0 {
            return Err(ValidationError::InvalidField {
                field: "game.round_seconds".to_string(),
                message: "round time limit must be greater than zero".to_string(),
            });
        }

        if let Some(size) = self.hand_size {
            if HandSize::new(size).is_none() {
                return Err(ValidationError::InvalidField {
                    field: "game.hand_size".to_string(),
                    message: format!("hand size {size} is outside 3..=5"),
                });
            }
        }

        Ok(())
    }

    pub fn hand_size(&self) -> Option<HandSize> {
        self.hand_size.and_then(HandSize::new)
    }
}

fn default_starting_budget() -> f64 {
    DEFAULT_STARTING_BUDGET
}

fn default_round_seconds() -> u32 {
    DEFAULT_ROUND_SECONDS
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_tracker: bool,
    #[serde(default)]
    pub color: bool,
    #[serde(default = "default_order_presets")]
    pub order_presets: Vec<u32>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_tracker: true,
            color: false,
            order_presets: default_order_presets(),
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.order_presets.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "display.order_presets".to_string(),
                message: "at least one order preset must be listed".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for preset in &self.order_presets {
            if *preset == 0 {
                return Err(ValidationError::InvalidField {
                    field: "display.order_presets".to_string(),
                    message: "order presets must be positive".to_string(),
                });
            }
            if !seen.insert(*preset) {
                return Err(ValidationError::InvalidField {
                    field: "display.order_presets".to_string(),
                    message: format!("order preset {preset} listed more than once"),
                });
            }
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_order_presets() -> Vec<u32> {
    ORDER_PRESETS.to_vec()
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            path: default_log_path(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }
        if self.enable_structured && self.path.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    DEFAULT_LOG_PATH.to_string()
}

/// Optional artifacts written when a game reaches its summary.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OutputsConfig {
    #[serde(default)]
    pub history_jsonl: Option<String>,
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.history_jsonl {
            if path.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "outputs.history_jsonl".to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Substitutes `{seed}` placeholders in the history path.
    pub fn resolved_history(&self, seed: u64) -> Option<PathBuf> {
        self.history_jsonl
            .as_deref()
            .map(|template| resolve_template(&seed.to_string(), template))
    }
}

fn resolve_template(seed: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{seed}", seed))
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
