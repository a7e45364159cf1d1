//! Configuration handling for sqltable

use crate::model::DEFAULT_DATETIME_FORMAT;

/// Output format for query results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// How strictly cell values are converted to strings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Plain string conversion; a NULL cell fails the scan
    Raw,
    /// NULL becomes the empty string, everything else is stringified as-is
    Generic,
    /// Conversion driven by the declared column type
    #[default]
    Typed,
}

impl std::str::FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(Strictness::Raw),
            "generic" => Ok(Strictness::Generic),
            "typed" => Ok(Strictness::Typed),
            _ => Err(format!("Unknown strictness: {}", s)),
        }
    }
}

/// Settings for the value normalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Decimal places kept for floating-point columns
    pub float_precision: u32,
    /// chrono format string for timestamps
    pub datetime_format: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            float_precision: 6,
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl NormalizeConfig {
    /// Set the number of decimal places for floating-point columns
    pub fn with_float_precision(mut self, places: u32) -> Self {
        self.float_precision = places;
        self
    }

    /// Set the timestamp format
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }
}

/// Configuration for a command-line session
#[derive(Debug, Clone)]
pub struct Config {
    /// Registered driver name
    pub driver: String,
    /// Data source passed to the driver
    pub dsn: String,
    /// Verify the connection after opening it
    pub ping: bool,
    /// Normalization tier for table queries
    pub strictness: Strictness,
    /// Output format
    pub output_format: OutputFormat,
    /// Column used to group JSON output
    pub key_column: Option<String>,
    /// Normalizer settings
    pub normalize: NormalizeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: "sqlite".to_string(),
            dsn: String::new(),
            ping: true,
            strictness: Strictness::default(),
            output_format: OutputFormat::default(),
            key_column: None,
            normalize: NormalizeConfig::default(),
        }
    }
}

impl Config {
    /// Create a new Config for a driver and data source
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            dsn: dsn.into(),
            ..Default::default()
        }
    }

    /// Enable or skip the liveness check on connect
    pub fn with_ping(mut self, ping: bool) -> Self {
        self.ping = ping;
        self
    }

    /// Set the normalization tier
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Group JSON output by a column
    pub fn with_key_column(mut self, column: String) -> Self {
        self.key_column = Some(column);
        self
    }

    /// Set normalizer settings
    pub fn with_normalize(mut self, normalize: NormalizeConfig) -> Self {
        self.normalize = normalize;
        self
    }
}
