use std::fmt;

#[derive(Debug)]
pub enum LivingGraphError {
    Config(ConfigError),
    Eval(EvalError),
    Catalog(CatalogError),
    #[cfg(feature = "runtime")]
    Settings(SettingsError),
}

/// Rejections raised while building functors, samplers or preset selections.
/// Always surfaced at construction time; prior state is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyCoefficients,
    ZeroAmplitude,
    InvertedBounds { lower: f64, upper: f64 },
    ZeroTimeDilation,
    PeriodTooLong { sample_count: usize, limit: usize },
    NonFinite { field: &'static str },
    InvalidTuning(&'static str),
    UnknownPreset(String),
    DuplicatePreset(String),
    EmptyCatalog,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    NonFinite { time_ms: f64, value: f64 },
}

#[derive(Debug)]
pub enum CatalogError {
    Json(serde_json::Error),
    Io(std::io::Error),
    Config(ConfigError),
}

#[cfg(feature = "runtime")]
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    NoConfigDir,
}

impl fmt::Display for LivingGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LivingGraphError::Config(e) => write!(f, "Configuration error: {e}"),
            LivingGraphError::Eval(e) => write!(f, "Evaluation error: {e}"),
            LivingGraphError::Catalog(e) => write!(f, "Catalog error: {e}"),
            #[cfg(feature = "runtime")]
            LivingGraphError::Settings(e) => write!(f, "Settings error: {e}"),
        }
    }
}

impl std::error::Error for LivingGraphError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyCoefficients => {
                write!(f, "normalized waveform needs at least one coefficient pair")
            }
            ConfigError::ZeroAmplitude => {
                write!(f, "normalized waveform has a total amplitude of zero")
            }
            ConfigError::InvertedBounds { lower, upper } => {
                write!(f, "lower bound {lower} is greater than upper bound {upper}")
            }
            ConfigError::ZeroTimeDilation => write!(f, "time dilation must be nonzero"),
            ConfigError::PeriodTooLong { sample_count, limit } => {
                write!(f, "period spans {sample_count} samples, more than the limit of {limit}")
            }
            ConfigError::NonFinite { field } => write!(f, "'{field}' must be a finite number"),
            ConfigError::InvalidTuning(reason) => write!(f, "invalid sampler tuning: {reason}"),
            ConfigError::UnknownPreset(name) => write!(f, "unknown preset '{name}'"),
            ConfigError::DuplicatePreset(name) => write!(f, "preset '{name}' is defined twice"),
            ConfigError::EmptyCatalog => write!(f, "preset catalog is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::NonFinite { time_ms, value } => {
                write!(f, "waveform produced {value} at t={time_ms}ms")
            }
        }
    }
}

impl std::error::Error for EvalError {}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Json(e) => {
                write!(f, "invalid catalog JSON at line {}, column {}: {e}", e.line(), e.column())
            }
            CatalogError::Io(e) => write!(f, "could not read catalog: {e}"),
            CatalogError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(feature = "runtime")]
impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings I/O failed: {e}"),
            SettingsError::Json(e) => write!(f, "settings file is not valid JSON: {e}"),
            SettingsError::NoConfigDir => write!(f, "no configuration directory available"),
        }
    }
}

#[cfg(feature = "runtime")]
impl std::error::Error for SettingsError {}

impl From<ConfigError> for LivingGraphError {
    fn from(e: ConfigError) -> Self {
        LivingGraphError::Config(e)
    }
}

impl From<EvalError> for LivingGraphError {
    fn from(e: EvalError) -> Self {
        LivingGraphError::Eval(e)
    }
}

impl From<CatalogError> for LivingGraphError {
    fn from(e: CatalogError) -> Self {
        LivingGraphError::Catalog(e)
    }
}

#[cfg(feature = "runtime")]
impl From<SettingsError> for LivingGraphError {
    fn from(e: SettingsError) -> Self {
        LivingGraphError::Settings(e)
    }
}

impl From<ConfigError> for CatalogError {
    fn from(e: ConfigError) -> Self {
        CatalogError::Config(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Json(e)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}
