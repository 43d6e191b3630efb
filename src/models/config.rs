use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub preview: PreviewConfig,
    pub export: ExportConfig,
    pub assistant: AssistantConfig,
    pub admin: AdminConfig,
}

/// Canvas limits and stage tuning for the processing pipeline
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum width or height of a working canvas
    pub max_dimension: u32,

    /// Maximum total pixels of a working canvas
    pub max_pixels: u64,

    /// RGB distance below which a pixel matches the background corner
    pub background_tolerance: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_dimension: 16_384,
            max_pixels: 268_435_456,
            background_tolerance: raster_fx::DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PreviewConfig {
    /// Quiet period before a coalesced preview runs
    pub debounce_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub default_dpi: u32,

    /// Exports wider than this many pixels carry a quality warning
    pub quality_warning_px: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_dpi: 300,
            quality_warning_px: 4000,
        }
    }
}

/// Generative assistant endpoint settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    pub model: String,

    /// API key; `GEMINI_API_KEY` takes precedence when set
    pub api_key: Option<String>,

    /// Retries after a rate-limited attempt
    pub max_retries: u32,

    /// Delay before the first retry, doubled for each further one
    pub retry_base_delay_ms: u64,

    pub timeout_secs: u64,
    pub system_instruction: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            max_retries: 2,
            retry_base_delay_ms: 2000,
            timeout_secs: 60,
            system_instruction: "You are a technical expert in screen printing and graphic \
                                 design (DTF transfers, color separation)."
                .to_string(),
        }
    }
}

/// Seeded administrator account
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "change-me".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Load configuration from a file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        max_dimension = config.pipeline.max_dimension,
                        debounce_ms = config.preview.debounce_ms,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from `CONFIG_FILE` and apply environment overrides
    pub fn from_env() -> Self {
        let config_file = std::env::var("CONFIG_FILE").ok();
        let mut config = Self::load(config_file.as_deref().map(Path::new));
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.assistant.api_key = Some(key);
            }
        }
        config
    }
}
