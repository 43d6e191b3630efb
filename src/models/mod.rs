pub mod config;
pub mod print_spec;
pub mod settings;
pub mod user;

pub use config::{AdminConfig, AppConfig, AssistantConfig, ExportConfig, PipelineConfig, PreviewConfig};
pub use print_spec::{PrintLayout, PrintLocation, PrintSpec, ShirtSize};
pub use settings::{EffectSettings, EnhanceSettings, SeparationSettings, Tool, UpscaleFactor};
pub use user::{Role, User};
