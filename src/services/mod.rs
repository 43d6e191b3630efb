pub mod assistant;
pub mod credential_store;
pub mod pipeline;
pub mod print_export;
pub mod scheduler;

pub use assistant::{Assistant, AssistantError, ChatMessage, ChatRole, GeminiAssistant};
pub use credential_store::{CreateOutcome, CredentialStore, InMemoryCredentialStore};
pub use pipeline::{Pipeline, ProcessRequest, ProcessedImage};
pub use print_export::{PrintExport, PrintExporter};
pub use scheduler::{PreviewFailure, PreviewFrame, PreviewScheduler};
