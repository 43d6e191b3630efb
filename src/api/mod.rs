pub mod assistant;
pub mod auth;
pub mod export;
pub mod preview;
pub mod process;
pub mod users;

pub use assistant::{handle_analyze, handle_chat, AnalyzeRequest, AssistantReply, ChatRequest};
pub use assistant::{__path_handle_analyze, __path_handle_chat};
pub use export::{handle_export, handle_layout, ExportBody, LayoutQuery};
pub use export::{__path_handle_export, __path_handle_layout};
pub use preview::{handle_get_preview, handle_submit_preview, PreviewAccepted};
pub use preview::{__path_handle_get_preview, __path_handle_submit_preview};
pub use process::{handle_process, ProcessBody, __path_handle_process};
pub use users::{
    handle_create_user, handle_delete_user, handle_export_users, handle_import_users,
    handle_list_users, handle_login, Credentials, ImportResponse,
};
pub use users::{
    __path_handle_create_user, __path_handle_delete_user, __path_handle_export_users,
    __path_handle_import_users, __path_handle_list_users, __path_handle_login,
};
