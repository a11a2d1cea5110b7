pub mod agents;
pub mod completion;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

// Re-export main types
pub use completion::{
    ChatMessage, CompletionClient, CompletionReply, OpenAiClient, OutputSchema, Role, ToolCall,
    ToolSpec,
};
pub use config::{AppConfig, CompletionConfig, StorageConfig};
pub use error::{Error, Result};
pub use store::Store;
