//! Vibe Core - Shared functionality for the vibe CLI
//!
//! Speak plain English, run dev commands.

pub mod exec;
pub mod format;
pub mod handlers;
pub mod loader;
pub mod resolve;
pub mod table;

pub use exec::{execute, ExecutionResult};
pub use format::format_template;
pub use handlers::Builtin;
pub use resolve::{resolve, Resolution, ResolvedCommand};
pub use table::{CommandAction, CommandDescriptor, CommandTable, PhraseTable, ToolTable};
