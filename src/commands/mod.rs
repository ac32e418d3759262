//! CLI command implementations

mod chat;
mod ingest;
mod serve;
mod sources;

pub use chat::*;
pub use ingest::*;
pub use serve::*;
pub use sources::*;
