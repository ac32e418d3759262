//! ragchat: chat with your documents.
//!
//! PDF files, pasted text and websites are chunked, embedded and stored as
//! per-source Qdrant collections; questions are answered by a chat model
//! grounded in the most similar chunks from the selected collections.

pub mod chat;
pub mod chunk;
pub mod commands;
pub mod config;
pub mod controller;
pub mod embed;
pub mod error;
pub mod extract;
pub mod models;
pub mod progress;
pub mod retrieve;
pub mod server;
pub mod store;
