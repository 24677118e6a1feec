//! Daybook: a personal journal behind a small JSON API.
//!
//! Entries live in memory as an ordered list, are materialized from a single JSON
//! snapshot at startup and written back once on shutdown. A proxy route asks an
//! external chat-completion service for reflective feedback on an entry.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`journal`]: Entry types and the in-memory store: CRUD, shallow-merge updates, search
//! - [`persist`]: Snapshot load/save and the exactly-once shutdown flush
//! - [`feedback`]: Prompt rendering and the chat-completions provider
//! - [`api`]: axum router and handlers
//! - [`server`]: Server lifecycle and signal handling
//! - [`cli`]: Offline subcommands: export, add, prompt

pub mod api;
pub mod cli;
pub mod config;
pub mod feedback;
pub mod journal;
pub mod persist;
pub mod server;
