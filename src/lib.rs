//! Password protected remote file access over a single TCP stream.
//!
//! A client authenticates with a shared secret, then lists and changes the
//! server side directory and moves files in either direction. The pieces:
//!
//! - `core_protocol`: length-prefixed control frames and `SUCCEED<N>` headers
//! - `core_auth`: the one-shot password exchange
//! - `core_command`: verb parsing and the server side handlers
//! - `core_transfer`: chunked, paced payload streaming with progress
//! - `core_directory`: listing and directory resolution per session
//! - `core_network`: accept loop and per-connection dispatch
//! - `core_client`: client calls and the interactive prompt

pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_cli;
pub mod core_client;
pub mod core_command;
pub mod core_directory;
pub mod core_error;
pub mod core_log;
pub mod core_network;
pub mod core_protocol;
pub mod core_transfer;
pub mod server;
pub mod session;

pub use config::Config;
