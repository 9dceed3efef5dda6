//! Client side: the protocol calls and the interactive prompt on top.

pub mod client;
pub mod progress;
pub mod repl;

pub use client::Client;
pub use progress::BarProgress;
pub use repl::{read_command, run_repl};
