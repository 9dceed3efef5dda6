//! Wire framing shared by both ends of a connection.
//!
//! Control messages travel as frames: a big-endian `u32` length followed by
//! the message text. Bulk payloads (file contents, listings) follow a
//! `SUCCEED<N>` header as exactly `N` raw bytes.

pub mod frame;
pub mod header;

pub use frame::{read_frame, read_text_frame, write_frame, write_text_frame};
pub use header::{is_succeed, parse_length, TransferHeader};
