// src/constants.rs

/// Read buffer size used for commands and payload chunks.
pub const BUFFER_SIZE: usize = 4096;

/// Upper bound for a single control frame body.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Width of the length prefix in front of every control frame.
pub const FRAME_PREFIX_LEN: usize = 4;

pub const TAG_SUCCEED: &str = "SUCCEED";
pub const TAG_FAILED: &str = "FAILED";
pub const TAG_LEN: usize = 7;

pub const AUTH_SUCCESS_TOKEN: &str = "CONNECTION SUCCEED";

/// How many times the client tries to push the password before giving up.
pub const PASSWORD_SEND_ATTEMPTS: u32 = 6;
pub const PASSWORD_RETRY_INTERVAL_MS: u64 = 1000;

/// Pacing between two payload chunks, 0 disables it.
pub const CHUNK_INTERVAL_MS: u64 = 2;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

pub const IPV4_REGEX: &str =
    r"^(25[0-5]|2[0-4]\d|[0-1]?\d?\d)(\.(25[0-5]|2[0-4]\d|[0-1]?\d?\d)){3}$";

pub const LISTING_HEADER: &str = "ID\tFilename\tMode\tSize(byte)\n";
