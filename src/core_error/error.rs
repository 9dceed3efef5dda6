// Error types shared by the server and the client
use std::io;
use thiserror::Error;

/// Failures while reading or decoding a control frame.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("connection error: {0}")]
    Io(#[from] io::Error),

    #[error("peer closed the connection")]
    Closed,

    #[error("frame of {0} bytes exceeds the allowed size")]
    TooLarge(usize),

    #[error("short read: {0} bytes is too short for a transfer header")]
    ShortRead(usize),

    #[error("header transmission error: {0:?} is not a byte count")]
    HeaderParse(String),

    #[error("unexpected status tag: {0:?}")]
    UnexpectedTag(String),

    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
}

impl FrameError {
    /// True when the byte stream itself is gone or can no longer be
    /// resynchronised, as opposed to a well framed but malformed message.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            FrameError::Io(_) | FrameError::Closed | FrameError::TooLarge(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("secret mismatch")]
    Rejected,

    #[error("cannot contact remote server after {0} attempts")]
    Unreachable(u32),

    #[error("unexpected authentication reply: {0:?}")]
    UnexpectedReply(String),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Outcome of a failed upload or download.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("transmission error: {0}")]
    Io(#[source] io::Error),

    #[error("peer closed the stream after {transferred} of {total} bytes")]
    Truncated { transferred: u64, total: u64 },

    #[error("file write error: wrote {written} of {expected} bytes")]
    Write { expected: usize, written: usize },

    #[error("file system error on {path}: {source}")]
    FileSystem {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("remote side reported failure: {0}")]
    Remote(String),

    #[error(transparent)]
    Protocol(#[from] FrameError),
}

impl TransferError {
    pub fn file_system(path: impl Into<String>, source: io::Error) -> Self {
        TransferError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the connection is unusable after this failure.
    pub fn is_connection_error(&self) -> bool {
        match self {
            TransferError::Io(_) | TransferError::Truncated { .. } => true,
            TransferError::Protocol(e) => e.is_connection_error(),
            _ => false,
        }
    }
}

/// Session level taxonomy: what ended (or soured) a connection.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("file system error: {0}")]
    FileSystem(#[source] io::Error),
}

impl From<FrameError> for SessionError {
    fn from(e: FrameError) -> Self {
        if e.is_connection_error() {
            SessionError::Connection(e.to_string())
        } else {
            SessionError::Protocol(e.to_string())
        }
    }
}

impl From<TransferError> for SessionError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::FileSystem { source, .. } => SessionError::FileSystem(source),
            TransferError::Protocol(frame) => frame.into(),
            e if e.is_connection_error() => SessionError::Connection(e.to_string()),
            e => SessionError::Protocol(e.to_string()),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Connection(e.to_string())
    }
}
