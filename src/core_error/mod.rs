pub mod error;

pub use error::{AuthError, FrameError, SessionError, TransferError};
