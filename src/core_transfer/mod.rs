//! Chunked, paced byte streaming for uploads and downloads.

pub mod engine;
pub mod throttle;
pub mod transfer;

pub use engine::{
    create_destination, discard_payload, open_source, recv_payload, send_payload, TransferOptions,
};
pub use throttle::Throttle;
pub use transfer::{Direction, LogProgress, NoProgress, ProgressObserver, TransferSession};
