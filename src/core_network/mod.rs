pub mod network;

pub use network::{handle_connection, start_server};
