pub mod directory;

pub use directory::{format_mode, DirectoryService, LocalDirectory};
