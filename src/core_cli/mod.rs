pub mod core_cli;
pub mod prompt;

pub use core_cli::{validate_ipv4, ClientCli, ServerCli};
pub use prompt::{prompt_secret, read_secret_line};
