// Commands understood by the server, one handler per verb
pub mod cd;
pub mod command;
pub mod get;
pub mod ls;
pub mod put;
pub mod pwd;
pub mod try_;

pub use command::Command;
