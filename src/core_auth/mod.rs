pub mod core_auth;
pub mod helper;

pub use core_auth::{AuthState, Authenticator, Credential};
pub use helper::{authenticate_peer, login};
