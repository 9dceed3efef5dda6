use crate::core_auth::AuthState;
use std::path::PathBuf;

/// Per-connection state. Each session carries its own working directory so
/// that `CD` in one connection never moves another.
#[derive(Debug)]
pub struct Session {
    pub peer: String,
    pub current_dir: PathBuf,
    pub state: AuthState,
}

impl Session {
    pub fn new(peer: impl Into<String>, base_path: PathBuf) -> Self {
        Self {
            peer: peer.into(),
            current_dir: base_path,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    pub fn mark_authenticated(&mut self) {
        self.state = AuthState::Authenticated;
    }

    /// Current directory as sent over the wire, with `/` separators.
    pub fn current_dir_display(&self) -> String {
        self.current_dir.to_string_lossy().replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_unauthenticated() {
        let mut session = Session::new("127.0.0.1:5000", PathBuf::from("/srv/files"));
        assert!(!session.is_authenticated());
        session.mark_authenticated();
        assert!(session.is_authenticated());
        assert_eq!(session.current_dir_display(), "/srv/files");
    }
}
