use std::fmt;

/// The shared secret every client must present. Set once at startup and
/// handed to the `Authenticator`; never mutated afterwards.
#[derive(Clone)]
pub struct Credential {
    secret: Vec<u8>,
}

impl Credential {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Builds a credential from a line typed at a prompt, without its line ending.
    pub fn from_line(line: &str) -> Option<Self> {
        let secret = line.trim_end_matches(&['\r', '\n'][..]);
        if secret.is_empty() {
            return None;
        }
        Some(Self::new(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("secret", &"***").finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    credential: Credential,
}

impl Authenticator {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Accepts iff `candidate` is byte for byte the configured secret.
    pub fn verify(&self, candidate: &[u8]) -> bool {
        let secret = self.credential.as_bytes();
        if candidate.len() != secret.len() {
            return false;
        }
        candidate
            .iter()
            .zip(secret)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
