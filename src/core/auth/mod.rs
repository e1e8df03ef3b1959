use std::fmt;

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Locked,
    Unlocked,
}

/// Shared-secret check guarding the admin view.
///
/// Only the SHA-256 digest of the secret is held. There is no lockout after
/// failed attempts.
#[derive(Clone)]
pub struct AdminGate {
    secret_digest: [u8; 32],
}

impl AdminGate {
    pub fn new(secret: &str) -> Self {
        Self {
            secret_digest: digest(secret),
        }
    }

    pub fn authenticate(&self, input: &str) -> bool {
        let candidate = digest(input);
        // Compare every byte regardless of where the first mismatch is.
        candidate
            .iter()
            .zip(self.secret_digest.iter())
            .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
            == 0
    }
}

impl fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.finalize().into()
}
