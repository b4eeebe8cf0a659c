//! Guarded secret values.
//!
//! Passwords and other secrets travel through the framework as
//! [`GuardedString`]. The clear text is never printed and is only reachable
//! through [`GuardedString::access`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{Ordering, compiler_fence};

const REDACTED: &str = "********";

/// A secret string.
///
/// Equality compares SHA-256 digests. The backing buffer is overwritten with
/// zeros when the value is dropped.
#[derive(Clone)]
pub struct GuardedString {
    secret: Vec<u8>,
    digest: [u8; 32],
}

impl GuardedString {
    pub fn new(clear_text: &str) -> Self {
        let secret = clear_text.as_bytes().to_vec();
        let digest = Sha256::digest(&secret).into();
        Self { secret, digest }
    }

    /// Run `f` with the clear text.
    ///
    /// The borrowed text must not outlive the closure; copy it out only when
    /// the resource API demands an owned value.
    pub fn access<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(std::str::from_utf8(&self.secret).unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    /// Base64 encoded SHA-256 digest of the clear text.
    pub fn base64_sha256(&self) -> String {
        BASE64.encode(self.digest)
    }

    /// Check the clear text against a base64 encoded SHA-256 digest.
    pub fn verify_base64_sha256(&self, hash: &str) -> bool {
        match BASE64.decode(hash) {
            Ok(expected) => expected.as_slice() == self.digest.as_slice(),
            Err(_) => false,
        }
    }
}

impl PartialEq for GuardedString {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest
    }
}

impl Eq for GuardedString {}

impl Drop for GuardedString {
    fn drop(&mut self) {
        self.secret.fill(0);
        compiler_fence(Ordering::SeqCst);
    }
}

impl fmt::Debug for GuardedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuardedString({})", REDACTED)
    }
}

impl fmt::Display for GuardedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for GuardedString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}

impl From<&str> for GuardedString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
