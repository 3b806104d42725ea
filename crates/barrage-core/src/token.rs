//! Capability tokens
//!
//! A token is an opaque fixed-length lowercase-hex string. It is both the
//! credential and the sole means of locating the activity it grants access
//! to; there are no user accounts behind it.

use std::borrow::Borrow;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the per-activity comment/review/display tokens
pub const ACTIVITY_TOKEN_LEN: usize = 8;

/// Length of the engine-wide admin token
pub const ADMIN_TOKEN_LEN: usize = 16;

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// An opaque capability token
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Generate a fresh random token of `len` hex characters
    pub fn generate(len: usize) -> Self {
        let mut rng = rand::thread_rng();
        let s = (0..len)
            .map(|_| HEX_CHARS[rng.gen_range(0..HEX_CHARS.len())] as char)
            .collect();
        AuthToken(s)
    }

    /// Wrap a caller-chosen token verbatim
    pub fn from_raw(raw: impl Into<String>) -> Self {
        AuthToken(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets HashMap<AuthToken, _> be probed with the presented &str
impl Borrow<str> for AuthToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AuthToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AuthToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
