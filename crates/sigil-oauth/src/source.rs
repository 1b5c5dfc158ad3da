//! Nonce and timestamp sources for default options.
//!
//! Defaults are drawn through these traits rather than from globals so
//! callers can pin `oauth_nonce` and `oauth_timestamp` for reproducible
//! signatures.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngExt;

/// Source of single-use nonces.
pub trait NonceSource: Send + Sync {
    /// Produce a fresh nonce.
    fn nonce(&self) -> String;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn unix_timestamp(&self) -> u64;
}

/// Cryptographically random nonce (32 hex characters).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn nonce(&self) -> String {
        let bytes = rand::rng().random::<[u8; 16]>();
        hex::encode(bytes)
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> u64 {
        // A clock set before 1970 yields 0 rather than failing the signature.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    }
}

/// Nonce source that always returns the same value.
#[derive(Debug, Clone)]
pub struct FixedNonce(pub String);

impl NonceSource for FixedNonce {
    fn nonce(&self) -> String {
        self.0.clone()
    }
}

/// Clock frozen at a given Unix timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_timestamp(&self) -> u64 {
        self.0
    }
}
