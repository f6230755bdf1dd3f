//! Credential pool
//!
//! The head of the pool is always the current credential. Rotation discards it
//! for good; a key that hit the rate limit is never tried again in the same run.

use std::collections::VecDeque;
use std::fmt;

use crate::error::{Result, api};

/// Opaque API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the auth header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Ordered pool of API keys
#[derive(Debug, Default)]
pub struct CredentialPool {
    credentials: VecDeque<Credential>,
    /// Bumped on every rotation so concurrent callers can tell whether the
    /// credential they used is still the current one.
    generation: u64,
    /// Set once the last credential hit the rate limit
    spent: bool,
}

impl CredentialPool {
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
            generation: 0,
            spent: false,
        }
    }

    /// Build a pool from raw keys, skipping blank entries
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            keys.into_iter()
                .map(|k| k.as_ref().trim().to_string())
                .filter(|k| !k.is_empty())
                .map(Credential::new),
        )
    }

    /// The credential to authenticate with
    pub fn current(&self) -> Result<&Credential> {
        self.credentials.front().ok_or_else(api::exhausted)
    }

    /// Discard the current credential and move to the next one
    pub fn rotate(&mut self) -> Result<&Credential> {
        if self.credentials.pop_front().is_some() {
            self.generation += 1;
        }
        self.current()
    }

    /// Drop the last credential after it hit the rate limit
    ///
    /// Later checkouts must fail without sending anything.
    pub fn retire_limited(&mut self) {
        if self.credentials.pop_front().is_some() {
            self.generation += 1;
        }
        self.credentials.clear();
        self.spent = true;
    }

    /// Whether every credential has been rate limited
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Whether a credential remains after the current one
    pub fn has_backup(&self) -> bool {
        self.credentials.len() > 1
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current credential together with the generation it belongs to
    pub(crate) fn checkout(&self) -> Result<(u64, Credential)> {
        Ok((self.generation, self.current()?.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeployError;

    #[test]
    fn test_current_is_head() {
        let pool = CredentialPool::from_keys(["k1", "k2"]);
        assert_eq!(pool.current().unwrap().expose(), "k1");
        assert!(pool.has_backup());
    }

    #[test]
    fn test_rotate_discards_current() {
        let mut pool = CredentialPool::from_keys(["k1", "k2", "k3"]);
        assert_eq!(pool.rotate().unwrap().expose(), "k2");
        assert_eq!(pool.rotate().unwrap().expose(), "k3");
        assert_eq!(pool.len(), 1);
        assert!(!pool.has_backup());
        assert_eq!(pool.generation(), 2);
    }

    #[test]
    fn test_rotate_past_last_is_exhausted() {
        let mut pool = CredentialPool::from_keys(["k1"]);
        assert!(matches!(
            pool.rotate(),
            Err(DeployError::CredentialsExhausted)
        ));
        assert!(pool.is_empty());
        assert!(matches!(
            pool.current(),
            Err(DeployError::CredentialsExhausted)
        ));
    }

    #[test]
    fn test_retire_limited_spends_pool() {
        let mut pool = CredentialPool::from_keys(["k1"]);
        assert!(!pool.is_spent());
        pool.retire_limited();
        assert!(pool.is_spent());
        assert!(pool.is_empty());
        assert_eq!(pool.generation(), 1);
        assert!(pool.checkout().is_err());
    }

    #[test]
    fn test_empty_pool() {
        let mut pool = CredentialPool::default();
        assert!(pool.current().is_err());
        assert!(pool.rotate().is_err());
        assert_eq!(pool.generation(), 0);
    }

    #[test]
    fn test_blank_keys_are_skipped() {
        let pool = CredentialPool::from_keys(["", "  ", "k1 "]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.current().unwrap().expose(), "k1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let credential = Credential::new("secret-key");
        assert_eq!(format!("{credential:?}"), "Credential(****)");
    }
}
