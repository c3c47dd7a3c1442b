//! Identifier types, generation and resolution
//!
//! Ids are opaque strings. New ids are UUID v4 built from OS randomness; if the
//! OS source fails, a process-local `{millis}-{pid}-{counter}` id is used
//! instead. That fallback is unique within one process but only probabilistically
//! unique across processes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the full id string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a [`TaskList`](crate::domain::TaskList)
    ListId
);

string_id!(
    /// Identifier of a [`Task`](crate::domain::Task)
    TaskId
);

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh opaque id
pub fn generate_id() -> String {
    let mut bytes = [0u8; 16];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes).into_uuid().to_string(),
        Err(e) => {
            warn!(error = %e, "generate_id: OS randomness unavailable, using fallback id");
            fallback_id()
        }
    }
}

fn fallback_id() -> String {
    let seq = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "{:x}-{:x}-{:x}",
        chrono::Utc::now().timestamp_millis(),
        std::process::id(),
        seq
    )
}

/// Source of fresh ids and creation timestamps
///
/// The store mints everything it needs before reducing an intent, so the
/// reducer stays deterministic.
pub trait Minter: Send {
    /// A fresh id, unique for the lifetime of the state
    fn mint_id(&mut self) -> String;

    /// Current time in unix milliseconds
    fn now_millis(&mut self) -> i64;
}

/// Minter backed by OS randomness and the wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMinter;

impl Minter for SystemMinter {
    fn mint_id(&mut self) -> String {
        generate_id()
    }

    fn now_millis(&mut self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Deterministic minter: ids `{prefix}1`, `{prefix}2`, ... and a clock that
/// advances by one millisecond per reading
#[derive(Debug, Clone)]
pub struct SequenceMinter {
    prefix: String,
    next: u64,
    clock: i64,
}

impl SequenceMinter {
    pub fn new(prefix: impl Into<String>, start_millis: i64) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
            clock: start_millis,
        }
    }
}

impl Minter for SequenceMinter {
    fn mint_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    fn now_millis(&mut self) -> i64 {
        let now = self.clock;
        self.clock += 1;
        now
    }
}

/// Resolves abbreviated id references against a set of known ids
pub struct IdResolver<'a> {
    ids: Vec<&'a str>,
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Resolve a partial reference to a full id
    ///
    /// Returns:
    /// - Ok(Some(id)) on an exact match or a single prefix match
    /// - Ok(None) if nothing matches, or the reference is blank
    /// - Err with candidates if the prefix is ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<&'a str>, Vec<&'a str>> {
        debug!(%reference, known = self.ids.len(), "resolve: called");
        // a blank prefix would match everything
        if reference.trim().is_empty() {
            return Ok(None);
        }
        if let Some(exact) = self.ids.iter().find(|id| **id == reference) {
            return Ok(Some(*exact));
        }

        let mut matches: Vec<&'a str> = self.ids.iter().copied().filter(|id| id.starts_with(reference)).collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(matches),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_uuid_shaped_and_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_fallback_ids_are_distinct() {
        let a = fallback_id();
        let b = fallback_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequence_minter() {
        let mut minter = SequenceMinter::new("t", 100);
        assert_eq!(minter.mint_id(), "t1");
        assert_eq!(minter.mint_id(), "t2");
        assert_eq!(minter.now_millis(), 100);
        assert_eq!(minter.now_millis(), 101);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ListId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: TaskId = serde_json::from_str("\"xyz\"").unwrap();
        assert_eq!(back.as_str(), "xyz");
    }

    #[test]
    fn test_id_resolver_exact_beats_prefix() {
        let resolver = IdResolver::new(["abc", "abcdef"]);
        assert_eq!(resolver.resolve("abc").unwrap(), Some("abc"));
    }

    #[test]
    fn test_id_resolver_prefix() {
        let resolver = IdResolver::new(["0194-aaaa", "1234-bbbb"]);
        assert_eq!(resolver.resolve("0194").unwrap(), Some("0194-aaaa"));
    }

    #[test]
    fn test_id_resolver_ambiguous() {
        let resolver = IdResolver::new(["ab1", "ab2", "cd3"]);
        let candidates = resolver.resolve("ab").unwrap_err();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_id_resolver_blank_reference_matches_nothing() {
        let resolver = IdResolver::new(["only-one"]);
        assert_eq!(resolver.resolve("").unwrap(), None);
        assert_eq!(resolver.resolve("   ").unwrap(), None);
    }

    #[test]
    fn test_id_resolver_no_match() {
        let resolver = IdResolver::new(["ab1"]);
        assert_eq!(resolver.resolve("zz").unwrap(), None);
    }
}
