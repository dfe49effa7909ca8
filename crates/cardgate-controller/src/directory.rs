//! Card directory: hex identifier to display name.
//!
//! [`Directory`] is the seam for a remote user store. Whatever backs it must
//! answer within a bounded time; [`TimeoutDirectory`] enforces that bound on
//! any implementation and turns a late answer into "not found".

#![allow(async_fn_in_trait)]

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

/// Resolves a card's hex identifier to a user name.
///
/// Lookups are idempotent and must not block past their bound.
pub trait Directory: Send + Sync {
    /// Name for `hex_id`, or `None` when the card is not enrolled.
    async fn lookup(&self, hex_id: &str) -> Option<String>;
}

/// In-memory directory backed by a table loaded at startup.
///
/// Keys are stored lowercase, so tables may be written in either case.
///
/// # Examples
///
/// ```
/// use cardgate_controller::{Directory, StaticDirectory};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let directory = StaticDirectory::reference();
/// assert_eq!(directory.lookup("12345678").await.as_deref(), Some("Admin"));
/// assert_eq!(directory.lookup("aabbccdd").await, None);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The factory enrollment table.
    pub fn reference() -> Self {
        Self::from_entries([("12345678", "Admin"), ("87654321", "John Doe")])
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut directory = Self::new();
        for (hex_id, name) in entries {
            directory.insert(hex_id, name);
        }
        directory
    }

    pub fn insert(&mut self, hex_id: impl AsRef<str>, name: impl Into<String>) {
        self.entries
            .insert(hex_id.as_ref().to_ascii_lowercase(), name.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Directory for StaticDirectory {
    async fn lookup(&self, hex_id: &str) -> Option<String> {
        self.entries.get(&hex_id.to_ascii_lowercase()).cloned()
    }
}

/// Bounds every lookup of the wrapped directory.
///
/// A lookup that does not finish within the deadline is reported as not
/// found and logged at `warn`.
#[derive(Debug, Clone)]
pub struct TimeoutDirectory<D> {
    inner: D,
    timeout: Duration,
}

impl<D: Directory> TimeoutDirectory<D> {
    pub fn new(inner: D, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Directory> Directory for TimeoutDirectory<D> {
    async fn lookup(&self, hex_id: &str) -> Option<String> {
        match tokio::time::timeout(self.timeout, self.inner.lookup(hex_id)).await {
            Ok(found) => found,
            Err(_) => {
                warn!(
                    hex_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Directory lookup timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Directory that answers after a fixed delay.
    struct SlowDirectory {
        delay: Duration,
        inner: StaticDirectory,
    }

    impl Directory for SlowDirectory {
        async fn lookup(&self, hex_id: &str) -> Option<String> {
            tokio::time::sleep(self.delay).await;
            self.inner.lookup(hex_id).await
        }
    }

    #[rstest]
    #[case("12345678", Some("Admin"))]
    #[case("87654321", Some("John Doe"))]
    #[case("aabbccdd", None)]
    #[case("0389af0d", None)]
    #[case("", None)]
    #[tokio::test]
    async fn test_reference_table(#[case] hex_id: &str, #[case] expected: Option<&str>) {
        let directory = StaticDirectory::reference();
        assert_eq!(directory.lookup(hex_id).await.as_deref(), expected);
    }

    #[tokio::test]
    async fn test_keys_are_case_insensitive() {
        let directory = StaticDirectory::from_entries([("DEADBEEF", "Ops")]);
        assert_eq!(directory.lookup("deadbeef").await.as_deref(), Some("Ops"));
        assert_eq!(directory.lookup("DeadBeef").await.as_deref(), Some("Ops"));
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let directory = StaticDirectory::new();
        assert!(directory.is_empty());
        assert_eq!(directory.lookup("12345678").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_directory_within_bound() {
        let directory = TimeoutDirectory::new(
            SlowDirectory {
                delay: Duration::from_millis(100),
                inner: StaticDirectory::reference(),
            },
            Duration::from_millis(500),
        );

        assert_eq!(directory.lookup("12345678").await.as_deref(), Some("Admin"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_directory_late_answer_is_not_found() {
        let directory = TimeoutDirectory::new(
            SlowDirectory {
                delay: Duration::from_secs(3),
                inner: StaticDirectory::reference(),
            },
            Duration::from_millis(500),
        );

        let start = tokio::time::Instant::now();
        assert_eq!(directory.lookup("12345678").await, None);
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
