//! BreakdownService trait definition

use async_trait::async_trait;

use super::BreakdownError;

/// Stateless subtask generator - each call is independent
///
/// The same title may yield different suggestions on each call; the
/// generator behind it is not deterministic.
#[async_trait]
pub trait BreakdownService: Send + Sync {
    /// Suggest subtask titles for a task
    async fn suggest(&self, task_title: &str) -> Result<Vec<String>, BreakdownError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock breakdown service for unit tests
    pub struct MockBreakdownService {
        responses: Vec<Vec<String>>,
        fail: bool,
        call_count: AtomicUsize,
    }

    impl MockBreakdownService {
        pub fn new(responses: Vec<Vec<String>>) -> Self {
            debug!(response_count = %responses.len(), "MockBreakdownService::new: called");
            Self {
                responses,
                fail: false,
                call_count: AtomicUsize::new(0),
            }
        }

        /// A service whose every call fails
        pub fn failing() -> Self {
            Self {
                responses: vec![],
                fail: true,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BreakdownService for MockBreakdownService {
        async fn suggest(&self, task_title: &str) -> Result<Vec<String>, BreakdownError> {
            debug!(%task_title, "MockBreakdownService::suggest: called");
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BreakdownError::InvalidResponse("simulated failure".to_string()));
            }
            self.responses
                .get(idx)
                .cloned()
                .ok_or_else(|| BreakdownError::InvalidResponse("No more mock responses".to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_returns_responses_in_order() {
            let service = MockBreakdownService::new(vec![vec!["a".to_string()], vec!["b".to_string()]]);

            assert_eq!(service.suggest("x").await.unwrap(), vec!["a"]);
            assert_eq!(service.suggest("x").await.unwrap(), vec!["b"]);
            assert!(service.suggest("x").await.is_err());
            assert_eq!(service.call_count(), 3);
        }

        #[tokio::test]
        async fn test_failing_mock() {
            let service = MockBreakdownService::failing();
            assert!(service.suggest("x").await.is_err());
            assert_eq!(service.call_count(), 1);
        }
    }
}
