//! AI task breakdown
//!
//! Turns a task title into a handful of subtask titles via an external
//! text-generation service. Callers go through [`get_breakdown`], which never
//! fails: any error becomes an empty suggestion list.

use std::sync::Arc;

use tracing::{debug, info, warn};

mod error;
mod gate;
mod gemini;
mod service;

pub use error::BreakdownError;
pub use gate::{BreakdownGate, BreakdownPermit};
pub use gemini::GeminiClient;
pub use service::BreakdownService;

#[cfg(test)]
pub use service::mock;

use crate::config::BreakdownConfig;

/// Create a breakdown service based on the provider specified in config
///
/// Supports the "gemini" provider.
pub fn create_service(config: &BreakdownConfig) -> Result<Arc<dyn BreakdownService>, BreakdownError> {
    debug!(provider = %config.provider, model = %config.model, "create_service: called");
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_config(config)?)),
        other => {
            debug!(provider = %other, "create_service: unknown provider");
            Err(BreakdownError::Config(format!(
                "Unknown breakdown provider: '{}'. Supported: gemini",
                other
            )))
        }
    }
}

/// Ask for subtasks of a task, empty on any failure
///
/// Suggestions are trimmed and blank ones dropped.
pub async fn get_breakdown(service: &dyn BreakdownService, task_title: &str) -> Vec<String> {
    debug!(%task_title, "get_breakdown: called");
    match service.suggest(task_title).await {
        Ok(raw) => {
            let subtasks = clean_suggestions(raw);
            info!(count = subtasks.len(), "Breakdown received");
            subtasks
        }
        Err(e) => {
            warn!(error = %e, "get_breakdown: service failed, no suggestions");
            Vec::new()
        }
    }
}

fn clean_suggestions(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::mock::MockBreakdownService;
    use super::*;

    #[tokio::test]
    async fn test_get_breakdown_failure_is_empty() {
        let service = MockBreakdownService::failing();
        assert!(get_breakdown(&service, "Plan trip").await.is_empty());
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_get_breakdown_cleans_suggestions() {
        let service = MockBreakdownService::new(vec![vec![
            "  Book flights ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "Pack".to_string(),
        ]]);
        assert_eq!(get_breakdown(&service, "Plan trip").await, vec!["Book flights", "Pack"]);
    }

    #[test]
    fn test_create_service_unknown_provider() {
        let config = BreakdownConfig {
            provider: "nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(create_service(&config), Err(BreakdownError::Config(_))));
    }

    #[test]
    fn test_create_service_without_key() {
        let config = BreakdownConfig {
            api_key_env: "TASKMASTER_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(create_service(&config), Err(BreakdownError::Config(_))));
    }
}
