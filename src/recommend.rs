//! Sequential fallback over the candidate model list
//!
//! Each attempt runs the full pipeline: generate, extract the array,
//! parse it, validate every element. Availability problems and parse
//! failures move on to the next candidate; anything else aborts.

use serde_json::Value;
use tracing::{info, warn};

use crate::error::RecommendError;
use crate::extract::extract_json_array;
use crate::gemini::TextGenerator;
use crate::models::{sanitize_all, Destination};

/// Candidate models in priority order, cheapest capable model first
pub const CANDIDATE_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
];

/// Asks the provider for destinations matching `query`, trying
/// [`CANDIDATE_MODELS`] strictly in order and returning the first success.
///
/// `exclude` lists destination names the prompt tells the model not to
/// repeat; the caller owns that history, nothing is kept between requests.
pub async fn recommend(
    provider: &dyn TextGenerator,
    query: &str,
    exclude: &[String],
) -> crate::Result<Vec<Destination>> {
    if query.trim().is_empty() {
        return Err(RecommendError::EmptyQuery);
    }
    let prompt = build_prompt(query.trim(), exclude);

    let mut last_error = None;
    for model in CANDIDATE_MODELS {
        match attempt(provider, model, &prompt).await {
            Ok(destinations) => {
                info!(model, count = destinations.len(), "recommendation ready");
                return Ok(destinations);
            }
            Err(err) if err.is_retryable() => {
                warn!(model, error = %err, "attempt failed, trying next candidate");
                last_error = Some(err);
            }
            Err(err) => {
                warn!(model, error = %err, "attempt failed, aborting fallback");
                return Err(err);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        RecommendError::Parse("no candidate model produced a reply".to_string())
    }))
}

async fn attempt(
    provider: &dyn TextGenerator,
    model: &str,
    prompt: &str,
) -> crate::Result<Vec<Destination>> {
    let reply = provider.generate(model, prompt).await?;

    let array_text = extract_json_array(&reply)
        .ok_or_else(|| RecommendError::Parse("no JSON array in the model reply".to_string()))?;
    let parsed: Value = serde_json::from_str(array_text)
        .map_err(|e| RecommendError::Parse(format!("model reply is not valid JSON: {e}")))?;
    let Value::Array(items) = parsed else {
        return Err(RecommendError::Parse(
            "model reply is not a JSON array".to_string(),
        ));
    };

    Ok(sanitize_all(&items))
}

fn build_prompt(query: &str, exclude: &[String]) -> String {
    let mut prompt = format!(
        "You are a travel assistant. The user asked: \"{query}\"\n\
         Reply with a JSON array of 3 to 6 destination objects and nothing \
         else - no prose, no markdown fences.\n\
         Each object has the fields: id (string), name (string), country \
         (string), description (string, one or two sentences), lat (number) \
         and lng (number).\n\
         Use accurate real-world coordinates for lat and lng."
    );
    if !exclude.is_empty() {
        prompt.push_str("\nDo not suggest these destinations again: ");
        prompt.push_str(&exclude.join(", "));
        prompt.push('.');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, ProviderErrorKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that replays a fixed sequence of outcomes and records
    /// which models were asked.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedProvider {
        async fn generate(&self, model: &str, _prompt: &str) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push(model.to_string());
            let mut replies = self.replies.lock().unwrap();
            assert!(!replies.is_empty(), "unexpected provider call");
            replies.remove(0)
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(Vec::new())
        }
    }

    const VALID_REPLY: &str =
        r#"[{"name":"Paris","country":"France","description":"Lights.","lat":48.8,"lng":2.3}]"#;

    fn overloaded() -> ProviderError {
        ProviderError::new(ProviderErrorKind::Overloaded, "model overloaded")
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits_without_provider_call() {
        let provider = ScriptedProvider::new(Vec::new());
        let result = recommend(&provider, "   ", &[]).await;

        assert!(matches!(result, Err(RecommendError::EmptyQuery)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_first_candidate_success_returns_immediately() {
        let provider = ScriptedProvider::new(vec![Ok(VALID_REPLY.to_string())]);
        let destinations = recommend(&provider, "a city break", &[]).await.unwrap();

        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].name, "Paris");
        assert_eq!(destinations[0].id, "1");
        assert_eq!(provider.calls(), vec!["gemini-2.5-flash"]);
    }

    #[tokio::test]
    async fn test_overloaded_then_success_uses_second_candidate() {
        let provider =
            ScriptedProvider::new(vec![Err(overloaded()), Ok(VALID_REPLY.to_string())]);
        let destinations = recommend(&provider, "a city break", &[]).await.unwrap();

        assert_eq!(destinations[0].name, "Paris");
        assert_eq!(
            provider.calls(),
            vec!["gemini-2.5-flash", "gemini-2.5-flash-lite"]
        );
    }

    #[tokio::test]
    async fn test_parse_failure_advances_to_next_candidate() {
        let provider = ScriptedProvider::new(vec![
            Ok("Sorry, I can only answer in prose.".to_string()),
            Ok(VALID_REPLY.to_string()),
        ]);
        let destinations = recommend(&provider, "somewhere warm", &[]).await.unwrap();

        assert_eq!(destinations[0].name, "Paris");
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_json_counts_as_parse_failure() {
        // Balanced brackets but unquoted values: extraction succeeds,
        // parsing does not.
        let provider = ScriptedProvider::new(vec![
            Ok(r#"[{"name": Paris}]"#.to_string()),
            Ok(VALID_REPLY.to_string()),
        ]);
        let destinations = recommend(&provider, "somewhere warm", &[]).await.unwrap();
        assert_eq!(provider.calls().len(), 2);
        assert_eq!(destinations[0].name, "Paris");
    }

    #[tokio::test]
    async fn test_generic_error_aborts_immediately() {
        let provider = ScriptedProvider::new(vec![Err(ProviderError::other(
            "permission denied for project",
        ))]);
        let err = recommend(&provider, "a beach", &[]).await.unwrap_err();

        assert_eq!(provider.calls().len(), 1);
        assert!(err.user_message().contains("permission denied for project"));
    }

    #[tokio::test]
    async fn test_exhausted_candidates_surface_last_error() {
        let provider = ScriptedProvider::new(vec![
            Err(overloaded()),
            Err(overloaded()),
            Err(ProviderError::new(
                ProviderErrorKind::RateLimited,
                "quota exhausted",
            )),
        ]);
        let err = recommend(&provider, "a beach", &[]).await.unwrap_err();

        assert_eq!(provider.calls().len(), CANDIDATE_MODELS.len());
        assert!(matches!(
            err,
            RecommendError::Provider(ProviderError {
                kind: ProviderErrorKind::RateLimited,
                ..
            })
        ));
    }

    #[test]
    fn test_prompt_mentions_exclusions_only_when_present() {
        let bare = build_prompt("a beach", &[]);
        assert!(!bare.contains("Do not suggest"));

        let with_exclusions =
            build_prompt("a beach", &["Lisbon".to_string(), "Nice".to_string()]);
        assert!(with_exclusions.contains("Do not suggest these destinations again: Lisbon, Nice."));
        assert!(with_exclusions.contains("a beach"));
    }
}
