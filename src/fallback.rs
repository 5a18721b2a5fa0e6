//! Ordered fallback across generation endpoints.
//!
//! One attempt per endpoint, walked in roster order. Rate-limited and
//! missing models are skipped, the first response wins, and any other
//! failure aborts the sweep. No retries, no backoff, no parallel
//! fan-out.

use tracing::{debug, warn};

use crate::providers::{Error, ErrorKind, GenerateEndpoint};

/// Substituted when a model answers successfully but produces no text.
/// An empty response counts as a success and never triggers fallback.
pub(crate) const EMPTY_RESPONSE_PLACEHOLDER: &'static str = "(空の応答)";

/// A completed generation and the model that produced it.
#[derive(Debug, Clone)]
pub(crate) struct Generation {
    pub text: String,
    pub model: String,
}

/// A model passed over during the sweep and the error that
/// disqualified it.
#[derive(Debug)]
pub(crate) struct SkippedModel {
    pub model: String,
    pub error: Error,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum FallbackError {
    /// Every model in the roster was skipped over a rate limit or a
    /// missing model.
    #[error("every model was skipped: {}", skipped_summary(.skipped))]
    Exhausted { skipped: Vec<SkippedModel> },

    /// A model failed in a way fallback cannot route around.
    #[error("model {model} failed: {source}")]
    Terminal { model: String, source: Error },
}

fn skipped_summary(skipped: &[SkippedModel]) -> String {
    if skipped.is_empty() {
        return "no models are registered".to_string();
    }

    let entries: Vec<String> = skipped
        .iter()
        .map(|s| format!("{} ({})", s.model, s.error))
        .collect();

    entries.join(", ")
}

fn is_skippable(err: &Error) -> bool {
    matches!(err.kind(), ErrorKind::ExcessUsage | ErrorKind::NotFound)
}

/// Walks the endpoints in order and returns the first response.
///
/// Quota and missing-model failures skip to the next endpoint. A model
/// that answers with no text at all yields
/// [`EMPTY_RESPONSE_PLACEHOLDER`] rather than falling through.
pub(crate) async fn generate_with_fallback(
    endpoints: &[Box<dyn GenerateEndpoint>],
    prompt: &str,
) -> Result<Generation, FallbackError> {
    let mut skipped = Vec::new();

    for endpoint in endpoints {
        let model = endpoint.model_id();

        match endpoint.generate(prompt).await {
            Ok(text) => {
                let text = if text.is_empty() {
                    debug!("model {} answered with an empty response", model);

                    EMPTY_RESPONSE_PLACEHOLDER.to_string()
                } else {
                    text
                };

                return Ok(Generation {
                    text,
                    model: model.to_string(),
                });
            }
            Err(err) if is_skippable(&err) => {
                debug!("model {} unavailable, falling back: {}", model, err);

                skipped.push(SkippedModel {
                    model: model.to_string(),
                    error: err,
                });
            }
            Err(err) => {
                warn!("model {} failed, aborting the sweep: {}", model, err);

                return Err(FallbackError::Terminal {
                    model: model.to_string(),
                    source: err,
                });
            }
        }
    }

    Err(FallbackError::Exhausted { skipped })
}
