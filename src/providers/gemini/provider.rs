use std::sync::Arc;

use async_trait::async_trait;
use reqwest::IntoUrl;

use crate::providers::gemini::api;
use crate::providers::{Error, ErrorKind, GenerateEndpoint, Model};

impl From<api::Error> for Error {
    fn from(value: api::Error) -> Self {
        let kind = match &value {
            api::Error::Authentication(_) | api::Error::PermissionDenied(_) => {
                Some(ErrorKind::Authentication)
            }
            api::Error::BadRequest(_)
            | api::Error::InvalidApiBase(_)
            | api::Error::InvalidEndpoint(_) => Some(ErrorKind::BadRequest),
            api::Error::InternalError(_) => Some(ErrorKind::InternalError),
            api::Error::NotFound(_) => Some(ErrorKind::NotFound),
            api::Error::RateLimit(_) => Some(ErrorKind::ExcessUsage),
            api::Error::ApiOverloaded(_) => Some(ErrorKind::ApiOverloaded),
            api::Error::UnknownStatus(_) => Some(ErrorKind::UnspecifiedError),

            api::Error::RequestFailed(_) => None,
        };

        match value {
            api::Error::RequestFailed(err) => err.into(),
            value => Error::from_source(kind.unwrap(), Box::new(value)),
        }
    }
}

/// A shared handle on the Gemini API. Endpoints hold onto the same
/// underlying client, so one `GeminiClient` serves every model in the
/// fallback roster.
pub(crate) struct GeminiClient {
    api: Arc<api::GeminiApi>,
}

impl GeminiClient {
    pub(crate) fn new<U: IntoUrl>(api_key: &str, api_base: U) -> Result<GeminiClient, Error> {
        Ok(GeminiClient {
            api: Arc::new(api::GeminiApi::new(api_key, api_base)?),
        })
    }

    pub(crate) fn with_api_key(api_key: &str) -> GeminiClient {
        GeminiClient {
            api: Arc::new(api::GeminiApi::with_api_key(api_key)),
        }
    }

    /// Builds a generation endpoint for a single model id.
    pub(crate) fn endpoint(&self, model: &str) -> GeminiEndpoint {
        GeminiEndpoint {
            api: Arc::clone(&self.api),
            model: model.to_string(),
        }
    }

    /// Lists the models reachable with this API key. The `models/`
    /// resource prefix is stripped so ids can be fed back into
    /// [`Self::endpoint`].
    pub(crate) async fn models(&self) -> Result<Vec<Model>, Error> {
        let entries = self.api.list_models().await?;

        let models = entries
            .into_iter()
            .map(|entry| {
                let id = entry
                    .name
                    .strip_prefix("models/")
                    .unwrap_or(&entry.name)
                    .to_string();

                Model {
                    id,
                    display_name: entry.display_name,
                }
            })
            .collect();

        Ok(models)
    }
}

pub(crate) struct GeminiEndpoint {
    api: Arc<api::GeminiApi>,
    model: String,
}

#[async_trait]
impl GenerateEndpoint for GeminiEndpoint {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let response = self.api.generate_content(&self.model, prompt).await?;

        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn payload(message: &str) -> api::ApiErrorPayload {
        api::ApiErrorPayload {
            code: None,
            message: message.to_string(),
            status: None,
        }
    }

    #[test]
    fn rate_limits_map_to_excess_usage() {
        let err: Error = api::Error::RateLimit(payload("quota crossed")).into();

        assert!(matches!(err.kind(), ErrorKind::ExcessUsage));
    }

    #[test]
    fn missing_models_map_to_not_found() {
        let err: Error = api::Error::NotFound(payload("no such model")).into();

        assert!(matches!(err.kind(), ErrorKind::NotFound));
    }

    #[test]
    fn permission_failures_collapse_into_authentication() {
        let err: Error = api::Error::PermissionDenied(payload("key lacks access")).into();

        assert!(matches!(err.kind(), ErrorKind::Authentication));
    }

    #[tokio::test]
    async fn endpoints_generate_through_the_shared_api() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.5-flash:generateContent");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "candidates": [{
                            "content": {"parts": [{"text": "了解しました"}]}
                        }]
                    }));
            })
            .await;

        let client = GeminiClient::new("test-key", server.base_url()).unwrap();
        let endpoint = client.endpoint("gemini-2.5-flash");

        assert_eq!(endpoint.model_id(), "gemini-2.5-flash");

        let text = endpoint.generate("どうぞ").await.unwrap();

        assert_eq!(text, "了解しました");
    }

    #[tokio::test]
    async fn listing_strips_the_resource_prefix() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1beta/models");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "models": [
                            {"name": "models/gemini-2.0-flash", "displayName": "Gemini 2.0 Flash"}
                        ]
                    }));
            })
            .await;

        let client = GeminiClient::new("test-key", server.base_url()).unwrap();

        let models = client.models().await.unwrap();

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "gemini-2.0-flash");
        assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.0 Flash"));
    }
}
