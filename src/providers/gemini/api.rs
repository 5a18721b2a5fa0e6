use reqwest::{Client, IntoUrl, Response};
use serde::{Deserialize, Serialize};

use crate::providers::apireq::{self, Url};

const DEFAULT_API_BASE: &'static str = "https://generativelanguage.googleapis.com";
const API_VERSION: &'static str = "v1beta";

#[derive(thiserror::Error, Debug)]
pub(super) enum Error {
    /// The API base is not a URL that can be used in a network request
    #[error("invalid api base")]
    InvalidApiBase(#[source] reqwest::Error),

    /// Endpoint URL is invalid
    #[error("invalid endpoint")]
    InvalidEndpoint(
        #[from]
        #[source]
        url::ParseError,
    ),

    /// Some issue with the request
    #[error("{}", .0)]
    RequestFailed(
        #[from]
        #[source]
        apireq::Error,
    ),

    /// The request was malformed or missing a required parameter,
    /// such as a key or an input.
    #[error("{}", .0.message)]
    BadRequest(ApiErrorPayload),

    /// The API key is missing, expired, or otherwise not accepted.
    #[error("{}", .0.message)]
    Authentication(ApiErrorPayload),

    /// The key is valid but does not grant access to the requested
    /// resource.
    #[error("{}", .0.message)]
    PermissionDenied(ApiErrorPayload),

    /// The requested resource does not exist. Raised for model ids
    /// this API version does not serve.
    #[error("{}", .0.message)]
    NotFound(ApiErrorPayload),

    /// A rate limit or free-tier quota was crossed.
    #[error("{}", .0.message)]
    RateLimit(ApiErrorPayload),

    /// Gemini has an internal issue
    #[error("{}", .0.message)]
    InternalError(ApiErrorPayload),

    /// The model is temporarily overloaded, try again later
    #[error("{}", .0.message)]
    ApiOverloaded(ApiErrorPayload),

    /// Some unknown error was returned by the API
    #[error("{}", .0.message)]
    UnknownStatus(ApiErrorPayload),
}

impl Error {
    fn from_status(status: u16, payload: ApiErrorPayload) -> Error {
        match status {
            400 => Error::BadRequest(payload),
            401 => Error::Authentication(payload),
            403 => Error::PermissionDenied(payload),
            404 => Error::NotFound(payload),
            429 => Error::RateLimit(payload),
            500 => Error::InternalError(payload),
            503 => Error::ApiOverloaded(payload),
            _ => Error::UnknownStatus(payload),
        }
    }
}

/* Structures to serialize :generateContent */

#[derive(Serialize, Deserialize, Debug)]
pub(super) struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub(super) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'c> {
    contents: &'c [Content],
}

/* Structures to deserialize :generateContent */

#[derive(Deserialize, Debug)]
pub(super) struct Candidate {
    pub content: Option<Content>,
}

#[derive(Deserialize, Debug)]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate. An empty
    /// string means the API answered without producing any text.
    pub(super) fn text(&self) -> String {
        match self.candidates.first().and_then(|c| c.content.as_ref()) {
            Some(content) => content.parts.iter().map(|p| p.text.as_str()).collect(),
            None => String::new(),
        }
    }
}

/* Structures to deserialize /models */

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModelEntry {
    /// The resource name, e.g. "models/gemini-2.0-flash".
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

/* API Errors */

#[derive(Deserialize, Debug)]
pub(super) struct ApiErrorPayload {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    error: ApiErrorPayload,
}

pub(super) struct GeminiApi {
    api_base: Url,
    api_key: String,
    client: Client,
}

impl GeminiApi {
    pub(super) fn new<U: IntoUrl>(api_key: &str, api_base: U) -> Result<GeminiApi, Error> {
        let api_base = api_base.into_url().map_err(|e| Error::InvalidApiBase(e))?;

        Ok(GeminiApi {
            api_base,
            api_key: api_key.to_string(),
            client: Client::new(),
        })
    }

    pub(super) fn with_api_key(api_key: &str) -> GeminiApi {
        Self::new(api_key, DEFAULT_API_BASE).unwrap()
    }

    async fn maybe_parse_api_error(res: Response) -> Result<Response, Error> {
        let status = res.status();

        if status.is_success() {
            return Ok(res);
        }

        // Error bodies are usually the documented JSON envelope, but
        // proxies and HTML error pages occur in the wild. Synthesize a
        // payload from the status line when the body cannot be parsed.
        let status = status.as_u16();

        let payload = match res.json::<ApiErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => ApiErrorPayload {
                code: Some(status),
                message: format!("the API returned HTTP status {}", status),
                status: None,
            },
        };

        Err(Error::from_status(status, payload))
    }

    pub(super) async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, Error> {
        let url = self
            .api_base
            .join(&format!("/{}/models/{}:generateContent", API_VERSION, model))?;

        let contents = [Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
            role: Some("user".to_string()),
        }];

        let res = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest {
                contents: &contents,
            })
            .send()
            .await
            .map_err(|e| Error::RequestFailed(e.into()))?;

        let res = Self::maybe_parse_api_error(res).await?;

        let response: GenerateContentResponse = res
            .json()
            .await
            .map_err(|e| Error::RequestFailed(e.into()))?;

        Ok(response)
    }

    pub(super) async fn list_models(&self) -> Result<Vec<ModelEntry>, Error> {
        let url = self.api_base.join(&format!("/{}/models", API_VERSION))?;

        let res = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::RequestFailed(e.into()))?;

        let res = Self::maybe_parse_api_error(res).await?;

        let models: ModelsResponse = res
            .json()
            .await
            .map_err(|e| Error::RequestFailed(e.into()))?;

        Ok(models.models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn generation_joins_candidate_parts() {
        let server = MockServer::start_async().await;

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.0-flash:generateContent")
                    .query_param("key", "test-key")
                    .body_contains("こんにちは");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "candidates": [{
                            "content": {
                                "role": "model",
                                "parts": [{"text": "おはよう"}, {"text": "ございます"}]
                            },
                            "finishReason": "STOP"
                        }]
                    }));
            })
            .await;

        let api = GeminiApi::new("test-key", server.base_url()).unwrap();

        let res = api
            .generate_content("gemini-2.0-flash", "こんにちは")
            .await
            .unwrap();

        assert_eq!(res.text(), "おはようございます");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_candidates_read_as_empty_text() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.0-flash:generateContent");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({}));
            })
            .await;

        let api = GeminiApi::new("test-key", server.base_url()).unwrap();

        let res = api
            .generate_content("gemini-2.0-flash", "課題")
            .await
            .unwrap();

        assert_eq!(res.text(), "");
    }

    #[tokio::test]
    async fn quota_errors_parse_to_rate_limit() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.5-flash:generateContent");
                then.status(429)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "error": {
                            "code": 429,
                            "message": "Resource has been exhausted (e.g. check quota).",
                            "status": "RESOURCE_EXHAUSTED"
                        }
                    }));
            })
            .await;

        let api = GeminiApi::new("test-key", server.base_url()).unwrap();

        let err = api
            .generate_content("gemini-2.5-flash", "課題")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RateLimit(_)));
        assert_eq!(
            err.to_string(),
            "Resource has been exhausted (e.g. check quota)."
        );
    }

    #[tokio::test]
    async fn unknown_models_parse_to_not_found() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-oops:generateContent");
                then.status(404)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "error": {
                            "code": 404,
                            "message": "models/gemini-oops is not found for API version v1beta",
                            "status": "NOT_FOUND"
                        }
                    }));
            })
            .await;

        let api = GeminiApi::new("test-key", server.base_url()).unwrap();

        let err = api.generate_content("gemini-oops", "課題").await.unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn unparseable_error_bodies_fall_back_to_the_status_line() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.0-flash:generateContent");
                then.status(500).body("upstream connect error");
            })
            .await;

        let api = GeminiApi::new("test-key", server.base_url()).unwrap();

        let err = api
            .generate_content("gemini-2.0-flash", "課題")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InternalError(_)));
        assert_eq!(err.to_string(), "the API returned HTTP status 500");
    }

    #[tokio::test]
    async fn model_listing_deserializes_entries() {
        let server = MockServer::start_async().await;

        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1beta/models")
                    .query_param("key", "test-key");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "models": [
                            {
                                "name": "models/gemini-2.0-flash",
                                "displayName": "Gemini 2.0 Flash",
                                "inputTokenLimit": 1048576
                            },
                            {"name": "models/embedding-001"}
                        ]
                    }));
            })
            .await;

        let api = GeminiApi::new("test-key", server.base_url()).unwrap();

        let entries = api.list_models().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "models/gemini-2.0-flash");
        assert_eq!(entries[0].display_name.as_deref(), Some("Gemini 2.0 Flash"));
        assert!(entries[1].display_name.is_none());
        mock.assert_async().await;
    }
}
