//! Traits and type definitions for text generation endpoints.
//!
//! The `providers` module contains the components for talking to generative
//! model APIs. The interface for generation is the [`GenerateEndpoint`]
//! trait: a single model behind an API, able to turn a prompt into a full
//! text response. Endpoints are constructed by a provider client (currently
//! Gemini) and collected into the fallback roster by the registry.
//!
//! ## Error Handling
//!
//! Each API has its own bespoke error system with varying levels of rigor.
//! Concrete endpoint errors are encapsulated in [`Error`], and the
//! [`ErrorKind`] enum provides an indication of the category of error that
//! was raised. Fallback decisions are made over kinds, never over
//! provider-specific details.

mod apireq;

pub(crate) mod gemini;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;

/// This is a list specifying general categories of errors that
/// can be returned by a [`GenerateEndpoint`]. This list may be updated
/// as providers are added.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ErrorKind {
    /// Failed to connect to the underlying API service.
    /// This could be due to network issues like DNS
    /// resolution, connectivity issues, or routing problems.
    Connection,
    /// A request timed out.
    TimedOut,
    /// An API key was not provided or service-specific
    /// permissions are needed.
    Authentication,
    /// A rate limit was reached or a quota was exceeded.
    ExcessUsage,
    /// The servers are overloaded. This is non-fatal
    /// and indicates that a retry may be needed later.
    ApiOverloaded,
    /// The requested resource was not found. This likely means that
    /// the requested model was not found.
    NotFound,
    /// The request was malformed or is otherwise improper. This
    /// often corresponds to errors with HTTP status codes in
    /// the 400s.
    BadRequest,
    /// The server encountered an error. This often corresponds to
    /// errors with HTTP status codes in the 500s.
    InternalError,
    /// An API response was unable to be deserialized, malformed,
    /// or otherwise violated the assumptions of the client.
    UnexpectedResponse,
    /// An error that does not fit into any of the other categories.
    UnspecifiedError,
}

#[derive(Debug)]
pub(crate) struct Error {
    kind: ErrorKind,
    source: Box<dyn StdError + Send + Sync>,
}

impl Error {
    pub(crate) fn from_source(kind: ErrorKind, source: Box<dyn StdError + Send + Sync>) -> Error {
        Error { kind, source }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        self.kind
    }

    fn message(&self) -> &'static str {
        match self.kind {
            ErrorKind::Connection => "failed to connect to the API service",
            ErrorKind::TimedOut => "request timed out",
            ErrorKind::Authentication => "authentication failed or not provided",
            ErrorKind::ExcessUsage => "rate limit exceeded or quota crossed",
            ErrorKind::ApiOverloaded => "API server(s) are currently overloaded",
            ErrorKind::NotFound => "the requested resource was not found",
            ErrorKind::BadRequest => "the request was bad or malformed",
            ErrorKind::InternalError => "the server encountered an internal error",
            ErrorKind::UnexpectedResponse => "API response was unexpected or malformed",
            ErrorKind::UnspecifiedError => "an unspecified error occurred",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source as _)
    }
}

/// A model visible through the provider's listing API.
#[derive(Debug, Clone)]
pub(crate) struct Model {
    /// The id of the model. This must be an acceptable generation
    /// target for [`gemini::GeminiClient::endpoint`].
    pub id: String,
    /// The human-readable name of the model, if the API reports one.
    pub display_name: Option<String>,
}

/// A single model endpoint capable of one-shot text generation.
#[async_trait]
pub(crate) trait GenerateEndpoint {
    /// Returns the id of the model this endpoint generates with.
    fn model_id(&self) -> &str;

    /// Takes a prompt and returns the model's complete text response.
    /// An empty response is not an error; callers decide how to
    /// present it.
    async fn generate(&self, prompt: &str) -> Result<String, Error>;
}
