//! Shared plumbing for API requests over reqwest.
//!
//! Reqwest reports transport failures through one opaque error type. The
//! wrapper here classifies those failures up front so provider code can
//! match on them exclusively, and defines their conversion into the
//! provider error taxonomy.

use std::error::Error as StdError;
use std::fmt;

use crate::providers;
use crate::providers::ErrorKind as ProviderErrorKind;

pub(crate) use reqwest::Url;

#[derive(Debug, Clone, Copy)]
pub(crate) enum ErrorKind {
    ConnectFailed,
    DecodingFailed,
    RedirectPolicyViolated,
    TimedOut,
    UnknownReqwestError,
}

/// Wrapper around Reqwest's error type to facilitate exclusive matching.
#[derive(Debug)]
pub(crate) struct Error {
    kind: ErrorKind,
    source: Option<reqwest::Error>,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::new(err)
    }
}

impl Error {
    pub(crate) fn new(err: reqwest::Error) -> Error {
        let kind = if err.is_decode() {
            ErrorKind::DecodingFailed
        } else if err.is_timeout() {
            ErrorKind::TimedOut
        } else if err.is_redirect() {
            ErrorKind::RedirectPolicyViolated
        } else if err.is_connect() {
            ErrorKind::ConnectFailed
        } else {
            ErrorKind::UnknownReqwestError
        };

        Error {
            kind,
            source: Some(err),
        }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match &self.kind {
            ErrorKind::ConnectFailed => "connection failed",
            ErrorKind::DecodingFailed => "decoding failed",
            ErrorKind::RedirectPolicyViolated => "redirect policy violated",
            ErrorKind::TimedOut => "timed out",
            ErrorKind::UnknownReqwestError => "unknown reqwest error",
        };

        write!(f, "{}", message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<Error> for providers::Error {
    fn from(value: Error) -> Self {
        let kind = match &value.kind() {
            ErrorKind::ConnectFailed => ProviderErrorKind::Connection,
            ErrorKind::DecodingFailed | ErrorKind::RedirectPolicyViolated => {
                ProviderErrorKind::UnexpectedResponse
            }
            ErrorKind::TimedOut => ProviderErrorKind::TimedOut,
            ErrorKind::UnknownReqwestError => ProviderErrorKind::UnspecifiedError,
        };

        providers::Error::from_source(kind, Box::new(value))
    }
}
