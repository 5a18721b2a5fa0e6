//! An umbrella module for the Gemini provider

mod api;
mod provider;

pub(crate) use self::provider::GeminiClient;
