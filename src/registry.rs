//! The ordered model roster that fallback generation walks.

use std::env::VarError;

use crate::config::Config;
use crate::die;
use crate::providers::gemini::GeminiClient;
use crate::providers::GenerateEndpoint;

// Which models exist and how generous their free-tier quotas are shifts
// with Google's release cycle, so the roster needs a manual update
// whenever a flash generation ships or retires.
pub(crate) const DEFAULT_MODEL_ORDER: [&'static str; 5] = [
    "gemini-3-flash-preview", // newest model, tried first
    "gemini-2.5-flash-lite",  // 1,000 requests/day on the free tier
    "gemini-2.5-flash",       // 250 requests/day
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash",
];

/// An ordered collection of generation endpoints, most preferred first.
/// Built once at startup and held for the life of the process.
pub(crate) struct ModelRegistry {
    client: GeminiClient,
    endpoints: Vec<Box<dyn GenerateEndpoint>>,
}

impl ModelRegistry {
    pub(crate) fn new(client: GeminiClient) -> ModelRegistry {
        ModelRegistry {
            client,
            endpoints: Vec::new(),
        }
    }

    /// Appends a model to the end of the fallback order.
    pub(crate) fn add_model(&mut self, model: &str) {
        let endpoint = self.client.endpoint(model);

        self.endpoints.push(Box::new(endpoint));
    }

    /// The endpoints in fallback order.
    pub(crate) fn endpoints(&self) -> &[Box<dyn GenerateEndpoint>] {
        &self.endpoints
    }

    /// The registered model ids in fallback order.
    pub(crate) fn model_ids(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.model_id()).collect()
    }

    pub(crate) fn client(&self) -> &GeminiClient {
        &self.client
    }
}

const GOOGLE_ENV_KEY_VAR: &'static str = "GOOGLE_API_KEY";

fn google_api_key() -> Option<String> {
    match std::env::var(GOOGLE_ENV_KEY_VAR) {
        Ok(api_key) => Some(api_key),
        Err(err) => match err {
            VarError::NotUnicode(_) => die!("failed to parse {}", GOOGLE_ENV_KEY_VAR),
            VarError::NotPresent => None,
        },
    }
}

/// Populate a registry from the configured credentials and model order
pub(crate) fn populated_registry(config: &Config) -> ModelRegistry {
    let api_key = match config.api_key.clone().or_else(google_api_key) {
        Some(api_key) => api_key,
        None => die!(
            "an API key is required, either add \"api_key\" to the config or define {}",
            GOOGLE_ENV_KEY_VAR
        ),
    };

    let client = match &config.api_base {
        Some(api_base) => match GeminiClient::new(&api_key, api_base) {
            Ok(client) => client,
            Err(err) => die!("the configured API base failed to parse: {}", err),
        },
        None => GeminiClient::with_api_key(&api_key),
    };

    let mut registry = ModelRegistry::new(client);

    match &config.models {
        Some(models) => {
            if models.is_empty() {
                die!("the \"models\" list in the config must name at least one model");
            }

            for model in models {
                registry.add_model(model);
            }
        }
        None => {
            for &model in DEFAULT_MODEL_ORDER.iter() {
                registry.add_model(model);
            }
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::with_api_key("test-key")
    }

    #[test]
    fn a_fresh_registry_has_no_endpoints() {
        let registry = ModelRegistry::new(client());

        assert!(registry.endpoints().is_empty());
    }

    #[test]
    fn models_register_in_insertion_order() {
        let mut registry = ModelRegistry::new(client());

        for &model in DEFAULT_MODEL_ORDER.iter() {
            registry.add_model(model);
        }

        assert_eq!(registry.model_ids(), DEFAULT_MODEL_ORDER);
        assert_eq!(registry.endpoints().len(), DEFAULT_MODEL_ORDER.len());
    }
}
