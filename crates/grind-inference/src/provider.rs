//! Multi-provider registry for generation backends.
//!
//! Maps provider ids (`gemini`, `zai`) to configuration and constructs
//! concrete backends on demand. Configuration comes from the environment;
//! every known provider stays registered even without an API key, so
//! resolution errors can name the exact variable to set.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{info, warn};

use grind_core::{defaults, Error, Result};

// ---------------------------------------------------------------------------
// Provider configuration
// ---------------------------------------------------------------------------

/// Configuration for a single inference provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Unique provider identifier (e.g., "gemini", "zai").
    pub id: String,
    /// Base URL for API requests.
    pub base_url: String,
    /// API key. `None` means the provider is known but not configured.
    pub api_key: Option<String>,
    /// Generation model used by this provider.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Whether this is the default provider.
    pub is_default: bool,
}

/// Environment variable holding the API key for a provider id.
fn api_key_env(id: &str) -> String {
    match id {
        "gemini" => defaults::ENV_GEMINI_API_KEY.to_string(),
        "zai" => defaults::ENV_ZAI_API_KEY.to_string(),
        other => format!("{}_API_KEY", other.to_uppercase()),
    }
}

// ---------------------------------------------------------------------------
// Provider registry
// ---------------------------------------------------------------------------

/// Registry of configured inference providers.
///
/// Manages provider configuration and resolves provider ids to concrete
/// backend instances.
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderConfig>,
    default_provider: String,
}

impl ProviderRegistry {
    /// Create a new empty provider registry.
    pub fn new(default_provider: String) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider,
        }
    }

    /// Register a provider.
    pub fn register(&mut self, config: ProviderConfig) {
        info!(
            provider = %config.id,
            base_url = %config.base_url,
            model = %config.model,
            configured = config.api_key.is_some(),
            is_default = config.is_default,
            "Registering inference provider"
        );
        if config.is_default {
            self.default_provider = config.id.clone();
        }
        self.providers.insert(config.id.clone(), config);
    }

    /// Get the default provider ID.
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// Get all registered provider IDs.
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    /// Get the IDs of providers that have an API key, sorted for stable
    /// output.
    pub fn configured_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .providers
            .values()
            .filter(|p| p.api_key.is_some())
            .map(|p| p.id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Get a provider config by ID.
    pub fn get_provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.get(id)
    }

    /// Check if a provider is registered.
    pub fn has_provider(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    // -----------------------------------------------------------------------
    // Backend resolution
    // -----------------------------------------------------------------------

    /// Resolve a provider id to a boxed [`GenerationBackend`].
    ///
    /// `None` selects the default provider. Each call builds a fresh
    /// backend instance, so resolved backends share no mutable state.
    ///
    /// [`GenerationBackend`]: grind_core::GenerationBackend
    pub fn resolve(
        &self,
        provider: Option<&str>,
    ) -> Result<Box<dyn grind_core::GenerationBackend>> {
        let id = provider.unwrap_or(&self.default_provider);
        let config = self
            .providers
            .get(id)
            .ok_or_else(|| Error::Config(format!("Unknown provider: {}", id)))?;

        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config(format!("{} is not configured", api_key_env(id))))?;

        match id {
            #[cfg(feature = "gemini")]
            "gemini" => {
                let gemini_config = crate::GeminiConfig {
                    base_url: config.base_url.clone(),
                    api_key,
                    model: config.model.clone(),
                    timeout_seconds: config.timeout.as_secs(),
                };
                Ok(Box::new(crate::GeminiBackend::new(gemini_config)?))
            }
            #[cfg(feature = "zai")]
            "zai" => {
                let zai_config = crate::ZaiConfig {
                    base_url: config.base_url.clone(),
                    api_key,
                    model: config.model.clone(),
                    timeout_seconds: config.timeout.as_secs(),
                };
                Ok(Box::new(crate::ZaiBackend::new(zai_config)?))
            }
            _ => Err(Error::Config(format!(
                "Provider '{}' not compiled in (check feature flags)",
                id
            ))),
        }
    }

    // -----------------------------------------------------------------------
    // Environment bootstrap
    // -----------------------------------------------------------------------

    /// Build the registry from environment variables.
    ///
    /// Both known providers are always registered; an empty or missing
    /// API key variable leaves the provider unresolvable rather than
    /// unknown.
    pub fn from_env() -> Self {
        let mut registry = Self::new(defaults::DEFAULT_PROVIDER.to_string());

        registry.register(ProviderConfig {
            id: "gemini".to_string(),
            base_url: std::env::var(defaults::ENV_GEMINI_BASE_URL)
                .unwrap_or_else(|_| defaults::DEFAULT_GEMINI_BASE_URL.to_string()),
            api_key: env_nonempty(defaults::ENV_GEMINI_API_KEY),
            model: std::env::var(defaults::ENV_GEMINI_MODEL)
                .unwrap_or_else(|_| defaults::DEFAULT_GEMINI_MODEL.to_string()),
            timeout: Duration::from_secs(defaults::GEN_TIMEOUT_SECS),
            is_default: defaults::DEFAULT_PROVIDER == "gemini",
        });

        registry.register(ProviderConfig {
            id: "zai".to_string(),
            base_url: std::env::var(defaults::ENV_ZAI_BASE_URL)
                .unwrap_or_else(|_| defaults::DEFAULT_ZAI_BASE_URL.to_string()),
            api_key: env_nonempty(defaults::ENV_ZAI_API_KEY),
            model: std::env::var(defaults::ENV_ZAI_MODEL)
                .unwrap_or_else(|_| defaults::DEFAULT_ZAI_MODEL.to_string()),
            timeout: Duration::from_secs(defaults::GEN_TIMEOUT_SECS),
            is_default: defaults::DEFAULT_PROVIDER == "zai",
        });

        if let Some(id) = env_nonempty(defaults::ENV_ENHANCE_PROVIDER) {
            if registry.has_provider(&id) {
                registry.default_provider = id;
            } else {
                warn!(
                    provider = %id,
                    "{} names an unknown provider, keeping '{}'",
                    defaults::ENV_ENHANCE_PROVIDER,
                    registry.default_provider
                );
            }
        }

        info!(
            configured = ?registry.configured_ids(),
            default = %registry.default_provider,
            "Provider registry initialized from environment"
        );

        registry
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
