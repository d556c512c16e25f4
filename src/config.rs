//! Provider configuration resolved once at startup.
//!
//! Each setting resolves in priority order: explicit CLI flag, environment
//! variable, built-in default. The resolved value is read-only afterwards.
use crate::cli::ProviderArgs;
use anyhow::{anyhow, Result};
use std::fmt;

pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";
pub const ENDPOINT_ENV: &str = "ECOASSESS_ENDPOINT";
pub const MODEL_ENV: &str = "ECOASSESS_MODEL";

/// Settings for the remote chat-completion provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    /// Bearer credential. Absence is not rejected here; the provider refuses
    /// the first request instead.
    pub api_key: Option<String>,
    pub max_tokens: u32,
}

impl ProviderConfig {
    /// Resolve from CLI flags and the process environment.
    pub fn resolve(args: &ProviderArgs) -> Result<Self> {
        Self::resolve_with(args, |name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    pub fn resolve_with(
        args: &ProviderArgs,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let config = Self {
            endpoint: args
                .endpoint
                .clone()
                .or_else(|| non_empty(ENDPOINT_ENV))
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: args
                .model
                .clone()
                .or_else(|| non_empty(MODEL_ENV))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: non_empty(API_KEY_ENV),
            max_tokens: args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        };
        config.validate()?;
        if config.api_key.is_none() {
            tracing::warn!(env = API_KEY_ENV, "provider API key is not set");
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(anyhow!(
                "endpoint must be an http(s) URL (got {:?})",
                self.endpoint
            ));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must be non-empty"));
        }
        if self.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be positive"));
        }
        Ok(())
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key.as_deref().unwrap_or_default())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_flags_or_environment() {
        let config = ProviderConfig::resolve_with(&ProviderArgs::default(), env(&[]))
            .expect("resolve");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.api_key, None);
        assert_eq!(config.bearer(), "Bearer ");
    }

    #[test]
    fn flags_override_environment_which_overrides_defaults() {
        let lookup = env(&[
            (ENDPOINT_ENV, "http://localhost:9000/chat/completions"),
            (MODEL_ENV, "env-model"),
            (API_KEY_ENV, "secret"),
        ]);
        let from_env = ProviderConfig::resolve_with(&ProviderArgs::default(), &lookup)
            .expect("resolve env");
        assert_eq!(from_env.endpoint, "http://localhost:9000/chat/completions");
        assert_eq!(from_env.model, "env-model");
        assert_eq!(from_env.bearer(), "Bearer secret");

        let args = ProviderArgs {
            model: Some("flag-model".to_string()),
            max_tokens: Some(512),
            ..ProviderArgs::default()
        };
        let from_flags = ProviderConfig::resolve_with(&args, &lookup).expect("resolve flags");
        assert_eq!(from_flags.model, "flag-model");
        assert_eq!(from_flags.max_tokens, 512);
        assert_eq!(from_flags.endpoint, "http://localhost:9000/chat/completions");
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let config = ProviderConfig::resolve_with(
            &ProviderArgs::default(),
            env(&[(API_KEY_ENV, "  "), (MODEL_ENV, "")]),
        )
        .expect("resolve");
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let bad_endpoint = ProviderArgs {
            endpoint: Some("ftp://example.com".to_string()),
            ..ProviderArgs::default()
        };
        assert!(ProviderConfig::resolve_with(&bad_endpoint, env(&[])).is_err());

        let zero_tokens = ProviderArgs {
            max_tokens: Some(0),
            ..ProviderArgs::default()
        };
        assert!(ProviderConfig::resolve_with(&zero_tokens, env(&[])).is_err());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = ProviderConfig::resolve_with(
            &ProviderArgs::default(),
            env(&[(API_KEY_ENV, "top-secret")]),
        )
        .expect("resolve");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
