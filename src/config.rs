//! Provider connection settings with environment fallbacks.
//!
//! Hosts usually hand the provider a partially filled configuration block; any field left
//! unset falls back to the matching `KEYCLOAK_*` environment variable, and `realm` finally
//! falls back to `master`.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Environment variable consulted for the admin client identifier.
pub const ENV_CLIENT_ID: &str = "KEYCLOAK_CLIENT_ID";
/// Environment variable consulted for the admin client secret.
pub const ENV_CLIENT_SECRET: &str = "KEYCLOAK_CLIENT_SECRET";
/// Environment variable consulted for the Keycloak base URL.
pub const ENV_API_BASE: &str = "KEYCLOAK_API_BASE";
/// Environment variable consulted for the login realm.
pub const ENV_REALM: &str = "KEYCLOAK_REALM";
/// Realm used when neither the host nor the environment names one.
pub const DEFAULT_REALM: &str = "master";

/// Validated settings used to log in and reach the admin API.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
	/// Client identifier used for the client-credentials grant.
	pub client_id: String,
	/// Client secret used for the client-credentials grant.
	pub client_secret: TokenSecret,
	/// Keycloak base URL, without the `/auth` suffix.
	pub api_base: Url,
	/// Realm the admin client lives in.
	pub realm: String,
	/// Per-request timeout applied by the HTTP client.
	pub timeout: Duration,
}
impl ProviderConfig {
	/// Request timeout used when none is configured.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

	/// Creates a builder with every field unset.
	pub fn builder() -> ProviderConfigBuilder {
		ProviderConfigBuilder::default()
	}

	/// Builds a configuration entirely from `KEYCLOAK_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::builder().build()
	}

	/// Returns the base URL as a string without a trailing slash.
	pub fn base(&self) -> &str {
		self.api_base.as_str().trim_end_matches('/')
	}
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug, Default)]
pub struct ProviderConfigBuilder {
	/// Client identifier, falls back to [`ENV_CLIENT_ID`].
	pub client_id: Option<String>,
	/// Client secret, falls back to [`ENV_CLIENT_SECRET`].
	pub client_secret: Option<TokenSecret>,
	/// Base URL, falls back to [`ENV_API_BASE`].
	pub api_base: Option<String>,
	/// Realm, falls back to [`ENV_REALM`] then [`DEFAULT_REALM`].
	pub realm: Option<String>,
	/// Request timeout, defaults to [`ProviderConfig::DEFAULT_TIMEOUT`].
	pub timeout: Option<Duration>,
}
impl ProviderConfigBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, value: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(value));

		self
	}

	/// Sets the Keycloak base URL.
	pub fn api_base(mut self, value: impl Into<String>) -> Self {
		self.api_base = Some(value.into());

		self
	}

	/// Sets the realm the admin client authenticates against.
	pub fn realm(mut self, value: impl Into<String>) -> Self {
		self.realm = Some(value.into());

		self
	}

	/// Overrides the request timeout.
	pub fn timeout(mut self, value: Duration) -> Self {
		self.timeout = Some(value);

		self
	}

	/// Validates the collected settings, consulting the environment for missing fields.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		self.build_with(|key| std::env::var(key).ok())
	}

	/// Same as [`build`](Self::build) with a custom variable lookup.
	pub fn build_with<F>(self, lookup: F) -> Result<ProviderConfig, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
		let client_id = non_empty(self.client_id)
			.or_else(|| non_empty(lookup(ENV_CLIENT_ID)))
			.ok_or(ConfigError::MissingField { field: "client_id", env: ENV_CLIENT_ID })?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.expose().is_empty())
			.or_else(|| non_empty(lookup(ENV_CLIENT_SECRET)).map(TokenSecret::new))
			.ok_or(ConfigError::MissingField { field: "client_secret", env: ENV_CLIENT_SECRET })?;
		let raw_base = non_empty(self.api_base)
			.or_else(|| non_empty(lookup(ENV_API_BASE)))
			.ok_or(ConfigError::MissingField { field: "api_base", env: ENV_API_BASE })?;
		let api_base = Url::parse(raw_base.trim())
			.map_err(|source| ConfigError::InvalidUrl { value: raw_base.clone(), source })?;
		let realm = non_empty(self.realm)
			.or_else(|| non_empty(lookup(ENV_REALM)))
			.unwrap_or_else(|| DEFAULT_REALM.into());
		let timeout = self.timeout.unwrap_or(ProviderConfig::DEFAULT_TIMEOUT);

		if !timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(ProviderConfig { client_id, client_secret, api_base, realm, timeout })
	}
}
