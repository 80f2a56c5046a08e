//! Shared reqwest transport used for the token exchange and every admin call.
//!
//! [`HttpClient`] owns one configured [`ReqwestClient`]. Raw responses that must be reported
//! verbatim (a rejected login, for example) are captured as [`ResponseMetadata`].

// std
use std::ops::Deref;
// crates.io
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ConfigError};

/// Status and body text captured from a response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded lossily as UTF-8.
	pub body: String,
}
impl ResponseMetadata {
	/// Captures `status` and the raw body bytes.
	pub fn new(status: u16, bytes: &[u8]) -> Self {
		Self { status, body: String::from_utf8_lossy(bytes).into_owned() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so timeouts and redirect rules live in one place.
///
/// Redirects are never followed: the token endpoint must answer directly, and admin
/// creation responses are read for their `Location` header rather than chased.
#[derive(Clone, Debug)]
pub struct HttpClient(ReqwestClient);
impl HttpClient {
	/// Builds a client that aborts requests after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
		let timeout = std::time::Duration::try_from(timeout)
			.map_err(|_| ConfigError::NonPositiveTimeout)?;
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
impl Deref for HttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Decodes a JSON body, reporting the path of the first offending value.
pub(crate) fn decode_json<T>(url: &str, bytes: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de).map_err(|e| Error::Decode {
		url: url.to_owned(),
		path: e.path().to_string(),
		source: e.into_inner(),
	})
}
