//! Client-credentials token exchange against a realm token endpoint.
//!
//! Credentials travel as an HTTP Basic header over the plain `id:secret` pair; they are not
//! form-encoded first, so ids and secrets with reserved characters reach Keycloak verbatim.
//! The success body is decoded as an `oauth2` token response.

// crates.io
use oauth2::{TokenResponse, basic::BasicTokenResponse};
use reqwest::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransportError},
	http::{self, HttpClient, ResponseMetadata},
};

/// Access token material returned by a successful grant.
#[derive(Debug)]
pub(crate) struct IssuedToken {
	pub(crate) access_token: String,
	pub(crate) expires_in: Option<std::time::Duration>,
}

/// Issues client-credentials grants against one realm's token endpoint.
pub(crate) struct TokenFacade {
	token_url: Url,
	client_id: String,
	client_secret: TokenSecret,
	http_client: HttpClient,
}
impl TokenFacade {
	/// Builds the facade for `{base}/auth/realms/{realm}/protocol/openid-connect/token`.
	pub(crate) fn new(
		base: &str,
		realm: &str,
		client_id: &str,
		client_secret: &TokenSecret,
		http_client: HttpClient,
	) -> Result<Self> {
		let raw = token_endpoint(base, realm);
		let token_url =
			Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { value: raw, source })?;

		Ok(Self {
			token_url,
			client_id: client_id.to_owned(),
			client_secret: client_secret.clone(),
			http_client,
		})
	}

	/// Performs the `client_credentials` grant with HTTP Basic client authentication.
	pub(crate) async fn exchange_client_credentials(&self) -> Result<IssuedToken> {
		let url = self.token_url.as_str();
		let response = self
			.http_client
			.post(self.token_url.clone())
			.basic_auth(&self.client_id, Some(self.client_secret.expose()))
			.header(ACCEPT, "application/json")
			.form(&[("grant_type", "client_credentials")])
			.send()
			.await
			.map_err(|e| TransportError::network(url, e))?;
		let status = response.status().as_u16();
		let bytes = response.bytes().await.map_err(|e| TransportError::network(url, e))?;

		parse_token_response(url, ResponseMetadata::new(status, &bytes), &bytes)
	}
}

/// Formats the realm token endpoint URL.
pub fn token_endpoint(base: &str, realm: &str) -> String {
	format!("{}/auth/realms/{realm}/protocol/openid-connect/token", base.trim_end_matches('/'))
}

fn parse_token_response(url: &str, meta: ResponseMetadata, bytes: &[u8]) -> Result<IssuedToken> {
	if !meta.is_success() {
		return Err(Error::Authentication { status: Some(meta.status), body: meta.body });
	}

	let token: BasicTokenResponse = http::decode_json(url, bytes)?;

	Ok(IssuedToken {
		access_token: token.access_token().secret().to_owned(),
		expires_in: token.expires_in(),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const URL: &str = "https://kc/auth/realms/master/protocol/openid-connect/token";

	#[test]
	fn token_endpoint_trims_trailing_slash() {
		assert_eq!(
			token_endpoint("https://kc.example.com/", "master"),
			"https://kc.example.com/auth/realms/master/protocol/openid-connect/token"
		);
	}

	#[test]
	fn facade_rejects_unparsable_base() {
		let http = HttpClient::new(Duration::seconds(5)).expect("HTTP client should build.");
		let secret = TokenSecret::new("secret");

		assert!(TokenFacade::new("https://kc.example.com", "master", "id", &secret, http.clone())
			.is_ok());
		assert!(matches!(
			TokenFacade::new("kc.example.com", "master", "id", &secret, http),
			Err(Error::Config(ConfigError::InvalidUrl { .. }))
		));
	}

	#[test]
	fn rejection_keeps_status_and_raw_body() {
		let body = b"{\"error\":\"unauthorized_client\"}";
		let err = parse_token_response(URL, ResponseMetadata::new(401, body), body)
			.expect_err("A 401 should fail the login.");

		match err {
			Error::Authentication { status, body } => {
				assert_eq!(status, Some(401));
				assert!(body.contains("unauthorized_client"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn success_body_is_decoded_with_path() {
		let body = b"{\"access_token\":\"abc\",\"token_type\":\"Bearer\",\"expires_in\":60}";
		let token = parse_token_response(URL, ResponseMetadata::new(200, body), body)
			.expect("A well-formed token response should decode.");

		assert_eq!(token.access_token, "abc");
		assert_eq!(token.expires_in, Some(std::time::Duration::from_secs(60)));

		let body = b"{\"token_type\":\"Bearer\"}";
		let err = parse_token_response(URL, ResponseMetadata::new(200, body), body)
			.expect_err("A response without access_token should fail.");

		assert!(matches!(err, Error::Decode { .. }), "Unexpected error variant: {err:?}.");
	}
}
