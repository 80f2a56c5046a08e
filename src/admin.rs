//! Typed Keycloak admin REST clients.
//!
//! [`KeycloakClient`] pairs the shared [`HttpClient`] with an immutable [`Session`] and exposes
//! the four transport verbs every entity module builds on. Each call attaches the bearer
//! token, runs inside a `keycloak_provider.admin` span, and turns any non-2xx answer into
//! [`Error::HttpStatus`] carrying the status and body text.

pub mod client;
pub mod group;
pub mod protocol_mapper;
pub mod role;
pub mod role_mapping;
pub mod user;

pub use client::*;
pub use group::*;
pub use protocol_mapper::*;
pub use role::*;
pub use role_mapping::*;
pub use user::*;

// crates.io
use reqwest::{Method, RequestBuilder, Response, header::LOCATION};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::Session,
	config::ProviderConfig,
	error::TransportError,
	http::{self, HttpClient},
	obs::{self, OperationSpan},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verb {
	Get,
	Post,
	Put,
	Delete,
}
impl Verb {
	const fn as_str(self) -> &'static str {
		match self {
			Verb::Get => "GET",
			Verb::Post => "POST",
			Verb::Put => "PUT",
			Verb::Delete => "DELETE",
		}
	}

	fn method(self) -> Method {
		match self {
			Verb::Get => Method::GET,
			Verb::Post => Method::POST,
			Verb::Put => Method::PUT,
			Verb::Delete => Method::DELETE,
		}
	}
}

/// Authenticated client for the Keycloak admin API.
///
/// Cloning is cheap; clones share the HTTP connection pool and the session.
#[derive(Clone)]
pub struct KeycloakClient {
	http_client: HttpClient,
	base: Arc<str>,
	session: Arc<Session>,
}
impl KeycloakClient {
	/// Creates a client from an existing transport and session.
	pub fn new(http_client: HttpClient, api_base: &Url, session: Session) -> Self {
		Self {
			http_client,
			base: Arc::from(api_base.as_str().trim_end_matches('/')),
			session: Arc::new(session),
		}
	}

	/// Builds the transport from `config`, logs in, and returns the authenticated client.
	pub async fn login(config: &ProviderConfig) -> Result<Self> {
		let http_client = HttpClient::new(config.timeout)?;
		let session = Session::login(&http_client, config).await?;

		Ok(Self::new(http_client, &config.api_base, session))
	}

	/// Keycloak base URL without a trailing slash.
	pub fn base(&self) -> &str {
		&self.base
	}

	/// Session whose token authorizes every call.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Formats `{base}/auth/admin/realms/{realm}/{path}`.
	pub fn realm_url(&self, realm: &str, path: &str) -> String {
		if path.is_empty() {
			format!("{}/auth/admin/realms/{realm}", self.base)
		} else {
			format!("{}/auth/admin/realms/{realm}/{path}", self.base)
		}
	}

	/// GETs `url` and decodes the JSON body into `T`.
	pub async fn get<T>(&self, url: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let bytes = self.get_raw(url).await?;

		http::decode_json(url, &bytes)
	}

	/// GETs `url` and returns the body bytes untouched (e.g. SAML descriptor XML).
	pub async fn get_raw(&self, url: &str) -> Result<Vec<u8>> {
		let response = self.send(Verb::Get, url, None::<&()>).await?;
		let bytes = response.bytes().await.map_err(|e| TransportError::network(url, e))?;

		Ok(bytes.to_vec())
	}

	/// POSTs `body` as JSON and returns the `Location` of the created resource.
	///
	/// The response body is discarded; callers re-fetch the location for the canonical
	/// server-side representation.
	pub async fn post<B>(&self, url: &str, body: &B) -> Result<String>
	where
		B: ?Sized + Serialize,
	{
		let response = self.send(Verb::Post, url, Some(body)).await?;

		response
			.headers()
			.get(LOCATION)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned)
			.ok_or_else(|| Error::MissingLocation { url: url.to_owned() })
	}

	/// POSTs `body` as JSON when the endpoint answers without a `Location`.
	pub async fn post_no_location<B>(&self, url: &str, body: &B) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		self.send(Verb::Post, url, Some(body)).await?;

		Ok(())
	}

	/// PUTs `body` as JSON, replacing the whole resource.
	pub async fn put<B>(&self, url: &str, body: &B) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		self.send(Verb::Put, url, Some(body)).await?;

		Ok(())
	}

	/// DELETEs `url`, optionally sending a JSON body.
	pub async fn delete<B>(&self, url: &str, body: Option<&B>) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		self.send(Verb::Delete, url, body).await?;

		Ok(())
	}

	async fn send<B>(&self, verb: Verb, url: &str, body: Option<&B>) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		let span = OperationSpan::request(verb.as_str(), url);

		span.instrument(async {
			let mut request: RequestBuilder = self
				.http_client
				.request(verb.method(), url)
				.bearer_auth(self.session.access_token().expose());

			if let Some(body) = body {
				request = request.json(body);
			}

			let response = request.send().await.map_err(|e| TransportError::network(url, e))?;
			let status = response.status();

			obs::log_status(verb.as_str(), url, status.as_u16());

			if !status.is_success() {
				let body = response.text().await.unwrap_or_default();

				return Err(Error::HttpStatus {
					method: verb.as_str(),
					url: url.to_owned(),
					status: status.as_u16(),
					body,
				});
			}

			Ok(response)
		})
		.await
	}
}
impl Debug for KeycloakClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeycloakClient")
			.field("base", &self.base)
			.field("session_expires_at", &self.session.expires_at())
			.finish()
	}
}
