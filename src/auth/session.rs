//! Authenticated admin session produced once by the client-credentials login.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ProviderConfig,
	http::HttpClient,
	oauth::TokenFacade,
	obs::{self, Operation},
};

/// Immutable bearer-token session shared by every admin call.
///
/// A session is produced once by [`Session::login`] and never mutated afterwards, so it can be
/// shared across concurrent lifecycle callbacks. There is no refresh: hosts that outlive the
/// token lifetime re-run the login and build a new client.
#[derive(Clone, Debug)]
pub struct Session {
	access_token: TokenSecret,
	expires_at: Option<OffsetDateTime>,
}
impl Session {
	/// Exchanges the configured client credentials for a bearer token.
	pub async fn login(http_client: &HttpClient, config: &ProviderConfig) -> Result<Self> {
		obs::observe("provider", Operation::Login, async {
			let facade = TokenFacade::new(
				config.base(),
				&config.realm,
				&config.client_id,
				&config.client_secret,
				http_client.clone(),
			)?;
			let issued = facade.exchange_client_credentials().await?;
			let issued_at = OffsetDateTime::now_utc();
			let expires_at = issued
				.expires_in
				.and_then(|ttl| Duration::try_from(ttl).ok())
				.map(|ttl| issued_at + ttl);

			Ok(Self { access_token: TokenSecret::new(issued.access_token), expires_at })
		})
		.await
	}

	/// Wraps a token obtained out of band (for example by the host itself).
	pub fn from_token(access_token: impl Into<String>) -> Self {
		Self { access_token: TokenSecret::new(access_token), expires_at: None }
	}

	/// Returns the bearer token. Callers must avoid logging its exposed value.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Expiry derived from `expires_in`, when Keycloak reported one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Returns `true` when the token is known to be expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expiry| instant >= expiry)
	}
}
