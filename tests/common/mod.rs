//! Helpers shared by the integration tests: an admin client pointed at a mock Keycloak.

#![allow(dead_code)]

// crates.io
use time::Duration;
use url::Url;
// self
pub use keycloak_provider::error::Error;
use keycloak_provider::{admin::KeycloakClient, auth::Session, http::HttpClient};

/// Bearer token carried by clients built with [`test_admin_client`].
pub const TEST_TOKEN: &str = "test-admin-token";

/// Builds an admin client pointed at a mock server, skipping the login round trip.
pub fn test_admin_client(base: &str) -> KeycloakClient {
	let http_client =
		HttpClient::new(Duration::seconds(5)).expect("Failed to build HTTP client for tests.");
	let base = Url::parse(base).expect("Mock server URL should parse.");

	KeycloakClient::new(http_client, &base, Session::from_token(TEST_TOKEN))
}

/// Formats the admin path of `realm` as seen by a mock server.
pub fn admin_path(realm: &str, path: &str) -> String {
	format!("/auth/admin/realms/{realm}/{path}")
}
