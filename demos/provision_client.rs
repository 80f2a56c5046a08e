//! Drives the provider against a mocked Keycloak: logs in, creates an OIDC client, and grants a
//! realm role to a group.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;
// self
use keycloak_provider::provider::{Provider, ResourceData};

const REALM: &str = "demo";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
		)
		.init();

	let server = MockServer::start_async().await;
	let admin = |path: &str| format!("/auth/admin/realms/{REALM}/{path}");

	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/auth/realms/{REALM}/protocol/openid-connect/token"));
			then.status(200).json_body(json!({
				"access_token": "demo-token",
				"token_type": "bearer",
				"expires_in": 300,
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(admin("clients"));
			then.status(201).header("location", server.url(admin("clients/c-1")));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin("clients/c-1"));
			then.status(200).json_body(json!({
				"id": "c-1",
				"clientId": "dashboard",
				"enabled": true,
				"protocol": "openid-connect",
				"publicClient": true,
				"redirectUris": ["https://dashboard.example/callback"],
				"protocolMappers": [],
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin("clients/c-1/protocol-mappers/models"));
			then.status(200).json_body(json!([]));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin("clients/c-1/client-secret"));
			then.status(200).json_body(json!({ "type": "secret", "value": "generated" }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin("groups")).query_param("search", "operators");
			then.status(200).json_body(json!([{ "id": "g-1", "name": "operators" }]));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin("roles-by-id/r-1"));
			then.status(200).json_body(json!({ "id": "r-1", "name": "viewer" }));
		})
		.await;
	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path(admin("groups/g-1/role-mappings/realm"));
			then.status(204);
		})
		.await;

	let provider = Provider::configure(
		ResourceData::new()
			.with("client_id", "terraform")
			.with("client_secret", "s3cret")
			.with("api_base", server.base_url())
			.with("realm", REALM),
	)
	.await?;
	let mut client = ResourceData::new()
		.with("realm", REALM)
		.with("client_id", "dashboard")
		.with("redirect_uris", vec!["https://dashboard.example/callback"]);

	provider.create("keycloak_client", &mut client).await?;

	println!("Created client {} with id {}.", client.get_str("client_id")?, client.require_id()?);

	let mut mapping = ResourceData::new()
		.with("realm", REALM)
		.with("role_id", "r-1")
		.with("group", "operators");

	provider.create("keycloak_role_mapping", &mut mapping).await?;

	println!("Tracking role mapping as {}.", mapping.require_id()?);

	grant.assert_async().await;

	Ok(())
}
