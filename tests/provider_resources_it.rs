mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use keycloak_provider::{
	admin::{Principal, RoleMappingTarget},
	provider::{ConfiguredProvider, Provider, ResourceData},
};

const REALM: &str = "test";

fn provider(server: &MockServer) -> ConfiguredProvider {
	ConfiguredProvider::new(test_admin_client(&server.base_url()))
}

#[tokio::test]
async fn read_clears_id_when_client_is_gone() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);
	let get = server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients/6f1c"));
			then.status(404);
		})
		.await;
	let mut data = ResourceData::with_id("6f1c").with("realm", REALM);

	provider
		.read("keycloak_client", &mut data)
		.await
		.expect("A vanished client should not fail.");

	assert!(data.is_new_resource());

	get.assert_async().await;
}

#[tokio::test]
async fn read_propagates_other_failures() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "roles-by-id/r-1"));
			then.status(403).body("forbidden");
		})
		.await;

	let mut data = ResourceData::with_id("r-1").with("realm", REALM);
	let err = provider
		.read("keycloak_role", &mut data)
		.await
		.expect_err("A 403 should reach the host.");

	assert_eq!(err.status(), Some(403));
	assert_eq!(data.id(), Some("r-1"));
}

#[tokio::test]
async fn client_import_reads_computed_fields() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients/6f1c"));
			then.status(200).json_body(json!({
				"id": "6f1c",
				"clientId": "svc1",
				"enabled": true,
				"protocol": "saml",
				"serviceAccountsEnabled": true,
				"redirectUris": ["https://a/callback"],
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients/6f1c/client-secret"));
			then.status(200).json_body(json!({ "type": "secret", "value": "generated" }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients/6f1c/service-account-user"));
			then.status(200).json_body(json!({ "id": "u-sa", "username": "service-account-svc1" }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path(admin_path(REALM, "clients/6f1c/installation/providers/saml-idp-descriptor"));
			then.status(200).body("<EntityDescriptor/>");
		})
		.await;

	let mut data = ResourceData::with_id("test.6f1c");

	provider.import("keycloak_client", &mut data).await.expect("Import should succeed.");

	assert_eq!(data.id(), Some("6f1c"));
	assert_eq!(data.get_str("realm").expect("Realm should be set."), REALM);
	assert_eq!(data.get_str("client_id").expect("Client id should be set."), "svc1");
	assert_eq!(data.get_str("client_secret").expect("Secret should be set."), "generated");
	assert_eq!(data.get_str("service_account_user_id").expect("User id should be set."), "u-sa");
	assert_eq!(
		data.get_str("saml_idp_descriptor_xml").expect("Descriptor should be set."),
		"<EntityDescriptor/>"
	);
}

#[tokio::test]
async fn malformed_import_ids_are_rejected() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);
	let mut data = ResourceData::with_id("only-one-part");
	let err = provider
		.import("keycloak_client", &mut data)
		.await
		.expect_err("A single-part id should be rejected.");

	assert!(err.to_string().contains("${realm}.${resource_id}"));

	let mut data = ResourceData::with_id("test.m-1");
	let err = provider
		.import("keycloak_protocol_mapper", &mut data)
		.await
		.expect_err("Mapper ids need three parts.");

	assert!(matches!(err, Error::InvalidImportId { .. }), "Unexpected error variant: {err:?}.");
}

#[tokio::test]
async fn role_resource_creates_client_role_when_container_is_set() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);
	let location = server.url(admin_path(REALM, "clients/c-1/roles/editor"));
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(admin_path(REALM, "clients/c-1/roles"));
			then.status(201).header("location", location.as_str());
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients/c-1/roles/editor"));
			then.status(200).json_body(json!({
				"id": "r-2",
				"name": "editor",
				"clientRole": true,
				"containerId": "c-1",
			}));
		})
		.await;

	let mut data =
		ResourceData::new().with("realm", REALM).with("name", "editor").with("container_id", "c-1");

	provider.create("keycloak_role", &mut data).await.expect("Role creation should succeed.");

	assert_eq!(data.id(), Some("r-2"));
	assert!(data.get_bool("client_role").expect("Client role should be a bool."));

	create.assert_async().await;
}

#[tokio::test]
async fn role_mapping_lifecycle_tracks_identifier() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "groups")).query_param("search", "admins");
			then.status(200).json_body(json!([{ "id": "g-1", "name": "admins" }]));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "roles-by-id/r-1"));
			then.status(200).json_body(json!({ "id": "r-1", "name": "viewer" }));
		})
		.await;

	let add = server
		.mock_async(|when, then| {
			when.method(POST).path(admin_path(REALM, "groups/g-1/role-mappings/realm"));
			then.status(204);
		})
		.await;
	let mut composite = server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "groups/g-1/role-mappings/realm/composite"));
			then.status(200).json_body(json!([{ "id": "r-1", "name": "viewer" }]));
		})
		.await;
	let mut data =
		ResourceData::new().with("realm", REALM).with("role_id", "r-1").with("group", "admins");

	provider
		.create("keycloak_role_mapping", &mut data)
		.await
		.expect("Mapping creation should succeed.");

	let id = data.id().expect("Created mapping should be tracked.").to_owned();
	let target = RoleMappingTarget::from_identifier(&id).expect("Tracked id should decode.");

	assert_eq!(target.principal, Principal::Group("g-1".into()));

	add.assert_async().await;

	provider.read("keycloak_role_mapping", &mut data).await.expect("Read should succeed.");

	assert_eq!(data.id(), Some(id.as_str()));

	composite.delete_async().await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "groups/g-1/role-mappings/realm/composite"));
			then.status(200).json_body(json!([]));
		})
		.await;

	provider.read("keycloak_role_mapping", &mut data).await.expect("Read should succeed.");

	assert!(data.is_new_resource());
}

#[tokio::test]
async fn data_source_finds_client_by_client_id() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients"));
			then.status(200).json_body(json!([
				{ "id": "a-0", "clientId": "other" },
				{ "id": "6f1c", "clientId": "svc1" },
			]));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients/6f1c"));
			then.status(200).json_body(json!({
				"id": "6f1c",
				"clientId": "svc1",
				"protocol": "openid-connect",
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "clients/6f1c/client-secret"));
			then.status(200).json_body(json!({ "type": "secret", "value": "generated" }));
		})
		.await;

	let mut data = ResourceData::new().with("realm", REALM).with("client_id", "svc1");

	provider
		.read_data_source("keycloak_client", &mut data)
		.await
		.expect("Lookup by client_id should succeed.");

	assert_eq!(data.id(), Some("6f1c"));
	assert_eq!(data.get_str("guid").expect("Guid should be set."), "6f1c");

	let mut missing = ResourceData::new().with("realm", REALM).with("client_id", "nope");
	let err = provider
		.read_data_source("keycloak_client", &mut missing)
		.await
		.expect_err("Unknown client ids should fail.");

	assert!(err.is_not_found());
}

#[tokio::test]
async fn unknown_resource_type_is_rejected() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);
	let err = provider
		.read("keycloak_realm", &mut ResourceData::with_id("x"))
		.await
		.expect_err("Realms are not served.");

	assert!(matches!(err, Error::UnknownResource { .. }), "Unexpected error variant: {err:?}.");
}

#[tokio::test]
async fn configure_logs_in_with_block_settings() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/realms/ops/protocol/openid-connect/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"ops-token\",\"token_type\":\"bearer\"}");
		})
		.await;
	let data = ResourceData::new()
		.with("client_id", "terraform")
		.with("client_secret", "s3cret")
		.with("api_base", server.base_url())
		.with("realm", "ops");
	let provider = Provider::configure(data).await.expect("Configure should log in.");

	assert_eq!(provider.client().session().access_token().expose(), "ops-token");
	assert!(provider.client().session().expires_at().is_none());

	token.assert_async().await;
}
