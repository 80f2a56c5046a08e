mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use keycloak_provider::admin::{Principal, RoleMapping, RoleMappingTarget};

const REALM: &str = "test";

fn mapping() -> RoleMapping {
	RoleMapping { realm: REALM.into(), role_id: "r-1".into(), ..Default::default() }
}

#[tokio::test]
async fn unknown_group_fails_before_any_mapping_call() {
	let server = MockServer::start_async().await;
	let client = test_admin_client(&server.base_url());
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "groups"));
			then.status(200).json_body(json!([]));
		})
		.await;
	let post = server
		.mock_async(|when, then| {
			when.method(POST);
			then.status(204);
		})
		.await;
	let err = client
		.resolve_role_mapping(&RoleMapping { group_name: "admins".into(), ..mapping() })
		.await
		.expect_err("A missing group should fail resolution.");

	assert!(matches!(err, Error::NotFound { kind: "group", .. }), "Unexpected error variant: {err:?}.");

	search.assert_async().await;
	post.assert_calls_async(0).await;
}

#[tokio::test]
async fn ambiguous_principal_is_rejected_without_requests() {
	let server = MockServer::start_async().await;
	let client = test_admin_client(&server.base_url());
	let any = server
		.mock_async(|_when, then| {
			then.status(500);
		})
		.await;
	let err = client
		.resolve_role_mapping(&RoleMapping {
			user_name: "alice".into(),
			group_id: "g-1".into(),
			..mapping()
		})
		.await
		.expect_err("Two principals should be rejected.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error variant: {err:?}.");

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn user_mapping_adds_and_deletes_resolved_role() {
	let server = MockServer::start_async().await;
	let client = test_admin_client(&server.base_url());
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "users")).query_param("search", "alice");
			then.status(200).json_body(json!([{ "id": "u-1", "username": "alice" }]));
		})
		.await;
	let role = server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "roles-by-id/r-1"));
			then.status(200).json_body(json!({ "id": "r-1", "name": "viewer" }));
		})
		.await;
	let add = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(admin_path(REALM, "users/u-1/role-mappings/realm"))
				.json_body(json!([{ "id": "r-1", "name": "viewer" }]));
			then.status(204);
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path(admin_path(REALM, "users/u-1/role-mappings/realm"))
				.json_body(json!([{ "id": "r-1", "name": "viewer" }]));
			then.status(204);
		})
		.await;
	let target = client
		.resolve_role_mapping(&RoleMapping { user_name: "alice".into(), ..mapping() })
		.await
		.expect("Known user should resolve.");

	assert_eq!(target.principal, Principal::User("u-1".into()));

	let resolved = client.resolve_role(target).await.expect("Role should resolve.");

	client.add_role_mapping(&resolved).await.expect("Add should succeed.");
	client.delete_role_mapping(&resolved).await.expect("Delete should succeed.");

	search.assert_async().await;
	role.assert_calls_async(1).await;
	add.assert_async().await;
	delete.assert_async().await;
}

#[tokio::test]
async fn client_scoped_queries_hit_available_and_composite() {
	let server = MockServer::start_async().await;
	let client = test_admin_client(&server.base_url());
	let available = server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "groups/g-1/role-mappings/clients/c-1/available"));
			then.status(200).json_body(json!([{ "id": "r-2", "name": "editor", "clientRole": true }]));
		})
		.await;
	let composite = server
		.mock_async(|when, then| {
			when.method(GET).path(admin_path(REALM, "groups/g-1/role-mappings/clients/c-1/composite"));
			then.status(200).json_body(json!([
				{ "id": "r-1", "name": "viewer", "clientRole": true },
				{ "id": "r-3", "name": "inherited", "clientRole": true },
			]));
		})
		.await;
	let target = client
		.resolve_role_mapping(&RoleMapping {
			group_id: "g-1".into(),
			client_id: "c-1".into(),
			..mapping()
		})
		.await
		.expect("Explicit ids should resolve without lookups.");
	let open = client.get_available_roles(&target).await.expect("Available roles should load.");
	let effective =
		client.get_composite_roles(&target).await.expect("Composite roles should load.");

	assert_eq!(open.len(), 1);
	assert_eq!(effective.len(), 2);
	assert!(effective.iter().any(|role| role.id == target.role_id));

	available.assert_async().await;
	composite.assert_async().await;
}

#[test]
fn identifier_round_trips_through_text() {
	let target = RoleMappingTarget {
		realm: REALM.into(),
		role_id: "r-1".into(),
		principal: Principal::User("u-1".into()),
		client_id: None,
	};
	let id = target.to_identifier();

	assert_eq!(RoleMappingTarget::from_identifier(&id).expect("Identifier should decode."), target);
	assert_ne!(
		id,
		RoleMappingTarget { client_id: Some("c-1".into()), ..target.clone() }.to_identifier()
	);
}
