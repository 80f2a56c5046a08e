//! `keycloak_role` resource.

// self
use crate::{
	_prelude::*,
	admin::{KeycloakClient, Role},
	config::DEFAULT_REALM,
	provider::{
		Attribute, ResourceData, Schema,
		resource::{self, Resource, ResourceFuture},
	},
};

const NAME: &str = "keycloak_role";
const IMPORT_SHAPE: &str = "${realm}.${resource_id}";

/// Manages realm roles and client roles. A non-empty `container_id` makes it a client role.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleResource;
impl Resource for RoleResource {
	fn name(&self) -> &'static str {
		NAME
	}

	fn schema(&self) -> Schema {
		Schema::new()
			.attribute("realm", Attribute::string().default_value(DEFAULT_REALM))
			.attribute("name", Attribute::string().required().force_new())
			.attribute(
				"container_id",
				Attribute::string().describe("Server id of the owning client, for client roles."),
			)
			.attribute("description", Attribute::string())
			.attribute("scope_param_required", Attribute::bool())
			.attribute("client_role", Attribute::bool().computed())
	}

	fn read<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let role = client.get_role(data.get_str("realm")?, data.require_id()?).await;

			match role {
				Ok(role) => {
					write_role(&role, data);

					Ok(())
				},
				Err(e) => resource::clear_if_gone(NAME, data, e),
			}
		})
	}

	fn create<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let realm = data.get_str("realm")?.to_owned();
			let role = role_from_data(data)?;
			let created = if role.client_role {
				client.create_client_role(&realm, &role.container_id, &role).await?
			} else {
				client.create_realm_role(&realm, &role).await?
			};

			data.set_id(created.id.as_str());
			write_role(&created, data);

			Ok(())
		})
	}

	fn update<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			client.update_role(data.get_str("realm")?, &role_from_data(data)?).await
		})
	}

	fn delete<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(
			async move { client.delete_role(data.get_str("realm")?, data.require_id()?).await },
		)
	}

	fn import<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let raw = data.require_id()?.to_owned();
			let [realm, id] = resource::split_import_id::<2>(&raw, IMPORT_SHAPE)?;

			data.set("realm", realm);
			data.set_id(id);

			self.read(client, data).await
		})
	}
}

fn role_from_data(data: &ResourceData) -> Result<Role> {
	let role = Role {
		id: data.id().unwrap_or_default().to_owned(),
		name: data.get_str("name")?.to_owned(),
		client_role: data.get_bool("client_role")?,
		container_id: data.get_str("container_id")?.to_owned(),
		description: data.get_str("description")?.to_owned(),
		scope_param_required: data.get_bool("scope_param_required")?,
	};

	Ok(role.normalized())
}

fn write_role(role: &Role, data: &mut ResourceData) {
	data.set("name", role.name.as_str());
	data.set("client_role", role.client_role);
	data.set("description", role.description.as_str());
	data.set("scope_param_required", role.scope_param_required);
	// Realm roles report the realm id as their container; only client roles round-trip it.
	if role.client_role {
		data.set("container_id", role.container_id.as_str());
	}
}
