//! `keycloak_role_mapping` resource.
//!
//! Every attribute forces replacement, so there is no update. The tracked id is the opaque
//! [`RoleMappingTarget`] identifier, which also makes the resource importable.

// self
use crate::{
	_prelude::*,
	admin::{KeycloakClient, Principal, RoleMapping, RoleMappingTarget},
	provider::{
		Attribute, ResourceData, Schema,
		resource::{self, Resource, ResourceFuture},
	},
};

const NAME: &str = "keycloak_role_mapping";
const PRINCIPALS: [&str; 4] = ["user", "group", "user_id", "group_id"];

/// Grants a realm or client role to one user or group.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleMappingResource;
impl Resource for RoleMappingResource {
	fn name(&self) -> &'static str {
		NAME
	}

	fn schema(&self) -> Schema {
		let principal = |name: &'static str, description: &'static str| {
			let others =
				PRINCIPALS.iter().copied().filter(|other| *other != name).collect::<Vec<_>>();

			Attribute::string().force_new().conflicts_with(&others).describe(description)
		};

		Schema::new()
			.attribute("realm", Attribute::string().required().force_new())
			.attribute("role_id", Attribute::string().required().force_new())
			.attribute("user", principal("user", "Username of the user receiving the role."))
			.attribute("group", principal("group", "Name of the group receiving the role."))
			.attribute("user_id", principal("user_id", "Id of the user receiving the role."))
			.attribute("group_id", principal("group_id", "Id of the group receiving the role."))
			.attribute(
				"client_id",
				Attribute::string()
					.force_new()
					.describe("Server id of the client owning the role; empty for realm roles."),
			)
	}

	fn read<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let mapping = mapping_from_data(data)?;
			let granted = async {
				let target = client.resolve_role_mapping(&mapping).await?;
				let roles = client.get_composite_roles(&target).await?;

				Ok::<_, Error>(roles.iter().any(|role| role.id == target.role_id))
			}
			.await;

			match granted {
				Ok(true) => Ok(()),
				Ok(false) => {
					if let Some(id) = data.id() {
						crate::obs::log_gone(NAME, id);
					}

					data.clear_id();

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
			let target = client.resolve_role_mapping(&mapping_from_data(data)?).await?;
			let resolved = client.resolve_role(target).await?;

			client.add_role_mapping(&resolved).await?;
			data.set_id(resolved.target.to_identifier());

			Ok(())
		})
	}

	fn delete<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let target = client.resolve_role_mapping(&mapping_from_data(data)?).await?;
			let resolved = client.resolve_role(target).await?;

			client.delete_role_mapping(&resolved).await
		})
	}

	fn import<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let target = RoleMappingTarget::from_identifier(data.require_id()?)?;

			write_target(&target, data);

			self.read(client, data).await
		})
	}
}

fn mapping_from_data(data: &ResourceData) -> Result<RoleMapping> {
	Ok(RoleMapping {
		realm: data.require_str("realm")?.to_owned(),
		role_id: data.require_str("role_id")?.to_owned(),
		client_id: data.get_str("client_id")?.to_owned(),
		user_name: data.get_str("user")?.to_owned(),
		group_name: data.get_str("group")?.to_owned(),
		user_id: data.get_str("user_id")?.to_owned(),
		group_id: data.get_str("group_id")?.to_owned(),
	})
}

fn write_target(target: &RoleMappingTarget, data: &mut ResourceData) {
	data.set("realm", target.realm.as_str());
	data.set("role_id", target.role_id.as_str());
	data.set("client_id", target.client_id.as_deref().unwrap_or_default());

	match &target.principal {
		Principal::User(id) => data.set("user_id", id.as_str()),
		Principal::Group(id) => data.set("group_id", id.as_str()),
	}
}
