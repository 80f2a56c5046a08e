//! `keycloak_client` data source.

// self
use crate::{
	_prelude::*,
	admin::KeycloakClient,
	config::DEFAULT_REALM,
	provider::{
		Attribute, ResourceData, Schema,
		resource::{DataSource, ResourceFuture, client},
	},
};

/// Looks an existing client up by server id (`guid`) or by `client_id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientDataSource;
impl DataSource for ClientDataSource {
	fn name(&self) -> &'static str {
		"keycloak_client"
	}

	fn schema(&self) -> Schema {
		let computed = |attribute: Attribute| attribute.computed_only();

		Schema::new()
			.attribute("realm", Attribute::string().default_value(DEFAULT_REALM))
			.attribute("guid", Attribute::string().computed().conflicts_with(&["client_id"]))
			.attribute("client_id", Attribute::string().computed().conflicts_with(&["guid"]))
			.attribute("enabled", computed(Attribute::bool()))
			.attribute("client_authenticator_type", computed(Attribute::string()))
			.attribute("redirect_uris", computed(Attribute::list()))
			.attribute("protocol", computed(Attribute::string()))
			.attribute("public_client", computed(Attribute::bool()))
			.attribute("bearer_only", computed(Attribute::bool()))
			.attribute("service_accounts_enabled", computed(Attribute::bool()))
			.attribute("direct_access_grants_enabled", computed(Attribute::bool()))
			.attribute("implicit_flow_enabled", computed(Attribute::bool()))
			.attribute("standard_flow_enabled", computed(Attribute::bool()))
			.attribute("web_origins", computed(Attribute::list()))
			.attribute("root_url", computed(Attribute::string()))
			.attribute("admin_url", computed(Attribute::string()))
			.attribute("base_url", computed(Attribute::string()))
			.attribute("full_scope_allowed", computed(Attribute::bool()))
			.attribute("attributes", computed(Attribute::map()))
			.attribute("client_secret", computed(Attribute::string()).sensitive())
			.attribute("service_account_user_id", computed(Attribute::string()))
			.attribute("saml_idp_descriptor_xml", computed(Attribute::string()))
	}

	fn read<'a>(
		&'a self,
		admin: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let realm = data.get_str("realm")?.to_owned();
			let guid = data.get_str("guid")?.to_owned();
			let client_id = data.get_str("client_id")?.to_owned();
			let id = match (guid.is_empty(), client_id.is_empty()) {
				(false, false) =>
					return Err(Error::attribute(
						"guid",
						"guid and client_id arguments can't be used together",
					)),
				(true, true) =>
					return Err(Error::attribute("guid", "either guid or client_id must be set")),
				(false, true) => guid,
				(true, false) => admin
					.list_clients(&realm)
					.await?
					.into_iter()
					.find(|candidate| candidate.client_id == client_id)
					.map(|candidate| candidate.id)
					.ok_or_else(|| Error::NotFound { kind: "client", name: client_id.clone() })?,
			};

			client::read_into(admin, &realm, &id, data).await?;
			data.set("guid", id.as_str());
			data.set_id(id);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn lookup_keys_are_exclusive() {
		let schema = ClientDataSource.schema();
		let both = ResourceData::new().with("guid", "6f1c").with("client_id", "svc1");

		assert!(matches!(schema.validate(&both), Err(Error::Attribute { .. })));
		assert!(schema.validate(&ResourceData::new().with("client_id", "svc1")).is_ok());
	}
}
