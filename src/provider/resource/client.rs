//! `keycloak_client` resource.

// self
use crate::{
	_prelude::*,
	admin::{Client, KeycloakClient, PROTOCOL_OPENID_CONNECT, PROTOCOL_SAML},
	config::DEFAULT_REALM,
	provider::{
		Attribute, ResourceData, Schema,
		resource::{self, Resource, ResourceFuture},
	},
};

const NAME: &str = "keycloak_client";
const IMPORT_SHAPE: &str = "${realm}.${resource_id}";

/// Manages OIDC and SAML clients.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientResource;
impl Resource for ClientResource {
	fn name(&self) -> &'static str {
		NAME
	}

	fn schema(&self) -> Schema {
		Schema::new()
			.attribute("realm", Attribute::string().default_value(DEFAULT_REALM))
			.attribute("client_id", Attribute::string().required())
			.attribute("enabled", Attribute::bool().default_value(true))
			.attribute(
				"client_authenticator_type",
				Attribute::string().default_value("client-secret"),
			)
			.attribute("redirect_uris", Attribute::list().required())
			.attribute("protocol", Attribute::string().default_value(PROTOCOL_OPENID_CONNECT))
			.attribute("public_client", Attribute::bool().default_value(true))
			.attribute("bearer_only", Attribute::bool().default_value(false))
			.attribute("service_accounts_enabled", Attribute::bool().default_value(false))
			.attribute("direct_access_grants_enabled", Attribute::bool().default_value(false))
			.attribute("implicit_flow_enabled", Attribute::bool().default_value(false))
			.attribute("standard_flow_enabled", Attribute::bool().default_value(true))
			.attribute("web_origins", Attribute::list())
			.attribute("root_url", Attribute::string())
			.attribute("admin_url", Attribute::string())
			.attribute("base_url", Attribute::string())
			.attribute("full_scope_allowed", Attribute::bool().default_value(true))
			.attribute("attributes", Attribute::map())
			.attribute("client_secret", Attribute::string().computed_only().sensitive())
			.attribute("service_account_user_id", Attribute::string().computed_only())
			.attribute(
				"saml_idp_descriptor_xml",
				Attribute::string().computed_only().describe("Only populated for SAML clients."),
			)
	}

	fn read<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let realm = data.get_str("realm")?.to_owned();
			let id = data.require_id()?.to_owned();

			match read_into(client, &realm, &id, data).await {
				Err(e) => resource::clear_if_gone(NAME, data, e),
				ok => ok,
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
			let desired = client_from_data(data)?;
			let created = match client.create_client(&realm, &desired).await {
				Ok(created) => created,
				Err(Error::ClientMapperCleanup { client: created, source }) => {
					// Keep tracking the half-configured client so the next plan can fix or drop it.
					data.set_id(created.id.clone());

					return Err(Error::ClientMapperCleanup { client: created, source });
				},
				Err(e) => return Err(e),
			};

			data.set_id(created.id);

			let id = data.require_id()?.to_owned();

			read_into(client, &realm, &id, data).await
		})
	}

	fn update<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let realm = data.get_str("realm")?;

			client.update_client(realm, &client_from_data(data)?).await
		})
	}

	fn delete<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(
			async move { client.delete_client(data.get_str("realm")?, data.require_id()?).await },
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

/// Builds the request payload from host state. Tracked resources carry their id.
pub(crate) fn client_from_data(data: &ResourceData) -> Result<Client> {
	Ok(Client {
		id: data.id().unwrap_or_default().to_owned(),
		client_id: data.get_str("client_id")?.to_owned(),
		enabled: data.get_bool("enabled")?,
		client_authenticator_type: data.get_str("client_authenticator_type")?.to_owned(),
		redirect_uris: data.get_str_list("redirect_uris")?,
		root_url: data.get_str("root_url")?.to_owned(),
		admin_url: data.get_str("admin_url")?.to_owned(),
		base_url: data.get_str("base_url")?.to_owned(),
		protocol: data.get_str("protocol")?.to_owned(),
		public_client: data.get_bool("public_client")?,
		bearer_only: data.get_bool("bearer_only")?,
		service_accounts_enabled: data.get_bool("service_accounts_enabled")?,
		direct_access_grants_enabled: data.get_bool("direct_access_grants_enabled")?,
		implicit_flow_enabled: data.get_bool("implicit_flow_enabled")?,
		standard_flow_enabled: data.get_bool("standard_flow_enabled")?,
		web_origins: data.get_str_list("web_origins")?,
		full_scope_allowed: data.get_bool("full_scope_allowed")?,
		attributes: data
			.get_str_map("attributes")?
			.into_iter()
			.map(|(key, value)| (key, Value::String(value)))
			.collect(),
	})
}

/// Fetches client `id` plus its computed fields and writes everything into `data`.
pub(crate) async fn read_into(
	client: &KeycloakClient,
	realm: &str,
	id: &str,
	data: &mut ResourceData,
) -> Result<()> {
	let remote = client.get_client(realm, id).await?;

	write_client(&remote, data);

	let secret = client.get_client_secret(realm, id).await?;

	data.set("client_secret", secret.value.expose());

	if remote.service_accounts_enabled {
		let user = client.get_client_service_account_user(realm, id).await?;

		data.set("service_account_user_id", user.id);
	}
	if remote.protocol == PROTOCOL_SAML {
		let descriptor = client.get_client_installation_saml_descriptor(realm, id).await?;

		data.set("saml_idp_descriptor_xml", descriptor);
	}

	Ok(())
}

fn write_client(remote: &Client, data: &mut ResourceData) {
	data.set("client_id", remote.client_id.as_str());
	data.set("enabled", remote.enabled);
	data.set("client_authenticator_type", remote.client_authenticator_type.as_str());
	data.set("redirect_uris", remote.redirect_uris.clone());
	data.set("protocol", remote.protocol.as_str());
	data.set("public_client", remote.public_client);
	data.set("bearer_only", remote.bearer_only);
	data.set("service_accounts_enabled", remote.service_accounts_enabled);
	data.set("direct_access_grants_enabled", remote.direct_access_grants_enabled);
	data.set("implicit_flow_enabled", remote.implicit_flow_enabled);
	data.set("standard_flow_enabled", remote.standard_flow_enabled);
	data.set("web_origins", remote.web_origins.clone());
	data.set("root_url", remote.root_url.as_str());
	data.set("admin_url", remote.admin_url.as_str());
	data.set("base_url", remote.base_url.as_str());
	data.set("full_scope_allowed", remote.full_scope_allowed);
	// Keycloak stores attribute values as strings but may echo scalars back untyped.
	data.set(
		"attributes",
		remote
			.attributes
			.iter()
			.map(|(key, value)| {
				let value = match value {
					Value::String(s) => s.clone(),
					other => other.to_string(),
				};

				(key.clone(), Value::String(value))
			})
			.collect::<serde_json::Map<_, _>>(),
	);
}
