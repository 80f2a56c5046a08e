//! Keycloak clients (OIDC or SAML applications) and their read-only sub-resources.

// self
use crate::{
	_prelude::*,
	admin::{KeycloakClient, User},
	auth::TokenSecret,
};

/// Protocol value for OpenID Connect clients.
pub const PROTOCOL_OPENID_CONNECT: &str = "openid-connect";
/// Protocol value for SAML clients.
pub const PROTOCOL_SAML: &str = "saml";

/// Subset of Keycloak's `ClientRepresentation` round-tripped by the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
	/// Server-assigned identifier; empty until created.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// User-chosen client identifier.
	pub client_id: String,
	/// Whether the client may be used.
	pub enabled: bool,
	/// Authenticator used for confidential clients (e.g. `client-secret`).
	#[serde(skip_serializing_if = "String::is_empty")]
	pub client_authenticator_type: String,
	/// Allowed redirect URIs.
	pub redirect_uris: Vec<String>,
	/// Root URL prepended to relative URLs.
	pub root_url: String,
	/// Admin URL for back-channel calls.
	pub admin_url: String,
	/// Default landing URL.
	pub base_url: String,
	/// `openid-connect` or `saml`.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub protocol: String,
	/// Public clients authenticate without a secret.
	pub public_client: bool,
	/// Bearer-only clients never initiate logins.
	pub bearer_only: bool,
	/// Enables the service account (client-credentials grant).
	pub service_accounts_enabled: bool,
	/// Enables the resource-owner password grant.
	pub direct_access_grants_enabled: bool,
	/// Enables the implicit flow.
	pub implicit_flow_enabled: bool,
	/// Enables the authorization-code flow.
	pub standard_flow_enabled: bool,
	/// Allowed CORS origins.
	pub web_origins: Vec<String>,
	/// Whether every role is included in issued tokens.
	pub full_scope_allowed: bool,
	/// Free-form attributes.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, Value>,
}

/// Secret of a confidential client, regenerated server-side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSecret {
	/// Credential type, usually `secret`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Secret value.
	pub value: TokenSecret,
}

impl KeycloakClient {
	/// Fetches a client by its server-assigned id.
	pub async fn get_client(&self, realm: &str, id: &str) -> Result<Client> {
		self.get(&self.realm_url(realm, &format!("clients/{id}"))).await
	}

	/// Lists every client in the realm.
	pub async fn list_clients(&self, realm: &str) -> Result<Vec<Client>> {
		self.get(&self.realm_url(realm, "clients")).await
	}

	/// Fetches the current secret of a confidential client.
	pub async fn get_client_secret(&self, realm: &str, id: &str) -> Result<ClientSecret> {
		self.get(&self.realm_url(realm, &format!("clients/{id}/client-secret"))).await
	}

	/// Fetches the synthetic user backing the client's service account.
	pub async fn get_client_service_account_user(&self, realm: &str, id: &str) -> Result<User> {
		self.get(&self.realm_url(realm, &format!("clients/{id}/service-account-user"))).await
	}

	/// Fetches the SAML IdP descriptor XML for a SAML client.
	pub async fn get_client_installation_saml_descriptor(
		&self,
		realm: &str,
		id: &str,
	) -> Result<String> {
		let url = self.realm_url(
			realm,
			&format!("clients/{id}/installation/providers/saml-idp-descriptor"),
		);
		let raw = self.get_raw(&url).await?;

		Ok(String::from_utf8_lossy(&raw).into_owned())
	}

	/// Creates a client and returns the server's representation of it.
	///
	/// Keycloak attaches default protocol mappers to every new client; they are deleted before
	/// returning. When that cleanup fails the created client is handed back inside
	/// [`Error::ClientMapperCleanup`] so the caller can still track or remove it.
	pub async fn create_client(&self, realm: &str, client: &Client) -> Result<Client> {
		let location = self.post(&self.realm_url(realm, "clients"), client).await?;
		let created: Client = self.get(&location).await?;

		if let Err(e) = self.remove_protocol_mappers(realm, &created.id).await {
			return Err(Error::ClientMapperCleanup {
				client: Box::new(created),
				source: Box::new(e),
			});
		}

		Ok(created)
	}

	/// Replaces a client; `client.id` selects the target.
	pub async fn update_client(&self, realm: &str, client: &Client) -> Result<()> {
		self.put(&self.realm_url(realm, &format!("clients/{}", client.id)), client).await
	}

	/// Deletes a client.
	pub async fn delete_client(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&self.realm_url(realm, &format!("clients/{id}")), None::<&()>).await
	}

	async fn remove_protocol_mappers(&self, realm: &str, client_id: &str) -> Result<()> {
		for mapper in self.list_protocol_mappers(realm, client_id).await? {
			self.delete_protocol_mapper(realm, client_id, &mapper.id).await?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn new_client_omits_empty_server_fields() {
		let client = Client {
			client_id: "svc1".into(),
			redirect_uris: vec!["https://a/callback".into()],
			..Default::default()
		};
		let payload = serde_json::to_value(&client).expect("Client should serialize.");

		assert!(payload.get("id").is_none());
		assert!(payload.get("protocol").is_none());
		assert!(payload.get("attributes").is_none());
		assert_eq!(payload["clientId"], "svc1");
		assert_eq!(payload["redirectUris"][0], "https://a/callback");
		assert_eq!(payload["publicClient"], false);
	}

	#[test]
	fn server_representation_tolerates_missing_fields() {
		let client: Client = serde_json::from_str(
			r#"{"id":"6f1c","clientId":"svc1","protocol":"openid-connect","attributes":{"pkce.code.challenge.method":"S256"},"defaultRoles":["x"]}"#,
		)
		.expect("Partial representation should decode.");

		assert_eq!(client.id, "6f1c");
		assert_eq!(client.protocol, PROTOCOL_OPENID_CONNECT);
		assert!(client.redirect_uris.is_empty());
		assert_eq!(client.attributes["pkce.code.challenge.method"], "S256");
	}

	#[test]
	fn client_secret_decodes_type_field() {
		let secret: ClientSecret = serde_json::from_str(r#"{"type":"secret","value":"abc"}"#)
			.expect("Client secret should decode.");

		assert_eq!(secret.kind, "secret");
		assert_eq!(secret.value.expose(), "abc");
		assert!(!format!("{secret:?}").contains("abc"));
	}
}
