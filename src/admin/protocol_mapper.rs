//! Protocol mappers attached to a client.

// self
use crate::{_prelude::*, admin::KeycloakClient};

/// Named claim/attribute transformation scoped to a (realm, client) pair.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolMapper {
	/// Server-assigned identifier; empty until created.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Mapper name, immutable after creation.
	pub name: String,
	/// `openid-connect` or `saml`.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub protocol: String,
	/// Mapper implementation, e.g. `oidc-usermodel-attribute-mapper`.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub protocol_mapper: String,
	/// Whether users must consent to the mapped data.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub consent_required: bool,
	/// Text shown on the consent screen.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub consent_text: String,
	/// Mapper-specific settings.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub config: BTreeMap<String, Value>,
}

impl KeycloakClient {
	/// Fetches one mapper of a client.
	pub async fn get_protocol_mapper(
		&self,
		realm: &str,
		client_id: &str,
		id: &str,
	) -> Result<ProtocolMapper> {
		self.get(&self.mapper_url(realm, client_id, Some(id))).await
	}

	/// Lists the mappers attached to a client.
	pub async fn list_protocol_mappers(
		&self,
		realm: &str,
		client_id: &str,
	) -> Result<Vec<ProtocolMapper>> {
		self.get(&self.mapper_url(realm, client_id, None)).await
	}

	/// Creates a mapper and returns the server's representation of it.
	pub async fn create_protocol_mapper(
		&self,
		realm: &str,
		client_id: &str,
		mapper: &ProtocolMapper,
	) -> Result<ProtocolMapper> {
		let location = self.post(&self.mapper_url(realm, client_id, None), mapper).await?;

		self.get(&location).await
	}

	/// Replaces a mapper; `mapper.id` selects the target.
	pub async fn update_protocol_mapper(
		&self,
		realm: &str,
		client_id: &str,
		mapper: &ProtocolMapper,
	) -> Result<()> {
		self.put(&self.mapper_url(realm, client_id, Some(&mapper.id)), mapper).await
	}

	/// Deletes a mapper.
	pub async fn delete_protocol_mapper(
		&self,
		realm: &str,
		client_id: &str,
		id: &str,
	) -> Result<()> {
		self.delete(&self.mapper_url(realm, client_id, Some(id)), None::<&()>).await
	}

	fn mapper_url(&self, realm: &str, client_id: &str, id: Option<&str>) -> String {
		match id {
			Some(id) =>
				self.realm_url(realm, &format!("clients/{client_id}/protocol-mappers/models/{id}")),
			None => self.realm_url(realm, &format!("clients/{client_id}/protocol-mappers/models")),
		}
	}
}
