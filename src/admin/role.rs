//! Realm and client roles.

// self
use crate::{_prelude::*, admin::KeycloakClient};

/// Named permission grant, realm-scoped or owned by a client. Composite roles are not modeled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
	/// Server-assigned identifier; empty until created.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Role name, immutable after creation.
	pub name: String,
	/// Whether the role belongs to a client.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub client_role: bool,
	/// Owning client id (or realm id for realm roles, as reported by the server).
	#[serde(skip_serializing_if = "String::is_empty")]
	pub container_id: String,
	/// Free-form description.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub description: String,
	/// Whether the role must be requested through the `scope` parameter.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub scope_param_required: bool,
}
impl Role {
	/// Forces `client_role` on whenever a container is named.
	pub fn normalized(mut self) -> Self {
		if !self.container_id.is_empty() {
			self.client_role = true;
		}

		self
	}
}

impl KeycloakClient {
	/// Fetches a role by id.
	pub async fn get_role(&self, realm: &str, id: &str) -> Result<Role> {
		self.get(&self.realm_url(realm, &format!("roles-by-id/{id}"))).await
	}

	/// Creates a realm-scoped role and returns the server's representation of it.
	pub async fn create_realm_role(&self, realm: &str, role: &Role) -> Result<Role> {
		self.create_role(self.realm_url(realm, "roles"), role).await
	}

	/// Creates a role owned by `client_id` and returns the server's representation of it.
	pub async fn create_client_role(
		&self,
		realm: &str,
		client_id: &str,
		role: &Role,
	) -> Result<Role> {
		self.create_role(self.realm_url(realm, &format!("clients/{client_id}/roles")), role).await
	}

	/// Replaces a role; `role.id` selects the target.
	pub async fn update_role(&self, realm: &str, role: &Role) -> Result<()> {
		self.put(&self.realm_url(realm, &format!("roles-by-id/{}", role.id)), role).await
	}

	/// Deletes a role.
	pub async fn delete_role(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&self.realm_url(realm, &format!("roles-by-id/{id}")), None::<&()>).await
	}

	async fn create_role(&self, create_url: String, role: &Role) -> Result<Role> {
		let location = self.post(&create_url, role).await?;
		let location = reencode_role_location(&create_url, &location)?;

		self.get(&location).await
	}
}

/// Rebuilds a role-creation `Location` with a correctly escaped role name.
///
/// Keycloak does not escape reserved characters such as `/` in the name it appends to the
/// creation URL. Everything after `{create_url}/` is percent-decoded and re-encoded as a single
/// path segment.
pub fn reencode_role_location(create_url: &str, location: &str) -> Result<String> {
	let encoding_error = |reason: &str| Error::Encoding {
		location: location.to_owned(),
		reason: reason.to_owned(),
	};
	let suffix = location
		.strip_prefix(create_url)
		.and_then(|rest| rest.strip_prefix('/'))
		.filter(|rest| !rest.is_empty())
		.ok_or_else(|| encoding_error("location does not extend the creation URL"))?;
	let name = urlencoding::decode(suffix).map_err(|e| encoding_error(&e.to_string()))?;

	Ok(format!("{create_url}/{}", urlencoding::encode(&name)))
}
