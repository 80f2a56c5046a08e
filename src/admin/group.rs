//! Group lookup used to resolve role-mapping principals.

// self
use crate::{_prelude::*, admin::KeycloakClient};

/// Minimal group representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
	/// Server-assigned identifier.
	pub id: String,
	/// Group name.
	pub name: String,
}

impl KeycloakClient {
	/// Finds the group whose name equals `name` exactly.
	///
	/// Keycloak's search is a substring match, so results are filtered locally.
	pub async fn get_group_by_name(&self, realm: &str, name: &str) -> Result<Group> {
		let url =
			format!("{}?search={}", self.realm_url(realm, "groups"), urlencoding::encode(name));
		let groups: Vec<Group> = self.get(&url).await?;

		groups
			.into_iter()
			.find(|group| group.name == name)
			.ok_or_else(|| Error::NotFound { kind: "group", name: name.to_owned() })
	}
}
