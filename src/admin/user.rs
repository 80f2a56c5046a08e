//! User lookup used to resolve role-mapping principals and service accounts.

// self
use crate::{_prelude::*, admin::KeycloakClient};

/// Minimal user representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
	/// Server-assigned identifier.
	pub id: String,
	/// Login name.
	pub username: String,
}

impl KeycloakClient {
	/// Finds the user whose username equals `name` exactly.
	pub async fn get_user_by_name(&self, realm: &str, name: &str) -> Result<User> {
		let url =
			format!("{}?search={}", self.realm_url(realm, "users"), urlencoding::encode(name));
		let users: Vec<User> = self.get(&url).await?;

		users
			.into_iter()
			.find(|user| user.username == name)
			.ok_or_else(|| Error::NotFound { kind: "user", name: name.to_owned() })
	}
}
