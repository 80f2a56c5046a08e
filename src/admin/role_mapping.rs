//! Role-mapping resolution: principal lookup, role fetch, URL construction and the opaque
//! identifier under which a mapping is tracked.
//!
//! A role mapping is not a server-side object with its own id. It is the fact that a role is
//! granted to a user or a group, either at realm level or within one client. The flow is:
//!
//! 1. [`RoleMapping::principal_ref`] checks that exactly one principal is named.
//! 2. [`KeycloakClient::resolve_role_mapping`] turns user or group names into ids, giving a
//!    [`RoleMappingTarget`].
//! 3. [`KeycloakClient::resolve_role`] fetches the role once, giving a
//!    [`ResolvedRoleMapping`] that add and delete reuse.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	admin::{KeycloakClient, Role},
};

/// Host-supplied description of a role mapping. Empty strings mean "not set".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleMapping {
	/// Realm holding both the role and the principal.
	pub realm: String,
	/// Id of the role to grant.
	pub role_id: String,
	/// Server id of the client owning the role; empty for realm roles.
	pub client_id: String,
	/// Username of the principal.
	pub user_name: String,
	/// Name of the principal group.
	pub group_name: String,
	/// Id of the principal user.
	pub user_id: String,
	/// Id of the principal group.
	pub group_id: String,
}
impl RoleMapping {
	/// Returns the single principal reference, or [`Error::Validation`] when zero or several
	/// are set.
	pub fn principal_ref(&self) -> Result<PrincipalRef<'_>> {
		let candidates = [
			(!self.user_name.is_empty()).then_some(PrincipalRef::UserName(&self.user_name)),
			(!self.group_name.is_empty()).then_some(PrincipalRef::GroupName(&self.group_name)),
			(!self.user_id.is_empty()).then_some(PrincipalRef::UserId(&self.user_id)),
			(!self.group_id.is_empty()).then_some(PrincipalRef::GroupId(&self.group_id)),
		];
		let mut set = candidates.into_iter().flatten();

		match (set.next(), set.next()) {
			(Some(principal), None) => Ok(principal),
			(None, _) => Err(Error::validation(
				"exactly one of user, group, user_id or group_id must be set, found none",
			)),
			(Some(_), Some(_)) => Err(Error::validation(
				"exactly one of user, group, user_id or group_id must be set, found several",
			)),
		}
	}

	fn client_scope(&self) -> Option<String> {
		(!self.client_id.is_empty()).then(|| self.client_id.clone())
	}
}

/// Borrowed principal reference as supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrincipalRef<'a> {
	/// Username to look up.
	UserName(&'a str),
	/// Group name to look up.
	GroupName(&'a str),
	/// Known user id.
	UserId(&'a str),
	/// Known group id.
	GroupId(&'a str),
}

/// Resolved principal receiving the role.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Principal {
	/// User id.
	User(String),
	/// Group id.
	Group(String),
}
impl Principal {
	fn collection(&self) -> &'static str {
		match self {
			Self::User(_) => "users",
			Self::Group(_) => "groups",
		}
	}

	fn id(&self) -> &str {
		match self {
			Self::User(id) | Self::Group(id) => id,
		}
	}
}

/// Fully resolved role mapping minus the role payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoleMappingTarget {
	/// Realm holding the role and the principal.
	pub realm: String,
	/// Id of the granted role.
	pub role_id: String,
	/// Principal receiving the role.
	pub principal: Principal,
	/// Owning client for client roles.
	pub client_id: Option<String>,
}
impl RoleMappingTarget {
	/// URL used to add or delete the mapping.
	pub fn mapping_url(&self, base: &str) -> String {
		self.url(base, "")
	}

	/// URL listing roles that could still be mapped.
	pub fn available_url(&self, base: &str) -> String {
		self.url(base, "/available")
	}

	/// URL listing effective roles, composites expanded.
	pub fn composite_url(&self, base: &str) -> String {
		self.url(base, "/composite")
	}

	/// Encodes the target as standard base64 over compact JSON with a fixed field order.
	pub fn to_identifier(&self) -> String {
		let (user_id, group_id) = match &self.principal {
			Principal::User(id) => (id.as_str(), ""),
			Principal::Group(id) => ("", id.as_str()),
		};
		let record = IdentifierRecord {
			realm: Cow::Borrowed(&self.realm),
			role_id: Cow::Borrowed(&self.role_id),
			user_id: Cow::Borrowed(user_id),
			group_id: Cow::Borrowed(group_id),
			client_id: Cow::Borrowed(self.client_id.as_deref().unwrap_or_default()),
		};
		// A struct of strings always serializes.
		let json = serde_json::to_vec(&record).unwrap_or_default();

		STANDARD.encode(json)
	}

	/// Decodes an identifier produced by [`Self::to_identifier`].
	pub fn from_identifier(identifier: &str) -> Result<Self> {
		let raw = STANDARD
			.decode(identifier)
			.map_err(|e| Error::validation(format!("identifier is not base64: {e}")))?;
		let record: IdentifierRecord<'_> = serde_json::from_slice(&raw)
			.map_err(|e| Error::validation(format!("identifier is not a role mapping: {e}")))?;
		let principal = match (record.user_id.is_empty(), record.group_id.is_empty()) {
			(false, true) => Principal::User(record.user_id.into_owned()),
			(true, false) => Principal::Group(record.group_id.into_owned()),
			_ => return Err(Error::validation("identifier must name exactly one principal")),
		};

		Ok(Self {
			realm: record.realm.into_owned(),
			role_id: record.role_id.into_owned(),
			principal,
			client_id: (!record.client_id.is_empty()).then(|| record.client_id.into_owned()),
		})
	}

	fn url(&self, base: &str, suffix: &str) -> String {
		let scope = match &self.client_id {
			Some(client_id) => format!("clients/{client_id}"),
			None => "realm".into(),
		};

		format!(
			"{base}/auth/admin/realms/{}/{}/{}/role-mappings/{scope}{suffix}",
			self.realm,
			self.principal.collection(),
			self.principal.id(),
		)
	}
}

/// A target together with the role payload Keycloak expects in add/delete bodies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoleMapping {
	/// Where the mapping lives.
	pub target: RoleMappingTarget,
	/// The role fetched during resolution.
	pub role: Role,
}

#[derive(Serialize, Deserialize)]
struct IdentifierRecord<'a> {
	realm: Cow<'a, str>,
	role_id: Cow<'a, str>,
	#[serde(default)]
	user_id: Cow<'a, str>,
	#[serde(default)]
	group_id: Cow<'a, str>,
	#[serde(default)]
	client_id: Cow<'a, str>,
}

impl KeycloakClient {
	/// Validates `mapping` and resolves name references to ids.
	///
	/// Unknown names fail with [`Error::NotFound`] before any mapping call is issued.
	pub async fn resolve_role_mapping(&self, mapping: &RoleMapping) -> Result<RoleMappingTarget> {
		let realm = mapping.realm.as_str();
		let principal = match mapping.principal_ref()? {
			PrincipalRef::UserName(name) =>
				Principal::User(self.get_user_by_name(realm, name).await?.id),
			PrincipalRef::GroupName(name) =>
				Principal::Group(self.get_group_by_name(realm, name).await?.id),
			PrincipalRef::UserId(id) => Principal::User(id.to_owned()),
			PrincipalRef::GroupId(id) => Principal::Group(id.to_owned()),
		};

		Ok(RoleMappingTarget {
			realm: mapping.realm.clone(),
			role_id: mapping.role_id.clone(),
			principal,
			client_id: mapping.client_scope(),
		})
	}

	/// Fetches the role named by `target`.
	pub async fn resolve_role(&self, target: RoleMappingTarget) -> Result<ResolvedRoleMapping> {
		let role = self.get_role(&target.realm, &target.role_id).await?;

		Ok(ResolvedRoleMapping { target, role })
	}

	/// Grants the role to the principal.
	pub async fn add_role_mapping(&self, mapping: &ResolvedRoleMapping) -> Result<()> {
		let url = mapping.target.mapping_url(self.base());

		self.post_no_location(&url, std::slice::from_ref(&mapping.role)).await
	}

	/// Revokes the role from the principal.
	pub async fn delete_role_mapping(&self, mapping: &ResolvedRoleMapping) -> Result<()> {
		let url = mapping.target.mapping_url(self.base());

		self.delete(&url, Some(std::slice::from_ref(&mapping.role))).await
	}

	/// Lists roles the principal could still be granted in the target's scope.
	pub async fn get_available_roles(&self, target: &RoleMappingTarget) -> Result<Vec<Role>> {
		self.get(&target.available_url(self.base())).await
	}

	/// Lists the principal's effective roles in the target's scope.
	pub async fn get_composite_roles(&self, target: &RoleMappingTarget) -> Result<Vec<Role>> {
		self.get(&target.composite_url(self.base())).await
	}
}
