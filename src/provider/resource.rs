//! Lifecycle contracts implemented by every managed resource and data source.

pub mod client;
pub mod protocol_mapper;
pub mod role;
pub mod role_mapping;

pub use client::ClientResource;
pub use protocol_mapper::ProtocolMapperResource;
pub use role::RoleResource;
pub use role_mapping::RoleMappingResource;

// self
use crate::{
	_prelude::*,
	admin::KeycloakClient,
	provider::{ResourceData, Schema},
};

/// Boxed future returned by lifecycle callbacks.
pub type ResourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// CRUD callbacks for one managed resource type.
///
/// Each callback works on the host's [`ResourceData`] in place. `read` clears the tracked id
/// when the remote object is gone instead of failing.
pub trait Resource
where
	Self: Send + Sync,
{
	/// Type name registered with the host, e.g. `keycloak_client`.
	fn name(&self) -> &'static str;

	/// Declared attributes.
	fn schema(&self) -> Schema;

	/// Refreshes `data` from Keycloak.
	fn read<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()>;

	/// Creates the remote object and starts tracking its id.
	fn create<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()>;

	/// Pushes changed attributes to the remote object.
	fn update<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		let _ = (client, data);
		let kind = self.name();

		Box::pin(async move { Err(Error::Unsupported { kind, operation: "update" }) })
	}

	/// Deletes the remote object.
	fn delete<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()>;

	/// Adopts an existing object whose import id sits in `data.id()`.
	fn import<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		let _ = (client, data);
		let kind = self.name();

		Box::pin(async move { Err(Error::Unsupported { kind, operation: "import" }) })
	}
}

/// Read-only lookup registered with the host.
pub trait DataSource
where
	Self: Send + Sync,
{
	/// Type name registered with the host.
	fn name(&self) -> &'static str;

	/// Declared attributes.
	fn schema(&self) -> Schema;

	/// Resolves the lookup and fills `data`.
	fn read<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()>;
}

/// Splits a dotted import id into exactly `N` non-empty parts.
pub fn split_import_id<'a, const N: usize>(
	id: &'a str,
	expected: &'static str,
) -> Result<[&'a str; N]> {
	let invalid = || Error::InvalidImportId { id: id.to_owned(), expected };
	let parts = id.split('.').collect::<Vec<_>>();

	if parts.iter().any(|part| part.is_empty()) {
		return Err(invalid());
	}

	parts.try_into().map_err(|_| invalid())
}

/// Applies the read-side not-found policy: a vanished object clears the tracked id.
pub(crate) fn clear_if_gone(
	resource: &'static str,
	data: &mut ResourceData,
	error: Error,
) -> Result<()> {
	if error.is_not_found() {
		if let Some(id) = data.id() {
			crate::obs::log_gone(resource, id);
		}

		data.clear_id();

		Ok(())
	} else {
		Err(error)
	}
}
