//! Host-facing provider surface: schemas, generic resource state, and lifecycle adapters.
//!
//! The host runtime owns planning, diffing and state persistence. It hands this module a
//! [`ResourceData`] per resource instance and calls the matching [`Resource`] callback.
//! [`Provider`] declares the provider block and performs the login; the resulting
//! [`ConfiguredProvider`] dispatches callbacks by resource type name, each one running inside
//! an observed `keycloak_provider.operation` span.

pub mod data;
pub mod data_source;
pub mod resource;
pub mod schema;

pub use data::*;
pub use data_source::*;
pub use resource::*;
pub use schema::*;

// self
use crate::{
	_prelude::*,
	admin::KeycloakClient,
	config::ProviderConfig,
	obs::{self, Operation},
};

/// Entry point registered with the host runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct Provider;
impl Provider {
	/// Schema of the provider configuration block.
	pub fn schema() -> Schema {
		Schema::new()
			.attribute(
				"client_id",
				Attribute::string().describe("Admin client id; defaults to KEYCLOAK_CLIENT_ID."),
			)
			.attribute(
				"client_secret",
				Attribute::string()
					.sensitive()
					.describe("Admin client secret; defaults to KEYCLOAK_CLIENT_SECRET."),
			)
			.attribute(
				"api_base",
				Attribute::string().describe("Keycloak base URL; defaults to KEYCLOAK_API_BASE."),
			)
			.attribute(
				"realm",
				Attribute::string()
					.describe("Login realm; defaults to KEYCLOAK_REALM, then master."),
			)
	}

	/// Resource types served by the provider.
	pub fn resources() -> Vec<Arc<dyn Resource>> {
		vec![
			Arc::new(ClientResource),
			Arc::new(RoleResource),
			Arc::new(ProtocolMapperResource),
			Arc::new(RoleMappingResource),
		]
	}

	/// Data sources served by the provider.
	pub fn data_sources() -> Vec<Arc<dyn DataSource>> {
		vec![Arc::new(ClientDataSource)]
	}

	/// Builds the connection settings from the provider block and the process environment.
	pub fn config(data: &ResourceData) -> Result<ProviderConfig> {
		Self::config_with(data, |key| std::env::var(key).ok())
	}

	/// Same as [`config`](Self::config) with a custom environment lookup.
	pub fn config_with<F>(data: &ResourceData, lookup: F) -> Result<ProviderConfig>
	where
		F: Fn(&str) -> Option<String>,
	{
		Self::schema().validate(data)?;

		let field = |name: &str| -> Result<Option<String>> {
			Ok(Some(data.get_str(name)?).filter(|v| !v.is_empty()).map(str::to_owned))
		};
		let mut builder = ProviderConfig::builder();

		if let Some(value) = field("client_id")? {
			builder = builder.client_id(value);
		}
		if let Some(value) = field("client_secret")? {
			builder = builder.client_secret(value);
		}
		if let Some(value) = field("api_base")? {
			builder = builder.api_base(value);
		}
		if let Some(value) = field("realm")? {
			builder = builder.realm(value);
		}

		Ok(builder.build_with(lookup)?)
	}

	/// Logs in with the provider block settings and returns the dispatcher.
	pub async fn configure(data: ResourceData) -> Result<ConfiguredProvider> {
		let config = Self::config(&data)?;
		let client = KeycloakClient::login(&config).await?;

		Ok(ConfiguredProvider::new(client))
	}
}

/// Authenticated dispatcher returned by [`Provider::configure`].
#[derive(Clone)]
pub struct ConfiguredProvider {
	client: KeycloakClient,
	resources: BTreeMap<&'static str, Arc<dyn Resource>>,
	data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
}
impl ConfiguredProvider {
	/// Wraps an authenticated client and registers every resource and data source.
	pub fn new(client: KeycloakClient) -> Self {
		Self {
			client,
			resources: Provider::resources().into_iter().map(|r| (r.name(), r)).collect(),
			data_sources: Provider::data_sources().into_iter().map(|d| (d.name(), d)).collect(),
		}
	}

	/// Authenticated admin client shared by every callback.
	pub fn client(&self) -> &KeycloakClient {
		&self.client
	}

	/// Looks a resource type up by name.
	pub fn resource(&self, kind: &str) -> Result<Arc<dyn Resource>> {
		self.resources
			.get(kind)
			.cloned()
			.ok_or_else(|| Error::UnknownResource { kind: kind.to_owned() })
	}

	/// Looks a data source up by name.
	pub fn data_source(&self, kind: &str) -> Result<Arc<dyn DataSource>> {
		self.data_sources
			.get(kind)
			.cloned()
			.ok_or_else(|| Error::UnknownResource { kind: kind.to_owned() })
	}

	/// Refreshes a managed resource.
	pub async fn read(&self, kind: &str, data: &mut ResourceData) -> Result<()> {
		let resource = self.resource(kind)?;

		obs::observe(resource.name(), Operation::Read, resource.read(&self.client, data)).await
	}

	/// Applies schema defaults, validates, and creates a managed resource.
	pub async fn create(&self, kind: &str, data: &mut ResourceData) -> Result<()> {
		let resource = self.resource(kind)?;
		let schema = resource.schema();

		schema.apply_defaults(data);
		schema.validate(data)?;

		obs::observe(resource.name(), Operation::Create, resource.create(&self.client, data)).await
	}

	/// Validates and updates a managed resource.
	pub async fn update(&self, kind: &str, data: &mut ResourceData) -> Result<()> {
		let resource = self.resource(kind)?;
		let schema = resource.schema();

		schema.apply_defaults(data);
		schema.validate(data)?;

		obs::observe(resource.name(), Operation::Update, resource.update(&self.client, data)).await
	}

	/// Deletes a managed resource.
	pub async fn delete(&self, kind: &str, data: &mut ResourceData) -> Result<()> {
		let resource = self.resource(kind)?;

		obs::observe(resource.name(), Operation::Delete, resource.delete(&self.client, data)).await
	}

	/// Imports an existing object under the import id held in `data`.
	pub async fn import(&self, kind: &str, data: &mut ResourceData) -> Result<()> {
		let resource = self.resource(kind)?;

		obs::observe(resource.name(), Operation::Import, resource.import(&self.client, data)).await
	}

	/// Resolves a data source.
	pub async fn read_data_source(&self, kind: &str, data: &mut ResourceData) -> Result<()> {
		let source = self.data_source(kind)?;
		let schema = source.schema();

		schema.apply_defaults(data);
		schema.validate(data)?;

		obs::observe(source.name(), Operation::Read, source.read(&self.client, data)).await
	}
}
impl Debug for ConfiguredProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConfiguredProvider")
			.field("client", &self.client)
			.field("resources", &self.resources.keys().collect::<Vec<_>>())
			.field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
			.finish()
	}
}
