//! `keycloak_protocol_mapper` resource.

// self
use crate::{
	_prelude::*,
	admin::{KeycloakClient, ProtocolMapper},
	config::DEFAULT_REALM,
	provider::{
		Attribute, ResourceData, Schema,
		resource::{self, Resource, ResourceFuture},
	},
};

const NAME: &str = "keycloak_protocol_mapper";
const IMPORT_SHAPE: &str = "${realm}.${client_id}.${resource_id}";

/// Manages protocol mappers of one client.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProtocolMapperResource;
impl Resource for ProtocolMapperResource {
	fn name(&self) -> &'static str {
		NAME
	}

	fn schema(&self) -> Schema {
		Schema::new()
			.attribute("realm", Attribute::string().default_value(DEFAULT_REALM))
			.attribute(
				"client_id",
				Attribute::string().required().describe("Server id of the owning client."),
			)
			.attribute("name", Attribute::string().required().force_new())
			.attribute("protocol", Attribute::string())
			.attribute("protocol_mapper", Attribute::string())
			.attribute("consent_required", Attribute::bool())
			.attribute("consent_text", Attribute::string())
			.attribute("config", Attribute::map())
	}

	fn read<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let mapper = client
				.get_protocol_mapper(
					data.get_str("realm")?,
					data.get_str("client_id")?,
					data.require_id()?,
				)
				.await;

			match mapper {
				Ok(mapper) => {
					write_mapper(&mapper, data);

					Ok(())
				},
				Err(e) => resource::clear_if_gone(NAME, data, e),
			}
		})
	}

	fn create<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let created = client
				.create_protocol_mapper(
					data.get_str("realm")?,
					data.require_str("client_id")?,
					&mapper_from_data(data)?,
				)
				.await?;

			data.set_id(created.id.as_str());
			write_mapper(&created, data);

			Ok(())
		})
	}

	fn update<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			client
				.update_protocol_mapper(
					data.get_str("realm")?,
					data.require_str("client_id")?,
					&mapper_from_data(data)?,
				)
				.await
		})
	}

	fn delete<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			client
				.delete_protocol_mapper(
					data.get_str("realm")?,
					data.require_str("client_id")?,
					data.require_id()?,
				)
				.await
		})
	}

	fn import<'a>(
		&'a self,
		client: &'a KeycloakClient,
		data: &'a mut ResourceData,
	) -> ResourceFuture<'a, ()> {
		Box::pin(async move {
			let raw = data.require_id()?.to_owned();
			let [realm, client_id, id] = resource::split_import_id::<3>(&raw, IMPORT_SHAPE)?;

			data.set("realm", realm);
			data.set("client_id", client_id);
			data.set_id(id);

			self.read(client, data).await
		})
	}
}

fn mapper_from_data(data: &ResourceData) -> Result<ProtocolMapper> {
	Ok(ProtocolMapper {
		id: data.id().unwrap_or_default().to_owned(),
		name: data.get_str("name")?.to_owned(),
		protocol: data.get_str("protocol")?.to_owned(),
		protocol_mapper: data.get_str("protocol_mapper")?.to_owned(),
		consent_required: data.get_bool("consent_required")?,
		consent_text: data.get_str("consent_text")?.to_owned(),
		config: data
			.get_str_map("config")?
			.into_iter()
			.map(|(key, value)| (key, Value::String(value)))
			.collect(),
	})
}

fn write_mapper(mapper: &ProtocolMapper, data: &mut ResourceData) {
	data.set("name", mapper.name.as_str());
	data.set("protocol", mapper.protocol.as_str());
	data.set("protocol_mapper", mapper.protocol_mapper.as_str());
	data.set("consent_required", mapper.consent_required);
	data.set("consent_text", mapper.consent_text.as_str());
	data.set(
		"config",
		mapper
			.config
			.iter()
			.map(|(key, value)| {
				let value = value.as_str().map_or_else(|| value.to_string(), str::to_owned);

				(key.clone(), Value::String(value))
			})
			.collect::<serde_json::Map<_, _>>(),
	);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn state_maps_to_payload() {
		let data = ResourceData::with_id("m-1")
			.with("name", "email")
			.with("protocol", "openid-connect")
			.with("protocol_mapper", "oidc-usermodel-property-mapper")
			.with(
				"config",
				serde_json::json!({ "claim.name": "email", "user.attribute": "email" }),
			);
		let mapper = mapper_from_data(&data).expect("Mapper state should convert.");

		assert_eq!(mapper.id, "m-1");
		assert_eq!(mapper.config["claim.name"], "email");
		assert!(!mapper.consent_required);
	}
}
