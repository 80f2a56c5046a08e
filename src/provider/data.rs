//! Generic key/value resource state exchanged with the host runtime.

// self
use crate::_prelude::*;

/// Tracked id plus attribute values of one resource instance.
///
/// Absent, `null`, empty-string, empty-list and empty-map values all count as unset, matching
/// how the host represents optional attributes it has no value for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceData {
	id: Option<String>,
	attributes: BTreeMap<String, Value>,
}
impl ResourceData {
	/// Creates empty state with no id.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates state tracking `id`, as the host does before `read` or `import`.
	pub fn with_id(id: impl Into<String>) -> Self {
		Self { id: Some(id.into()), ..Self::default() }
	}

	/// Builder-style [`set`](Self::set).
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(name, value);

		self
	}

	/// Tracked id, if the resource exists.
	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	/// Tracked id, or an error naming the missing attribute.
	pub fn require_id(&self) -> Result<&str> {
		self.id().ok_or_else(|| Error::attribute("id", "resource has no tracked id"))
	}

	/// Starts tracking `id`.
	pub fn set_id(&mut self, id: impl Into<String>) {
		self.id = Some(id.into());
	}

	/// Stops tracking the resource; the host will plan a re-creation.
	pub fn clear_id(&mut self) {
		self.id = None;
	}

	/// Returns `true` when no id is tracked.
	pub fn is_new_resource(&self) -> bool {
		self.id.is_none()
	}

	/// Raw attribute values.
	pub fn attributes(&self) -> &BTreeMap<String, Value> {
		&self.attributes
	}

	/// Raw value of `name`.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Returns `true` when `name` holds a non-empty value.
	pub fn is_set(&self, name: &str) -> bool {
		match self.attributes.get(name) {
			None | Some(Value::Null) => false,
			Some(Value::String(s)) => !s.is_empty(),
			Some(Value::Array(items)) => !items.is_empty(),
			Some(Value::Object(entries)) => !entries.is_empty(),
			Some(_) => true,
		}
	}

	/// Stores `value` under `name`.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.attributes.insert(name.into(), value.into());
	}

	/// String value of `name`; empty when unset.
	pub fn get_str(&self, name: &str) -> Result<&str> {
		match self.attributes.get(name) {
			None | Some(Value::Null) => Ok(""),
			Some(Value::String(s)) => Ok(s),
			Some(_) => Err(Error::attribute(name, "expected a string")),
		}
	}

	/// Non-empty string value of `name`.
	pub fn require_str(&self, name: &str) -> Result<&str> {
		match self.get_str(name)? {
			"" => Err(Error::attribute(name, "attribute is required")),
			value => Ok(value),
		}
	}

	/// Boolean value of `name`; `false` when unset.
	pub fn get_bool(&self, name: &str) -> Result<bool> {
		match self.attributes.get(name) {
			None | Some(Value::Null) => Ok(false),
			Some(Value::Bool(b)) => Ok(*b),
			Some(_) => Err(Error::attribute(name, "expected a bool")),
		}
	}

	/// List-of-strings value of `name`; empty when unset.
	pub fn get_str_list(&self, name: &str) -> Result<Vec<String>> {
		match self.attributes.get(name) {
			None | Some(Value::Null) => Ok(Vec::new()),
			Some(Value::Array(items)) => items
				.iter()
				.map(|item| {
					item.as_str()
						.map(str::to_owned)
						.ok_or_else(|| Error::attribute(name, "expected a list of strings"))
				})
				.collect(),
			Some(_) => Err(Error::attribute(name, "expected a list of strings")),
		}
	}

	/// Map-of-strings value of `name`; empty when unset.
	pub fn get_str_map(&self, name: &str) -> Result<BTreeMap<String, String>> {
		match self.attributes.get(name) {
			None | Some(Value::Null) => Ok(BTreeMap::new()),
			Some(Value::Object(entries)) => entries
				.iter()
				.map(|(key, value)| {
					value
						.as_str()
						.map(|v| (key.clone(), v.to_owned()))
						.ok_or_else(|| Error::attribute(name, "expected a map of strings"))
				})
				.collect(),
			Some(_) => Err(Error::attribute(name, "expected a map of strings")),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unset_values_read_as_empty() {
		let data =
			ResourceData::new().with("realm", Value::Null).with("uris", Vec::<String>::new());

		assert_eq!(data.get_str("realm").expect("Null should read as empty."), "");
		assert!(!data.get_bool("enabled").expect("Missing should read as false."));
		assert!(data.get_str_list("uris").expect("Empty list should read.").is_empty());
		assert!(!data.is_set("realm"));
		assert!(!data.is_set("uris"));
	}

	#[test]
	fn wrong_shapes_are_rejected() {
		let data = ResourceData::new()
			.with("name", true)
			.with("uris", vec![Value::from(1)])
			.with("config", serde_json::json!({ "a": 1 }));

		assert!(matches!(data.get_str("name"), Err(Error::Attribute { .. })));
		assert!(matches!(data.get_str_list("uris"), Err(Error::Attribute { .. })));
		assert!(matches!(data.get_str_map("config"), Err(Error::Attribute { .. })));
		assert!(matches!(data.require_str("missing"), Err(Error::Attribute { .. })));
	}

	#[test]
	fn id_tracking() {
		let mut data = ResourceData::with_id("abc");

		assert!(!data.is_new_resource());
		assert_eq!(data.require_id().expect("Id should be tracked."), "abc");

		data.clear_id();

		assert!(data.is_new_resource());
		assert!(data.require_id().is_err());
	}
}
