//! Attribute schemas declared to the host runtime.

// self
use crate::{_prelude::*, provider::ResourceData};

/// Value shape of a schema attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
	/// UTF-8 string.
	String,
	/// Boolean flag.
	Bool,
	/// List of strings.
	List,
	/// String-keyed map of strings.
	Map,
}
impl AttributeKind {
	/// Returns `true` when `value` has this shape; `null` always matches.
	pub fn accepts(self, value: &Value) -> bool {
		match (self, value) {
			(_, Value::Null) => true,
			(Self::String, Value::String(_)) | (Self::Bool, Value::Bool(_)) => true,
			(Self::List, Value::Array(items)) => items.iter().all(Value::is_string),
			(Self::Map, Value::Object(entries)) => entries.values().all(Value::is_string),
			_ => false,
		}
	}

	const fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Bool => "bool",
			Self::List => "list of strings",
			Self::Map => "map of strings",
		}
	}
}

/// One declared attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
	/// Value shape.
	pub kind: AttributeKind,
	/// The host must supply a value.
	pub required: bool,
	/// The host may supply a value.
	pub optional: bool,
	/// The provider fills the value in.
	pub computed: bool,
	/// The value must be hidden from plans and logs.
	pub sensitive: bool,
	/// Changing the value replaces the resource.
	pub force_new: bool,
	/// Value applied when the host supplies none.
	pub default: Option<Value>,
	/// Attributes that must not be set together with this one.
	pub conflicts_with: Vec<&'static str>,
	/// Human-readable description.
	pub description: &'static str,
}
impl Attribute {
	/// Starts an optional attribute of `kind`.
	pub fn new(kind: AttributeKind) -> Self {
		Self {
			kind,
			required: false,
			optional: true,
			computed: false,
			sensitive: false,
			force_new: false,
			default: None,
			conflicts_with: Vec::new(),
			description: "",
		}
	}

	/// Shorthand for a string attribute.
	pub fn string() -> Self {
		Self::new(AttributeKind::String)
	}

	/// Shorthand for a boolean attribute.
	pub fn bool() -> Self {
		Self::new(AttributeKind::Bool)
	}

	/// Shorthand for a list-of-strings attribute.
	pub fn list() -> Self {
		Self::new(AttributeKind::List)
	}

	/// Shorthand for a map-of-strings attribute.
	pub fn map() -> Self {
		Self::new(AttributeKind::Map)
	}

	/// Marks the attribute as required.
	pub fn required(mut self) -> Self {
		self.required = true;
		self.optional = false;

		self
	}

	/// Marks the attribute as provider-filled. Computed attributes stay optional.
	pub fn computed(mut self) -> Self {
		self.computed = true;

		self
	}

	/// Marks the attribute as provider-filled only; the host may not set it.
	pub fn computed_only(mut self) -> Self {
		self.computed = true;
		self.optional = false;

		self
	}

	/// Marks the value as sensitive.
	pub fn sensitive(mut self) -> Self {
		self.sensitive = true;

		self
	}

	/// Changing the attribute forces replacement.
	pub fn force_new(mut self) -> Self {
		self.force_new = true;

		self
	}

	/// Sets the default value.
	pub fn default_value(mut self, value: impl Into<Value>) -> Self {
		self.default = Some(value.into());

		self
	}

	/// Declares attributes this one conflicts with.
	pub fn conflicts_with(mut self, names: &[&'static str]) -> Self {
		self.conflicts_with.extend_from_slice(names);

		self
	}

	/// Sets the description.
	pub fn describe(mut self, description: &'static str) -> Self {
		self.description = description;

		self
	}
}

/// Attribute set of a resource, data source, or the provider block itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
	/// Declared attributes keyed by name.
	pub attributes: BTreeMap<&'static str, Attribute>,
}
impl Schema {
	/// Creates an empty schema.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an attribute.
	pub fn attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
		self.attributes.insert(name, attribute);

		self
	}

	/// Looks an attribute up by name.
	pub fn get(&self, name: &str) -> Option<&Attribute> {
		self.attributes.get(name)
	}

	/// Fills unset attributes from their declared defaults.
	pub fn apply_defaults(&self, data: &mut ResourceData) {
		for (name, attribute) in &self.attributes {
			if let Some(default) = &attribute.default
				&& !data.is_set(name)
			{
				data.set(*name, default.clone());
			}
		}
	}

	/// Checks required attributes, value shapes, conflicts, and undeclared names.
	pub fn validate(&self, data: &ResourceData) -> Result<()> {
		for (name, value) in data.attributes() {
			let Some(attribute) = self.attributes.get(name.as_str()) else {
				return Err(Error::attribute(name.as_str(), "attribute is not declared"));
			};

			if !attribute.kind.accepts(value) {
				return Err(Error::attribute(
					name.as_str(),
					format!("expected a {}", attribute.kind.as_str()),
				));
			}
		}
		for (name, attribute) in &self.attributes {
			if attribute.required && !data.is_set(name) {
				return Err(Error::attribute(*name, "attribute is required"));
			}
			if data.is_set(name)
				&& let Some(other) =
					attribute.conflicts_with.iter().find(|other| data.is_set(other))
			{
				return Err(Error::attribute(*name, format!("conflicts with `{other}`")));
			}
		}

		Ok(())
	}
}
