//! Provider-level error types shared by the transport, admin clients, and resource adapters.

// self
use crate::{_prelude::*, admin::Client};

/// Provider-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provider error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Keycloak answered with a non-2xx status.
	#[error("{method} {url} returned HTTP {status}: {body}")]
	HttpStatus {
		/// HTTP method of the failed call.
		method: &'static str,
		/// Target URL of the failed call.
		url: String,
		/// Status code returned by Keycloak.
		status: u16,
		/// Response body text, possibly empty.
		body: String,
	},
	/// Response body could not be decoded as the expected JSON shape.
	#[error("Response from {url} is not valid JSON at `{path}`.")]
	Decode {
		/// URL whose response failed to decode.
		url: String,
		/// JSON path of the offending value.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// The token endpoint rejected the client credentials.
	#[error("Keycloak login failed: {body} ({}).", status_label(.status))]
	Authentication {
		/// HTTP status code, when a response was received.
		status: Option<u16>,
		/// Raw response body from the token endpoint.
		body: String,
	},
	/// An exact-name search found nothing, or a tracked resource is gone.
	#[error("Exact match search failed to find {kind} `{name}`.")]
	NotFound {
		/// Kind of entity searched for (user, group, role mapping).
		kind: &'static str,
		/// Name or identifier that was searched for.
		name: String,
	},
	/// A role mapping names zero or several principals, or is otherwise malformed.
	#[error("Invalid role mapping: {reason}.")]
	Validation {
		/// Human-readable reason.
		reason: String,
	},
	/// A created-resource location could not be re-encoded.
	#[error("Cannot re-encode location `{location}`: {reason}.")]
	Encoding {
		/// Location header value returned by Keycloak.
		location: String,
		/// Human-readable reason.
		reason: String,
	},
	/// A creation response carried no `Location` header.
	#[error("POST {url} returned no Location header.")]
	MissingLocation {
		/// URL that was posted to.
		url: String,
	},
	/// The client was created but its default protocol mappers could not be removed.
	#[error("Client `{}` was created but its default protocol mappers could not be removed.", client.client_id)]
	ClientMapperCleanup {
		/// The created client; callers keep its id for remediation.
		client: Box<Client>,
		/// Failure raised while listing or deleting mappers.
		#[source]
		source: Box<Error>,
	},
	/// An import identifier does not follow the expected dotted shape.
	#[error("Import ID `{id}` must be specified as '{expected}'.")]
	InvalidImportId {
		/// Identifier supplied by the host.
		id: String,
		/// Expected shape.
		expected: &'static str,
	},
	/// A resource attribute is missing or has the wrong type.
	#[error("Attribute `{name}` is invalid: {reason}.")]
	Attribute {
		/// Attribute name.
		name: String,
		/// Human-readable reason.
		reason: String,
	},
	/// The host asked for a resource type this provider does not serve.
	#[error("Unknown resource type `{kind}`.")]
	UnknownResource {
		/// Requested resource type name.
		kind: String,
	},
	/// The resource does not support the requested lifecycle operation.
	#[error("Resource `{kind}` does not support {operation}.")]
	Unsupported {
		/// Resource type name.
		kind: &'static str,
		/// Operation label.
		operation: &'static str,
	},
}
impl Error {
	/// Returns `true` when the error means the addressed resource no longer exists.
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::NotFound { .. } => true,
			Self::HttpStatus { status, .. } => *status == 404,
			_ => false,
		}
	}

	/// Returns the HTTP status code carried by the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::HttpStatus { status, .. } => Some(*status),
			Self::Authentication { status, .. } => *status,
			_ => None,
		}
	}

	pub(crate) fn attribute(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Attribute { name: name.into(), reason: reason.into() }
	}

	pub(crate) fn validation(reason: impl Into<String>) -> Self {
		Self::Validation { reason: reason.into() }
	}
}

fn status_label(status: &Option<u16>) -> String {
	status.map_or_else(|| "no status".into(), |code| format!("HTTP {code}"))
}

/// Configuration and validation failures raised while setting up the provider.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The API base or a derived endpoint is not a valid URL.
	#[error("`{value}` is not a valid URL.")]
	InvalidUrl {
		/// Offending value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required setting was neither configured nor present in the environment.
	#[error("`{field}` must be set (or provided through `{env}`).")]
	MissingField {
		/// Setting name.
		field: &'static str,
		/// Environment variable consulted as fallback.
		env: &'static str,
	},
	/// The request timeout must be positive.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Target URL of the failed call.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling Keycloak.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		url: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}
}
