//! Optional observability helpers for admin calls and provider lifecycle callbacks.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit spans named `keycloak_provider.operation` with the
//!   `resource` and `operation` fields, and `keycloak_provider.admin` spans with the `method`
//!   and `url` fields around every admin API call.
//! - Enable `metrics` to increment the `keycloak_provider_operation_total` counter for every
//!   attempt/success/failure, labeled by `resource`, `operation`, and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Lifecycle operations observed by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Client-credentials login.
	Login,
	/// Resource or data source read.
	Read,
	/// Resource creation.
	Create,
	/// Resource update.
	Update,
	/// Resource deletion.
	Delete,
	/// Resource import.
	Import,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Login => "login",
			Operation::Read => "read",
			Operation::Create => "create",
			Operation::Update => "update",
			Operation::Delete => "delete",
			Operation::Import => "import",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a lifecycle callback.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the host.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records its outcome.
pub(crate) async fn observe<T, Fut>(
	resource: &'static str,
	operation: Operation,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(resource, operation);

	record_operation_outcome(resource, operation, Outcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_operation_outcome(resource, operation, Outcome::Success),
		Err(e) => {
			record_operation_outcome(resource, operation, Outcome::Failure);
			log_failure(resource, operation, e);
		},
	}

	result
}
