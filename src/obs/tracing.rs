// self
use crate::{_prelude::*, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type Instrumented<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type Instrumented<F> = F;

/// A span builder used by lifecycle callbacks and admin calls.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a span tagged with the resource type + lifecycle operation.
	pub fn new(resource: &'static str, operation: Operation) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"keycloak_provider.operation",
				resource,
				operation = operation.as_str()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (resource, operation);

			Self {}
		}
	}

	/// Creates a span for a single admin API request.
	pub fn request(method: &'static str, url: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("keycloak_provider.admin", method, url);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, url);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs the status Keycloak answered an admin request with.
pub fn log_status(method: &'static str, url: &str, status: u16) {
	#[cfg(feature = "tracing")]
	{
		if (200..300).contains(&status) {
			tracing::debug!(method, url, status, "admin request completed");
		} else {
			tracing::warn!(method, url, status, "admin request rejected");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, url, status);
	}
}

/// Logs a lifecycle failure before it is returned to the host.
pub fn log_failure(resource: &'static str, operation: Operation, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(resource, operation = operation.as_str(), %error, "operation failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (resource, operation, error);
	}
}

/// Logs that a tracked resource disappeared and will be recreated.
pub fn log_gone(resource: &'static str, id: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(resource, id, "resource no longer exists, clearing id");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (resource, id);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new("keycloak_client", Operation::Read);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[tokio::test]
	async fn request_span_passes_output_through() {
		let span = OperationSpan::request("GET", "https://kc/auth/admin/realms/test/clients");
		let value = span.instrument(async { "done" }).await;

		assert_eq!(value, "done");
	}
}
