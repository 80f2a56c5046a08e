//! Admin credentials, redacted secrets, and the authenticated session.

pub mod secret;
pub mod session;

pub use secret::*;
pub use session::*;
