//! Credential primitives: redacted secrets, credential pairs, and JWT claim peeking.

pub mod claims;
pub mod credentials;
pub mod secret;

pub use claims::*;
pub use credentials::*;
pub use secret::*;
