//! Storage contracts and built-in store implementations for client credentials.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
};

/// Persistence contract future for credential stores.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by credential stores.
///
/// The two slots deliberately mirror the browser-storage keys the hosted web
/// client uses (`accessToken`, `refreshToken`): either may be present without
/// the other. Each operation is atomic with respect to the others, which is
/// what lets the refresh path read-modify-write safely on multi-threaded
/// runtimes.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the current access token, if present.
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Fetches the current refresh token, if present.
	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Persists a fresh pair, replacing both slots (login path).
	fn store_pair(&self, pair: CredentialPair) -> StoreFuture<'_, ()>;

	/// Replaces the access slot only, leaving the refresh token untouched
	/// (silent-refresh path).
	fn replace_access(&self, access: TokenSecret) -> StoreFuture<'_, ()>;

	/// Destroys both slots (logout or refresh failure path).
	///
	/// Returns `true` when at least one token was present, so callers can
	/// distinguish a real teardown from a redundant one.
	fn clear(&self) -> StoreFuture<'_, bool>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk unreachable".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Store(_)));
		assert!(client_error.to_string().contains("disk unreachable"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
