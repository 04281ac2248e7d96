//! Async client for the Fixlink local-services marketplace API—bearer authentication,
//! single-shot transparent token refresh, and pluggable credential stores in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod session;
pub mod store;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; rides the default `reqwest`
	//! feature so `cargo test` builds the suite out of the box.

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ApiClient,
		http::ReqwestTransport,
		session::SessionHook,
		store::{CredentialStore, MemoryStore},
	};

	/// Session hook that counts expiry notifications for assertions.
	#[derive(Debug, Default)]
	pub struct RecordingSessionHook(AtomicUsize);
	impl RecordingSessionHook {
		/// Number of times the hook has fired.
		pub fn fired(&self) -> usize {
			self.0.load(Ordering::Relaxed)
		}
	}
	impl SessionHook for RecordingSessionHook {
		fn on_session_expired(&self, _: &Error) {
			self.0.fetch_add(1, Ordering::Relaxed);
		}
	}

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs an [`ApiClient`] backed by an in-memory store, the reqwest transport used
	/// across integration tests, and a recording session hook.
	pub fn build_test_client(base: Url) -> (ApiClient, Arc<MemoryStore>, Arc<RecordingSessionHook>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let hook = Arc::new(RecordingSessionHook::default());
		let client = ApiClient::with_transport(store, base, test_reqwest_transport())
			.with_session_hook(hook.clone());

		(client, store_backend, hook)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
