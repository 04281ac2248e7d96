//! Walks through the 401 recovery contract: an expired access token is rotated through the
//! refresh endpoint exactly once and the original request is transparently re-issued. The
//! session hook only fires when the refresh token itself stops working.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use fixlink_client::{
	auth::TokenSecret,
	client::ApiClient,
	session::FnSessionHook,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/client/").header("authorization", "Bearer stale");
			then.status(401);
		})
		.await;
	let _refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"rotated\"}");
		})
		.await;
	let _retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/client/").header("authorization", "Bearer rotated");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"book_id\":1,\"status\":\"confirmed\"}]");
		})
		.await;
	let store_backend = Arc::new(MemoryStore::default());

	store_backend.seed_access(TokenSecret::new("stale"));
	store_backend.seed_refresh(TokenSecret::new("still-valid"));

	let store: Arc<dyn CredentialStore> = store_backend.clone();
	let base = Url::parse(&server.url("/api"))?;
	let client = ApiClient::new(store, base).with_session_hook(Arc::new(FnSessionHook::new(
		|error| println!("Session expired, navigate to the login page: {error}."),
	)));
	let bookings = client.client_bookings().await?;

	println!("Recovered transparently; {} booking(s) fetched.", bookings.len());
	println!(
		"Refresh calls: {} attempt(s), {} success(es).",
		client.refresh_metrics.attempts(),
		client.refresh_metrics.successes()
	);

	let access = store_backend
		.access_token()
		.await?
		.expect("Rotated access token should be in the store.");

	println!("Store now holds the rotated token (fingerprint {}).", access.fingerprint());

	Ok(())
}
