//! Demonstrates the happy path end to end with the default reqwest transport: log in,
//! list nearby tradespeople, and place a booking against a mock backend.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use fixlink_client::{
	api::{BookingRequest, LoginRequest},
	client::ApiClient,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login/");
			then.status(200).header("content-type", "application/json").body(
				"{\"access\":\"demo-access\",\"refresh\":\"demo-refresh\",\"user\":{\"id\":1,\"email\":\"demo@fixlink.test\",\"role\":\"client\"}}",
			);
		})
		.await;
	let _nearby = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/book/nearby/")
				.header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"[{\"id\":42,\"name\":\"Ravi\",\"job\":\"electrician\",\"place\":\"Kochi\"}]",
			);
		})
		.await;
	let _create = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/book/create/");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"book_id\":7,\"status\":\"pending\",\"job\":\"Rewire the kitchen\"}");
		})
		.await;
	let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
	let base = Url::parse(&server.url("/api"))?;
	let client = ApiClient::new(store, base);
	let user = client
		.login(&LoginRequest { email: "demo@fixlink.test".into(), password: "demo".into() })
		.await?;

	println!("Logged in as {}.", user.email);

	let nearby = client.nearby_employees().await?;

	println!("{} tradespeople nearby; booking {}.", nearby.len(), nearby[0].name);

	let booking = client
		.create_booking(&BookingRequest {
			employee: nearby[0].id,
			booking_date: "2026-08-20".into(),
			job: "Rewire the kitchen".into(),
		})
		.await?;

	println!("Booking #{} is {}.", booking.book_id, booking.status);

	Ok(())
}
