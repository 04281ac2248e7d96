#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use fixlink_client::{
	_preludet::*,
	auth::TokenSecret,
	http::{ApiResponse, HttpMethod},
	store::{CredentialStore, MemoryStore},
};

async fn seed_pair(store: &MemoryStore, access: &str, refresh: &str) {
	store.seed_access(TokenSecret::new(access));
	store.seed_refresh(TokenSecret::new(refresh));
}

#[tokio::test]
async fn expired_access_token_is_refreshed_and_request_retried_once() {
	let server = MockServer::start_async().await;
	let base = Url::parse(&server.url("/api")).expect("Mock base URL should parse.");
	let (client, store, hook) = build_test_client(base);

	seed_pair(&store, "A1", "R1").await;

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/client/").header("authorization", "Bearer A1");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"token expired\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/token/refresh/")
				.json_body(json!({"refresh": "R1"}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"A2\"}");
		})
		.await;
	let retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/client/").header("authorization", "Bearer A2");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"book_id\":1,\"status\":\"pending\"}]");
		})
		.await;
	let request = client
		.request(HttpMethod::Get, "/book/client/")
		.expect("Request path should resolve against the mock base.");
	let response: ApiResponse =
		client.execute(request).await.expect("Recovered request should succeed transparently.");

	assert!(response.is_success());

	rejected.assert_async().await;
	refresh.assert_async().await;
	retried.assert_async().await;

	// The rotated access token is persisted; the refresh token is untouched.
	let access = store
		.access_token()
		.await
		.expect("Access token read should succeed.")
		.expect("Rotated access token should be present.");
	let refresh_token = store
		.refresh_token()
		.await
		.expect("Refresh token read should succeed.")
		.expect("Refresh token should remain present.");

	assert_eq!(access.expose(), "A2");
	assert_eq!(refresh_token.expose(), "R1");
	assert_eq!(hook.fired(), 0);
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.successes(), 1);
}

#[tokio::test]
async fn rotated_token_is_used_by_subsequent_requests() {
	let server = MockServer::start_async().await;
	let base = Url::parse(&server.url("/api")).expect("Mock base URL should parse.");
	let (client, store, _hook) = build_test_client(base);

	seed_pair(&store, "A1", "R1").await;

	let _rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/user/profile/").header("authorization", "Bearer A1");
			then.status(401);
		})
		.await;
	let _refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"A2\"}");
		})
		.await;
	let _retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/user/profile/").header("authorization", "Bearer A2");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"email\":\"u@x.test\"}");
		})
		.await;
	let follow_up = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/client/").header("authorization", "Bearer A2");
			then.status(200)
				.header("content-type", "application/json")
				.body("[]");
		})
		.await;
	let first = client
		.request(HttpMethod::Get, "/user/profile/")
		.expect("Request path should resolve against the mock base.");

	client.execute(first).await.expect("Recovered request should succeed.");

	let second = client
		.request(HttpMethod::Get, "/book/client/")
		.expect("Request path should resolve against the mock base.");

	client.execute(second).await.expect("Follow-up request should reuse the rotated token.");

	follow_up.assert_async().await;
}

#[tokio::test]
async fn second_401_on_the_retried_request_does_not_refresh_again() {
	let server = MockServer::start_async().await;
	let base = Url::parse(&server.url("/api")).expect("Mock base URL should parse.");
	let (client, store, hook) = build_test_client(base);

	seed_pair(&store, "A1", "R1").await;

	let always_rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/employee/");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"still unauthorized\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"A2\"}");
		})
		.await;
	let request = client
		.request(HttpMethod::Get, "/book/employee/")
		.expect("Request path should resolve against the mock base.");
	let err = client
		.execute(request)
		.await
		.expect_err("A 401 on the retried request must terminate as a plain API error.");

	assert!(matches!(err, Error::Api(ref rejection) if rejection.is_unauthorized()));

	// One original call, one retry, exactly one refresh in between.
	always_rejected.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	// The successful refresh keeps the rotated pair; termination does not
	// tear the session down.
	let access = store
		.access_token()
		.await
		.expect("Access token read should succeed.")
		.expect("Rotated access token should be present.");

	assert_eq!(access.expose(), "A2");
	assert_eq!(hook.fired(), 0);
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh_call() {
	let server = MockServer::start_async().await;
	let base = Url::parse(&server.url("/api")).expect("Mock base URL should parse.");
	let (client, store, _hook) = build_test_client(base);

	seed_pair(&store, "A1", "R1").await;

	let _rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/client/").header("authorization", "Bearer A1");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"A2\"}");
		})
		.await;
	let _retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/book/client/").header("authorization", "Bearer A2");
			then.status(200)
				.header("content-type", "application/json")
				.body("[]");
		})
		.await;
	let first = client
		.request(HttpMethod::Get, "/book/client/")
		.expect("Request path should resolve against the mock base.");
	let second = first.clone();
	let (outcome_a, outcome_b) = tokio::join!(client.execute(first), client.execute(second));

	outcome_a.expect("First concurrent request should recover.");
	outcome_b.expect("Second concurrent request should recover.");

	refresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn forced_refresh_rotates_the_stored_token() {
	let server = MockServer::start_async().await;
	let base = Url::parse(&server.url("/api")).expect("Mock base URL should parse.");
	let (client, store, _hook) = build_test_client(base);

	seed_pair(&store, "A1", "R1").await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/token/refresh/")
				.json_body(json!({"refresh": "R1"}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"A2\"}");
		})
		.await;
	let rotated =
		client.refresh_access_token().await.expect("Forced refresh should succeed.");

	assert_eq!(rotated.expose(), "A2");

	refresh.assert_async().await;

	let access = store
		.access_token()
		.await
		.expect("Access token read should succeed.")
		.expect("Rotated access token should be present.");

	assert_eq!(access.expose(), "A2");
}
