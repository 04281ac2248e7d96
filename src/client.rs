//! Authenticated API client with single-shot transparent token refresh.
//!
//! [`ApiClient`] owns the credential store, the HTTP transport, and the
//! session-expiry hook so every feature surface goes through one pipeline:
//! attach the bearer credential, send, and — only for a 401 on a request that
//! has not already been retried — refresh the access token once and re-issue
//! the original request. Every other failure passes through unchanged.

pub mod refresh;

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError},
	http::{ApiRequest, ApiResponse, HttpMethod, Transport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::{NoopSessionHook, SessionHook},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Default refresh endpoint path, relative to the configured base URL.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/token/refresh/";

/// Coordinates authenticated calls against the marketplace backend.
///
/// The client owns the transport, credential store, and session hook so the
/// per-request recovery contract can be enforced in one place. Cloning is
/// cheap; clones share the store, the refresh singleflight guard, and the
/// metrics counters.
#[derive(Clone)]
pub struct ApiClient {
	/// HTTP transport used for every outbound call.
	pub transport: Arc<dyn Transport>,
	/// Credential store holding the access/refresh pair.
	pub store: Arc<dyn CredentialStore>,
	/// Shared counters for refresh flow outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	base: Url,
	refresh_path: String,
	session_hook: Arc<dyn SessionHook>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl ApiClient {
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		store: Arc<dyn CredentialStore>,
		base: Url,
		transport: impl Transport,
	) -> Self {
		Self {
			transport: Arc::new(transport),
			store,
			refresh_metrics: Default::default(),
			base: Self::normalize_base(base),
			refresh_path: DEFAULT_REFRESH_PATH.into(),
			session_hook: Arc::new(NoopSessionHook),
			refresh_guard: Default::default(),
		}
	}

	/// Overrides the refresh endpoint path (deployments differ; the original
	/// backend exposed `/refreshtoken/`).
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Registers the hook notified when credentials become irrecoverably expired.
	pub fn with_session_hook(mut self, hook: Arc<dyn SessionHook>) -> Self {
		self.session_hook = hook;

		self
	}

	/// Base URL all endpoint paths are resolved against.
	pub fn base(&self) -> &Url {
		&self.base
	}

	/// Resolves a relative endpoint path against the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidPath { path: path.into(), source })
	}

	/// Builds a request for the provided method + relative path.
	pub fn request(&self, method: HttpMethod, path: &str) -> Result<ApiRequest> {
		Ok(ApiRequest::new(method, self.endpoint(path)?))
	}

	/// Executes a request through the full authentication pipeline.
	///
	/// This is the one well-scoped function carrying the recovery contract:
	/// bearer attachment, pass-through of successes and non-401 failures, and
	/// at most one refresh-and-retry cycle per logical request.
	pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "execute");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.execute_inner(request)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn execute_inner(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		let stale = self.store.access_token().await?;

		request.bearer = stale.clone();

		let response = self.transport.send(request.clone()).await?;

		if !response.is_unauthorized() || request.retried {
			return Self::classify(response);
		}

		self.retry_after_refresh(request, stale).await
	}

	/// Splits raw responses into successes and pass-through rejections.
	pub(crate) fn classify(response: ApiResponse) -> Result<ApiResponse> {
		if response.is_success() {
			Ok(response)
		} else {
			Err(ApiError { status: response.status, body: response.body }.into())
		}
	}

	pub(crate) fn session_hook(&self) -> &dyn SessionHook {
		self.session_hook.as_ref()
	}

	pub(crate) fn refresh_guard(&self) -> &AsyncMutex<()> {
		&self.refresh_guard
	}

	pub(crate) fn refresh_path(&self) -> &str {
		&self.refresh_path
	}

	fn normalize_base(mut base: Url) -> Url {
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		base
	}

	/// Executes a GET and decodes the JSON response.
	pub async fn get_json<T>(&self, path: &str) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		self.execute(self.request(HttpMethod::Get, path)?).await?.json()
	}

	/// Executes a POST with a JSON body and decodes the JSON response.
	pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: for<'de> Deserialize<'de>,
	{
		self.execute(self.request(HttpMethod::Post, path)?.json(body)?).await?.json()
	}

	/// Executes a PUT with a JSON body and decodes the JSON response.
	pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: for<'de> Deserialize<'de>,
	{
		self.execute(self.request(HttpMethod::Put, path)?.json(body)?).await?.json()
	}

	/// Executes a PATCH with a JSON body and decodes the JSON response.
	pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: for<'de> Deserialize<'de>,
	{
		self.execute(self.request(HttpMethod::Patch, path)?.json(body)?).await?.json()
	}

	/// Executes a DELETE, discarding any response body.
	pub async fn delete(&self, path: &str) -> Result<()> {
		self.execute(self.request(HttpMethod::Delete, path)?).await?;

		Ok(())
	}

	/// Executes a POST with a multipart body and decodes the JSON response.
	pub async fn post_multipart<T>(
		&self,
		path: &str,
		parts: Vec<crate::http::FormPart>,
	) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		self.execute(self.request(HttpMethod::Post, path)?.multipart(parts)).await?.json()
	}

	/// Executes a PUT with a multipart body and decodes the JSON response.
	pub async fn put_multipart<T>(&self, path: &str, parts: Vec<crate::http::FormPart>) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		self.execute(self.request(HttpMethod::Put, path)?.multipart(parts)).await?.json()
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient {
	/// Creates a client with the crate's default reqwest transport.
	///
	/// The client provisions its own [`ReqwestTransport`] so callers do not
	/// need to pass HTTP handles explicitly. Use
	/// [`ApiClient::with_session_hook`] to let the hosting application observe
	/// forced logouts.
	pub fn new(store: Arc<dyn CredentialStore>, base: Url) -> Self {
		Self::with_transport(store, base, ReqwestTransport::default())
	}
}
impl Debug for ApiClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base", &self.base.as_str())
			.field("refresh_path", &self.refresh_path)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::MemoryStore;

	fn build_client(base: &str) -> ApiClient {
		struct DeadTransport;
		impl Transport for DeadTransport {
			fn send(&self, _: ApiRequest) -> crate::http::TransportFuture<'_> {
				Box::pin(async {
					Err(crate::error::TransportError::Network {
						source: "unused in endpoint tests".into(),
					}
					.into())
				})
			}
		}

		let base = Url::parse(base).expect("Fixture base URL should parse.");

		ApiClient::with_transport(Arc::new(MemoryStore::default()), base, DeadTransport)
	}

	#[test]
	fn endpoint_preserves_base_path_segment() {
		let client = build_client("http://127.0.0.1:8000/api");

		assert_eq!(
			client.endpoint("/book/client/").expect("Endpoint path should resolve.").as_str(),
			"http://127.0.0.1:8000/api/book/client/"
		);
	}

	#[test]
	fn endpoint_accepts_paths_without_leading_slash() {
		let client = build_client("http://127.0.0.1:8000/api/");

		assert_eq!(
			client.endpoint("auth/login/").expect("Endpoint path should resolve.").as_str(),
			"http://127.0.0.1:8000/api/auth/login/"
		);
	}

	#[test]
	fn classify_passes_2xx_and_rejects_the_rest() {
		let ok = ApiClient::classify(ApiResponse { status: 204, body: Vec::new() });
		let err = ApiClient::classify(ApiResponse { status: 500, body: b"oops".to_vec() })
			.expect_err("Non-2xx statuses should classify as API errors.");

		assert!(ok.is_ok());
		assert!(matches!(err, Error::Api(ref rejection) if rejection.status == 500));
	}
}
