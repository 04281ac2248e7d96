//! Silent access-token refresh with a shared singleflight guard.
//!
//! The client exposes [`ApiClient::refresh_access_token`] and wires the same
//! path into 401 recovery. Each refresh acquires the client-wide guard,
//! re-reads the store to detect a rotation performed by a concurrent caller,
//! and only then performs the unauthenticated `POST {"refresh": ...}` call.
//! Any refresh failure tears the session down: both tokens are purged, the
//! session hook fires, and the caller receives
//! [`Error::SessionExpired`](crate::error::Error::SessionExpired) wrapping the
//! underlying failure.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::ApiClient,
	error::{ApiError, ConfigError},
	http::{ApiRequest, ApiResponse, HttpMethod},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

#[derive(Serialize)]
struct RefreshGrant<'a> {
	refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshedAccess {
	access: String,
}

impl ApiClient {
	/// Re-issues a 401-failed request exactly once after refreshing the access token.
	///
	/// `stale` is the bearer the failed request carried; the refresh path uses
	/// it to detect rotations that happened while this request was in flight.
	pub(crate) async fn retry_after_refresh(
		&self,
		mut request: ApiRequest,
		stale: Option<TokenSecret>,
	) -> Result<ApiResponse> {
		request.retried = true;

		let fresh = self.refresh_with_stale(stale.as_ref()).await?;

		request.bearer = Some(fresh);

		let response = self.transport.send(request).await?;

		// A second 401 lands here as a plain API error; the retried flag
		// guarantees no further recovery is attempted.
		Self::classify(response)
	}

	/// Forces a silent refresh and returns the resulting access token.
	///
	/// Concurrent callers serialize on the client-wide guard; whoever enters
	/// second reuses the rotation performed by the first instead of issuing a
	/// redundant refresh call.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		let current = self.store.access_token().await?;

		self.refresh_with_stale(current.as_ref()).await
	}

	async fn refresh_with_stale(&self, stale: Option<&TokenSecret>) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.refresh_metrics.record_attempt();

				let _singleflight = self.refresh_guard().lock().await;

				// Re-read after acquiring the guard: a concurrent 401 may have
				// already rotated the token while this caller was waiting.
				let current = self.store.access_token().await.map_err(|err| {
					self.refresh_metrics.record_failure();
					Error::from(err)
				})?;

				if let Some(current) = current
					&& stale.is_none_or(|seen| seen != &current)
				{
					self.refresh_metrics.record_success();

					return Ok(current);
				}

				let Some(refresh) = self.store.refresh_token().await.map_err(|err| {
					self.refresh_metrics.record_failure();
					Error::from(err)
				})?
				else {
					return Err(self.teardown(ConfigError::MissingRefreshToken.into()).await);
				};
				let request = ApiRequest::new(
					HttpMethod::Post,
					self.endpoint(self.refresh_path()).inspect_err(|_| {
						self.refresh_metrics.record_failure();
					})?,
				)
				.json(&RefreshGrant { refresh: refresh.expose() })
				.inspect_err(|_| {
					self.refresh_metrics.record_failure();
				})?;
				let response = match self.transport.send(request).await {
					Ok(response) => response,
					Err(err) => return Err(self.teardown(err).await),
				};

				if !response.is_success() {
					let rejection =
						ApiError { status: response.status, body: response.body }.into();

					return Err(self.teardown(rejection).await);
				}

				let grant: RefreshedAccess = match response.json() {
					Ok(grant) => grant,
					Err(err) => return Err(self.teardown(err).await),
				};
				let fresh = TokenSecret::new(grant.access);

				self.store.replace_access(fresh.clone()).await.map_err(|err| {
					self.refresh_metrics.record_failure();
					Error::from(err)
				})?;
				self.refresh_metrics.record_success();

				Ok(fresh)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Purges both tokens, notifies the session hook, and produces the
	/// terminal session-expired error.
	///
	/// The hook fires only when the store still held credentials, so a
	/// teardown racing a concurrent one signals the application exactly once.
	async fn teardown(&self, cause: Error) -> Error {
		self.refresh_metrics.record_failure();

		let error = Error::session_expired(cause);

		// A broken store cannot confirm the purge; still signal expiry rather
		// than let the application believe the session is alive.
		if self.store.clear().await.unwrap_or(true) {
			self.session_hook().on_session_expired(&error);
		}

		error
	}
}
