//! Registration, OTP verification, and login/logout flows.
//!
//! Login is the only wrapper with a side effect: a successful response hands
//! its `{access, refresh}` pair to the credential store before the user
//! payload is returned. Logout is purely client-side, mirroring the hosted
//! web client: it destroys the stored pair and never contacts the backend.

// self
use crate::{
	_prelude::*,
	api::StatusMessage,
	auth::{CredentialPair, TokenSecret},
	client::ApiClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Credentials submitted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Registration payload for the sign-up endpoint.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
	/// Display name.
	pub name: String,
	/// Account email; the OTP challenge is delivered here.
	pub email: String,
	/// Account password.
	pub password: String,
	/// Requested role label (`client` or `employee`).
	pub role: RoleLabel,
	/// Optional contact number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
}
impl Debug for RegisterRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterRequest")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("role", &self.role)
			.field("phone", &self.phone)
			.finish()
	}
}

/// Backend-owned account role label.
///
/// The backend defines the vocabulary (`client`, `employee`, `admin`); the
/// wrapper keeps unknown labels intact instead of failing to decode.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleLabel(String);
impl RoleLabel {
	/// Well-known label for booking customers.
	pub const CLIENT: &'static str = "client";
	/// Well-known label for tradespeople.
	pub const EMPLOYEE: &'static str = "employee";
	/// Well-known label for the analytics dashboard account.
	pub const ADMIN: &'static str = "admin";

	/// Wraps a raw label.
	pub fn new(label: impl Into<String>) -> Self {
		Self(label.into())
	}

	/// Returns the raw label.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Case-insensitive label comparison.
	pub fn is(&self, label: &str) -> bool {
		self.0.eq_ignore_ascii_case(label)
	}
}
impl Display for RoleLabel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<&str> for RoleLabel {
	fn from(label: &str) -> Self {
		Self::new(label)
	}
}

/// Account payload returned by login and registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserAccount {
	/// Backend identifier, absent on some registration responses.
	#[serde(default)]
	pub id: Option<u64>,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Account email.
	pub email: String,
	/// Role label driving dashboard routing.
	#[serde(default)]
	pub role: Option<RoleLabel>,
}

#[derive(Deserialize)]
struct LoginGrant {
	access: TokenSecret,
	refresh: TokenSecret,
	user: UserAccount,
}

#[derive(Serialize)]
struct OtpSubmission<'a> {
	email: &'a str,
	otp: &'a str,
}

#[derive(Serialize)]
struct OtpResend<'a> {
	email: &'a str,
}

impl ApiClient {
	/// Authenticates and persists the issued credential pair.
	///
	/// On success both tokens land in the credential store atomically, so the
	/// next authenticated call already carries the fresh bearer.
	pub async fn login(&self, request: &LoginRequest) -> Result<UserAccount> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let grant: LoginGrant = self.post_json("/auth/login/", request).await?;

				self.store
					.store_pair(CredentialPair::new(grant.access, grant.refresh))
					.await
					.map_err(Error::from)?;

				Ok(grant.user)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Creates an account; the backend responds with the pending user payload
	/// and emails an OTP challenge.
	pub async fn register(&self, request: &RegisterRequest) -> Result<UserAccount> {
		self.post_json("/auth/register/", request).await
	}

	/// Submits the emailed OTP to activate a pending account.
	pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<StatusMessage> {
		self.post_json("/auth/verify-otp/", &OtpSubmission { email, otp }).await
	}

	/// Requests a fresh OTP for a pending account.
	pub async fn resend_otp(&self, email: &str) -> Result<StatusMessage> {
		self.post_json("/auth/resend-otp/", &OtpResend { email }).await
	}

	/// Destroys the stored credential pair.
	///
	/// Returns `true` when credentials were present. No backend call is made;
	/// the refresh token simply stops being used and expires server-side.
	pub async fn logout(&self) -> Result<bool> {
		self.store.clear().await.map_err(Error::from)
	}
}
