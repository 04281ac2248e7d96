//! The access/refresh credential pair persisted by stores.

// self
use crate::{_prelude::*, auth::secret::TokenSecret};

/// Access + refresh token pair issued at login.
///
/// The access secret is short-lived and replaced on every silent refresh; the
/// refresh secret survives until logout or an irrecoverable refresh failure
/// destroys both.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived credential attached to authenticated requests.
	pub access: TokenSecret,
	/// Longer-lived credential used solely to obtain new access tokens.
	pub refresh: TokenSecret,
	/// Instant the pair was handed to the store.
	pub issued_at: OffsetDateTime,
}
impl CredentialPair {
	/// Builds a pair stamped with the current clock.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access: access.into(), refresh: refresh.into(), issued_at: OffsetDateTime::now_utc() }
	}

	/// Overrides the issuance instant, mainly for fixtures.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}
}
impl Debug for CredentialPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialPair")
			.field("access", &"<redacted>")
			.field("refresh", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.finish()
	}
}
