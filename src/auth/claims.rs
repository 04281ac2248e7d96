//! Best-effort peek into JWT access token claims.
//!
//! The backend issues JWT access tokens, so the expiry instant can be read
//! locally to anticipate an imminent 401. This is advisory only: tokens stay
//! opaque strings everywhere else in the crate, and the 401 recovery path in
//! [`crate::client`] remains the source of truth for expiry.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, auth::secret::TokenSecret};

/// Errors produced while peeking into a JWT payload.
#[derive(Debug, ThisError)]
pub enum ClaimsError {
	/// The token is not a three-segment JWT.
	#[error("Token is not a JWT.")]
	MalformedToken,
	/// The payload segment is not valid base64url.
	#[error("Token payload is not valid base64url.")]
	PayloadEncoding(#[from] base64::DecodeError),
	/// The payload decoded but is not valid JSON.
	#[error("Token payload is not valid JSON.")]
	PayloadJson(#[from] serde_json::Error),
	/// A timestamp claim is outside the representable range.
	#[error("Token carries an out-of-range timestamp claim.")]
	TimestampOutOfRange(#[from] time::error::ComponentRange),
}

/// Registered claims extracted from an access token payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessClaims {
	/// Expiry instant (`exp`), when present.
	pub expires_at: Option<OffsetDateTime>,
	/// Issuance instant (`iat`), when present.
	pub issued_at: Option<OffsetDateTime>,
	/// Subject (`sub`), when present.
	pub subject: Option<String>,
}
impl AccessClaims {
	/// Decodes the payload segment of the provided token without verifying its signature.
	///
	/// Signature verification belongs to the backend; the client only needs the
	/// public timestamps.
	pub fn peek(token: &TokenSecret) -> Result<Self, ClaimsError> {
		let mut segments = token.expose().split('.');
		let (Some(_), Some(payload), Some(_), None) =
			(segments.next(), segments.next(), segments.next(), segments.next())
		else {
			return Err(ClaimsError::MalformedToken);
		};
		let bytes = URL_SAFE_NO_PAD.decode(payload)?;
		let raw: RawClaims = serde_json::from_slice(&bytes)?;
		let expires_at = raw.exp.map(OffsetDateTime::from_unix_timestamp).transpose()?;
		let issued_at = raw.iat.map(OffsetDateTime::from_unix_timestamp).transpose()?;

		Ok(Self { expires_at, issued_at, subject: raw.sub })
	}

	/// Returns `true` when the token is expired at the provided instant.
	///
	/// Tokens without an `exp` claim are never considered expired locally.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expiry| instant >= expiry)
	}

	/// Returns `true` when the token expires within `window` of the provided instant.
	pub fn expires_within(&self, window: Duration, now: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expiry| expiry - now <= window)
	}
}

#[derive(Deserialize)]
struct RawClaims {
	#[serde(default)]
	exp: Option<i64>,
	#[serde(default)]
	iat: Option<i64>,
	#[serde(default)]
	sub: Option<String>,
}
