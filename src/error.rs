//! Client-level error types shared across the transport, credential store, and API surface.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Store(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend rejected the request; carries the status and raw body.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Credentials are irrecoverably expired; both tokens were purged and the
	/// session hook was notified. The source is the refresh failure itself.
	#[error("Session expired; stored credentials were cleared.")]
	SessionExpired {
		/// Refresh failure that triggered the cleanup.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	/// Wraps a refresh failure into the session-expired terminal error.
	pub(crate) fn session_expired(source: Error) -> Self {
		Self::SessionExpired { source: Box::new(source) }
	}

	/// Returns the HTTP status carried by this error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api(rejection) => Some(rejection.status),
			Self::Decode(decode) => decode.status,
			Self::SessionExpired { source } => source.status(),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint path cannot be joined onto the configured base URL.
	#[error("Endpoint path `{path}` is invalid.")]
	InvalidPath {
		/// The offending relative path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Stored access token contains bytes that cannot form an HTTP header.
	#[error("Stored access token cannot be used as an Authorization header.")]
	InvalidBearer,
	/// Request body failed to serialize to JSON.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[from] serde_json::Error),
	/// No refresh token is available for the recovery attempt.
	#[error("No refresh token is available.")]
	MissingRefreshToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-success response surfaced to callers unchanged (pass-through policy).
///
/// The body is kept raw; [`ApiError::payload`] lazily parses the Django-style
/// error shapes the backend emits so feature code can surface field-level
/// messages without re-fetching.
#[derive(Debug, ThisError)]
#[error("API request failed with status {status}.")]
pub struct ApiError {
	/// HTTP status code returned by the backend.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl ApiError {
	/// Returns `true` for 401 responses.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Parses the backend error payload, if the body is JSON.
	pub fn payload(&self) -> Option<ErrorPayload> {
		serde_json::from_slice(&self.body).ok()
	}

	/// Best-effort human-readable message extracted from the payload.
	///
	/// Mirrors the precedence the backend contract implies: `non_field_errors`
	/// first, then `detail`, then `message`/`msg`, then the first field error.
	pub fn message(&self) -> Option<String> {
		let payload = self.payload()?;

		if let Some(first) = payload.non_field_errors.first() {
			return Some(first.clone());
		}
		if let Some(detail) = payload.detail {
			return Some(detail);
		}
		if let Some(message) = payload.message.or(payload.msg) {
			return Some(message);
		}

		payload.error.values().flat_map(|messages| messages.first()).next().cloned()
	}
}

/// Django-style error body emitted by the backend.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorPayload {
	/// Top-level human-readable message.
	#[serde(default)]
	pub message: Option<String>,
	/// Alternative message key used by a handful of endpoints.
	#[serde(default)]
	pub msg: Option<String>,
	/// DRF-style detail string.
	#[serde(default)]
	pub detail: Option<String>,
	/// Serializer-level errors not tied to a field.
	#[serde(default)]
	pub non_field_errors: Vec<String>,
	/// Per-field validation errors.
	#[serde(default)]
	pub error: BTreeMap<String, Vec<String>>,
}

/// Response decoding failure with JSON path context.
#[derive(Debug, ThisError)]
#[error("Response body is malformed JSON.")]
pub struct DecodeError {
	/// Structured parsing failure including the offending path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code of the response being decoded, when available.
	pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn api_error(body: &str) -> ApiError {
		ApiError { status: 400, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn message_prefers_non_field_errors() {
		let err = api_error(
			"{\"non_field_errors\":[\"Invalid OTP.\"],\"detail\":\"ignored\",\"message\":\"ignored\"}",
		);

		assert_eq!(err.message().as_deref(), Some("Invalid OTP."));
	}

	#[test]
	fn message_falls_back_to_field_errors() {
		let err = api_error("{\"error\":{\"email\":[\"Email already registered.\"]}}");

		assert_eq!(err.message().as_deref(), Some("Email already registered."));
	}

	#[test]
	fn message_handles_non_json_bodies() {
		let err = api_error("<html>504</html>");

		assert!(err.message().is_none());
		assert!(err.payload().is_none());
	}

	#[test]
	fn session_expired_exposes_source_status() {
		let inner = Error::from(ApiError { status: 401, body: Vec::new() });
		let outer = Error::session_expired(inner);

		assert_eq!(outer.status(), Some(401));
		assert!(StdError::source(&outer).is_some());
	}
}
