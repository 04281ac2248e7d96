//! Transport primitives for the marketplace API.
//!
//! The module exposes [`Transport`] alongside the owned request/response types
//! so downstream crates can integrate custom HTTP stacks. A transport receives
//! a fully-resolved [`ApiRequest`] (absolute URL, bearer secret, body, retry
//! flag) and returns the raw status and bytes; all recovery policy lives in
//! [`crate::client`], never in the transport.

// std
use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
	multipart::{Form, Part},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, DecodeError, TransportError},
};

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiResponse>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing marketplace API calls.
///
/// The trait acts as the client's only dependency on an HTTP implementation.
/// Implementations must be `Send + Sync + 'static` so one transport can be
/// shared across clients, and the returned future must own whatever state it
/// needs so it stays `Send` for the lifetime of the in-flight call.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and resolves with the raw response.
	///
	/// Transports must return [`ApiResponse`] for every response the wire
	/// produced, including non-2xx statuses; only connection-level failures
	/// surface as errors. Classification is the client's job.
	fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the marketplace API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// GET
	Get,
	/// POST
	Post,
	/// PUT
	Put,
	/// PATCH
	Patch,
	/// DELETE
	Delete,
}
impl HttpMethod {
	/// Returns the canonical wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request body shapes the API speaks.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// No body (GET, DELETE).
	Empty,
	/// JSON payload, already serialized; sent as `application/json`.
	Json(Vec<u8>),
	/// Multipart form payload (profile and post uploads).
	Multipart(Vec<FormPart>),
}

/// One part of a multipart form body.
#[derive(Clone, Debug)]
pub struct FormPart {
	/// Form field name.
	pub name: String,
	/// Field value.
	pub value: FormValue,
}
impl FormPart {
	/// Builds a plain text field.
	pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self { name: name.into(), value: FormValue::Text(value.into()) }
	}

	/// Builds a file field.
	pub fn file(name: impl Into<String>, file: FilePart) -> Self {
		Self { name: name.into(), value: FormValue::File(file) }
	}
}

/// Value carried by a [`FormPart`].
#[derive(Clone, Debug)]
pub enum FormValue {
	/// Plain text field.
	Text(String),
	/// File upload field.
	File(FilePart),
}

/// Owned file upload payload.
#[derive(Clone)]
pub struct FilePart {
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type of the payload.
	pub content_type: String,
	/// Raw file bytes.
	pub bytes: Vec<u8>,
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Fully-resolved description of one outgoing API call.
///
/// The `retried` flag is the per-request marker from the recovery contract: it
/// is `false` for every fresh call and set exactly once when the client
/// re-issues the request after a token refresh, which is what guarantees
/// termination of the recovery loop.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute endpoint URL.
	pub url: Url,
	/// Bearer credential attached by the client pipeline; `None` for
	/// unauthenticated calls.
	pub bearer: Option<TokenSecret>,
	/// Request body.
	pub body: RequestBody,
	/// Whether a refresh-and-retry cycle has already been attempted.
	pub retried: bool,
}
impl ApiRequest {
	/// Builds a request with no body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, bearer: None, body: RequestBody::Empty, retried: false }
	}

	/// Serializes `payload` and attaches it as a JSON body.
	pub fn json<T>(mut self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = RequestBody::Json(serde_json::to_vec(payload)?);

		Ok(self)
	}

	/// Attaches a multipart form body.
	pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
		self.body = RequestBody::Multipart(parts);

		self
	}

	/// Appends one query pair to the URL.
	pub fn with_query(mut self, key: &str, value: &str) -> Self {
		self.url.query_pairs_mut().append_pair(key, value);

		self
	}
}

/// Raw response produced by a transport: status plus body bytes.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` for 401 responses.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Decodes the body as JSON into `T`, reporting the offending path on failure.
	pub fn json<T>(&self) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| DecodeError { source, status: Some(self.status) }.into())
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// JSON bodies are sent with `Content-Type: application/json`; multipart bodies
/// use form encoding with per-part MIME types. Callers supplying a custom
/// [`ReqwestClient`] keep full control over TLS, proxies, and timeouts.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn method_of(method: HttpMethod) -> reqwest::Method {
		match method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
			HttpMethod::Put => reqwest::Method::PUT,
			HttpMethod::Patch => reqwest::Method::PATCH,
			HttpMethod::Delete => reqwest::Method::DELETE,
		}
	}

	fn form_of(parts: Vec<FormPart>) -> Result<Form> {
		let mut form = Form::new();

		for part in parts {
			form = match part.value {
				FormValue::Text(value) => form.text(part.name, value),
				FormValue::File(file) => {
					let piece = Part::bytes(file.bytes)
						.file_name(file.file_name)
						.mime_str(&file.content_type)
						.map_err(TransportError::network)?;

					form.part(part.name, piece)
				},
			};
		}

		Ok(form)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(Self::method_of(request.method), request.url);

			if let Some(bearer) = &request.bearer {
				let value = HeaderValue::from_str(&format!("Bearer {}", bearer.expose()))
					.map_err(|_| ConfigError::InvalidBearer)?;

				builder = builder.header(AUTHORIZATION, value);
			}

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(bytes) =>
					builder.header(CONTENT_TYPE, "application/json").body(bytes),
				RequestBody::Multipart(parts) => builder.multipart(Self::form_of(parts)?),
			};

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fixture_url() -> Url {
		Url::parse("https://api.fixlink.test/api/").expect("Fixture URL should parse.")
	}

	#[test]
	fn query_pairs_append_without_clobbering() {
		let request = ApiRequest::new(HttpMethod::Get, fixture_url())
			.with_query("page", "2")
			.with_query("ordering", "recent");

		assert_eq!(request.url.query(), Some("page=2&ordering=recent"));
	}

	#[test]
	fn json_body_serializes_payload() {
		#[derive(Serialize)]
		struct Payload<'a> {
			refresh: &'a str,
		}

		let request = ApiRequest::new(HttpMethod::Post, fixture_url())
			.json(&Payload { refresh: "R1" })
			.expect("JSON body should serialize.");

		match request.body {
			RequestBody::Json(bytes) => assert_eq!(bytes, b"{\"refresh\":\"R1\"}"),
			_ => panic!("Expected a JSON body."),
		}
	}

	#[test]
	fn response_json_reports_offending_path() {
		#[derive(Debug, Deserialize)]
		struct Expected {
			#[allow(dead_code)]
			access: String,
		}

		let response = ApiResponse { status: 200, body: b"{\"access\":42}".to_vec() };
		let err = response.json::<Expected>().expect_err("Mistyped field should fail to decode.");

		assert!(matches!(err, Error::Decode(_)));
		assert_eq!(err.status(), Some(200));
	}

	#[test]
	fn fresh_requests_are_unretried_and_anonymous() {
		let request = ApiRequest::new(HttpMethod::Delete, fixture_url());

		assert!(!request.retried);
		assert!(request.bearer.is_none());
		assert!(matches!(request.body, RequestBody::Empty));
	}
}
