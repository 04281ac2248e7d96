//! Typed wrappers over the marketplace REST endpoints.
//!
//! Each submodule mirrors one feature area of the backend. The wrappers are
//! deliberately thin: build a request, run it through the authenticated
//! pipeline in [`crate::client`], decode the documented payload shape. All
//! booking/posting invariants live server-side; nothing here enforces state
//! beyond what the wire contract returns.

pub mod auth;
pub mod bookings;
pub mod posts;
pub mod profiles;

pub use auth::*;
pub use bookings::*;
pub use posts::*;
pub use profiles::*;

// self
use crate::_prelude::*;

/// One page of a paginated listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
	/// Items on this page.
	pub results: Vec<T>,
	/// 1-based index of this page.
	pub current: u32,
	/// Total number of pages.
	pub total: u32,
}
impl<T> Page<T> {
	/// Returns `true` when a later page exists.
	pub fn has_next(&self) -> bool {
		self.current < self.total
	}
}

/// Plain acknowledgement body returned by several mutation endpoints.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatusMessage {
	/// Human-readable confirmation, when the backend supplies one.
	#[serde(default)]
	pub message: Option<String>,
}
