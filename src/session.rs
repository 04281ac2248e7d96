//! Session-expiry signalling between the client core and the hosting application.
//!
//! The hosted web client forced navigation to `/login` by mutating the global
//! location. Here the credential mechanism only signals; the application layer
//! registers a [`SessionHook`] and decides how to navigate, show a dialog, or
//! re-run a device login. The hook fires exactly once per teardown, after the
//! credential store has been cleared and before the failing call rejects.

// self
use crate::_prelude::*;

/// Callback invoked when credentials become irrecoverably expired.
pub trait SessionHook
where
	Self: Send + Sync,
{
	/// Observes the refresh failure that forced the logout.
	///
	/// Implementations must not block; they run inline on the failing request's
	/// task.
	fn on_session_expired(&self, error: &Error);
}

/// Default hook that ignores expiry events.
#[derive(Clone, Debug, Default)]
pub struct NoopSessionHook;
impl SessionHook for NoopSessionHook {
	fn on_session_expired(&self, _: &Error) {}
}

/// Adapter that lets plain closures act as session hooks.
pub struct FnSessionHook<F>(F);
impl<F> FnSessionHook<F>
where
	F: Fn(&Error) + Send + Sync,
{
	/// Wraps the provided closure.
	pub fn new(f: F) -> Self {
		Self(f)
	}
}
impl<F> SessionHook for FnSessionHook<F>
where
	F: Fn(&Error) + Send + Sync,
{
	fn on_session_expired(&self, error: &Error) {
		self.0(error);
	}
}
impl<F> Debug for FnSessionHook<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FnSessionHook(..)")
	}
}
