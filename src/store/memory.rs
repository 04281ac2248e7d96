//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	store::{CredentialStore, StoreFuture},
};

#[derive(Debug, Default)]
struct Slots {
	access: Option<TokenSecret>,
	refresh: Option<TokenSecret>,
}

type SharedSlots = Arc<RwLock<Slots>>;

/// Thread-safe storage backend that keeps credentials in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SharedSlots);
impl MemoryStore {
	/// Seeds the access slot directly, mainly for fixtures that model a
	/// half-populated browser storage.
	pub fn seed_access(&self, access: TokenSecret) {
		self.0.write().access = Some(access);
	}

	/// Seeds the refresh slot directly.
	pub fn seed_refresh(&self, refresh: TokenSecret) {
		self.0.write().refresh = Some(refresh);
	}

	fn clear_now(slots: &SharedSlots) -> bool {
		let mut guard = slots.write();
		let had_any = guard.access.is_some() || guard.refresh.is_some();

		guard.access = None;
		guard.refresh = None;

		had_any
	}
}
impl CredentialStore for MemoryStore {
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(slots.read().access.clone()) })
	}

	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(slots.read().refresh.clone()) })
	}

	fn store_pair(&self, pair: CredentialPair) -> StoreFuture<'_, ()> {
		let slots = self.0.clone();

		Box::pin(async move {
			let mut guard = slots.write();

			guard.access = Some(pair.access);
			guard.refresh = Some(pair.refresh);

			Ok(())
		})
	}

	fn replace_access(&self, access: TokenSecret) -> StoreFuture<'_, ()> {
		let slots = self.0.clone();

		Box::pin(async move {
			slots.write().access = Some(access);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, bool> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(Self::clear_now(&slots)) })
	}
}
