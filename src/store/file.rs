//! Simple file-backed [`CredentialStore`] for CLI tools and desktop shells.
//!
//! The snapshot file is the out-of-process analogue of the hosted web client's
//! browser storage: a single JSON document holding the two token slots,
//! rewritten atomically (temp file + rename) after every mutation.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	store::{CredentialStore, StoreError, StoreFuture},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
	access: Option<TokenSecret>,
	refresh: Option<TokenSecret>,
	updated_at: Option<OffsetDateTime>,
}

/// Persists credentials to a JSON snapshot after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot =
			if path.exists() { Self::load_snapshot(&path)? } else { Snapshot::default() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Snapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &Snapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileStore {
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move { Ok(self.inner.read().access.clone()) })
	}

	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move { Ok(self.inner.read().refresh.clone()) })
	}

	fn store_pair(&self, pair: CredentialPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.access = Some(pair.access);
			guard.refresh = Some(pair.refresh);
			guard.updated_at = Some(pair.issued_at);
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn replace_access(&self, access: TokenSecret) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.access = Some(access);
			guard.updated_at = Some(OffsetDateTime::now_utc());
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, bool> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let had_any = guard.access.is_some() || guard.refresh.is_some();

			guard.access = None;
			guard.refresh = None;
			guard.updated_at = Some(OffsetDateTime::now_utc());
			self.persist_locked(&guard)?;

			Ok(had_any)
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"fixlink_client_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let pair = CredentialPair::new("access-token", "refresh-token");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.store_pair(pair))
			.expect("Failed to save credential pair to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let access = rt
			.block_on(reopened.access_token())
			.expect("Failed to read access token from reopened store.")
			.expect("File store lost the access token after reopen.");

		assert_eq!(access.expose(), "access-token");

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn clear_reports_prior_presence_and_persists() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.store_pair(CredentialPair::new("a", "r")))
			.expect("Failed to seed credential pair.");

		let first = rt.block_on(store.clear()).expect("Clear should succeed on populated store.");
		let second = rt.block_on(store.clear()).expect("Clear should succeed on empty store.");

		assert!(first);
		assert!(!second);

		let reopened = FileStore::open(&path).expect("Failed to reopen cleared snapshot.");
		let refresh = rt
			.block_on(reopened.refresh_token())
			.expect("Failed to read refresh token from cleared store.");

		assert!(refresh.is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
