//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{Identification, IdentityRecord, TokenSecret},
	store::{CredentialStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<Identification, IdentityRecord>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn find_by_identification_now(map: StoreMap, identification: &str) -> Option<IdentityRecord> {
		map.read().get(identification).cloned()
	}

	fn find_by_uid_now(map: StoreMap, uid: &str) -> Option<IdentityRecord> {
		map.read().values().find(|record| record.uid.as_deref() == Some(uid)).cloned()
	}

	fn find_by_token_now(map: StoreMap, token: &str) -> Option<IdentityRecord> {
		map.read()
			.values()
			.find(|record| record.token.as_ref().is_some_and(|held| held.expose() == token))
			.cloned()
	}

	fn provision_now(
		map: StoreMap,
		record: IdentityRecord,
	) -> Result<IdentityRecord, StoreError> {
		let mut guard = map.write();

		if guard.contains_key(record.identification.as_ref()) {
			return Err(StoreError::Conflict {
				identification: record.identification.to_string(),
			});
		}

		guard.insert(record.identification.clone(), record.clone());

		Ok(record)
	}

	// Rotation happens under the write lock, so two racing issuers cannot both observe the
	// same previous token.
	fn rotate_now(
		map: StoreMap,
		identification: &Identification,
	) -> Result<TokenSecret, StoreError> {
		let mut guard = map.write();
		let record = guard.get_mut(identification.as_ref()).ok_or_else(|| {
			StoreError::MissingRecord { identification: identification.to_string() }
		})?;
		let token = TokenSecret::generate();

		record.token = Some(token.clone());
		record.token_issued_at = Some(OffsetDateTime::now_utc());

		Ok(token)
	}

	fn backfill_email_now(
		map: StoreMap,
		identification: &Identification,
		email: &str,
	) -> Result<(), StoreError> {
		let mut guard = map.write();

		if let Some(record) = guard.get_mut(identification.as_ref()) {
			if record.email.is_none() {
				record.email = Some(email.to_owned());
			}
		}

		Ok(())
	}
}
impl CredentialStore for MemoryStore {
	fn find_by_identification<'a>(
		&'a self,
		identification: &'a str,
	) -> StoreFuture<'a, Option<IdentityRecord>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::find_by_identification_now(map, identification)) })
	}

	fn find_by_uid<'a>(&'a self, uid: &'a str) -> StoreFuture<'a, Option<IdentityRecord>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::find_by_uid_now(map, uid)) })
	}

	fn find_by_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<IdentityRecord>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::find_by_token_now(map, token)) })
	}

	fn provision(&self, record: IdentityRecord) -> StoreFuture<'_, IdentityRecord> {
		let map = self.0.clone();

		Box::pin(async move { Self::provision_now(map, record) })
	}

	fn issue_token<'a>(
		&'a self,
		identification: &'a Identification,
	) -> StoreFuture<'a, TokenSecret> {
		let map = self.0.clone();

		Box::pin(async move { Self::rotate_now(map, identification) })
	}

	fn reset_token<'a>(&'a self, identification: &'a Identification) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::rotate_now(map, identification).map(|_| ()) })
	}

	fn backfill_email<'a>(
		&'a self,
		identification: &'a Identification,
		email: &'a str,
	) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::backfill_email_now(map, identification, email) })
	}
}
