//! Credential-store contract and built-in backend for identity records.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Identification, IdentityRecord, TokenSecret},
};

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for identity records and their bearer tokens.
///
/// Token mutation happens only through [`issue_token`](CredentialStore::issue_token) and
/// [`reset_token`](CredentialStore::reset_token); both rotate atomically per record so at
/// most one live token exists even under concurrent requests for the same identity.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the record whose identification matches, if present.
	fn find_by_identification<'a>(
		&'a self,
		identification: &'a str,
	) -> StoreFuture<'a, Option<IdentityRecord>>;

	/// Fetches the record carrying the given external unique-identity value, if present.
	fn find_by_uid<'a>(&'a self, uid: &'a str) -> StoreFuture<'a, Option<IdentityRecord>>;

	/// Fetches the record currently holding the given bearer token, if present.
	fn find_by_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<IdentityRecord>>;

	/// Inserts a new record, failing when the identification is already taken.
	fn provision(&self, record: IdentityRecord) -> StoreFuture<'_, IdentityRecord>;

	/// Atomically rotates the record's token and returns the fresh secret.
	///
	/// Any previously issued token is invalidated by the rotation.
	fn issue_token<'a>(
		&'a self,
		identification: &'a Identification,
	) -> StoreFuture<'a, TokenSecret>;

	/// Atomically rotates the record's token without revealing the replacement.
	///
	/// Used by revocation so the presented token dies while the record stays issuable.
	fn reset_token<'a>(&'a self, identification: &'a Identification) -> StoreFuture<'a, ()>;

	/// Backfills the email attribute when the record exists and has none yet.
	fn backfill_email<'a>(
		&'a self,
		identification: &'a Identification,
		email: &'a str,
	) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// No record matched the identification during a token mutation.
	#[error("No record matches identification `{identification}`.")]
	MissingRecord {
		/// Identification that failed to resolve.
		identification: String,
	},
	/// A record with the same identification already exists.
	#[error("A record with identification `{identification}` already exists.")]
	Conflict {
		/// Identification that collided.
		identification: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_error_messages_name_the_identification() {
		let missing = StoreError::MissingRecord { identification: "user@example.com".into() };
		let conflict = StoreError::Conflict { identification: "user@example.com".into() };

		assert!(missing.to_string().contains("user@example.com"));
		assert!(conflict.to_string().contains("user@example.com"));
	}

	#[test]
	fn store_error_can_be_serialized() {
		let payload = serde_json::to_string(&StoreError::Backend { message: "down".into() })
			.expect("StoreError should serialize to JSON.");
		let round_trip: StoreError = serde_json::from_str(&payload)
			.expect("Serialized store error should deserialize from JSON.");

		assert_eq!(round_trip, StoreError::Backend { message: "down".into() });
	}
}
