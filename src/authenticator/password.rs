//! Password grant strategy backed by the local credential store.

// self
use crate::{
	_prelude::*,
	auth::IdentityRecord,
	authenticator::{AuthError, AuthFuture, Authenticator, GrantFields},
	store::CredentialStore,
};

/// Verifies `username` + `password` fields against stored records.
///
/// An unknown identification, a record without a local password, and a mismatched
/// password all collapse into the same [`AuthError::InvalidCredentials`], so callers
/// cannot probe which identifications exist.
pub struct PasswordAuthenticator {
	store: Arc<dyn CredentialStore>,
}
impl PasswordAuthenticator {
	/// Creates a password strategy over the provided store.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self { store }
	}
}
impl Authenticator for PasswordAuthenticator {
	fn authenticate<'a>(&'a self, fields: &'a GrantFields) -> AuthFuture<'a, IdentityRecord> {
		Box::pin(async move {
			let username =
				fields.get("username").ok_or(AuthError::InvalidCredentials)?.as_str();
			let password =
				fields.get("password").ok_or(AuthError::InvalidCredentials)?.as_str();
			let record = self
				.store
				.find_by_identification(username)
				.await
				.map_err(AuthError::from)?
				.ok_or(AuthError::InvalidCredentials)?;

			match record.password.as_ref() {
				Some(stored) if stored.matches(password) => Ok(record),
				_ => Err(AuthError::InvalidCredentials),
			}
		})
	}
}
impl Debug for PasswordAuthenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("PasswordAuthenticator(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{Identification, PasswordSecret},
		store::MemoryStore,
	};

	async fn store_with_login() -> Arc<MemoryStore> {
		let store = Arc::new(MemoryStore::default());
		let identification = Identification::new("user@example.com")
			.expect("Login fixture identification should be valid.");

		store
			.provision(IdentityRecord::password_login(
				identification,
				PasswordSecret::new("correct-horse"),
			))
			.await
			.expect("Seeding the login fixture should succeed.");

		store
	}

	fn fields(username: &str, password: &str) -> GrantFields {
		GrantFields::from_iter([
			("username".to_owned(), username.to_owned()),
			("password".to_owned(), password.to_owned()),
		])
	}

	#[tokio::test]
	async fn valid_credentials_resolve_the_record() {
		let store = store_with_login().await;
		let authenticator = PasswordAuthenticator::new(store);
		let record = authenticator
			.authenticate(&fields("user@example.com", "correct-horse"))
			.await
			.expect("Valid credentials should authenticate.");

		assert_eq!(record.identification.as_ref(), "user@example.com");
	}

	#[tokio::test]
	async fn unknown_user_and_bad_password_are_indistinguishable() {
		let store = store_with_login().await;
		let authenticator = PasswordAuthenticator::new(store);
		let unknown = authenticator
			.authenticate(&fields("ghost@example.com", "correct-horse"))
			.await
			.expect_err("Unknown identifications must be rejected.");
		let mismatch = authenticator
			.authenticate(&fields("user@example.com", "badpassword"))
			.await
			.expect_err("Mismatched passwords must be rejected.");

		assert!(matches!(unknown, AuthError::InvalidCredentials));
		assert!(matches!(mismatch, AuthError::InvalidCredentials));
		assert_eq!(unknown.to_string(), mismatch.to_string());
	}

	#[tokio::test]
	async fn missing_fields_are_rejected_as_invalid_credentials() {
		let store = store_with_login().await;
		let authenticator = PasswordAuthenticator::new(store);
		let err = authenticator
			.authenticate(&GrantFields::from_iter([(
				"username".to_owned(),
				"user@example.com".to_owned(),
			)]))
			.await
			.expect_err("A missing password field must be rejected.");

		assert!(matches!(err, AuthError::InvalidCredentials));
	}

	#[tokio::test]
	async fn records_without_a_local_password_are_rejected() {
		let store = Arc::new(MemoryStore::default());
		let identification = Identification::new("social@example.com")
			.expect("Delegated fixture identification should be valid.");

		store
			.provision(IdentityRecord::delegated(identification, "1238190321", None))
			.await
			.expect("Seeding the delegated fixture should succeed.");

		let authenticator = PasswordAuthenticator::new(store);
		let err = authenticator
			.authenticate(&fields("social@example.com", "anything"))
			.await
			.expect_err("Password grant must not match passwordless records.");

		assert!(matches!(err, AuthError::InvalidCredentials));
	}
}
