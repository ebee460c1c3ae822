//! Identity record model shared by authenticators, stores, and endpoints.

// self
use crate::{
	_prelude::*,
	auth::{Identification, PasswordSecret, TokenSecret},
};

/// One authenticated principal as persisted by the credential store.
///
/// At most one live token exists per record; issuing a fresh token through the store
/// invalidates the previous one. The token field is mutated exclusively by the store's
/// issue/reset operations.
#[derive(Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
	/// Unique, stable lookup key.
	pub identification: Identification,
	/// Local password credential; absent for provisioned delegated identities.
	pub password: Option<PasswordSecret>,
	/// External unique-identity value from a delegated provider, unique when present.
	pub uid: Option<String>,
	/// Email attribute, backfilled from delegated profiles when mapped.
	pub email: Option<String>,
	/// Current bearer token; absent until issued.
	pub token: Option<TokenSecret>,
	/// Instant the current token was issued, tracked alongside the token itself.
	pub token_issued_at: Option<OffsetDateTime>,
}
impl IdentityRecord {
	/// Creates a record carrying a local password credential.
	pub fn password_login(identification: Identification, password: PasswordSecret) -> Self {
		Self {
			identification,
			password: Some(password),
			uid: None,
			email: None,
			token: None,
			token_issued_at: None,
		}
	}

	/// Creates a record keyed by a delegated provider's unique-identity value.
	pub fn delegated(
		identification: Identification,
		uid: impl Into<String>,
		email: Option<String>,
	) -> Self {
		Self {
			identification,
			password: None,
			uid: Some(uid.into()),
			email,
			token: None,
			token_issued_at: None,
		}
	}

	/// Returns `true` when the record currently carries a bearer token.
	pub fn has_live_token(&self) -> bool {
		self.token.is_some()
	}
}
impl Debug for IdentityRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IdentityRecord")
			.field("identification", &self.identification)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.field("uid", &self.uid)
			.field("email", &self.email)
			.field("token", &self.token.as_ref().map(|_| "<redacted>"))
			.field("token_issued_at", &self.token_issued_at)
			.finish()
	}
}
