//! Redacting wrappers for bearer tokens and password credentials.

// crates.io
use base64::Engine;
use rand::RngCore;
// self
use crate::_prelude::*;

const TOKEN_ENTROPY_BYTES: usize = 32;

/// Opaque bearer token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps an existing token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Generates a fresh random token from 32 bytes of OS entropy, URL-safe base64 encoded.
	pub fn generate() -> Self {
		let mut buf = [0_u8; TOKEN_ENTROPY_BYTES];

		rand::rng().fill_bytes(&mut buf);

		Self(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Password credential wrapper; comparison is opaque and redaction mirrors [`TokenSecret`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordSecret(String);
impl PasswordSecret {
	/// Wraps a password credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Compares the stored credential against a candidate without exposing either side.
	pub fn matches(&self, candidate: &str) -> bool {
		self.0.as_bytes() == candidate.as_bytes()
	}
}
impl Debug for PasswordSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("PasswordSecret").field(&"<redacted>").finish()
	}
}
impl Display for PasswordSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
