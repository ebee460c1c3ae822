//! The authenticator capability and its classified failure taxonomy.
//!
//! Every grant strategy—built-in or registered at runtime—implements [`Authenticator`]:
//! one method turning request fields into an authenticated
//! [`IdentityRecord`](crate::auth::IdentityRecord) or exactly one of three failure kinds.
//! Strategies never let a raw transport, parse, or storage error escape; they reclassify
//! before returning, which is what lets the token endpoint map failures to
//! protocol-correct responses without inspecting strategy internals.

pub mod delegated;
pub mod password;

pub use delegated::*;
pub use password::*;

// self
use crate::{_prelude::*, auth::IdentityRecord, http::ProfileError, store::StoreError};

/// Boxed future returned by authenticator strategies.
pub type AuthFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + 'a + Send>>;

/// Form-style credential fields accompanying a token request (everything except
/// `grant_type`).
pub type GrantFields = BTreeMap<String, String>;

/// Polymorphic authentication capability dispatched by grant type.
///
/// Custom strategies registered through
/// [`GrantRegistry::set_custom_providers`](crate::dispatch::GrantRegistry::set_custom_providers)
/// implement this trait and signal their own backing-service failures with
/// [`AuthError::upstream`].
pub trait Authenticator
where
	Self: Send + Sync,
{
	/// Verifies the supplied credential fields and resolves the identity record.
	fn authenticate<'a>(&'a self, fields: &'a GrantFields) -> AuthFuture<'a, IdentityRecord>;
}
impl Debug for dyn Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Authenticator")
	}
}

/// The only failure kinds that cross the authenticator boundary.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Credentials were rejected; unknown principal and bad secret are indistinguishable.
	#[error("Invalid credentials.")]
	InvalidCredentials,
	/// No authenticator is bound to the requested grant type.
	#[error("Unsupported grant type `{grant_type}`.")]
	UnsupportedGrantType {
		/// Grant-type string that failed to resolve.
		grant_type: String,
	},
	/// An external dependency errored, was unreachable, or answered with a malformed shape.
	#[error("Upstream dependency failure.")]
	Upstream {
		/// Reclassified dependency failure, when one is available.
		#[source]
		source: Option<BoxError>,
	},
}
impl AuthError {
	/// Wraps a dependency failure as an upstream error.
	pub fn upstream(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Upstream { source: Some(Box::new(src)) }
	}

	/// Upstream error without a source, for strategies with nothing safe to attach.
	pub fn upstream_opaque() -> Self {
		Self::Upstream { source: None }
	}
}
impl From<StoreError> for AuthError {
	fn from(e: StoreError) -> Self {
		Self::upstream(e)
	}
}
impl From<ProfileError> for AuthError {
	fn from(e: ProfileError) -> Self {
		Self::upstream(e)
	}
}
