//! Broker-level error types shared across authenticators, endpoints, and stores.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error payload carried by sources that cross trait-object boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
///
/// The endpoints never return this type—they map [`AuthError`] straight into HTTP-style
/// responses—but library consumers driving authenticators or stores directly receive it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Classified authentication failure.
	#[error(transparent)]
	Auth(#[from] crate::authenticator::AuthError),
	/// Credential-store failure.
	#[error("{0}")]
	Storage(#[from] crate::store::StoreError),
	/// Delegated-provider descriptor validation failure.
	#[error(transparent)]
	Provider(#[from] crate::provider::DelegatedProviderError),
	/// Delegated-provider transport or response-shape failure.
	#[error(transparent)]
	Profile(#[from] crate::http::ProfileError),
	/// Identification validation failure.
	#[error(transparent)]
	Identification(#[from] crate::auth::IdentificationError),
	/// Grant-type validation failure.
	#[error(transparent)]
	GrantType(#[from] crate::dispatch::GrantTypeError),
}
