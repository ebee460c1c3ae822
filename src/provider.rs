//! Delegated-provider descriptors: endpoint pair, profile field mapping, and policy.
//!
//! A descriptor is pure data consumed by
//! [`DelegatedAuthenticator`](crate::authenticator::DelegatedAuthenticator): the token and
//! profile endpoints, the name of the profile field that uniquely identifies the external
//! principal, an optional email mapping, and what to do when the verified identity has no
//! local record yet. Built-in constructors cover the facebook/google/edx shapes.

/// Builder API for assembling delegated-provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, dispatch::GrantType};

/// Facebook code-exchange endpoint.
pub const FACEBOOK_TOKEN_URL: &str = "https://graph.facebook.com/oauth/access_token";
/// Facebook profile endpoint; the `id` field is the unique identity.
pub const FACEBOOK_PROFILE_URL: &str = "https://graph.facebook.com/me?fields=id,email";
/// Google code-exchange endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
/// Google profile endpoint; the `sub` field is the unique identity.
pub const GOOGLE_PROFILE_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Policy applied when a verified external identity has no local record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownIdentityPolicy {
	#[default]
	/// Fail with invalid credentials; the embedding application provisions records itself.
	Reject,
	/// Provision a record keyed by the external identity, backfilling the email mapping.
	Provision,
}

/// Immutable delegated-provider descriptor consumed by authenticators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedProvider {
	/// Grant-type string the provider is dispatched under.
	pub grant_type: GrantType,
	/// Endpoint exchanging an authorization code for an access credential.
	pub token_endpoint: Url,
	/// Endpoint returning the profile JSON for an access credential.
	pub profile_endpoint: Url,
	/// Profile field holding the provider's unique-identity value.
	pub uid_field: String,
	/// Profile field holding an email attribute, when the provider exposes one.
	pub email_field: Option<String>,
	/// Application identifier attached to the code exchange, when required.
	pub client_id: Option<String>,
	/// Application secret attached to the code exchange, when required.
	pub client_secret: Option<String>,
	/// Behavior for verified identities without a local record.
	pub unknown_identity: UnknownIdentityPolicy,
}
impl DelegatedProvider {
	/// Creates a new builder for the provided grant type.
	pub fn builder(grant_type: GrantType) -> DelegatedProviderBuilder {
		DelegatedProviderBuilder::new(grant_type)
	}

	/// Descriptor for the `facebook_auth_code` grant; identity from the `id` field.
	pub fn facebook() -> Result<Self> {
		Ok(Self::builder(GrantType::facebook_auth_code())
			.token_endpoint(FACEBOOK_TOKEN_URL)
			.profile_endpoint(FACEBOOK_PROFILE_URL)
			.uid_field("id")
			.email_field("email")
			.build()?)
	}

	/// Descriptor for the `google_auth_code` grant; identity from the `sub` claim.
	pub fn google() -> Result<Self> {
		Ok(Self::builder(GrantType::google_auth_code())
			.token_endpoint(GOOGLE_TOKEN_URL)
			.profile_endpoint(GOOGLE_PROFILE_URL)
			.uid_field("sub")
			.email_field("email")
			.build()?)
	}

	/// Descriptor for the `edx_auth_code` grant against a caller-supplied Open edX host;
	/// identity from the `username` field.
	pub fn edx(host: &str) -> Result<Self> {
		let host = host.trim_end_matches('/');

		Ok(Self::builder(GrantType::edx_auth_code())
			.token_endpoint(format!("{host}/oauth2/access_token"))
			.profile_endpoint(format!("{host}/api/mobile/v0.5/my_user_info"))
			.uid_field("username")
			.email_field("email")
			.build()?)
	}

	/// Attaches application credentials to the code exchange.
	pub fn with_client_credentials(
		mut self,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		self.client_id = Some(client_id.into());
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Overrides the unknown-identity policy.
	pub fn with_unknown_identity(mut self, policy: UnknownIdentityPolicy) -> Self {
		self.unknown_identity = policy;

		self
	}
}
