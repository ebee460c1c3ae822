// self
use crate::{
	_prelude::*,
	dispatch::GrantType,
	provider::{DelegatedProvider, UnknownIdentityPolicy},
};

/// Errors raised while constructing or validating delegated-provider descriptors.
#[derive(Debug, ThisError)]
pub enum DelegatedProviderError {
	/// Token endpoint is mandatory for the code exchange.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Profile endpoint is mandatory for the identity fetch.
	#[error("Missing profile endpoint.")]
	MissingProfileEndpoint,
	/// A profile field must be designated as the unique identity.
	#[error("Missing uid field mapping.")]
	MissingUidField,
	/// Field mappings must be non-empty and whitespace-free.
	#[error("The {role} field mapping `{field}` is invalid.")]
	InvalidFieldMapping {
		/// Which mapping failed validation.
		role: &'static str,
		/// Mapping value that failed validation.
		field: String,
	},
	/// An endpoint URL failed to parse.
	#[error("The {endpoint} endpoint URL is invalid: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint value that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Builder for [`DelegatedProvider`] values.
#[derive(Debug)]
pub struct DelegatedProviderBuilder {
	/// Grant-type string the descriptor will be dispatched under.
	pub grant_type: GrantType,
	/// Raw token endpoint, parsed during [`build`](DelegatedProviderBuilder::build).
	pub token_endpoint: Option<String>,
	/// Raw profile endpoint, parsed during [`build`](DelegatedProviderBuilder::build).
	pub profile_endpoint: Option<String>,
	/// Profile field holding the unique identity.
	pub uid_field: Option<String>,
	/// Optional profile field holding an email attribute.
	pub email_field: Option<String>,
	/// Behavior for verified identities without a local record.
	pub unknown_identity: UnknownIdentityPolicy,
}
impl DelegatedProviderBuilder {
	/// Creates a new builder seeded with the provided grant type.
	pub fn new(grant_type: GrantType) -> Self {
		Self {
			grant_type,
			token_endpoint: None,
			profile_endpoint: None,
			uid_field: None,
			email_field: None,
			unknown_identity: UnknownIdentityPolicy::default(),
		}
	}

	/// Sets the token (code-exchange) endpoint.
	pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
		self.token_endpoint = Some(url.into());

		self
	}

	/// Sets the profile endpoint.
	pub fn profile_endpoint(mut self, url: impl Into<String>) -> Self {
		self.profile_endpoint = Some(url.into());

		self
	}

	/// Designates the profile field holding the unique identity.
	pub fn uid_field(mut self, field: impl Into<String>) -> Self {
		self.uid_field = Some(field.into());

		self
	}

	/// Designates the profile field holding the email attribute.
	pub fn email_field(mut self, field: impl Into<String>) -> Self {
		self.email_field = Some(field.into());

		self
	}

	/// Overrides the unknown-identity policy.
	pub fn unknown_identity(mut self, policy: UnknownIdentityPolicy) -> Self {
		self.unknown_identity = policy;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<DelegatedProvider, DelegatedProviderError> {
		let token_endpoint = parse_endpoint(
			"token",
			self.token_endpoint.ok_or(DelegatedProviderError::MissingTokenEndpoint)?,
		)?;
		let profile_endpoint = parse_endpoint(
			"profile",
			self.profile_endpoint.ok_or(DelegatedProviderError::MissingProfileEndpoint)?,
		)?;
		let uid_field = self.uid_field.ok_or(DelegatedProviderError::MissingUidField)?;

		validate_field("uid", &uid_field)?;

		if let Some(email_field) = self.email_field.as_deref() {
			validate_field("email", email_field)?;
		}

		Ok(DelegatedProvider {
			grant_type: self.grant_type,
			token_endpoint,
			profile_endpoint,
			uid_field,
			email_field: self.email_field,
			client_id: None,
			client_secret: None,
			unknown_identity: self.unknown_identity,
		})
	}
}

fn parse_endpoint(endpoint: &'static str, url: String) -> Result<Url, DelegatedProviderError> {
	Url::parse(&url)
		.map_err(|source| DelegatedProviderError::InvalidEndpoint { endpoint, url, source })
}

fn validate_field(role: &'static str, field: &str) -> Result<(), DelegatedProviderError> {
	if field.is_empty() || field.chars().any(char::is_whitespace) {
		return Err(DelegatedProviderError::InvalidFieldMapping {
			role,
			field: field.to_owned(),
		});
	}

	Ok(())
}
