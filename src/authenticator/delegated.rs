//! Delegated-identity grant strategy: code exchange, profile fetch, local resolution.

// self
use crate::{
	_prelude::*,
	auth::{Identification, IdentityRecord},
	authenticator::{AuthError, AuthFuture, Authenticator, GrantFields},
	http::{DelegatedHttpClient, ProfileError},
	provider::{DelegatedProvider, UnknownIdentityPolicy},
	store::CredentialStore,
};

/// Verifies a third-party authorization code by exchanging it for a profile.
///
/// Two sequential provider calls per request, no retries: any transport failure, non-2xx
/// status, malformed body, or missing mapped field is a dependency fault and surfaces as
/// [`AuthError::Upstream`]. A successfully verified identity that has no local record is a
/// credential fault instead, unless the provider descriptor opts into provisioning.
pub struct DelegatedAuthenticator {
	store: Arc<dyn CredentialStore>,
	provider: DelegatedProvider,
	http_client: Arc<dyn DelegatedHttpClient>,
}
impl DelegatedAuthenticator {
	/// Creates a delegated strategy over the provided store, descriptor, and transport.
	pub fn new(
		store: Arc<dyn CredentialStore>,
		provider: DelegatedProvider,
		http_client: Arc<dyn DelegatedHttpClient>,
	) -> Self {
		Self { store, provider, http_client }
	}

	/// Returns the descriptor this strategy was built around.
	pub fn provider(&self) -> &DelegatedProvider {
		&self.provider
	}

	async fn resolve_identity(
		&self,
		uid: String,
		email: Option<String>,
	) -> Result<IdentityRecord, AuthError> {
		if let Some(mut record) = self.store.find_by_uid(&uid).await? {
			if let Some(email) = email.as_deref().filter(|_| record.email.is_none()) {
				self.store.backfill_email(&record.identification, email).await?;

				record.email = Some(email.to_owned());
			}

			return Ok(record);
		}

		match self.provider.unknown_identity {
			UnknownIdentityPolicy::Reject => Err(AuthError::InvalidCredentials),
			UnknownIdentityPolicy::Provision => {
				// The identification is derived from provider data; a shape the local
				// domain rejects is a malformed upstream profile, not a credential fault.
				let identification =
					Identification::new(email.as_deref().unwrap_or(uid.as_str()))
						.map_err(AuthError::upstream)?;
				let record = IdentityRecord::delegated(identification, uid, email);

				self.store.provision(record).await.map_err(AuthError::from)
			},
		}
	}
}
impl Authenticator for DelegatedAuthenticator {
	fn authenticate<'a>(&'a self, fields: &'a GrantFields) -> AuthFuture<'a, IdentityRecord> {
		Box::pin(async move {
			let code = fields.get("code").ok_or(AuthError::InvalidCredentials)?;
			let access_token = self.http_client.exchange_code(&self.provider, code).await?;
			let profile = self.http_client.fetch_profile(&self.provider, &access_token).await?;
			let uid = scalar_field(&profile, &self.provider.uid_field).ok_or_else(|| {
				AuthError::upstream(ProfileError::MissingField {
					field: self.provider.uid_field.clone(),
				})
			})?;
			let email = self
				.provider
				.email_field
				.as_deref()
				.and_then(|field| scalar_field(&profile, field));

			self.resolve_identity(uid, email).await
		})
	}
}
impl Debug for DelegatedAuthenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DelegatedAuthenticator").field("provider", &self.provider).finish()
	}
}

// Providers disagree on whether identity fields are JSON strings or numbers.
fn scalar_field(profile: &serde_json::Value, field: &str) -> Option<String> {
	match profile.get(field)? {
		serde_json::Value::String(value) => Some(value.clone()),
		serde_json::Value::Number(value) => Some(value.to_string()),
		_ => None,
	}
}
