//! Transport primitives for delegated-identity code exchanges and profile fetches.
//!
//! The module exposes [`DelegatedHttpClient`] as the broker's only dependency on an HTTP
//! stack. Each delegated grant performs exactly two sequential outbound calls—exchange the
//! authorization code for an access credential, then fetch the profile JSON—with no retry
//! or timeout layer of its own; connection-level timeouts belong to the serving layer.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::TokenSecret, provider::DelegatedProvider};

/// Boxed future returned by delegated transport operations.
pub type ProfileFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProfileError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of running a delegated-identity exchange.
///
/// Implementations must reclassify every transport, status, and parse failure into
/// [`ProfileError`] so authenticators never observe a raw client error.
pub trait DelegatedHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Exchanges an authorization code for the provider's access credential (call #1).
	fn exchange_code<'a>(
		&'a self,
		provider: &'a DelegatedProvider,
		code: &'a str,
	) -> ProfileFuture<'a, TokenSecret>;

	/// Fetches the profile JSON using the exchanged credential (call #2).
	fn fetch_profile<'a>(
		&'a self,
		provider: &'a DelegatedProvider,
		access_token: &'a TokenSecret,
	) -> ProfileFuture<'a, serde_json::Value>;
}

/// Failure taxonomy for delegated-provider calls and their response shapes.
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Provider answered with a non-2xx status.
	#[error("Provider responded with status {status}.")]
	Status {
		/// HTTP status code returned by the provider.
		status: u16,
	},
	/// Provider returned a body that is not valid JSON.
	#[error("Provider returned malformed JSON.")]
	MalformedJson {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token response carried no usable access token field.
	#[error("Provider token response is missing an access token.")]
	MissingAccessToken,
	/// Profile response carried no usable value under the mapped field.
	#[error("Provider profile is missing the `{field}` field.")]
	MissingField {
		/// Mapped field name absent from the profile JSON.
		field: String,
	},
}

#[cfg(feature = "reqwest")]
/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Delegated exchanges post the code as a form body and read the profile with a bearer
/// header; neither request follows redirects into another origin's hands, so configure any
/// custom [`ReqwestClient`] with redirect following disabled.
#[derive(Clone, Default)]
pub struct ReqwestProfileClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestProfileClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, ProfileError> {
		let status = response.status();

		if !status.is_success() {
			return Err(ProfileError::Status { status: status.as_u16() });
		}

		let bytes = response
			.bytes()
			.await
			.map_err(|e| ProfileError::Network { source: Box::new(e) })?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ProfileError::MalformedJson { source })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestProfileClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestProfileClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl DelegatedHttpClient for ReqwestProfileClient {
	fn exchange_code<'a>(
		&'a self,
		provider: &'a DelegatedProvider,
		code: &'a str,
	) -> ProfileFuture<'a, TokenSecret> {
		Box::pin(async move {
			let mut form = BTreeMap::new();

			form.insert("grant_type", "authorization_code");
			form.insert("code", code);

			if let Some(client_id) = provider.client_id.as_deref() {
				form.insert("client_id", client_id);
			}
			if let Some(client_secret) = provider.client_secret.as_deref() {
				form.insert("client_secret", client_secret);
			}

			let response = self
				.0
				.post(provider.token_endpoint.clone())
				.form(&form)
				.send()
				.await
				.map_err(|e| ProfileError::Network { source: Box::new(e) })?;
			let payload = Self::read_json(response).await?;

			payload
				.get("access_token")
				.and_then(serde_json::Value::as_str)
				.map(TokenSecret::new)
				.ok_or(ProfileError::MissingAccessToken)
		})
	}

	fn fetch_profile<'a>(
		&'a self,
		provider: &'a DelegatedProvider,
		access_token: &'a TokenSecret,
	) -> ProfileFuture<'a, serde_json::Value> {
		Box::pin(async move {
			let response = self
				.0
				.get(provider.profile_endpoint.clone())
				.bearer_auth(access_token.expose())
				.send()
				.await
				.map_err(|e| ProfileError::Network { source: Box::new(e) })?;

			Self::read_json(response).await
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn malformed_json_errors_carry_the_parse_path() {
		let mut deserializer = serde_json::Deserializer::from_str("{\"access_token\":");
		let err = serde_path_to_error::deserialize::<_, serde_json::Value>(&mut deserializer)
			.map_err(|source| ProfileError::MalformedJson { source })
			.expect_err("Truncated JSON should fail to parse.");

		assert!(matches!(err, ProfileError::MalformedJson { .. }));
		assert!(err.to_string().contains("malformed JSON"));
	}

	#[test]
	fn status_errors_name_the_code() {
		let err = ProfileError::Status { status: 503 };

		assert!(err.to_string().contains("503"));
	}
}
