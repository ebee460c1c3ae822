//! Token and revocation endpoints: HTTP-shaped orchestration over the dispatcher.
//!
//! Both endpoints are routing-framework agnostic: they consume plain request structs and
//! produce a status code plus optional JSON body, which the embedding application writes
//! onto whatever server stack it runs. Every failure is terminal for the request—no
//! retries anywhere on this path.

// self
use crate::{
	_prelude::*,
	authenticator::{AuthError, GrantFields},
	dispatch::GrantRegistry,
	obs::{self, GrantOutcome, GrantSpan},
	store::CredentialStore,
};

/// One incoming token request: the declared grant type plus its form-style fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
	/// Client-declared strategy for proving identity.
	pub grant_type: String,
	/// Grant-specific credential fields (`username`/`password`, `code`, or arbitrary).
	pub fields: GrantFields,
}
impl TokenRequest {
	/// Creates a request for the provided grant type with no fields yet.
	pub fn new(grant_type: impl Into<String>) -> Self {
		Self { grant_type: grant_type.into(), fields: GrantFields::new() }
	}

	/// Adds one credential field.
	pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.insert(name.into(), value.into());

		self
	}
}

/// One incoming revocation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRequest {
	/// Accepted for interface compatibility; never branched on.
	pub token_type_hint: Option<String>,
	/// Bearer token the client wants dead.
	pub token: String,
}
impl RevocationRequest {
	/// Creates a request revoking the provided token with an `access_token` hint.
	pub fn access_token(token: impl Into<String>) -> Self {
		Self { token_type_hint: Some("access_token".into()), token: token.into() }
	}
}

/// Successful token-grant body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenBody {
	/// Freshly issued bearer token.
	pub access_token: String,
}

/// Structured error body returned for client-side faults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Protocol error code (`invalid_grant` or `unsupported_grant_type`).
	pub error: String,
}

/// HTTP-shaped endpoint outcome: status code plus optional JSON body.
///
/// Upstream failures deliberately carry no body so dependency details never leak to the
/// client; the two 400-class errors stay structured so integrators can distinguish wrong
/// input from a feature that is not configured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndpointResponse {
	/// HTTP status code.
	pub status: u16,
	/// JSON body, when the outcome carries one.
	pub body: Option<serde_json::Value>,
}
impl EndpointResponse {
	/// 200 with the freshly issued token.
	pub fn granted(token: impl Into<String>) -> Self {
		Self {
			status: 200,
			body: Some(serde_json::json!({ "access_token": token.into() })),
		}
	}

	/// 200 acknowledgement with an empty body.
	pub fn ok() -> Self {
		Self { status: 200, body: None }
	}

	/// 400 `{"error":"invalid_grant"}`.
	pub fn invalid_grant() -> Self {
		Self { status: 400, body: Some(serde_json::json!({ "error": "invalid_grant" })) }
	}

	/// 400 `{"error":"unsupported_grant_type"}`.
	pub fn unsupported_grant_type() -> Self {
		Self {
			status: 400,
			body: Some(serde_json::json!({ "error": "unsupported_grant_type" })),
		}
	}

	/// 502 with an empty body; dependency faults leak no detail.
	pub fn bad_gateway() -> Self {
		Self { status: 502, body: None }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Orchestrates one token request: dispatch, authenticate, issue, respond.
pub struct TokenEndpoint {
	registry: Arc<GrantRegistry>,
	store: Arc<dyn CredentialStore>,
}
impl TokenEndpoint {
	/// Creates a token endpoint over the provided dispatcher and store.
	pub fn new(registry: Arc<GrantRegistry>, store: Arc<dyn CredentialStore>) -> Self {
		Self { registry, store }
	}

	/// Returns the dispatcher handle, e.g. for runtime custom-provider registration.
	pub fn registry(&self) -> &Arc<GrantRegistry> {
		&self.registry
	}

	/// Runs the request to a terminal response; never errors.
	pub async fn token(&self, request: &TokenRequest) -> EndpointResponse {
		let span = GrantSpan::new(&request.grant_type, "token");

		obs::record_grant_outcome(&request.grant_type, GrantOutcome::Attempt);

		let response = span.instrument(self.token_inner(request)).await;
		let outcome =
			if response.is_success() { GrantOutcome::Success } else { GrantOutcome::Failure };

		obs::record_grant_outcome(&request.grant_type, outcome);

		response
	}

	async fn token_inner(&self, request: &TokenRequest) -> EndpointResponse {
		let authenticator = match self.registry.resolve(&request.grant_type) {
			Ok(authenticator) => authenticator,
			Err(_) => return EndpointResponse::unsupported_grant_type(),
		};
		let record = match authenticator.authenticate(&request.fields).await {
			Ok(record) => record,
			Err(AuthError::InvalidCredentials) => return EndpointResponse::invalid_grant(),
			Err(AuthError::UnsupportedGrantType { .. }) =>
				return EndpointResponse::unsupported_grant_type(),
			Err(AuthError::Upstream { .. }) => return EndpointResponse::bad_gateway(),
		};

		// Issuance always rotates, so a record that already held a token gets a fresh one.
		match self.store.issue_token(&record.identification).await {
			Ok(token) => EndpointResponse::granted(token.expose()),
			Err(_) => EndpointResponse::bad_gateway(),
		}
	}
}
impl Debug for TokenEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEndpoint").field("registry", &self.registry).finish()
	}
}

/// Revokes presented tokens with a uniform acknowledgement.
pub struct RevocationEndpoint {
	store: Arc<dyn CredentialStore>,
}
impl RevocationEndpoint {
	/// Creates a revocation endpoint over the provided store.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self { store }
	}

	/// Revokes the presented token; always answers 200 so the endpoint cannot be used as a
	/// token-enumeration oracle.
	pub async fn revoke(&self, request: &RevocationRequest) -> EndpointResponse {
		// One explicit branch on presence; a miss (or a store fault) changes nothing
		// observable.
		if let Ok(Some(record)) = self.store.find_by_token(&request.token).await {
			let _ = self.store.reset_token(&record.identification).await;
		}

		EndpointResponse::ok()
	}
}
impl Debug for RevocationEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RevocationEndpoint(..)")
	}
}
