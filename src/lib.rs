//! Grant-type-dispatched bearer token broker—resolve password, delegated
//! social-identity, and runtime-registered custom grants into one token/revocation
//! endpoint pair with a three-outcome error taxonomy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod authenticator;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or
	//! the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Identification, IdentityRecord, PasswordSecret},
		authenticator::DelegatedAuthenticator,
		dispatch::GrantRegistry,
		endpoint::{RevocationEndpoint, TokenEndpoint},
		http::{DelegatedHttpClient, ReqwestProfileClient},
		provider::DelegatedProvider,
		store::{CredentialStore, MemoryStore},
	};

	/// Fully wired broker stack backed by an in-memory store, shared across tests.
	pub struct TestStack {
		/// Token issuance endpoint.
		pub token_endpoint: TokenEndpoint,
		/// Token revocation endpoint.
		pub revocation_endpoint: RevocationEndpoint,
		/// Dispatcher handle used to register/clear custom providers.
		pub registry: Arc<GrantRegistry>,
		/// Backing store handle for fixture seeding and assertions.
		pub store: Arc<MemoryStore>,
	}

	/// Builds endpoints over a fresh in-memory store, registering the password grant plus
	/// one delegated authenticator per supplied provider.
	pub fn build_test_stack(providers: impl IntoIterator<Item = DelegatedProvider>) -> TestStack {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let http_client: Arc<dyn DelegatedHttpClient> = Arc::new(ReqwestProfileClient::default());
		let mut builder = GrantRegistry::builder().password(store.clone());

		for provider in providers {
			builder = builder.delegated(DelegatedAuthenticator::new(
				store.clone(),
				provider,
				http_client.clone(),
			));
		}

		let registry = Arc::new(builder.build());
		let token_endpoint = TokenEndpoint::new(registry.clone(), store.clone());
		let revocation_endpoint = RevocationEndpoint::new(store);

		TestStack { token_endpoint, revocation_endpoint, registry, store: store_backend }
	}

	/// Seeds one password login into the store and returns the stored record.
	pub async fn seed_login(
		store: &MemoryStore,
		identification: &str,
		password: &str,
	) -> IdentityRecord {
		let identification = Identification::new(identification)
			.expect("Login fixture identification should be valid.");
		let record =
			IdentityRecord::password_login(identification, PasswordSecret::new(password));

		store
			.provision(record)
			.await
			.expect("Seeding a login fixture into the memory store should succeed.")
	}

	/// Seeds one delegated login keyed by its external uid and returns the stored record.
	pub async fn seed_delegated_login(
		store: &MemoryStore,
		identification: &str,
		uid: &str,
	) -> IdentityRecord {
		let identification = Identification::new(identification)
			.expect("Delegated fixture identification should be valid.");
		let record = IdentityRecord::delegated(identification, uid, None);

		store
			.provision(record)
			.await
			.expect("Seeding a delegated login fixture into the memory store should succeed.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {bearer_broker as _, color_eyre as _, httpmock as _};
