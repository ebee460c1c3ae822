//! Grant-type dispatch: the open string key and the two-tier authenticator registry.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{
	_prelude::*,
	authenticator::{AuthError, Authenticator, DelegatedAuthenticator, PasswordAuthenticator},
	store::CredentialStore,
};

const GRANT_TYPE_MAX_LEN: usize = 128;

/// Error returned when grant-type validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum GrantTypeError {
	/// The grant type was empty.
	#[error("Grant type cannot be empty.")]
	Empty,
	/// The grant type contains whitespace characters.
	#[error("Grant type contains whitespace.")]
	ContainsWhitespace,
	/// The grant type exceeded the allowed character count.
	#[error("Grant type exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Open-set grant-type key: any non-empty, whitespace-free string.
///
/// Deliberately not an enum—custom grant types are registered at process runtime, so the
/// key space is extensible beyond the built-in names.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GrantType(String);
impl GrantType {
	/// The built-in Open edX delegated grant name.
	pub const EDX_AUTH_CODE: &'static str = "edx_auth_code";
	/// The built-in Facebook delegated grant name.
	pub const FACEBOOK_AUTH_CODE: &'static str = "facebook_auth_code";
	/// The built-in Google delegated grant name.
	pub const GOOGLE_AUTH_CODE: &'static str = "google_auth_code";
	/// The built-in password grant name.
	pub const PASSWORD: &'static str = "password";

	/// Creates a new grant type after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, GrantTypeError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Grant type for the password grant.
	pub fn password() -> Self {
		Self(Self::PASSWORD.into())
	}

	/// Grant type for the Facebook delegated grant.
	pub fn facebook_auth_code() -> Self {
		Self(Self::FACEBOOK_AUTH_CODE.into())
	}

	/// Grant type for the Google delegated grant.
	pub fn google_auth_code() -> Self {
		Self(Self::GOOGLE_AUTH_CODE.into())
	}

	/// Grant type for the Open edX delegated grant.
	pub fn edx_auth_code() -> Self {
		Self(Self::EDX_AUTH_CODE.into())
	}
}
impl Deref for GrantType {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for GrantType {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<GrantType> for String {
	fn from(value: GrantType) -> Self {
		value.0
	}
}
impl TryFrom<String> for GrantType {
	type Error = GrantTypeError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for GrantType {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "GrantType({})", self.0)
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for GrantType {
	type Err = GrantTypeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), GrantTypeError> {
	if view.is_empty() {
		return Err(GrantTypeError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(GrantTypeError::ContainsWhitespace);
	}
	if view.len() > GRANT_TYPE_MAX_LEN {
		return Err(GrantTypeError::TooLong { max: GRANT_TYPE_MAX_LEN });
	}

	Ok(())
}

type AuthenticatorTable = HashMap<GrantType, Arc<dyn Authenticator>>;

/// Two-tier grant-type dispatcher.
///
/// The built-in tier is fixed at construction time; the custom tier is process-wide
/// mutable state replaced wholesale by
/// [`set_custom_providers`](GrantRegistry::set_custom_providers) (last-write-wins, no
/// merge) and consulted first, so operators can override a built-in binding without
/// mutating it. Readers take one consistent `Arc` snapshot of the custom tier per lookup.
pub struct GrantRegistry {
	builtin: AuthenticatorTable,
	custom: RwLock<Arc<AuthenticatorTable>>,
}
impl GrantRegistry {
	/// Creates a new builder for assembling the built-in tier.
	pub fn builder() -> GrantRegistryBuilder {
		GrantRegistryBuilder::default()
	}

	/// Resolves the authenticator bound to a grant-type string.
	pub fn resolve(&self, grant_type: &str) -> Result<Arc<dyn Authenticator>, AuthError> {
		let custom = self.custom.read().clone();

		if let Some(authenticator) = custom.get(grant_type) {
			return Ok(authenticator.clone());
		}
		if let Some(authenticator) = self.builtin.get(grant_type) {
			return Ok(authenticator.clone());
		}

		Err(AuthError::UnsupportedGrantType { grant_type: grant_type.to_owned() })
	}

	/// Replaces the entire custom tier; takes effect for subsequent requests only.
	pub fn set_custom_providers(&self, providers: AuthenticatorTable) {
		*self.custom.write() = Arc::new(providers);
	}

	/// Empties the custom tier.
	pub fn clear_custom_providers(&self) {
		*self.custom.write() = Arc::new(AuthenticatorTable::new());
	}

	/// Lists the grant types currently resolvable, custom tier included.
	pub fn grant_types(&self) -> Vec<GrantType> {
		let custom = self.custom.read().clone();
		let mut grant_types: Vec<_> =
			custom.keys().chain(self.builtin.keys()).cloned().collect();

		grant_types.sort();
		grant_types.dedup();

		grant_types
	}
}
impl Debug for GrantRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantRegistry")
			.field("builtin", &self.builtin.keys().collect::<Vec<_>>())
			.field("custom", &self.custom.read().keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Builder assembling the immutable built-in tier of a [`GrantRegistry`].
#[derive(Default)]
pub struct GrantRegistryBuilder {
	builtin: AuthenticatorTable,
}
impl GrantRegistryBuilder {
	/// Binds the password grant to a [`PasswordAuthenticator`] over the provided store.
	pub fn password(self, store: Arc<dyn CredentialStore>) -> Self {
		self.register(GrantType::password(), Arc::new(PasswordAuthenticator::new(store)))
	}

	/// Binds a delegated strategy under its descriptor's grant type.
	pub fn delegated(self, authenticator: DelegatedAuthenticator) -> Self {
		let grant_type = authenticator.provider().grant_type.clone();

		self.register(grant_type, Arc::new(authenticator))
	}

	/// Binds an arbitrary authenticator to a grant type; last binding wins.
	pub fn register(
		mut self,
		grant_type: GrantType,
		authenticator: Arc<dyn Authenticator>,
	) -> Self {
		self.builtin.insert(grant_type, authenticator);

		self
	}

	/// Consumes the builder, freezing the built-in tier.
	pub fn build(self) -> GrantRegistry {
		GrantRegistry { builtin: self.builtin, custom: RwLock::new(Arc::new(HashMap::new())) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::IdentityRecord,
		authenticator::{AuthFuture, GrantFields},
	};

	struct StubAuthenticator;
	impl Authenticator for StubAuthenticator {
		fn authenticate<'a>(
			&'a self,
			_fields: &'a GrantFields,
		) -> AuthFuture<'a, IdentityRecord> {
			Box::pin(async move { Err(AuthError::upstream_opaque()) })
		}
	}

	fn stub() -> Arc<dyn Authenticator> {
		Arc::new(StubAuthenticator)
	}

	fn grant(value: &str) -> GrantType {
		GrantType::new(value).expect("Grant-type fixture should be valid.")
	}

	#[test]
	fn grant_type_validates_shape() {
		assert!(GrantType::new("").is_err());
		assert!(GrantType::new("custom grant").is_err());
		assert!(GrantType::new("a".repeat(GRANT_TYPE_MAX_LEN + 1)).is_err());
		assert_eq!(GrantType::password().as_ref(), "password");
		assert_eq!(GrantType::facebook_auth_code().as_ref(), "facebook_auth_code");
		assert_eq!(GrantType::google_auth_code().as_ref(), "google_auth_code");
		assert_eq!(GrantType::edx_auth_code().as_ref(), "edx_auth_code");
	}

	#[test]
	fn resolve_misses_fail_with_unsupported_grant_type() {
		let registry = GrantRegistry::builder().build();
		let err = registry
			.resolve("UNKNOWN")
			.expect_err("An empty registry should resolve nothing.");

		assert!(matches!(
			err,
			AuthError::UnsupportedGrantType { grant_type } if grant_type == "UNKNOWN",
		));
	}

	#[test]
	fn set_replaces_and_clear_empties_the_custom_tier() {
		let registry = GrantRegistry::builder().build();

		registry.set_custom_providers(HashMap::from_iter([(
			grant("first_auth_code"),
			stub(),
		)]));

		assert!(registry.resolve("first_auth_code").is_ok());

		// Whole-table replacement, not a merge.
		registry.set_custom_providers(HashMap::from_iter([(
			grant("second_auth_code"),
			stub(),
		)]));

		assert!(registry.resolve("first_auth_code").is_err());
		assert!(registry.resolve("second_auth_code").is_ok());

		registry.clear_custom_providers();

		assert!(registry.resolve("second_auth_code").is_err());
	}

	#[test]
	fn custom_tier_overrides_a_built_in_binding() {
		let registry =
			GrantRegistry::builder().register(grant("partner_auth_code"), stub()).build();
		let builtin = registry
			.resolve("partner_auth_code")
			.expect("The built-in binding should resolve.");

		registry.set_custom_providers(HashMap::from_iter([(
			grant("partner_auth_code"),
			stub(),
		)]));

		let custom = registry
			.resolve("partner_auth_code")
			.expect("The overridden binding should resolve.");

		assert!(
			!Arc::ptr_eq(&builtin, &custom),
			"The custom tier must shadow the built-in binding.",
		);

		registry.clear_custom_providers();

		let restored = registry
			.resolve("partner_auth_code")
			.expect("Clearing the custom tier should restore the built-in binding.");

		assert!(Arc::ptr_eq(&builtin, &restored));
	}

	#[test]
	fn grant_types_lists_both_tiers_without_duplicates() {
		let registry =
			GrantRegistry::builder().register(grant("partner_auth_code"), stub()).build();

		registry.set_custom_providers(HashMap::from_iter([
			(grant("partner_auth_code"), stub()),
			(grant("bespoke_auth_code"), stub()),
		]));

		assert_eq!(
			registry.grant_types(),
			vec![grant("bespoke_auth_code"), grant("partner_auth_code")],
		);
	}
}
