//! Strongly typed identification key enforced across the broker domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFICATION_MAX_LEN: usize = 128;

/// Error returned when identification validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentificationError {
	/// The identification was empty.
	#[error("Identification cannot be empty.")]
	Empty,
	/// The identification contains whitespace characters.
	#[error("Identification contains whitespace.")]
	ContainsWhitespace,
	/// The identification exceeded the allowed character count.
	#[error("Identification exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Unique, stable lookup key for an [`IdentityRecord`](crate::auth::IdentityRecord).
///
/// Typically an email address or account name; never a secret.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identification(String);
impl Identification {
	/// Creates a new identification after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentificationError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for Identification {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Identification {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Identification> for String {
	fn from(value: Identification) -> Self {
		value.0
	}
}
impl TryFrom<String> for Identification {
	type Error = IdentificationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for Identification {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for Identification {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Identification({})", self.0)
	}
}
impl Display for Identification {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for Identification {
	type Err = IdentificationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentificationError> {
	if view.is_empty() {
		return Err(IdentificationError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentificationError::ContainsWhitespace);
	}
	if view.len() > IDENTIFICATION_MAX_LEN {
		return Err(IdentificationError::TooLong { max: IDENTIFICATION_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identification_validates_shape() {
		assert!(Identification::new("").is_err());
		assert!(Identification::new("user name").is_err());
		assert!(Identification::new(" user@example.com").is_err());

		let identification = Identification::new("user@example.com")
			.expect("Identification fixture should be considered valid.");

		assert_eq!(identification.as_ref(), "user@example.com");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let identification: Identification = serde_json::from_str("\"user@example.com\"")
			.expect("Identification should deserialize successfully.");

		assert_eq!(identification.as_ref(), "user@example.com");
		assert!(serde_json::from_str::<Identification>("\"with space\"").is_err());
		assert!(serde_json::from_str::<Identification>("\"\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		let exact = "a".repeat(IDENTIFICATION_MAX_LEN);

		Identification::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFICATION_MAX_LEN + 1);

		assert!(Identification::new(&too_long).is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<Identification, u8> = HashMap::from_iter([(
			Identification::new("user@example.com")
				.expect("Identification used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("user@example.com"), Some(&7));
	}
}
