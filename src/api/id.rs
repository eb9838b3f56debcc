//! Server-assigned resource identifiers, validated on construction and deserialization.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}

			/// Returns the identifier as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (source, job, tag, ...).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (source, job, tag, ...).
		kind: &'static str,
	},
	/// The identifier cannot be used as a single URL path segment.
	#[error("{kind} identifier is not a valid path segment.")]
	InvalidPathSegment {
		/// Kind of identifier (source, job, tag, ...).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (source, job, tag, ...).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { AccountId, "Identifier of the account a resource is scoped to.", "Account" }
def_id! { UserId, "Identifier of a dashboard user.", "User" }
def_id! { SourceId, "Identifier of a connected data source.", "Source" }
def_id! { JobId, "Identifier of a backup job.", "Job" }
def_id! { RunId, "Identifier of a single backup job run.", "Run" }
def_id! { TagId, "Identifier of a tag.", "Tag" }
def_id! { EventId, "Identifier of an activity event.", "Event" }
def_id! { PlatformId, "Identifier of an integration platform (e.g. `keap`, `stripe`).", "Platform" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if matches!(view, "." | "..") || view.contains(['/', '\\', '?', '#', '%']) {
		return Err(IdentifierError::InvalidPathSegment { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(SourceId::new(" s1").is_err(), "Leading whitespace must be rejected.");
		assert!(JobId::new("job 1").is_err(), "Inner whitespace must be rejected.");
		assert!(matches!(TagId::new(""), Err(IdentifierError::Empty { kind: "Tag" })));

		let source = SourceId::new("src_01HZX").expect("Source fixture should be valid.");

		assert_eq!(source.as_ref(), "src_01HZX");
		assert_eq!(format!("{source:?}"), "Source(src_01HZX)");
	}

	#[test]
	fn deserialization_enforces_validation() {
		let source: SourceId =
			serde_json::from_str("\"s1\"").expect("Source id should deserialize successfully.");

		assert_eq!(&*source, "s1");
		assert!(serde_json::from_str::<PlatformId>("\"with space\"").is_err());

		let nbsp = format!("\"acct{}1\"", '\u{00A0}');

		assert!(serde_json::from_str::<AccountId>(&nbsp).is_err());
	}

	#[test]
	fn identifiers_stay_inside_their_path_segment() {
		for raw in ["../account", "..", ".", "s1/runs", "s1\\x", "s1?x=1", "s1#top", "%2e%2e"] {
			assert_eq!(
				SourceId::new(raw),
				Err(IdentifierError::InvalidPathSegment { kind: "Source" }),
				"`{raw}` must be rejected."
			);
		}

		assert!(serde_json::from_str::<JobId>("\"../account\"").is_err());
		SourceId::new("src.v2-01_HZX").expect("Dots inside an identifier should be accepted.");
	}

	#[test]
	fn length_limit_is_inclusive() {
		RunId::new("r".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(matches!(
			RunId::new("r".repeat(IDENTIFIER_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { kind: "Run", max: IDENTIFIER_MAX_LEN })
		));
	}

	#[test]
	fn borrow_supports_lookup_by_str() {
		let map: HashMap<EventId, u8> = HashMap::from_iter([(
			EventId::new("evt-1").expect("Event id used for lookup should be valid."),
			3_u8,
		)]);

		assert_eq!(map.get("evt-1"), Some(&3));
	}
}
