//! Versions and the constraints placed on them.

use serde::*;

mod version_bounds;
pub use version_bounds::VersionBounds;

mod version_constraint;
pub use version_constraint::VersionConstraint;

/// The symbolic version tracking a package's development branch.
pub const DEVELOP: &str = "develop";

/// One piece of a version string.
///
/// The derived ordering places alphabetic components below numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
enum Component {
	Alpha(String),
	Numeric(u64),
}

/// The version of a package.
///
/// # Format
/// Versions are split into components on `.`, `-` and `_` as well as on every transition
/// between digits and letters, so `1.2rc3` has the components `1`, `2`, `rc`, `3`.
/// - Numeric components compare numerically, alphabetic components compare lexically.
/// - A version which is a prefix of another is older, `1.2 < 1.2.3`.
/// - [`DEVELOP`] is newer than every other version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
	text: String,
	components: Vec<Component>,
}

impl Version {
	pub fn new(version: &str) -> crate::Result<Self> {
		let text = version.trim();
		if text.is_empty() {
			return Err(crate::Error::Parse("version can't be empty".to_string()));
		}

		let mut components = Vec::<Component>::new();
		let mut buf = String::new();

		fn flush(buf: &mut String, components: &mut Vec<Component>) -> crate::Result<()> {
			if buf.is_empty() {
				return Ok(());
			}
			let c = if buf.chars().all(|c| c.is_ascii_digit()) {
				Component::Numeric(buf.parse::<u64>().map_err(|e| crate::Error::Parse(format!("version component \"{}\" is too large: {}", buf, e)))?)
			} else {
				Component::Alpha(buf.clone())
			};
			components.push(c);
			buf.clear();
			Ok(())
		}

		for c in text.chars() {
			match c {
				'.' | '-' | '_' => flush(&mut buf, &mut components)?,
				c if c.is_ascii_alphanumeric() => {
					/* Split on digit <-> letter transitions */
					if let Some(last) = buf.chars().last() {
						if last.is_ascii_digit() != c.is_ascii_digit() {
							flush(&mut buf, &mut components)?;
						}
					}
					buf.push(c);
				},
				c => return Err(crate::Error::Parse(format!("invalid character '{}' in version \"{}\"", c, text))),
			}
		}
		flush(&mut buf, &mut components)?;

		if components.is_empty() {
			return Err(crate::Error::Parse(format!("version \"{}\" has no components", text)));
		}

		Ok(Version { text: text.to_string(), components })
	}

	pub fn develop() -> Self {
		Version { text: DEVELOP.to_string(), components: vec![Component::Alpha(DEVELOP.to_string())] }
	}

	/// Is this the development branch sentinel.
	pub fn is_develop(&self) -> bool {
		self.text == DEVELOP
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}
}

impl std::str::FromStr for Version {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl AsRef<str> for Version {
	fn as_ref(&self) -> &str {
		&self.text
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		use std::cmp::Ordering;
		match (self.is_develop(), other.is_develop()) {
			(true, true) => Ordering::Equal,
			(true, false) => Ordering::Greater,
			(false, true) => Ordering::Less,
			(false, false) => self.components.cmp(&other.components),
		}
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Eq for Version {}

impl std::hash::Hash for Version {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.components.hash(state);
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.text)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	#[test] fn version_are_not_compared_lexically() { assert!(v("1.2.4") < v("1.2.10")) }
	#[test] fn version_short_version_is_lt() { assert!(v("1.2") < v("1.2.3")) }
	#[test] fn version_identical_are_eq() { assert!(v("1.2.3") == v("1.2.3")) }
	#[test] fn version_separators_are_equivalent() { assert!(v("1.2-3") == v("1_2.3")) }
	#[test] fn version_higher_version_is_gt() { assert!(v("1.2.3") < v("1.2.4")) }
	#[test] fn version_alpha_is_lt_numeric() { assert!(v("1.2a") < v("1.2.0")) }
	#[test] fn version_alpha_compared_lexically() { assert!(v("1.2a") < v("1.2b")) }
	#[test] fn version_release_candidate() { assert!(v("2.0rc1") < v("2.0rc2")) }
	#[test] fn version_develop_is_greatest() { assert!(v("develop") > v("999.999")) }
	#[test] fn version_develop_is_develop() { assert!(v("develop").is_develop() && !v("2.0").is_develop()) }
	#[test] fn version_develop_eq_constructor() { assert_eq!(v("develop"), Version::develop()) }
	#[test] fn version_display_keeps_text() { assert_eq!(v("1.8.16").to_string(), "1.8.16") }
	#[test] fn version_empty_is_error() { assert!(Version::new("").is_err()) }
	#[test] fn version_bad_character_is_error() { assert!(Version::new("1.2+3").is_err()) }

	#[test]
	fn version_ordering_is_total() {
		let mut versions = vec![v("develop"), v("2.0"), v("1.0"), v("1.2"), v("1.2a"), v("1.10")];
		versions.sort();
		let s: Vec<_> = versions.iter().map(|v| v.as_str()).collect();
		assert_eq!(s, vec!["1.0", "1.2", "1.2a", "1.10", "2.0", "develop"]);
	}
}
