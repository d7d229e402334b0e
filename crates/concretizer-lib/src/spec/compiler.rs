use serde::*;

use crate::version::VersionConstraint;

/// The compiler a spec is built with, written `%name[@versions]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerSpec {
	pub name: String,
	pub versions: VersionConstraint,
}

impl CompilerSpec {
	pub fn new(name: &str, versions: VersionConstraint) -> Self {
		Self { name: name.to_string(), versions }
	}

	pub fn satisfies(&self, other: &Self, strict: bool) -> bool {
		self.name == other.name && if strict {
			self.versions.is_subset_of(&other.versions)
		} else {
			self.versions.overlaps(&other.versions)
		}
	}

	/// Returns whether `self` changed.
	pub fn constrain(&mut self, other: &Self) -> crate::Result<bool> {
		let unsatisfiable = || crate::Error::UnsatisfiableCompilerSpec {
			provided: other.to_string(),
			required: self.to_string(),
		};
		if self.name != other.name {
			return Err(unsatisfiable());
		}
		match self.versions.intersection(&other.versions) {
			Some(joined) => {
				let changed = joined != self.versions;
				self.versions = joined;
				Ok(changed)
			},
			None => Err(unsatisfiable()),
		}
	}
}

impl std::fmt::Display for CompilerSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.versions.is_any() {
			write!(f, "%{}", self.name)
		} else {
			write!(f, "%{}@{}", self.name, self.versions)
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn gcc(v: &str) -> CompilerSpec { CompilerSpec::new("gcc", v.parse().unwrap()) }

	#[test]
	fn compiler_display() {
		assert_eq!(gcc("4.9:").to_string(), "%gcc@4.9:");
		assert_eq!(gcc(":").to_string(), "%gcc");
	}

	#[test]
	fn compiler_constrain() {
		let mut a = gcc("4.9:");
		assert!(a.constrain(&gcc(":7")).unwrap());
		assert_eq!(a, gcc("4.9:7"));
		assert!(matches!(a.constrain(&gcc("8")), Err(crate::Error::UnsatisfiableCompilerSpec { .. })));
		assert!(matches!(a.constrain(&CompilerSpec::new("clang", Default::default())), Err(crate::Error::UnsatisfiableCompilerSpec { .. })));
	}
}
