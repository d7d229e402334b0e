//! Specs describe a (possibly partial) package build.
//!
//! # Syntax
//! `name[@versions][%compiler[@versions]][+flag|~flag|key=v1,v2 ...][^dependency ...]`
//!
//! A spec without a leading name is anonymous, these are used as conditions, e.g. `~bluewaters` or `@2:`.

use serde::*;

use crate::variant::VariantMap;
use crate::version::VersionConstraint;

mod compiler;
pub use compiler::CompilerSpec;

mod parse;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
	pub name: Option<String>,
	pub versions: VersionConstraint,
	pub variants: VariantMap,
	pub compiler: Option<CompilerSpec>,
	/// Direct dependencies given with `^`.
	pub dependencies: Vec<Spec>,
	/// Every axis has exactly one value bound.
	pub concrete: bool,
}

impl Spec {
	pub fn parse(s: &str) -> crate::Result<Self> {
		parse::parse_spec(s)
	}

	/// A spec with only a name.
	pub fn named(name: &str) -> Self {
		Self { name: Some(name.to_string()), ..Default::default() }
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn is_anonymous(&self) -> bool {
		self.name.is_none()
	}

	pub fn dependency(&self, name: &str) -> Option<&Spec> {
		self.dependencies.iter().find(|d| d.name() == Some(name))
	}

	/// A copy of this node without any of its `^` dependencies.
	pub fn without_dependencies(&self) -> Self {
		Self { dependencies: Vec::new(), ..self.clone() }
	}

	/// Merges the constraints of `other` into `self`.
	///
	/// Returns whether `self` changed.
	/// # Errors
	/// Any of the `Unsatisfiable*` errors when a constraint of `other` can't be met alongside those of `self`.
	/// `self` is left as it was.
	pub fn constrain(&mut self, other: &Spec) -> crate::Result<bool> {
		let mut merged = self.clone();
		let changed = merged.constrain_in_place(other)?;
		*self = merged;
		Ok(changed)
	}

	fn constrain_in_place(&mut self, other: &Spec) -> crate::Result<bool> {
		let mut changed = false;

		match (&self.name, &other.name) {
			(Some(lhs), Some(rhs)) if lhs != rhs => {
				return Err(crate::Error::UnsatisfiableSpecName { provided: rhs.clone(), required: lhs.clone() });
			},
			(None, Some(rhs)) => {
				self.name = Some(rhs.clone());
				changed = true;
			},
			_ => {},
		}

		changed |= self.versions.constrain(&other.versions)?;

		match (&mut self.compiler, &other.compiler) {
			(Some(lhs), Some(rhs)) => changed |= lhs.constrain(rhs)?,
			(None, Some(rhs)) => {
				self.compiler = Some(rhs.clone());
				changed = true;
			},
			(_, None) => {},
		}

		changed |= self.variants.constrain(&other.variants, other.concrete)?;

		for dep in &other.dependencies {
			let existing = self.dependencies.iter_mut().find(|d| d.name.is_some() && d.name == dep.name);
			if let Some(existing) = existing {
				changed |= existing.constrain_in_place(dep)?;
			} else {
				self.dependencies.push(dep.clone());
				changed = true;
			}
		}

		Ok(changed)
	}

	/// Returns `true` if `self` meets the constraints of `other`.
	///
	/// When not `strict` it is enough for the constraints to be compatible, e.g. overlapping versions
	/// or a variant `other` sets that `self` leaves open.
	pub fn satisfies(&self, other: &Spec, strict: bool) -> bool {
		if let Some(name) = &other.name {
			if self.name.as_ref() != Some(name) {
				return false;
			}
		}

		let versions = if strict {
			self.versions.is_subset_of(&other.versions)
		} else {
			self.versions.overlaps(&other.versions)
		};
		if !versions {
			return false;
		}

		let compiler = match (&self.compiler, &other.compiler) {
			(_, None) => true,
			(None, Some(_)) => !strict,
			(Some(lhs), Some(rhs)) => lhs.satisfies(rhs, strict),
		};
		if !compiler {
			return false;
		}

		if !self.variants.satisfies(&other.variants, strict || self.concrete) {
			return false;
		}

		other.dependencies.iter().all(|dep| {
			match dep.name().and_then(|n| self.dependency(n)) {
				Some(existing) => existing.satisfies(dep, strict),
				None => !strict,
			}
		})
	}
}

impl std::str::FromStr for Spec {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl TryFrom<&str> for Spec {
	type Error = crate::Error;
	fn try_from(value: &str) -> Result<Self, Self::Error> { Self::parse(value) }
}

impl std::fmt::Display for Spec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut s = String::new();
		if let Some(name) = &self.name {
			s.push_str(name);
		}
		if !self.versions.is_any() {
			s.push_str(&format!("@{}", self.versions));
		}
		if let Some(compiler) = &self.compiler {
			s.push_str(&compiler.to_string());
		}
		s.push_str(&self.variants.to_string());
		for dep in &self.dependencies {
			s.push_str(&format!(" ^{}", dep));
		}
		write!(f, "{}", s.trim_start())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn s(text: &str) -> Spec { Spec::parse(text).unwrap() }

	#[test]
	fn spec_constrain_merges_everything() {
		let mut a = s("hdf5@1.8:");
		assert!(a.constrain(&s("hdf5@:1.10+mpi%gcc")).unwrap());
		assert_eq!(a, s("hdf5@1.8:1.10%gcc+mpi"));
		assert!(!a.constrain(&s("hdf5+mpi")).unwrap());
	}

	#[test]
	fn spec_constrain_names_anonymous() {
		let mut a = s("+mpi");
		assert!(a.constrain(&s("hdf5")).unwrap());
		assert_eq!(a.name(), Some("hdf5"));
	}

	#[test]
	fn spec_constrain_name_conflict() {
		let mut a = s("hdf5");
		assert!(matches!(a.constrain(&s("zlib")), Err(crate::Error::UnsatisfiableSpecName { .. })));
	}

	#[test]
	fn spec_constrain_version_conflict() {
		let mut a = s("hdf5@1.8");
		assert!(matches!(a.constrain(&s("hdf5@1.10")), Err(crate::Error::UnsatisfiableVersionSpec { .. })));
	}

	#[test]
	fn spec_constrain_failure_leaves_spec_unchanged() {
		let mut a = s("hdf5@1.8:+mpi");
		let before = a.clone();
		/* versions and compiler would merge, the variant can't */
		assert!(a.constrain(&s("hdf5@:1.10%gcc~mpi")).is_err());
		assert_eq!(a, before);

		let mut a = s("enzo ^hdf5@1.8");
		let before = a.clone();
		assert!(a.constrain(&s("enzo ^python ^hdf5@1.10")).is_err());
		assert_eq!(a, before);
	}

	#[test]
	fn spec_constrain_dependencies() {
		let mut a = s("enzo ^hdf5@1.8:");
		assert!(a.constrain(&s("enzo ^hdf5@:1.10 ^python")).unwrap());
		assert_eq!(a.dependency("hdf5"), Some(&s("hdf5@1.8:1.10")));
		assert!(a.dependency("python").is_some());
	}

	#[test]
	fn spec_satisfies_non_strict() {
		let pkg = s("enzo@2.5");
		assert!(pkg.satisfies(&s("~bluewaters"), false));
		assert!(pkg.satisfies(&s("@2:"), false));
		assert!(!pkg.satisfies(&s("@:2.4"), false));
		assert!(!s("enzo+bluewaters").satisfies(&s("~bluewaters"), false));
		assert!(!pkg.satisfies(&s("zlib"), false));
	}

	#[test]
	fn spec_satisfies_strict() {
		assert!(s("enzo@2.5+cray").satisfies(&s("enzo@2:+cray"), true));
		assert!(!s("enzo@2:").satisfies(&s("enzo@2.5"), true));
		assert!(!s("enzo").satisfies(&s("enzo+cray"), true));
		assert!(!s("enzo").satisfies(&s("enzo%gcc"), true));
		assert!(s("enzo").satisfies(&s("enzo%gcc"), false));
	}

	#[test]
	fn spec_satisfies_dependencies() {
		assert!(s("enzo ^mpich@3").satisfies(&s("^mpich"), true));
		assert!(!s("enzo ^mpich@3").satisfies(&s("^mpich@1"), false));
		assert!(!s("enzo").satisfies(&s("^mpich"), true));
	}

	#[test]
	fn spec_without_dependencies() {
		assert_eq!(s("enzo@2.5 ^hdf5 ^mpich").without_dependencies(), s("enzo@2.5"));
	}
}
