//! Per package working state of the expansion.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Dependency;
use crate::spec::Spec;
use crate::variant::Variant;

/// Everything known about a package that might be in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageEnumeration {
	/// Every constraint placed on the package by the requested specs.
	pub spec: Spec,
	/// Dependencies whose clauses may apply, keyed by target name.
	pub dependencies: BTreeMap<String, Vec<Dependency>>,
	pub variants: BTreeMap<String, Variant>,
}

impl PackageEnumeration {
	pub fn new(spec: Spec) -> Self {
		Self { spec, dependencies: BTreeMap::new(), variants: BTreeMap::new() }
	}

	pub fn name(&self) -> &str {
		self.spec.name().unwrap_or_default()
	}

	/// Returns `false` if an identical dependency is already known.
	pub fn add_dependency(&mut self, dependency: &Dependency) -> bool {
		let known = self.dependencies.entry(dependency.target().to_string()).or_default();
		if known.contains(dependency) {
			false
		} else {
			known.push(dependency.clone());
			true
		}
	}

	/// Returns `false` if a variant with the same name is already known, the known one is kept.
	pub fn add_variant(&mut self, variant: &Variant) -> bool {
		if self.variants.contains_key(&variant.name) {
			false
		} else {
			self.variants.insert(variant.name.clone(), variant.clone());
			true
		}
	}

	pub fn dependency_count(&self) -> usize {
		self.dependencies.values().map(Vec::len).sum()
	}
}

impl std::fmt::Display for PackageEnumeration {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "Package: {}", self.name())?;
		writeln!(f, "  Constraint: {}", self.spec)?;
		writeln!(f, "  Dependencies:")?;
		for (name, deps) in &self.dependencies {
			writeln!(f, "    {}:", name)?;
			for dep in deps {
				writeln!(f, "      {}", dep)?;
			}
		}
		writeln!(f, "  Variants:")?;
		for variant in self.variants.values() {
			writeln!(f, "    {}", variant)?;
		}
		Ok(())
	}
}

/// The packages found to provide a virtual package.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualPackageEnumeration {
	pub name: String,
	pub providers: BTreeSet<String>,
}

impl VirtualPackageEnumeration {
	pub fn new(name: &str) -> Self {
		Self { name: name.to_string(), providers: BTreeSet::new() }
	}

	/// Returns `false` if the provider is already known.
	pub fn add_provider(&mut self, provider: &str) -> bool {
		self.providers.insert(provider.to_string())
	}
}

impl std::fmt::Display for VirtualPackageEnumeration {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "Virtual Package: {}", self.name)?;
		writeln!(f, "  Possible Providers:")?;
		for provider in &self.providers {
			writeln!(f, "    {}", provider)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::catalog::{Clause, DependencyType};

	#[test]
	fn enumeration_dependencies_are_duplicate_insensitive() {
		let mut package = PackageEnumeration::new(Spec::named("enzo"));
		let dep = Dependency::new(Spec::named("hdf5"), DependencyType::defaults(), Clause::Always);
		assert!(package.add_dependency(&dep));
		assert!(!package.add_dependency(&dep));
		let conditional = Dependency::new(Spec::named("hdf5"), DependencyType::defaults(), Clause::When(Spec::parse("+mpi").unwrap()));
		assert!(package.add_dependency(&conditional));
		assert_eq!(package.dependency_count(), 2);
	}

	#[test]
	fn enumeration_first_variant_wins() {
		let mut package = PackageEnumeration::new(Spec::named("enzo"));
		assert!(package.add_variant(&Variant::boolean("mpi", true, "")));
		assert!(!package.add_variant(&Variant::boolean("mpi", false, "")));
		assert!(package.variants["mpi"].default == crate::variant::VariantValue::Bool(true));
	}

	#[test]
	fn virtual_providers() {
		let mut mpi = VirtualPackageEnumeration::new("mpi");
		assert!(mpi.add_provider("openmpi"));
		assert!(mpi.add_provider("mpich"));
		assert!(!mpi.add_provider("openmpi"));
		assert_eq!(mpi.to_string(), "Virtual Package: mpi\n  Possible Providers:\n    mpich\n    openmpi\n");
	}
}
