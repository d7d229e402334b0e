//! Package recipes as the catalog stores them.

use std::collections::{BTreeMap, BTreeSet};
use serde::*;

use crate::spec::Spec;
use crate::variant::Variant;
use crate::version::Version;

/// Extra information a recipe attaches to one of its versions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
	/// Picked ahead of newer versions when nothing else decides.
	pub preferred: bool,
}

/// The phase of the build a dependency is needed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DependencyType {
	Build,
	Link,
	Run,
}

impl DependencyType {
	/// Used when a recipe doesn't say.
	pub fn defaults() -> BTreeSet<DependencyType> {
		BTreeSet::from([DependencyType::Build, DependencyType::Link])
	}
}

impl std::str::FromStr for DependencyType {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"build" => Ok(DependencyType::Build),
			"link" => Ok(DependencyType::Link),
			"run" => Ok(DependencyType::Run),
			_ => Err(crate::Error::Parse(format!("unknown dependency type \"{}\"", s))),
		}
	}
}

impl std::fmt::Display for DependencyType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DependencyType::Build => write!(f, "build"),
			DependencyType::Link => write!(f, "link"),
			DependencyType::Run => write!(f, "run"),
		}
	}
}

/// The condition under which a declaration applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
	Always,
	/// Applies when the owning package can satisfy the anonymous spec.
	When(Spec),
}

impl Clause {
	/// Whether the clause can still hold for a package constrained by `package`.
	///
	/// Constraints the package hasn't decided yet count as possible.
	pub fn may_apply(&self, package: &Spec) -> bool {
		match self {
			Clause::Always => true,
			Clause::When(condition) => package.satisfies(condition, false),
		}
	}
}

impl std::fmt::Display for Clause {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Clause::Always => write!(f, "always"),
			Clause::When(s) => write!(f, "when {}", s),
		}
	}
}

/// A dependency declared by a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
	/// Constraint placed on the target, the name is the target package.
	pub spec: Spec,
	pub types: BTreeSet<DependencyType>,
	pub when: Clause,
}

impl Dependency {
	pub fn new(spec: Spec, types: BTreeSet<DependencyType>, when: Clause) -> Self {
		Self { spec, types, when }
	}

	/// Name of the target package.
	pub fn target(&self) -> &str {
		self.spec.name().unwrap_or_default()
	}
}

impl std::fmt::Display for Dependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let types: Vec<String> = self.types.iter().map(|t| t.to_string()).collect();
		write!(f, "{} ({}) {}", self.spec, types.join(","), self.when)
	}
}

/// A virtual package this package can stand in for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provision {
	/// The virtual package and the versions of it that are provided.
	pub spec: Spec,
	pub when: Clause,
}

/// A package recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
	pub name: String,
	pub description: Option<String>,
	pub versions: BTreeMap<Version, VersionInfo>,
	pub variants: BTreeMap<String, Variant>,
	/// Keyed by the name of the target package.
	pub dependencies: BTreeMap<String, Vec<Dependency>>,
	pub provides: Vec<Provision>,
}

impl Package {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			description: None,
			versions: BTreeMap::new(),
			variants: BTreeMap::new(),
			dependencies: BTreeMap::new(),
			provides: Vec::new(),
		}
	}

	/* Builder style helpers, used by tests and anything constructing recipes in code */

	pub fn with_version(mut self, version: Version, preferred: bool) -> Self {
		self.versions.insert(version, VersionInfo { preferred });
		self
	}

	/// # Errors
	/// [`crate::Error::DuplicateVariant`] if the package already declares a variant with this name.
	pub fn with_variant(mut self, variant: Variant) -> crate::Result<Self> {
		if self.variants.contains_key(&variant.name) {
			return Err(crate::Error::DuplicateVariant { variant: variant.name, package: Some(self.name) });
		}
		self.variants.insert(variant.name.clone(), variant);
		Ok(self)
	}

	/// # Errors
	/// [`crate::Error::AnonymousSpecUnsupported`] if the dependency has no name.
	pub fn with_dependency(mut self, dependency: Dependency) -> crate::Result<Self> {
		let target = dependency.spec.name()
			.ok_or_else(|| crate::Error::AnonymousSpecUnsupported(dependency.spec.to_string()))?
			.to_string();
		let entry = self.dependencies.entry(target).or_default();
		if !entry.contains(&dependency) {
			entry.push(dependency);
		}
		Ok(self)
	}

	/// # Errors
	/// [`crate::Error::AnonymousSpecUnsupported`] if the provided spec has no name.
	pub fn with_provision(mut self, spec: Spec, when: Clause) -> crate::Result<Self> {
		if spec.is_anonymous() {
			return Err(crate::Error::AnonymousSpecUnsupported(spec.to_string()));
		}
		self.provides.push(Provision { spec, when });
		Ok(self)
	}

	/// Does any provision name `virtual_name`.
	pub fn provides(&self, virtual_name: &str) -> bool {
		self.provides.iter().any(|p| p.spec.name() == Some(virtual_name))
	}
}
