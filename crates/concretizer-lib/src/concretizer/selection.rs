//! Picking a version and variant values for each discovered package.
//!
//! Versions allowed by the accumulated constraint are ranked by
//! 1. the configured preference order, listed versions before unlisted ones,
//! 1. the recipe's `preferred` flag,
//! 1. anything but `develop`,
//! 1. newest first.

use super::*;
use crate::catalog::VersionInfo;
use crate::spec::CompilerSpec;
use crate::variant::VariantMap;
use crate::version::{Version, VersionConstraint};

/// The choices made for one package.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
	pub name: String,
	pub version: Version,
	pub variants: VariantMap,
	/// Carried over from the constraint, compilers aren't chosen here.
	pub compiler: Option<CompilerSpec>,
}

impl Selection {
	/// The selection as a spec.
	pub fn to_spec(&self) -> Spec {
		Spec {
			name: Some(self.name.clone()),
			versions: VersionConstraint::exact(self.version.clone()),
			variants: self.variants.clone(),
			compiler: self.compiler.clone(),
			dependencies: Vec::new(),
			/* TODO: Commit selections back into a concrete graph, at which point dependencies and the compiler get bound as well. */
			concrete: false,
		}
	}
}

impl std::fmt::Display for Selection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_spec())
	}
}

impl<'c> Concretizer<'c> {
	fn enumeration(&self, name: &str) -> crate::Result<&PackageEnumeration> {
		self.packages.get(name).ok_or_else(|| crate::Error::UnknownPackage(name.to_string()))
	}

	/// Versions of `name` allowed by its constraint, best first.
	pub fn candidate_versions(&self, name: &str) -> crate::Result<Vec<Version>> {
		let constraint = &self.enumeration(name)?.spec.versions;
		let declared = self.catalog.versions(name).ok_or_else(|| crate::Error::UnknownPackage(name.to_string()))?;
		let rank = self.prefs.ranker(name);

		let mut candidates: Vec<(&Version, &VersionInfo)> = declared.iter()
			.filter(|(v, _)| constraint.contains(v))
			.collect();

		candidates.sort_by(|(a, a_info), (b, b_info)| {
			let a_rank = rank(*a).unwrap_or(usize::MAX);
			let b_rank = rank(*b).unwrap_or(usize::MAX);
			a_rank.cmp(&b_rank)
				.then_with(|| b_info.preferred.cmp(&a_info.preferred))
				.then_with(|| a.is_develop().cmp(&b.is_develop()))
				.then_with(|| b.cmp(a))
		});

		Ok(candidates.into_iter().map(|(v, _)| v.clone()).collect())
	}

	/// # Errors
	/// [`NoVersionsAvailable`](crate::Error::NoVersionsAvailable) when no declared version is within the constraint.
	pub fn select_version(&self, name: &str) -> crate::Result<Version> {
		self.candidate_versions(name)?.into_iter().next().ok_or_else(|| crate::Error::NoVersionsAvailable {
			package: name.to_string(),
			constraint: self.packages.get(name).map(|p| p.spec.versions.to_string()).unwrap_or_default(),
		})
	}

	/// One value for every discovered variant, what the constraint set or else the default.
	pub fn select_variants(&self, name: &str) -> crate::Result<VariantMap> {
		let enumeration = self.enumeration(name)?;
		let mut variants = VariantMap::new();
		for variant in enumeration.variants.values() {
			let vspec = match enumeration.spec.variants.get(&variant.name) {
				Some(set) => set.clone(),
				None => variant.make_default(),
			};
			variants.insert(vspec)?;
		}
		Ok(variants)
	}

	pub fn select(&self, name: &str) -> crate::Result<Selection> {
		let selection = Selection {
			name: name.to_string(),
			version: self.select_version(name)?,
			variants: self.select_variants(name)?,
			compiler: self.enumeration(name)?.spec.compiler.clone(),
		};
		log::debug!("selected {}", selection);
		Ok(selection)
	}

	/// Selections for every discovered package.
	///
	/// Fails on the first package that can't be selected.
	pub fn select_all(&self) -> crate::Result<BTreeMap<String, Selection>> {
		let mut selections = BTreeMap::<String, Selection>::new();
		for name in self.packages.keys() {
			selections.insert(name.clone(), self.select(name)?);
		}
		Ok(selections)
	}
}
