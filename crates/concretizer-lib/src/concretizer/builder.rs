use std::collections::BTreeMap;

use super::{Concretizer, ExpansionGraph};
use crate::catalog::Catalog;
use crate::config::PackagePrefs;
use crate::spec::Spec;

pub struct ConcretizerBuilder<'c> {
	catalog: &'c Catalog,
	prefs: PackagePrefs,

	specs: Vec<Spec>,
}

impl<'c> ConcretizerBuilder<'c> {
	pub fn new(catalog: &'c Catalog) -> Self {
		Self {
			catalog,
			prefs: Default::default(),
			specs: Default::default(),
		}
	}

	pub fn add_spec(mut self, spec: Spec) -> Self {
		self.specs.push(spec);
		self
	}

	pub fn add_specs(mut self, specs: impl IntoIterator<Item = Spec>) -> Self {
		for spec in specs {
			self.specs.push(spec);
		}
		self
	}

	pub fn package_prefs(mut self, prefs: PackagePrefs) -> Self {
		self.prefs = prefs;
		self
	}

	/// Seeds the concretizer with the specs and expands it to a fixed point.
	///
	/// # Errors
	/// - [`AnonymousSpecUnsupported`](crate::Error::AnonymousSpecUnsupported), [`VirtualPackageUnsupported`](crate::Error::VirtualPackageUnsupported)
	/// or [`UnknownPackage`](crate::Error::UnknownPackage) for a spec that can't be concretized.
	/// - [`UnknownVariant`](crate::Error::UnknownVariant), [`InvalidVariantValue`](crate::Error::InvalidVariantValue)
	/// or [`MultipleValuesInExclusiveVariant`](crate::Error::MultipleValuesInExclusiveVariant) for a variant the package doesn't accept.
	/// - Any of the `Unsatisfiable*` errors when specs for the same package conflict.
	/// - [`ExpansionLimitExceeded`](crate::Error::ExpansionLimitExceeded) if the expansion doesn't settle.
	pub fn build(self) -> crate::Result<Concretizer<'c>> {
		let mut concretizer = Concretizer {
			catalog: self.catalog,
			prefs: self.prefs,
			initial_specs: Vec::new(),
			leaf_specs: Vec::new(),
			needed_dep_specs: Vec::new(),
			packages: BTreeMap::new(),
			virtual_packages: BTreeMap::new(),
			graph: ExpansionGraph::default(),
			passes: 0,
		};

		for spec in self.specs {
			concretizer.add_spec(&spec, false)?;
			concretizer.initial_specs.push(spec);
		}

		concretizer.seed()?;
		concretizer.expand()?;
		Ok(concretizer)
	}
}
