//! Expands a set of requested specs into every package, virtual package, dependency and variant
//! that could end up in the tree, then picks versions and variant values for them.
//!
//! # Usage
//! 1. Create a [`ConcretizerBuilder`] with the [`Catalog`](crate::Catalog) to resolve against.
//! 1. Use the builder to add specs and version preferences.
//! 1. [`ConcretizerBuilder::build()`] to get a fully expanded [`Concretizer`].
//! 1. [`Concretizer::show()`] to inspect what was discovered, or [`Concretizer::select_all()`] to pick versions and variants.
//!
//! [`Concretizer::new()`] is a shortcut for a builder with no preferences.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::config::PackagePrefs;
use crate::spec::Spec;

mod expansion_graph;
pub use expansion_graph::{ExpansionGraph, NodeData, EdgeData};
mod enumeration;
pub use enumeration::{PackageEnumeration, VirtualPackageEnumeration};
mod builder;
pub use builder::ConcretizerBuilder;
mod expansion;
mod selection;
pub use selection::Selection;

#[derive(Debug)]
pub struct Concretizer<'c> {
	catalog: &'c Catalog,
	prefs: PackagePrefs,

	initial_specs: Vec<Spec>,
	/// Specs the user asked for, without their dependencies.
	leaf_specs: Vec<Spec>,
	/// Specs given as `^dependency` of another spec.
	needed_dep_specs: Vec<Spec>,

	packages: BTreeMap<String, PackageEnumeration>,
	virtual_packages: BTreeMap<String, VirtualPackageEnumeration>,
	graph: ExpansionGraph,
	passes: usize,
}

impl<'c> Concretizer<'c> {
	/// Creates and fully expands a concretizer for `specs`.
	///
	/// # Errors
	/// - [`AnonymousSpecUnsupported`](crate::Error::AnonymousSpecUnsupported) if a spec or one of its dependencies has no name.
	/// - [`VirtualPackageUnsupported`](crate::Error::VirtualPackageUnsupported) if a spec or one of its dependencies is virtual.
	/// - Any error from merging the specs or expanding them, see [`ConcretizerBuilder::build()`].
	pub fn new(catalog: &'c Catalog, specs: impl IntoIterator<Item = Spec>) -> crate::Result<Self> {
		ConcretizerBuilder::new(catalog).add_specs(specs).build()
	}

	pub fn initial_specs(&self) -> &[Spec] {
		&self.initial_specs
	}

	pub fn leaf_specs(&self) -> &[Spec] {
		&self.leaf_specs
	}

	pub fn needed_dep_specs(&self) -> &[Spec] {
		&self.needed_dep_specs
	}

	pub fn get_package(&self, name: &str) -> Option<&PackageEnumeration> {
		self.packages.get(name)
	}

	pub fn get_virtual_package(&self, name: &str) -> Option<&VirtualPackageEnumeration> {
		self.virtual_packages.get(name)
	}

	pub fn packages(&self) -> &BTreeMap<String, PackageEnumeration> {
		&self.packages
	}

	pub fn virtual_packages(&self) -> &BTreeMap<String, VirtualPackageEnumeration> {
		&self.virtual_packages
	}

	/// Number of passes the expansion took, including the last one which found nothing new.
	pub fn passes(&self) -> usize {
		self.passes
	}

	pub fn graph(&self) -> &ExpansionGraph {
		&self.graph
	}

	/// Text report of the expanded state.
	pub fn show(&self) -> String {
		self.to_string()
	}
}

impl std::fmt::Display for Concretizer<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "Initial State:")?;
		writeln!(f, "Leaf Packages:")?;
		for spec in &self.leaf_specs {
			writeln!(f, "  {}", spec)?;
		}
		writeln!(f, "Needed dependencies:")?;
		for spec in &self.needed_dep_specs {
			writeln!(f, "  {}", spec)?;
		}
		writeln!(f, "Packages which might be in tree:")?;
		for package in self.packages.values() {
			write!(f, "{}", package)?;
		}
		writeln!(f, "Virtual packages which might be in tree:")?;
		for package in self.virtual_packages.values() {
			write!(f, "{}", package)?;
		}
		Ok(())
	}
}
