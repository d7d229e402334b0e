//! # Package catalog
//!
//! The catalog holds every known package recipe and answers the questions the concretizer asks
//! about them: versions, variants, dependencies and which packages provide a virtual package.
//!
//! Recipes are JSON documents, one package per file, see [`import`] for the format.
//! Parsing a large repository is slow so a loaded catalog can be saved as a binary snapshot.

use std::collections::BTreeMap;
use std::path::Path;
use serde::*;

use crate::spec::Spec;
use crate::variant::Variant;
use crate::version::Version;

pub mod package;
pub use package::*;

pub mod import;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Catalog {
	packages: BTreeMap<String, Package>,
}

impl Catalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Errors
	/// [`Parse`](crate::Error::Parse) if a package with the same name is already present.
	pub fn add_package(&mut self, package: Package) -> crate::Result<()> {
		if self.packages.contains_key(&package.name) {
			return Err(crate::Error::Parse(format!("package \"{}\" is defined twice", package.name)));
		}
		self.packages.insert(package.name.clone(), package);
		Ok(())
	}

	pub fn get_package(&self, name: &str) -> Option<&Package> {
		self.packages.get(name)
	}

	pub fn packages(&self) -> impl Iterator<Item = &Package> {
		self.packages.values()
	}

	pub fn len(&self) -> usize {
		self.packages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.packages.is_empty()
	}

	pub fn versions(&self, name: &str) -> Option<&BTreeMap<Version, VersionInfo>> {
		self.get_package(name).map(|p| &p.versions)
	}

	pub fn dependencies(&self, name: &str) -> Option<&BTreeMap<String, Vec<Dependency>>> {
		self.get_package(name).map(|p| &p.dependencies)
	}

	pub fn variants(&self, name: &str) -> Option<&BTreeMap<String, Variant>> {
		self.get_package(name).map(|p| &p.variants)
	}

	/// Specs of the packages providing `virtual_name`, one per provision.
	///
	/// Conditional provisions carry their condition so callers can tell which builds of the provider qualify.
	pub fn providers_for(&self, virtual_name: &str) -> Vec<Spec> {
		let mut providers = Vec::<Spec>::new();
		for package in self.packages.values() {
			for provision in package.provides.iter().filter(|p| p.spec.name() == Some(virtual_name)) {
				let mut spec = match &provision.when {
					Clause::Always => Spec::default(),
					Clause::When(condition) => condition.clone(),
				};
				spec.name = Some(package.name.clone());
				providers.push(spec);
			}
		}
		providers
	}

	/// A name nothing defines but something provides.
	pub fn is_virtual(&self, name: &str) -> bool {
		!self.packages.contains_key(name) && self.packages.values().any(|p| p.provides(name))
	}

	pub fn exists(&self, name: &str) -> bool {
		self.packages.contains_key(name) || self.is_virtual(name)
	}

	/// Loads every `*.json` recipe below `path`.
	/// # Parameters
	/// - `path` - Root of the recipe repository.
	/// - `do_validation` - Check each recipe against the bundled schema before reading it. Recipes from a trusted repository can skip this as it is slow.
	/// # Errors
	/// - [`IO`](crate::Error::IO) or [`WalkDir`](crate::Error::WalkDir) when the repository can't be read.
	/// - [`SerdeJSON`](crate::Error::SerdeJSON) when a file isn't JSON.
	/// - [`Validation`](crate::Error::Validation) when a recipe doesn't match the schema.
	/// - Anything [`Package::from_json`] returns.
	pub fn load_from_dir(path: impl AsRef<Path>, do_validation: bool) -> crate::Result<Self> {
		let schema_json: serde_json::Value = serde_json::from_str(include_str!("catalog/recipe.schema.json"))?;
		let compiled_schema = if do_validation {
			Some(
				jsonschema::JSONSchema::compile(&schema_json)
					.map_err(|e| crate::Error::Validation(format!("recipe schema doesn't compile: {}", e)))?
			)
		} else {
			None
		};

		let mut catalog = Catalog::new();
		for entry in walkdir::WalkDir::new(path.as_ref()).sort_by_file_name() {
			let entry = entry?.into_path();
			if !entry.is_file() || entry.extension().map_or(true, |e| e != "json") {
				continue;
			}

			let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&entry)?)?;

			if let Some(schema) = &compiled_schema {
				if !schema.is_valid(&json) {
					return Err(crate::Error::Validation(format!("{} does not match the recipe schema", entry.display())));
				}
			}

			let package = Package::from_json(&json)?;
			log::debug!("loaded recipe for {} from {}", package.name, entry.display());
			catalog.add_package(package)?;
		}

		if catalog.is_empty() {
			log::warn!("no recipes found in {}", path.as_ref().display());
		}
		Ok(catalog)
	}

	/// Loads a snapshot written by [`Self::save_to_disk`].
	///
	/// # Errors
	/// - [`IO`](crate::Error::IO) when opening or reading from the file.
	/// - [`Bincode`](crate::Error::Bincode) when deserializing the file.
	pub fn load_from_disk(path: impl AsRef<Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(bincode::deserialize_from(std::io::BufReader::new(file))?)
	}

	/// # Errors
	/// - [`IO`](crate::Error::IO) when creating the file or it's parent directories.
	/// - [`Bincode`](crate::Error::Bincode) when serializing the catalog.
	pub fn save_to_disk(&self, path: impl AsRef<Path>) -> crate::Result<()> {
		if let Some(parent) = path.as_ref().parent() {
			std::fs::create_dir_all(parent)?;
		}
		let file = std::fs::File::create(path)?;
		bincode::serialize_into(std::io::BufWriter::new(file), self)?;
		Ok(())
	}
}
