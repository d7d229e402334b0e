//! Per package preferences used when selecting versions.
//!
//! # Format
//! ```json
//! {
//! 	"packages": {
//! 		"all": { "version": ["develop"] },
//! 		"hdf5": { "version": ["1.8.16", "1.10:"] }
//! 	}
//! }
//! ```
//! Each entry is a version constraint, earlier entries are preferred. A package's own list replaces the `all` list.

use std::collections::BTreeMap;
use std::path::Path;
use serde::*;

use crate::version::{Version, VersionConstraint};

/// Name of the section applying to every package.
pub const ALL_PACKAGES: &str = "all";

#[derive(Debug, Default, Deserialize)]
struct PackageSection {
	#[serde(default)]
	version: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PrefsFile {
	#[serde(default)]
	packages: BTreeMap<String, PackageSection>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagePrefs {
	versions: BTreeMap<String, Vec<VersionConstraint>>,
}

impl PackagePrefs {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the preferred version order of `package`, use [`ALL_PACKAGES`] for the fallback.
	pub fn with_version_order(mut self, package: &str, order: Vec<VersionConstraint>) -> Self {
		self.versions.insert(package.to_string(), order);
		self
	}

	/// # Errors
	/// - [`SerdeJSON`](crate::Error::SerdeJSON) when the document doesn't have the expected shape.
	/// - [`Parse`](crate::Error::Parse) when an entry isn't a version constraint.
	pub fn from_json(v: serde_json::Value) -> crate::Result<Self> {
		let file: PrefsFile = serde_json::from_value(v)?;
		let mut prefs = PackagePrefs::new();
		for (name, section) in file.packages {
			let order = section.version.iter()
				.map(|s| VersionConstraint::parse(s))
				.collect::<crate::Result<Vec<_>>>()?;
			if !order.is_empty() {
				prefs.versions.insert(name, order);
			}
		}
		Ok(prefs)
	}

	/// # Errors
	/// [`IO`](crate::Error::IO) when opening or reading from the file, otherwise see [`Self::from_json`].
	pub fn load_from_disk(path: impl AsRef<Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Self::from_json(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	fn order_for(&self, package: &str) -> Option<&Vec<VersionConstraint>> {
		self.versions.get(package).or_else(|| self.versions.get(ALL_PACKAGES))
	}

	/// Index of the first preference containing `version`, `None` if no preference mentions it.
	pub fn rank(&self, package: &str, version: &Version) -> Option<usize> {
		self.order_for(package)?.iter().position(|c| c.contains(version))
	}

	/// The rank function for a single package.
	pub fn ranker<'a>(&'a self, package: &str) -> impl Fn(&Version) -> Option<usize> + 'a {
		let order = self.order_for(package);
		move |version: &Version| order?.iter().position(|c| c.contains(version))
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use serde_json::json;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	#[test]
	fn prefs_rank_follows_order() {
		let prefs = PackagePrefs::from_json(json!({
			"packages": { "hdf5": { "version": ["1.8.16", "1.10:"] } }
		})).unwrap();
		assert_eq!(prefs.rank("hdf5", &v("1.8.16")), Some(0));
		assert_eq!(prefs.rank("hdf5", &v("1.12")), Some(1));
		assert_eq!(prefs.rank("hdf5", &v("1.8.12")), None);
		assert_eq!(prefs.rank("zlib", &v("1.2")), None);
	}

	#[test]
	fn prefs_package_overrides_all() {
		let prefs = PackagePrefs::from_json(json!({
			"packages": {
				"all": { "version": ["develop"] },
				"hdf5": { "version": ["1.10"] }
			}
		})).unwrap();
		assert_eq!(prefs.rank("zlib", &v("develop")), Some(0));
		assert_eq!(prefs.rank("hdf5", &v("develop")), None);
		let rank = prefs.ranker("hdf5");
		assert_eq!(rank(&v("1.10")), Some(0));
	}

	#[test]
	fn prefs_bad_entry() {
		assert!(PackagePrefs::from_json(json!({ "packages": { "hdf5": { "version": ["1.0:0.5"] } } })).is_err());
		assert!(PackagePrefs::from_json(json!({ "packages": [] })).is_err());
	}

	#[test]
	fn prefs_empty_document() {
		assert_eq!(PackagePrefs::from_json(json!({})).unwrap(), PackagePrefs::new());
	}
}
