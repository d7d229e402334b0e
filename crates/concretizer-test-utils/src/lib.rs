//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::io::Write;
use serde_json::json;

use concretizer::{Catalog, Package};

/// Recipes for a small repository covering virtual packages, conditional dependencies and exclusive variants.
pub fn fixture_recipes() -> Vec<serde_json::Value> {
	vec![
		json!({
			"name": "enzo",
			"description": "Adaptive mesh refinement simulation code",
			"versions": ["2.4", "2.5"],
			"variants": [{ "name": "bluewaters", "default": false, "description": "Build for Blue Waters" }],
			"depends_on": [
				"hdf5+mpi",
				"mpi",
				{ "spec": "python", "when": "+bluewaters", "type": "run" },
				{ "spec": "makedepend", "type": "build" }
			]
		}),
		json!({
			"name": "hdf5",
			"versions": ["1.8.16", "1.10.1"],
			"variants": [
				{ "name": "mpi", "default": true, "description": "Enable MPI support" },
				{ "name": "api", "default": "default", "values": ["default", "v18", "v110"] }
			],
			"depends_on": ["zlib@1.1.2:", { "spec": "mpi", "when": "+mpi" }]
		}),
		json!({
			"name": "zlib",
			"versions": ["1.2.8", "1.2.11"],
			"variants": [{ "name": "shared", "default": true }]
		}),
		json!({
			"name": "openmpi",
			"versions": ["3.1.6", "4.1.1"],
			"provides": ["mpi@:3"]
		}),
		json!({
			"name": "mpich",
			"versions": ["3.2.1", "3.4.2"],
			"provides": [{ "spec": "mpi@:3", "when": "@3:" }]
		}),
		json!({
			"name": "python",
			"versions": ["2.7.18", "3.9.7"],
			"depends_on": ["zlib"]
		}),
		json!({
			"name": "makedepend",
			"versions": ["1.0.5"]
		}),
		json!({
			"name": "A",
			"versions": ["1.0"],
			"depends_on": ["mpi"]
		}),
		json!({
			"name": "B",
			"versions": ["1.0"],
			"variants": [{ "name": "feature", "default": "x", "values": ["x", "y", "z"] }]
		}),
		json!({
			"name": "P",
			"versions": ["1.0", "1.2", "2.0", "develop"]
		}),
		json!({
			"name": "Q",
			"versions": ["1.0", { "version": "1.5", "preferred": true }, "2.0"]
		}),
		/* A straight chain, every link found on its own pass */
		json!({ "name": "chain0", "versions": ["1.0"], "depends_on": ["chain1"] }),
		json!({ "name": "chain1", "versions": ["1.0"], "depends_on": ["chain2"] }),
		json!({ "name": "chain2", "versions": ["1.0"], "depends_on": ["chain3"] }),
		json!({ "name": "chain3", "versions": ["1.0"] }),
		/* Depends on a package nothing defines */
		json!({ "name": "broken", "versions": ["1.0"], "depends_on": ["missing"] }),
	]
}

/// Number of dependency declarations across [`fixture_recipes`].
pub fn fixture_dependency_count() -> usize {
	fixture_recipes().iter()
		.filter_map(|r| r.get("depends_on").and_then(|d| d.as_array()).map(|d| d.len()))
		.sum()
}

/// A catalog built from [`fixture_recipes`].
pub fn fixture_catalog() -> concretizer::Result<Catalog> {
	let mut catalog = Catalog::new();
	for recipe in fixture_recipes() {
		catalog.add_package(Package::from_json(&recipe)?)?;
	}
	Ok(catalog)
}

/// Writes each recipe as `<name>.json` into a new temporary directory.
///
/// Recipes are split between the root and a `more` subdirectory so loading has to walk the tree.
pub fn write_recipe_repo(recipes: &[serde_json::Value]) -> concretizer::Result<tempfile::TempDir> {
	let dir = tempfile::tempdir()?;
	std::fs::create_dir_all(dir.path().join("more"))?;

	for (i, recipe) in recipes.iter().enumerate() {
		let name = recipe.get("name").and_then(|n| n.as_str()).unwrap_or("unnamed");
		let path = if i % 2 == 0 {
			dir.path().join(format!("{}-{}.json", i, name))
		} else {
			dir.path().join("more").join(format!("{}-{}.json", i, name))
		};
		let mut f = std::fs::File::create(path)?;
		f.write_all(serde_json::to_string_pretty(recipe)?.as_bytes())?;
	}

	Ok(dir)
}
