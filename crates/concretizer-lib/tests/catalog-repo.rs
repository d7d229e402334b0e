use serde_json::json;

use concretizer::{Catalog, Concretizer, Spec, Error};

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn catalog_load_from_dir() {
	init();
	let recipes = concretizer_test_utils::fixture_recipes();
	let repo = concretizer_test_utils::write_recipe_repo(&recipes).expect("failed to write recipes");

	let catalog = Catalog::load_from_dir(repo.path(), true).expect("failed to load recipes");
	let expected = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");

	assert_eq!(catalog.len(), recipes.len());
	for package in expected.packages() {
		assert_eq!(catalog.get_package(&package.name), Some(package));
	}
}

#[test]
fn catalog_validation_rejects_bad_recipes() {
	init();
	let repo = concretizer_test_utils::write_recipe_repo(&[
		json!({ "name": "zlib", "versions": ["1.2.11"] }),
		json!({ "name": "bad", "versions": [1.0] }),
	]).expect("failed to write recipes");

	assert!(matches!(Catalog::load_from_dir(repo.path(), true), Err(Error::Validation(_))));
	/* Without the schema the importer still catches it */
	assert!(matches!(Catalog::load_from_dir(repo.path(), false), Err(Error::Parse(_))));
}

#[test]
fn catalog_duplicate_recipe() {
	init();
	let repo = concretizer_test_utils::write_recipe_repo(&[
		json!({ "name": "zlib", "versions": ["1.2.11"] }),
		json!({ "name": "zlib", "versions": ["1.2.8"] }),
	]).expect("failed to write recipes");
	assert!(Catalog::load_from_dir(repo.path(), false).is_err());
}

#[test]
fn catalog_snapshot_round_trip() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	let dir = tempfile::tempdir().expect("failed to create temp dir");
	let path = dir.path().join("cache").join("catalog.bin");

	catalog.save_to_disk(&path).expect("failed to save catalog");
	let loaded = Catalog::load_from_disk(&path).expect("failed to load catalog");

	assert_eq!(loaded.len(), catalog.len());
	for package in catalog.packages() {
		assert_eq!(loaded.get_package(&package.name), Some(package));
	}

	let specs = vec![Spec::parse("enzo").unwrap()];
	let a = Concretizer::new(&catalog, specs.clone()).expect("failed to concretize");
	let b = Concretizer::new(&loaded, specs).expect("failed to concretize");
	assert_eq!(a.show(), b.show());
}

#[test]
fn catalog_missing_snapshot_is_io_error() {
	init();
	let dir = tempfile::tempdir().expect("failed to create temp dir");
	assert!(matches!(Catalog::load_from_disk(dir.path().join("nope.bin")), Err(Error::IO(_))));
}
