use concretizer::{ConcretizerBuilder, Concretizer, PackagePrefs, Spec, Version, VersionConstraint, Error};

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn v(s: &str) -> Version {
	Version::new(s).expect("fixture version should parse")
}

fn concretize<'c>(catalog: &'c concretizer::Catalog, spec: &str) -> Concretizer<'c> {
	Concretizer::new(catalog, vec![Spec::parse(spec).expect("fixture spec should parse")]).expect("failed to concretize")
}

#[test]
fn develop_is_not_selected_by_default() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	let c = concretize(&catalog, "P");
	assert_eq!(c.candidate_versions("P").unwrap(), vec![v("2.0"), v("1.2"), v("1.0"), v("develop")]);
	assert_eq!(c.select_version("P").unwrap(), v("2.0"));
}

#[test]
fn develop_is_selected_when_requested() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	assert_eq!(concretize(&catalog, "P@develop").select_version("P").unwrap(), v("develop"));
}

#[test]
fn constraint_filters_versions() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	assert_eq!(concretize(&catalog, "P@1.0:1.5").select_version("P").unwrap(), v("1.2"));
	assert_eq!(concretize(&catalog, "P@1.0").select_version("P").unwrap(), v("1.0"));
}

#[test]
fn no_versions_available() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	let c = concretize(&catalog, "P@:0.5");
	assert!(matches!(
		c.select_version("P"),
		Err(Error::NoVersionsAvailable { ref package, ref constraint }) if package == "P" && constraint == ":0.5"
	));
	assert!(c.select_all().is_err());
}

#[test]
fn preferred_version_beats_newer() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	let c = concretize(&catalog, "Q");
	assert_eq!(c.select_version("Q").unwrap(), v("1.5"));
	assert_eq!(c.candidate_versions("Q").unwrap(), vec![v("1.5"), v("2.0"), v("1.0")]);
}

#[test]
fn configured_order_comes_first() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");

	let prefs = PackagePrefs::new()
		.with_version_order("P", vec![VersionConstraint::parse("1.0").unwrap()])
		.with_version_order("Q", vec![VersionConstraint::parse("1.9:").unwrap()]);
	let c = ConcretizerBuilder::new(&catalog)
		.add_specs(vec![Spec::named("P"), Spec::named("Q")])
		.package_prefs(prefs)
		.build()
		.expect("failed to concretize");
	assert_eq!(c.select_version("P").unwrap(), v("1.0"));
	assert_eq!(c.candidate_versions("P").unwrap(), vec![v("1.0"), v("2.0"), v("1.2"), v("develop")]);
	assert_eq!(c.select_version("Q").unwrap(), v("2.0"));

	/* The fallback list can opt into develop */
	let prefs = PackagePrefs::new().with_version_order(concretizer::config::ALL_PACKAGES, vec![VersionConstraint::parse("develop").unwrap()]);
	let c = ConcretizerBuilder::new(&catalog)
		.add_spec(Spec::named("P"))
		.package_prefs(prefs)
		.build()
		.expect("failed to concretize");
	assert_eq!(c.select_version("P").unwrap(), v("develop"));
}

#[test]
fn variants_use_constraint_then_default() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	let c = concretize(&catalog, "hdf5 api=v18");
	assert_eq!(c.select_variants("hdf5").unwrap().to_string(), "+mpi api=v18");

	let selection = c.select("hdf5").unwrap();
	assert_eq!(selection.version, v("1.10.1"));
	assert_eq!(selection.to_string(), "hdf5@1.10.1+mpi api=v18");
}

#[test]
fn select_all_covers_every_package() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	let c = concretize(&catalog, "enzo~bluewaters%gcc@9:");
	let selections = c.select_all().expect("failed to select");

	assert_eq!(selections.len(), c.packages().len());
	assert_eq!(selections["zlib"].to_string(), "zlib@1.2.11+shared");
	assert_eq!(selections["enzo"].to_string(), "enzo@2.5%gcc@9:~bluewaters");
	assert_eq!(selections["mpich"].version, v("3.4.2"));
	assert!(selections.get("python").is_none());
}

#[test]
fn selecting_unknown_package() {
	init();
	let catalog = concretizer_test_utils::fixture_catalog().expect("failed to build catalog");
	let c = concretize(&catalog, "zlib");
	assert!(matches!(c.select("enzo"), Err(Error::UnknownPackage(_))));
}
