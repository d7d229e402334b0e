use concretizer::{Catalog, ConcretizerBuilder, PackagePrefs, Spec};

fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",       "Show help");
		opts.optflag( "v", "verbose",    "Increased verbosity");
		opts.optopt(  "r", "repo",       "Directory of package recipes", "DIR");
		opts.optopt(  "c", "cache",      "Catalog snapshot, read instead of the repository when present and written after loading it", "FILE");
		opts.optopt(  "p", "prefs",      "Package preferences file", "FILE");
		opts.optflag( "",  "validate",   "Validate recipes against the schema while loading");
		opts.optflag( "s", "select",     "Also print the selected version and variants of every package");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: concretizer-terminal [options] concretize SPEC..."));
			return;
		}

		parsed_options
	};

	let mut logger = env_logger::Builder::from_default_env();
	if parsed_options.opt_present("v") {
		logger.filter_level(log::LevelFilter::Debug);
	}
	logger.init();

	let prefs = match parsed_options.opt_str("p") {
		Some(path) => PackagePrefs::load_from_disk(&path).unwrap_or_else(|e| {
			log::warn!("Failed to read preferences file {}: {}", path, e);
			log::warn!("Using default preferences.");
			PackagePrefs::default()
		}),
		None => PackagePrefs::default(),
	};

	let catalog = match load_catalog(&parsed_options) {
		Ok(c) => c,
		Err(e) => { log::error!("Failed to load package catalog: {}", e); return },
	};

	match parsed_options.free.first().map(String::as_str) {
		Some("concretize") => {
			let specs = &parsed_options.free[1..];
			if let Err(e) = concretize(&catalog, prefs, specs, parsed_options.opt_present("s")) {
				log::error!("Failed to concretize: {}", e);
				std::process::exit(1);
			}
		},
		Some(command) => log::error!("Unknown command \"{}\".", command),
		None => eprintln!("{}", opts.usage("Usage: concretizer-terminal [options] concretize SPEC...")),
	}
}

fn load_catalog(parsed_options: &getopts::Matches) -> Result<Catalog, Error> {
	let cache = parsed_options.opt_str("c").map(std::path::PathBuf::from);

	if let Some(cache) = &cache {
		match Catalog::load_from_disk(cache) {
			Ok(catalog) => {
				log::debug!("Loaded {} packages from {}", catalog.len(), cache.display());
				return Ok(catalog);
			},
			Err(concretizer::Error::IO(e)) if e.kind() == std::io::ErrorKind::NotFound => {
				log::debug!("No catalog snapshot at {}", cache.display());
			},
			Err(e) => log::warn!("Failed to read catalog snapshot, format likely changed. reloading... ({})", e),
		}
	}

	let repo = parsed_options.opt_str("r").ok_or(Error::MissingArgument("--repo"))?;
	let catalog = Catalog::load_from_dir(&repo, parsed_options.opt_present("validate"))?;
	log::info!("Loaded {} packages from {}", catalog.len(), repo);

	if let Some(cache) = &cache {
		catalog.save_to_disk(cache)?;
	}
	Ok(catalog)
}

fn concretize(catalog: &Catalog, prefs: PackagePrefs, specs: &[String], select: bool) -> Result<(), Error> {
	if specs.is_empty() {
		return Err(Error::MissingArgument("SPEC"));
	}

	let specs = specs.iter().map(|s| Spec::parse(s)).collect::<concretizer::Result<Vec<_>>>()?;

	let concretizer = ConcretizerBuilder::new(catalog)
		.add_specs(specs)
		.package_prefs(prefs)
		.build()?;

	print!("{}", concretizer.show());

	if select {
		println!("Selected:");
		for selection in concretizer.select_all()?.values() {
			println!("  {}", selection);
		}
	}
	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("concretizer error: {0}")]
	Concretizer(#[from] concretizer::Error),
	#[error("missing argument {0}")]
	MissingArgument(&'static str),
}
