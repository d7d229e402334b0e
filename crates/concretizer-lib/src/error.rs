//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

fn in_package(package: &Option<String>) -> String {
	match package {
		Some(p) => format!(" in package \"{}\"", p),
		None => String::new(),
	}
}

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("bincode error: {0}")]
	Bincode(#[from] bincode::Error),
	#[error("error walking directory: {0}")]
	WalkDir(#[from] walkdir::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("validation error: {0}")]
	Validation(String),

	/// A virtual package was given as an input spec.
	#[error("virtual package \"{0}\" can't be concretized directly, request one of its providers instead.")]
	VirtualPackageUnsupported(String),
	/// An input spec has no package name.
	#[error("anonymous spec \"{0}\" can't be concretized, a package name is required.")]
	AnonymousSpecUnsupported(String),
	/// The package name isn't in the catalog, not even as a virtual.
	#[error("package \"{0}\" not found.")]
	UnknownPackage(String),

	#[error("variant \"{provided}\" is unsatisfiable, conflicts with \"{required}\"")]
	UnsatisfiableVariantSpec { provided: String, required: String },
	#[error("version \"{provided}\" is unsatisfiable, conflicts with \"{required}\"")]
	UnsatisfiableVersionSpec { provided: String, required: String },
	#[error("compiler \"{provided}\" is unsatisfiable, conflicts with \"{required}\"")]
	UnsatisfiableCompilerSpec { provided: String, required: String },
	#[error("spec name \"{provided}\" is unsatisfiable, conflicts with \"{required}\"")]
	UnsatisfiableSpecName { provided: String, required: String },

	#[error("variant \"{variant}\" specified twice{}", in_package(.package))]
	DuplicateVariant { variant: String, package: Option<String> },
	#[error("package {package} has no variant {variant}")]
	UnknownVariant { variant: String, package: String },
	#[error("invalid values for variant \"{variant}\"{}: {values:?}", in_package(.package))]
	InvalidVariantValue { variant: String, values: Vec<String>, package: Option<String> },
	#[error("multiple values are not allowed for variant \"{variant}\"{}", in_package(.package))]
	MultipleValuesInExclusiveVariant { variant: String, package: Option<String> },
	#[error("trying to validate variant \"{variant}\" with the validator of \"{validator}\"")]
	InconsistentValidation { variant: String, validator: String },

	/// No declared version of the package lies within the accumulated constraint.
	#[error("no versions of \"{package}\" available within \"{constraint}\"")]
	NoVersionsAvailable { package: String, constraint: String },
	/// Expansion failed to reach a fixed point within the pass ceiling.
	#[error("expansion did not reach a fixed point after {passes} passes")]
	ExpansionLimitExceeded { passes: usize },
}
