//! Functions and methods for reading package recipes from JSON
//!
//! # Recipe format
//! ```json
//! {
//! 	"name": "hdf5",
//! 	"versions": ["1.8.16", { "version": "1.10.1", "preferred": true }],
//! 	"variants": [
//! 		{ "name": "mpi", "default": true, "description": "Enable MPI support" },
//! 		{ "name": "api", "default": "default", "values": ["default", "v18", "v110"] },
//! 		{ "name": "languages", "default": "c", "values": ["c", "fortran"], "multi": true },
//! 		{ "name": "shift", "default": "4", "validator": "integer" }
//! 	],
//! 	"depends_on": ["zlib@1.1.2:", { "spec": "mpi", "when": "+mpi", "type": ["build", "link"] }],
//! 	"provides": [{ "spec": "mpi@:3", "when": "@2:" }]
//! }
//! ```

use std::collections::BTreeSet;
use serde_json::{Map, Value};

use super::package::*;
use crate::spec::Spec;
use crate::variant::*;
use crate::version::Version;

fn get_str<'a>(obj: &'a Map<String, Value>, key: &str) -> crate::Result<Option<&'a str>> {
	match obj.get(key) {
		Some(v) => Ok(Some(v.as_str().ok_or_else(|| crate::Error::Parse(format!("{} must be a string", key)))?)),
		None => Ok(None),
	}
}

/// Reads a `when` condition, it may only name the owning package.
fn clause_from_json(obj: &Map<String, Value>, package: &str) -> crate::Result<Clause> {
	match get_str(obj, "when")? {
		Some(when) => {
			let spec = Spec::parse(when)?;
			if let Some(name) = spec.name() {
				if name != package {
					return Err(crate::Error::Parse(format!("condition \"{}\" in package \"{}\" names another package", when, package)));
				}
			}
			Ok(Clause::When(spec))
		},
		None => Ok(Clause::Always),
	}
}

impl Variant {
	pub fn from_json(v: &Value) -> crate::Result<Self> {
		use crate::Error::Parse;

		let obj = v.as_object().ok_or_else(|| Parse("variant must be an object".to_string()))?;
		let name = get_str(obj, "name")?.ok_or_else(|| Parse("variant has no name field".to_string()))?;
		let description = get_str(obj, "description")?.unwrap_or_default();

		let default = match obj.get("default") {
			Some(Value::Bool(b)) => return Ok(Variant::boolean(name, *b, description)),
			Some(Value::String(s)) => s.clone(),
			Some(Value::Number(n)) => n.to_string(),
			Some(_) => return Err(Parse(format!("default of variant \"{}\" must be a bool, string or number", name))),
			/* Variants without a default are off switches */
			None => return Ok(Variant::boolean(name, false, description)),
		};

		let values = if let Some(values) = obj.get("values") {
			let arr = values.as_array().ok_or_else(|| Parse(format!("values of variant \"{}\" must be an array", name)))?;
			let mut allowed = Vec::<String>::new();
			for e in arr {
				allowed.push(e.as_str().ok_or_else(|| Parse(format!("values of variant \"{}\" must be strings", name)))?.to_string());
			}
			AllowedValues::Enumerated(allowed)
		} else if let Some(pattern) = get_str(obj, "pattern")? {
			AllowedValues::Validator(Validator::Pattern(VariantPattern::new(pattern)?))
		} else if let Some(validator) = get_str(obj, "validator")? {
			match validator {
				"integer" => AllowedValues::Validator(Validator::Integer),
				_ => return Err(Parse(format!("unknown validator \"{}\" for variant \"{}\"", validator, name))),
			}
		} else {
			return Err(Parse(format!("variant \"{}\" needs values, a pattern or a validator", name)));
		};

		let multi = match obj.get("multi") {
			Some(v) => v.as_bool().ok_or_else(|| Parse("multi must be a bool".to_string()))?,
			None => false,
		};

		Variant::new(name, default.as_str(), description, values, !multi)
	}
}

impl Dependency {
	pub fn from_json(v: &Value, package: &str) -> crate::Result<Self> {
		use crate::Error::Parse;

		let (spec, types, when) = match v {
			Value::String(s) => (s.as_str(), DependencyType::defaults(), Clause::Always),
			Value::Object(obj) => {
				let spec = get_str(obj, "spec")?.ok_or_else(|| Parse("dependency has no spec field".to_string()))?;
				let types = match obj.get("type") {
					None => DependencyType::defaults(),
					Some(Value::String(s)) => BTreeSet::from([s.parse::<DependencyType>()?]),
					Some(Value::Array(arr)) => {
						let mut types = BTreeSet::<DependencyType>::new();
						for e in arr {
							types.insert(e.as_str().ok_or_else(|| Parse("dependency types must be strings".to_string()))?.parse()?);
						}
						types
					},
					Some(_) => return Err(Parse("dependency type must be a string or an array".to_string())),
				};
				(spec, types, clause_from_json(obj, package)?)
			},
			_ => return Err(Parse("dependency must be a string or an object".to_string())),
		};

		let spec = Spec::parse(spec)?;
		if spec.is_anonymous() {
			return Err(crate::Error::AnonymousSpecUnsupported(spec.to_string()));
		}
		Ok(Dependency::new(spec, types, when))
	}
}

impl Package {
	/// Reads a recipe from JSON.
	///
	/// # Errors
	/// - [`Parse`](crate::Error::Parse) when a field has the wrong type or a spec or version can't be parsed.
	/// - [`DuplicateVariant`](crate::Error::DuplicateVariant) when a variant is declared twice.
	/// - [`InvalidVariantValue`](crate::Error::InvalidVariantValue) when a variant's default isn't allowed.
	pub fn from_json(v: &Value) -> crate::Result<Self> {
		use crate::Error::Parse;

		let obj = v.as_object().ok_or_else(|| Parse("JSON is not an object".to_string()))?;
		let name = get_str(obj, "name")?.ok_or_else(|| Parse("JSON has no name field".to_string()))?;

		let mut package = Package::new(name);
		package.description = get_str(obj, "description")?.map(str::to_string);

		if let Some(versions) = obj.get("versions") {
			let arr = versions.as_array().ok_or_else(|| Parse("versions must be an array".to_string()))?;
			for e in arr {
				package = match e {
					Value::String(s) => package.with_version(Version::new(s)?, false),
					Value::Object(o) => {
						let version = get_str(o, "version")?.ok_or_else(|| Parse("version object has no version field".to_string()))?;
						let preferred = match o.get("preferred") {
							Some(p) => p.as_bool().ok_or_else(|| Parse("preferred must be a bool".to_string()))?,
							None => false,
						};
						package.with_version(Version::new(version)?, preferred)
					},
					_ => return Err(Parse("versions must be strings or objects".to_string())),
				};
			}
		}

		if let Some(variants) = obj.get("variants") {
			let arr = variants.as_array().ok_or_else(|| Parse("variants must be an array".to_string()))?;
			for e in arr {
				let variant = Variant::from_json(e).map_err(|e| match e {
					crate::Error::InvalidVariantValue { variant, values, .. } => crate::Error::InvalidVariantValue { variant, values, package: Some(name.to_string()) },
					e => e,
				})?;
				package = package.with_variant(variant)?;
			}
		}

		if let Some(dependencies) = obj.get("depends_on") {
			let arr = dependencies.as_array().ok_or_else(|| Parse("depends_on must be an array".to_string()))?;
			for e in arr {
				package = package.with_dependency(Dependency::from_json(e, name)?)?;
			}
		}

		if let Some(provides) = obj.get("provides") {
			let arr = provides.as_array().ok_or_else(|| Parse("provides must be an array".to_string()))?;
			for e in arr {
				let (spec, when) = match e {
					Value::String(s) => (s.as_str(), Clause::Always),
					Value::Object(o) => (
						get_str(o, "spec")?.ok_or_else(|| Parse("provision has no spec field".to_string()))?,
						clause_from_json(o, name)?,
					),
					_ => return Err(Parse("provides must contain strings or objects".to_string())),
				};
				package = package.with_provision(Spec::parse(spec)?, when)?;
			}
		}

		Ok(package)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use serde_json::json;

	#[test]
	fn package_from_json() {
		let package = Package::from_json(&json!({
			"name": "hdf5",
			"versions": ["1.8.16", { "version": "1.10.1", "preferred": true }],
			"variants": [
				{ "name": "mpi", "default": true, "description": "Enable MPI support" },
				{ "name": "api", "default": "default", "values": ["default", "v18", "v110"] },
				{ "name": "languages", "default": "c", "values": ["c", "fortran"], "multi": true },
				{ "name": "shift", "default": 4, "validator": "integer" }
			],
			"depends_on": ["zlib@1.1.2:", { "spec": "mpi", "when": "+mpi", "type": ["build", "link"] }],
			"provides": [{ "spec": "h5@:3", "when": "@1.10:" }]
		})).unwrap();

		assert_eq!(package.name, "hdf5");
		assert_eq!(package.versions.len(), 2);
		assert!(package.versions[&Version::new("1.10.1").unwrap()].preferred);
		assert!(package.variants["mpi"].is_boolean());
		assert!(package.variants["api"].exclusive);
		assert!(!package.variants["languages"].exclusive);
		assert_eq!(package.variants["shift"].values, AllowedValues::Validator(Validator::Integer));
		assert_eq!(package.dependencies["zlib"][0].when, Clause::Always);
		assert_eq!(package.dependencies["mpi"][0].when, Clause::When(Spec::parse("+mpi").unwrap()));
		assert!(package.provides("h5"));
	}

	#[test]
	fn package_from_json_dependency_type() {
		let dep = Dependency::from_json(&json!({ "spec": "cmake", "type": "build" }), "enzo").unwrap();
		assert_eq!(dep.types, BTreeSet::from([DependencyType::Build]));
		assert!(Dependency::from_json(&json!({ "spec": "cmake", "type": "test" }), "enzo").is_err());
	}

	#[test]
	fn package_from_json_bad_default() {
		let err = Package::from_json(&json!({
			"name": "hdf5",
			"variants": [{ "name": "api", "default": "v20", "values": ["default", "v18"] }]
		})).unwrap_err();
		assert!(matches!(err, crate::Error::InvalidVariantValue { package: Some(p), .. } if p == "hdf5"));
	}

	#[test]
	fn package_from_json_duplicate_variant() {
		let err = Package::from_json(&json!({
			"name": "hdf5",
			"variants": [{ "name": "mpi", "default": true }, { "name": "mpi", "default": false }]
		})).unwrap_err();
		assert!(matches!(err, crate::Error::DuplicateVariant { .. }));
	}

	#[test]
	fn package_from_json_rejects_foreign_condition() {
		assert!(Package::from_json(&json!({
			"name": "enzo",
			"depends_on": [{ "spec": "hdf5", "when": "zlib+shared" }]
		})).is_err());
	}

	#[test]
	fn package_from_json_requires_name() {
		assert!(Package::from_json(&json!({ "versions": ["1.0"] })).is_err());
		assert!(Package::from_json(&json!("hdf5")).is_err());
	}
}
