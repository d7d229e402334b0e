//! Variants are named, build-time options for a package.
//!
//! Names depend on the particular package being built and each named variant can have
//! different (and possibly multiple) values.
//! - [`Variant`] is the declaration made by a package recipe.
//! - [`VariantSpec`] is a value assigned to a variant by a spec.
//! - [`VariantMap`] holds the assignments of a single spec.

use std::collections::{BTreeMap, BTreeSet};
use serde::*;

/// The value of a variant after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantValue {
	Bool(bool),
	/// Sorted and free of duplicates.
	Multi(Vec<String>),
}

impl VariantValue {
	/// Case-insensitive `true`/`false` become booleans, anything else is read as comma separated values.
	pub fn parse(value: &str) -> Self {
		let value = value.trim();
		if value.eq_ignore_ascii_case("true") {
			VariantValue::Bool(true)
		} else if value.eq_ignore_ascii_case("false") {
			VariantValue::Bool(false)
		} else {
			Self::from_values(value.split(',').map(|s| s.trim()))
		}
	}

	pub fn from_values<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
		let set: BTreeSet<String> = values.into_iter().map(|s| s.as_ref().to_string()).collect();
		VariantValue::Multi(set.into_iter().collect())
	}

	pub fn is_bool(&self) -> bool {
		matches!(self, VariantValue::Bool(_))
	}

	/// The values as strings, booleans become a single `"true"` or `"false"`.
	pub fn as_strings(&self) -> Vec<String> {
		match self {
			VariantValue::Bool(b) => vec![b.to_string()],
			VariantValue::Multi(v) => v.clone(),
		}
	}
}

impl From<bool> for VariantValue {
	fn from(value: bool) -> Self {
		VariantValue::Bool(value)
	}
}

impl From<&str> for VariantValue {
	fn from(value: &str) -> Self {
		VariantValue::parse(value)
	}
}

impl std::fmt::Display for VariantValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			VariantValue::Bool(b) => write!(f, "{}", b),
			VariantValue::Multi(v) => write!(f, "{}", v.join(",")),
		}
	}
}

/// A value assigned to a named variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantSpec {
	name: String,
	value: VariantValue,
}

impl VariantSpec {
	pub fn new(name: &str, value: impl Into<VariantValue>) -> Self {
		Self { name: name.to_string(), value: value.into() }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &VariantValue {
		&self.value
	}

	pub fn set_value(&mut self, value: impl Into<VariantValue>) {
		self.value = value.into();
	}

	/// Is `item` one of the values held.
	pub fn contains(&self, item: &str) -> bool {
		match &self.value {
			VariantValue::Bool(b) => item.eq_ignore_ascii_case(&b.to_string()),
			VariantValue::Multi(v) => v.iter().any(|x| x == item),
		}
	}

	/// Every value in `other` is also in `self`.
	///
	/// Booleans must be identical. Does not try to validate.
	pub fn satisfies(&self, other: &Self) -> bool {
		match (&self.value, &other.value) {
			(lhs, VariantValue::Bool(_)) => lhs == &other.value,
			(VariantValue::Bool(_), _) => false,
			(VariantValue::Multi(lhs), VariantValue::Multi(rhs)) => rhs.iter().all(|v| lhs.contains(v)),
		}
	}

	/// Two specs are compatible if they hold the same value or they are both multi-valued.
	///
	/// There is no semantic check here, conflicts between multi-valued specs are left to [`Self::constrain`]
	/// and to the variant declaration.
	pub fn compatible(&self, other: &Self) -> bool {
		self.value == other.value || (!self.value.is_bool() && !other.value.is_bool())
	}

	/// Merges the values of `other` into `self` if both are multi-valued.
	///
	/// Returns whether `self` changed.
	pub fn constrain(&mut self, other: &Self) -> crate::Result<bool> {
		match (&self.value, &other.value) {
			(VariantValue::Bool(lhs), VariantValue::Bool(rhs)) if lhs == rhs => Ok(false),
			(VariantValue::Multi(lhs), VariantValue::Multi(rhs)) => {
				let merged = VariantValue::from_values(lhs.iter().chain(rhs.iter()));
				let changed = merged != self.value;
				self.value = merged;
				Ok(changed)
			},
			_ => Err(crate::Error::UnsatisfiableVariantSpec {
				provided: other.to_string(),
				required: self.to_string(),
			}),
		}
	}
}

impl std::fmt::Display for VariantSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.value {
			VariantValue::Bool(true) => write!(f, "+{}", self.name),
			VariantValue::Bool(false) => write!(f, "~{}", self.name),
			VariantValue::Multi(v) => write!(f, "{}={}", self.name, v.join(",")),
		}
	}
}

/// A regular expression restricting variant values, compiled once and stored as its source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantPattern(regex::Regex);

impl VariantPattern {
	/// # Errors
	/// [`crate::Error::Parse`] if `pattern` isn't a valid regular expression.
	pub fn new(pattern: &str) -> crate::Result<Self> {
		regex::Regex::new(pattern)
			.map(Self)
			.map_err(|e| crate::Error::Parse(format!("invalid variant pattern \"{}\": {}", pattern, e)))
	}

	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	pub fn is_match(&self, value: &str) -> bool {
		self.0.is_match(value)
	}
}

impl PartialEq for VariantPattern {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}

impl TryFrom<String> for VariantPattern {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl From<VariantPattern> for String {
	fn from(value: VariantPattern) -> Self {
		value.as_str().to_string()
	}
}

/// Single value checks for variants which can't enumerate their values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Validator {
	/// Any integer.
	Integer,
	/// Values matching the regular expression.
	Pattern(VariantPattern),
}

impl Validator {
	pub fn check(&self, value: &str) -> bool {
		match self {
			Validator::Integer => value.parse::<i64>().is_ok(),
			Validator::Pattern(pattern) => pattern.is_match(value),
		}
	}
}

/// The values a [`Variant`] accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AllowedValues {
	Enumerated(Vec<String>),
	Validator(Validator),
}

/// Represents a variant in a package, as declared by its recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
	pub name: String,
	pub default: VariantValue,
	pub description: String,
	pub values: AllowedValues,
	/// Only a single value may be selected.
	pub exclusive: bool,
}

impl Variant {
	/// Creates a variant declaration.
	///
	/// # Errors
	/// [`crate::Error::InvalidVariantValue`] if the default isn't an allowed value.
	pub fn new(name: &str, default: impl Into<VariantValue>, description: &str, values: AllowedValues, exclusive: bool) -> crate::Result<Self> {
		let variant = Self {
			name: name.to_string(),
			default: default.into(),
			description: description.to_string(),
			values,
			exclusive,
		};

		let invalid = variant.invalid_values(&variant.default);
		if !invalid.is_empty() {
			return Err(crate::Error::InvalidVariantValue { variant: variant.name, values: invalid, package: None });
		}

		Ok(variant)
	}

	/// A `true`/`false` variant.
	pub fn boolean(name: &str, default: bool, description: &str) -> Self {
		Self {
			name: name.to_string(),
			default: VariantValue::Bool(default),
			description: description.to_string(),
			values: AllowedValues::Enumerated(vec!["true".to_string(), "false".to_string()]),
			exclusive: true,
		}
	}

	pub fn is_boolean(&self) -> bool {
		self.default.is_bool()
	}

	fn invalid_values(&self, value: &VariantValue) -> Vec<String> {
		value.as_strings().into_iter()
			.filter(|v| match &self.values {
				AllowedValues::Enumerated(allowed) => !allowed.contains(v),
				AllowedValues::Validator(validator) => !validator.check(v),
			})
			.collect()
	}

	/// Validates a variant spec against this declaration.
	///
	/// # Errors
	/// - [`crate::Error::InconsistentValidation`] if the names don't match.
	/// - [`crate::Error::MultipleValuesInExclusiveVariant`] if `vspec` has multiple values but the variant is exclusive.
	/// - [`crate::Error::InvalidVariantValue`] if `vspec` contains values which aren't allowed.
	pub fn validate(&self, vspec: &VariantSpec, package: Option<&str>) -> crate::Result<()> {
		if self.name != vspec.name {
			return Err(crate::Error::InconsistentValidation { variant: vspec.name.clone(), validator: self.name.clone() });
		}

		if self.exclusive && vspec.value.as_strings().len() != 1 {
			return Err(crate::Error::MultipleValuesInExclusiveVariant { variant: self.name.clone(), package: package.map(str::to_string) });
		}

		let invalid = self.invalid_values(&vspec.value);
		if !invalid.is_empty() {
			return Err(crate::Error::InvalidVariantValue { variant: self.name.clone(), values: invalid, package: package.map(str::to_string) });
		}

		Ok(())
	}

	/// Printable description of the values accepted.
	pub fn allowed_values(&self) -> String {
		match &self.values {
			AllowedValues::Enumerated(v) => v.join(", "),
			AllowedValues::Validator(Validator::Integer) => "any integer".to_string(),
			AllowedValues::Validator(Validator::Pattern(p)) => format!("values matching /{}/", p.as_str()),
		}
	}

	pub fn make_default(&self) -> VariantSpec {
		VariantSpec { name: self.name.clone(), value: self.default.clone() }
	}
}

impl std::fmt::Display for Variant {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} [default={}] ({})", self.name, self.default, self.allowed_values())?;
		if !self.exclusive {
			write!(f, " multi")?;
		}
		Ok(())
	}
}

/// Map containing [`VariantSpec`] instances keyed by name.
///
/// New values can be added only if the key is not already present.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantMap {
	variants: BTreeMap<String, VariantSpec>,
}

impl VariantMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Errors
	/// [`crate::Error::DuplicateVariant`] if a variant with the same name is already present.
	pub fn insert(&mut self, vspec: VariantSpec) -> crate::Result<()> {
		if self.variants.contains_key(&vspec.name) {
			return Err(crate::Error::DuplicateVariant { variant: vspec.name, package: None });
		}
		self.variants.insert(vspec.name.clone(), vspec);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&VariantSpec> {
		self.variants.get(name)
	}

	pub fn contains_key(&self, name: &str) -> bool {
		self.variants.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &VariantSpec> {
		self.variants.values()
	}

	pub fn len(&self) -> usize {
		self.variants.len()
	}

	pub fn is_empty(&self) -> bool {
		self.variants.is_empty()
	}

	/// Returns `true` if this map is at least as constrained as `other`.
	///
	/// When `strict` is `false` keys of `other` missing from `self` are ignored.
	pub fn satisfies(&self, other: &Self, strict: bool) -> bool {
		other.variants.iter()
			.filter(|(k, _)| strict || self.variants.contains_key(*k))
			.all(|(k, v)| self.variants.get(k).map(|s| s.satisfies(v)).unwrap_or(false))
	}

	/// Adds all variants in `other` that aren't in `self` and constrains those already present.
	///
	/// If `other_concrete` every variant of `self` must also appear in `other`.
	/// Returns whether `self` changed, on error `self` is left untouched.
	pub fn constrain(&mut self, other: &Self, other_concrete: bool) -> crate::Result<bool> {
		if other_concrete {
			if let Some(k) = self.variants.keys().find(|k| !other.variants.contains_key(*k)) {
				return Err(crate::Error::UnsatisfiableVariantSpec {
					provided: "<absent>".to_string(),
					required: self.variants[k].to_string(),
				});
			}
		}

		let mut merged = self.variants.clone();
		let mut changed = false;
		for (k, v) in &other.variants {
			if let Some(existing) = merged.get_mut(k) {
				if !existing.compatible(v) {
					return Err(crate::Error::UnsatisfiableVariantSpec { provided: v.to_string(), required: existing.to_string() });
				}
				changed |= existing.constrain(v)?;
			} else {
				merged.insert(k.clone(), v.clone());
				changed = true;
			}
		}

		self.variants = merged;
		Ok(changed)
	}
}

impl std::fmt::Display for VariantMap {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		/* Boolean flags first so they stay attached to whatever came before, then key-value pairs */
		for v in self.variants.values().filter(|v| v.value.is_bool()) {
			write!(f, "{}", v)?;
		}
		for v in self.variants.values().filter(|v| !v.value.is_bool()) {
			write!(f, " {}", v)?;
		}
		Ok(())
	}
}
