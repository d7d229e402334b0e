use serde::{Serialize, Deserialize};

use super::{Version, VersionBounds};

/// A union of version ranges that a package's version must fall within.
///
/// Written as a comma separated list of ranges, `1.2`, `1.0:2.0`, `:2.7.999`, `1.8.16:`
/// or `1.0,1.4:1.6`. A lone `:` accepts every version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionConstraint {
	ranges: Vec<VersionBounds<Version>>,
}

impl Default for VersionConstraint {
	fn default() -> Self {
		Self::any()
	}
}

impl VersionConstraint {
	pub fn any() -> Self {
		Self { ranges: vec![VersionBounds::Any] }
	}

	pub fn exact(version: Version) -> Self {
		Self { ranges: vec![VersionBounds::Explicit(version)] }
	}

	/// Returns `None` when `ranges` is empty.
	pub fn from_ranges(ranges: impl IntoIterator<Item = VersionBounds<Version>>) -> Option<Self> {
		let ranges: Vec<_> = ranges.into_iter().collect();
		if ranges.is_empty() {
			None
		} else {
			Some(Self::normalized(ranges))
		}
	}

	pub fn parse(s: &str) -> crate::Result<Self> {
		use crate::Error::Parse;

		let mut ranges = Vec::<VersionBounds<Version>>::new();
		for item in s.split(',') {
			let item = item.trim();
			if item.is_empty() {
				return Err(Parse(format!("empty version range in \"{}\"", s)));
			}

			let bounds = if let Some((min, max)) = item.split_once(':') {
				let min = if min.is_empty() { None } else { Some(Version::new(min)?) };
				let max = if max.is_empty() { None } else { Some(Version::new(max)?) };
				VersionBounds::new(None, min, max)?
			} else {
				VersionBounds::Explicit(Version::new(item)?)
			};
			ranges.push(bounds);
		}

		Ok(Self::normalized(ranges))
	}

	/// Sorts and deduplicates ranges so equal constraints compare equal regardless of how they were built.
	fn normalized(mut ranges: Vec<VersionBounds<Version>>) -> Self {
		if ranges.iter().any(|r| matches!(r, VersionBounds::Any)) {
			return Self::any();
		}

		ranges.sort_by(|a, b| {
			let (a_min, a_max) = a.limits();
			let (b_min, b_max) = b.limits();
			/* `None` is unbounded, so below everything as a minimum and above everything as a maximum */
			a_min.cmp(&b_min).then_with(|| match (a_max, b_max) {
				(None, None) => std::cmp::Ordering::Equal,
				(None, Some(_)) => std::cmp::Ordering::Greater,
				(Some(_), None) => std::cmp::Ordering::Less,
				(Some(a), Some(b)) => a.cmp(b),
			})
		});
		ranges.dedup();

		Self { ranges }
	}

	pub fn ranges(&self) -> &[VersionBounds<Version>] {
		&self.ranges
	}

	pub fn is_any(&self) -> bool {
		matches!(self.ranges.as_slice(), [VersionBounds::Any])
	}

	pub fn contains(&self, version: &Version) -> bool {
		self.ranges.iter().any(|r| r.is_version_within(version))
	}

	/// Versions allowed by both constraints, `None` if there are none.
	pub fn intersection(&self, other: &Self) -> Option<Self> {
		let mut ranges = Vec::<VersionBounds<Version>>::new();
		for lhs in &self.ranges {
			for rhs in &other.ranges {
				if let Some(joined) = lhs.inner_join(rhs) {
					ranges.push(joined);
				}
			}
		}
		Self::from_ranges(ranges)
	}

	pub fn overlaps(&self, other: &Self) -> bool {
		self.intersection(other).is_some()
	}

	/// Every range in `self` is contained within some range of `other`.
	pub fn is_subset_of(&self, other: &Self) -> bool {
		self.ranges.iter().all(|r| other.ranges.iter().any(|o| r.is_subset_of(o)))
	}

	/// Narrows `self` to the versions also allowed by `other`.
	///
	/// Returns whether `self` changed.
	pub fn constrain(&mut self, other: &Self) -> crate::Result<bool> {
		let joined = self.intersection(other).ok_or_else(|| crate::Error::UnsatisfiableVersionSpec {
			provided: other.to_string(),
			required: self.to_string(),
		})?;
		let changed = joined != *self;
		*self = joined;
		Ok(changed)
	}
}

impl std::str::FromStr for VersionConstraint {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl From<Version> for VersionConstraint {
	fn from(value: Version) -> Self {
		Self::exact(value)
	}
}

impl std::fmt::Display for VersionConstraint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
		write!(f, "{}", s.join(","))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn c(s: &str) -> VersionConstraint { VersionConstraint::parse(s).unwrap() }
	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	#[test]
	fn constraint_parse_forms() {
		assert_eq!(c("1.2").ranges(), &[VersionBounds::Explicit(v("1.2"))]);
		assert_eq!(c(":2.7.999").ranges(), &[VersionBounds::MaxOnly(v("2.7.999"))]);
		assert_eq!(c("1.8.16:").ranges(), &[VersionBounds::MinOnly(v("1.8.16"))]);
		assert_eq!(c("1.0:2.0").ranges(), &[VersionBounds::MinMax(v("1.0"), v("2.0"))]);
		assert!(c(":").is_any());
	}

	#[test]
	fn constraint_parse_errors() {
		assert!(VersionConstraint::parse("").is_err());
		assert!(VersionConstraint::parse("1.0,").is_err());
		assert!(VersionConstraint::parse("3:1").is_err());
	}

	#[test]
	fn constraint_display_round_trips() {
		for s in ["1.2", "1.0:2.0", ":2.7.999", "1.8.16:", "1.0,1.4:1.6", ":"] {
			assert_eq!(c(s).to_string(), s);
		}
	}

	#[test]
	fn constraint_list_is_order_insensitive() {
		assert_eq!(c("1.4:1.6,1.0"), c("1.0,1.4:1.6"));
	}

	#[test]
	fn constraint_contains() {
		let list = c("1.0,1.4:1.6");
		assert!(list.contains(&v("1.0")));
		assert!(list.contains(&v("1.5")));
		assert!(!list.contains(&v("1.2")));
		assert!(c("2.0:").contains(&v("develop")));
	}

	#[test]
	fn constraint_intersection() {
		assert_eq!(c("1.0:2.0").intersection(&c("1.5:")), Some(c("1.5:2.0")));
		assert_eq!(c("1.0,1.4:1.6").intersection(&c("1.5:")), Some(c("1.5:1.6")));
		assert_eq!(c("1.0").intersection(&c("2.0")), None);
	}

	#[test]
	fn constraint_constrain_reports_change() {
		let mut a = c("1.0:");
		assert!(a.constrain(&c(":2.0")).unwrap());
		assert_eq!(a, c("1.0:2.0"));
		assert!(!a.constrain(&c("1.0:2.0")).unwrap());
	}

	#[test]
	fn constraint_constrain_conflict_is_error() {
		let mut a = c("1.0");
		let err = a.constrain(&c("2.0")).unwrap_err();
		assert!(matches!(err, crate::Error::UnsatisfiableVersionSpec { .. }));
		assert_eq!(a, c("1.0"));
	}

	#[test]
	fn constraint_subset() {
		assert!(c("1.2").is_subset_of(&c("1.0:2.0")));
		assert!(!c("1.0:").is_subset_of(&c("1.0:2.0")));
		assert!(c("1.0:2.0").is_subset_of(&VersionConstraint::any()));
	}
}
