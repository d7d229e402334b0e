use serde::{Serialize, Deserialize};

/// A generic enum to describe a range of versions.
///
/// All bounds are inclusive.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub enum VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	#[default] Any,
	Explicit(T),
	MinOnly(T),
	MaxOnly(T),
	MinMax(T, T),
}

impl<T> VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	/// When all arguments are `None` will return `Any`
	pub fn new(explicit: Option<T>, min: Option<T>, max: Option<T>) -> crate::Result<VersionBounds<T>> {
		match (explicit, min, max) {
			(None, None, None) => Ok(VersionBounds::Any),
			(None, None, Some(max)) => Ok(VersionBounds::MaxOnly(max)),
			(None, Some(min), None) => Ok(VersionBounds::MinOnly(min)),
			(None, Some(min), Some(max)) => Self::from_limits(Some(min), Some(max))
				.ok_or_else(|| crate::Error::Parse("minimum version is greater than the maximum".to_string())),
			(Some(e), None, None) => Ok(VersionBounds::Explicit(e)),
			_ => Err(crate::Error::Parse("Attempted to create bounds with both explicit and min or max version constraint".to_string()))
		}
	}

	/// Builds bounds from an optional lower and upper limit, `None` if the range is empty.
	fn from_limits(min: Option<T>, max: Option<T>) -> Option<Self> {
		match (min, max) {
			(None, None) => Some(VersionBounds::Any),
			(Some(min), None) => Some(VersionBounds::MinOnly(min)),
			(None, Some(max)) => Some(VersionBounds::MaxOnly(max)),
			(Some(min), Some(max)) => {
				match min.cmp(&max) {
					std::cmp::Ordering::Greater => None,
					std::cmp::Ordering::Equal => Some(VersionBounds::Explicit(min)),
					std::cmp::Ordering::Less => Some(VersionBounds::MinMax(min, max)),
				}
			}
		}
	}

	/// Lower and upper limit of the range, `None` meaning unbounded.
	pub fn limits(&self) -> (Option<&T>, Option<&T>) {
		match self {
			VersionBounds::Any => (None, None),
			VersionBounds::Explicit(v) => (Some(v), Some(v)),
			VersionBounds::MinOnly(min) => (Some(min), None),
			VersionBounds::MaxOnly(max) => (None, Some(max)),
			VersionBounds::MinMax(min, max) => (Some(min), Some(max)),
		}
	}

	pub fn is_version_within(&self, other: &T) -> bool {
		match self {
			VersionBounds::Any => true,
			VersionBounds::Explicit(v) => other == v,
			VersionBounds::MinOnly(min) => other >= min,
			VersionBounds::MaxOnly(max) => other <= max,
			VersionBounds::MinMax(min, max) => min <= other && other <= max,
		}
	}

	/// Gets the intersection between the bounds, if no intersection exists returns `None`
	pub fn inner_join(&self, other: &Self) -> Option<Self> {
		let (lhs_min, lhs_max) = self.limits();
		let (rhs_min, rhs_max) = other.limits();

		/* Unbounded on one side defers to the other */
		let min = match (lhs_min, rhs_min) {
			(Some(a), Some(b)) => Some(std::cmp::max(a, b)),
			(a, b) => a.or(b),
		};
		let max = match (lhs_max, rhs_max) {
			(Some(a), Some(b)) => Some(std::cmp::min(a, b)),
			(a, b) => a.or(b),
		};

		Self::from_limits(min.cloned(), max.cloned())
	}

	/// Every version within `self` is also within `other`.
	pub fn is_subset_of(&self, other: &Self) -> bool {
		self.inner_join(other).as_ref() == Some(self)
	}
}

impl<T> std::fmt::Display for VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone + std::fmt::Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			VersionBounds::Any => write!(f, ":"),
			VersionBounds::Explicit(v) => write!(f, "{}", v),
			VersionBounds::MinOnly(min) => write!(f, "{}:", min),
			VersionBounds::MaxOnly(max) => write!(f, ":{}", max),
			VersionBounds::MinMax(min, max) => write!(f, "{}:{}", min, max),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn bounds_join_any_is_identity() {
		assert_eq!(VersionBounds::Any.inner_join(&VersionBounds::MinOnly(3)), Some(VersionBounds::MinOnly(3)));
		assert_eq!(VersionBounds::MaxOnly(3).inner_join(&VersionBounds::Any), Some(VersionBounds::MaxOnly(3)));
	}

	#[test]
	fn bounds_join_min_and_max() {
		assert_eq!(VersionBounds::MinOnly(1).inner_join(&VersionBounds::MaxOnly(4)), Some(VersionBounds::MinMax(1, 4)));
		assert_eq!(VersionBounds::MaxOnly(1).inner_join(&VersionBounds::MinOnly(4)), None);
	}

	#[test]
	fn bounds_join_touching_is_explicit() {
		assert_eq!(VersionBounds::MinOnly(2).inner_join(&VersionBounds::MaxOnly(2)), Some(VersionBounds::Explicit(2)));
	}

	#[test]
	fn bounds_join_explicit() {
		assert_eq!(VersionBounds::Explicit(2).inner_join(&VersionBounds::MinMax(1, 3)), Some(VersionBounds::Explicit(2)));
		assert_eq!(VersionBounds::Explicit(5).inner_join(&VersionBounds::MinMax(1, 3)), None);
		assert_eq!(VersionBounds::Explicit(5).inner_join(&VersionBounds::Explicit(4)), None);
	}

	#[test]
	fn bounds_join_ranges() {
		assert_eq!(VersionBounds::MinMax(1, 5).inner_join(&VersionBounds::MinMax(3, 8)), Some(VersionBounds::MinMax(3, 5)));
		assert_eq!(VersionBounds::MaxOnly(4).inner_join(&VersionBounds::MinMax(1, 8)), Some(VersionBounds::MinMax(1, 4)));
		assert_eq!(VersionBounds::MaxOnly(0).inner_join(&VersionBounds::MinMax(1, 8)), None);
	}

	#[test]
	fn bounds_subset() {
		assert!(VersionBounds::MinMax(2, 3).is_subset_of(&VersionBounds::MinOnly(1)));
		assert!(!VersionBounds::MinOnly(1).is_subset_of(&VersionBounds::MinMax(2, 3)));
		assert!(VersionBounds::Explicit(2).is_subset_of(&VersionBounds::Any));
	}

	#[test]
	fn bounds_new_rejects_mixed() {
		assert!(VersionBounds::new(Some(1), Some(0), None).is_err());
		assert!(VersionBounds::new(None, Some(3), Some(1)).is_err());
		assert_eq!(VersionBounds::<i32>::new(None, None, None).unwrap(), VersionBounds::Any);
	}
}
