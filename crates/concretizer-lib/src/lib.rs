pub mod error;
pub use error::Result;
pub use error::Error;

pub mod version;
pub use version::{Version, VersionConstraint};

pub mod variant;
pub use variant::{Variant, VariantSpec, VariantMap};

pub mod spec;
pub use spec::Spec;

pub mod catalog;
pub use catalog::{Catalog, Package};

pub mod config;
pub use config::PackagePrefs;

pub mod concretizer;
pub use concretizer::{Concretizer, ConcretizerBuilder};
