//! Seeding the concretizer with the requested specs and growing it to a fixed point.

use super::*;
use crate::catalog::Dependency;

/// Checks the variants set by `spec` against the declarations of `package`.
fn validate_variants(catalog: &Catalog, package: &str, spec: &Spec) -> crate::Result<()> {
	let declared = catalog.variants(package).ok_or_else(|| crate::Error::UnknownPackage(package.to_string()))?;
	for vspec in spec.variants.iter() {
		let variant = declared.get(vspec.name()).ok_or_else(|| crate::Error::UnknownVariant {
			variant: vspec.name().to_string(),
			package: package.to_string(),
		})?;
		variant.validate(vspec, Some(package))?;
	}
	Ok(())
}

/// A new enumeration for `spec`, holding every variant the recipe of `name` declares.
fn new_enumeration(catalog: &Catalog, name: &str, spec: Spec) -> crate::Result<PackageEnumeration> {
	let declared = catalog.variants(name).ok_or_else(|| crate::Error::UnknownPackage(name.to_string()))?;
	let mut enumeration = PackageEnumeration::new(spec);
	for variant in declared.values() {
		enumeration.add_variant(variant);
	}
	Ok(enumeration)
}

impl<'c> Concretizer<'c> {
	/// Sorts a requested spec and its `^` dependencies into the leaf and needed dependency lists.
	pub(super) fn add_spec(&mut self, spec: &Spec, explicit_dep: bool) -> crate::Result<()> {
		let name = spec.name().ok_or_else(|| crate::Error::AnonymousSpecUnsupported(spec.to_string()))?;
		/* Providers would have to be chosen before anything could be merged into them */
		if self.catalog.is_virtual(name) {
			return Err(crate::Error::VirtualPackageUnsupported(name.to_string()));
		}
		if self.catalog.get_package(name).is_none() {
			return Err(crate::Error::UnknownPackage(name.to_string()));
		}

		if explicit_dep {
			self.needed_dep_specs.push(spec.without_dependencies());
		} else {
			self.leaf_specs.push(spec.without_dependencies());
		}

		for dep in &spec.dependencies {
			self.add_spec(dep, true)?;
		}
		Ok(())
	}

	/// Creates or merges into a package enumeration for every leaf and needed dependency spec.
	pub(super) fn seed(&mut self) -> crate::Result<()> {
		for spec in self.leaf_specs.clone() {
			let i = self.merge_spec(&spec)?;
			let meta = self.graph.meta_node;
			self.graph.add_edge_once(meta, i, EdgeData::Requested);
		}
		for spec in self.needed_dep_specs.clone() {
			self.merge_spec(&spec)?;
		}
		Ok(())
	}

	fn merge_spec(&mut self, spec: &Spec) -> crate::Result<petgraph::prelude::NodeIndex> {
		let name = spec.name().ok_or_else(|| crate::Error::AnonymousSpecUnsupported(spec.to_string()))?;
		let catalog = self.catalog;
		validate_variants(catalog, name, spec)?;
		let declared = catalog.variants(name).ok_or_else(|| crate::Error::UnknownPackage(name.to_string()))?;

		if let Some(existing) = self.packages.get_mut(name) {
			/* Multi-valued merges would union these, an exclusive variant has to agree exactly */
			for vspec in spec.variants.iter() {
				let exclusive = declared.get(vspec.name()).map_or(false, |v| v.exclusive);
				if let Some(current) = existing.spec.variants.get(vspec.name()) {
					if exclusive && current != vspec {
						return Err(crate::Error::UnsatisfiableVariantSpec { provided: vspec.to_string(), required: current.to_string() });
					}
				}
			}
			if existing.spec.constrain(spec)? {
				log::debug!("merged {} into {}", spec, existing.spec);
			}
		} else {
			log::debug!("new package {} from {}", name, spec);
			self.packages.insert(name.to_string(), new_enumeration(catalog, name, spec.clone())?);
		}

		Ok(self.graph.get_or_add_package(name))
	}

	/// Bound on the number of passes given what has been discovered so far.
	fn pass_ceiling(&self) -> usize {
		let nodes = self.packages.len() + self.virtual_packages.len();
		let edges = self.packages.values().map(PackageEnumeration::dependency_count).sum::<usize>()
			+ self.virtual_packages.values().map(|v| v.providers.len()).sum::<usize>();
		let variants = self.packages.values().map(|p| p.variants.len()).sum::<usize>();
		(nodes + 1) * (edges + variants + 1) + 1
	}

	/// Runs discovery passes until one finds nothing new.
	pub(super) fn expand(&mut self) -> crate::Result<()> {
		loop {
			if self.passes >= self.pass_ceiling() {
				return Err(crate::Error::ExpansionLimitExceeded { passes: self.passes });
			}
			self.passes += 1;
			log::trace!("expansion pass {}: {} packages, {} virtual packages", self.passes, self.packages.len(), self.virtual_packages.len());

			let mut changed = false;

			/* Packages created during a pass are visited on the next one */
			let names: Vec<String> = self.packages.keys().cloned().collect();
			for name in &names {
				changed |= self.expand_package(name)?;
			}

			let virtuals: Vec<String> = self.virtual_packages.keys().cloned().collect();
			for name in &virtuals {
				changed |= self.expand_virtual(name)?;
			}

			if !changed {
				break;
			}
		}

		log::info!(
			"expansion reached a fixed point after {} passes: {} packages, {} virtual packages",
			self.passes, self.packages.len(), self.virtual_packages.len()
		);
		Ok(())
	}

	/// Records the dependencies of `name` that may apply.
	///
	/// Returns whether anything new was found.
	fn expand_package(&mut self, name: &str) -> crate::Result<bool> {
		let catalog = self.catalog;
		let package = catalog.get_package(name).ok_or_else(|| crate::Error::UnknownPackage(name.to_string()))?;
		let Some(spec) = self.packages.get(name).map(|p| p.spec.clone()) else { return Ok(false) };
		let src = self.graph.get_or_add_package(name);
		let mut changed = false;

		for (target, dependencies) in &package.dependencies {
			/* Even when none of its clauses can apply */
			if !catalog.exists(target) {
				return Err(crate::Error::UnknownPackage(target.clone()));
			}

			let applicable: Vec<&Dependency> = dependencies.iter().filter(|d| d.when.may_apply(&spec)).collect();
			if applicable.is_empty() {
				continue;
			}

			let dst = if catalog.is_virtual(target) {
				if !self.virtual_packages.contains_key(target) {
					log::debug!("{} needs virtual package {}", name, target);
					self.virtual_packages.insert(target.clone(), VirtualPackageEnumeration::new(target));
					changed = true;
				}
				self.graph.get_or_add_virtual(target)
			} else {
				for dep in &applicable {
					validate_variants(catalog, target, &dep.spec)?;
				}
				if !self.packages.contains_key(target) {
					log::debug!("{} needs package {}", name, target);
					self.packages.insert(target.clone(), new_enumeration(catalog, target, Spec::named(target))?);
					changed = true;
				}
				self.graph.get_or_add_package(target)
			};

			let Some(enumeration) = self.packages.get_mut(name) else { continue };
			for dep in applicable {
				changed |= enumeration.add_dependency(dep);
				changed |= self.graph.add_edge_once(src, dst, EdgeData::Depends(dep.types.clone()));
			}
		}

		Ok(changed)
	}

	/// Adds the providers of virtual package `name`.
	///
	/// Returns whether anything new was found.
	fn expand_virtual(&mut self, name: &str) -> crate::Result<bool> {
		let catalog = self.catalog;
		let src = self.graph.get_or_add_virtual(name);
		let mut changed = false;

		for provider in catalog.providers_for(name) {
			let Some(provider_name) = provider.name() else { continue };

			match self.packages.get(provider_name) {
				/* Already constrained so it can't provide this virtual */
				Some(existing) if !existing.spec.satisfies(&provider, false) => {
					log::debug!("{} can't provide {}, it is constrained to {}", provider_name, name, existing.spec);
					continue;
				},
				Some(_) => {},
				None => {
					log::debug!("{} provides {}", provider_name, name);
					self.packages.insert(provider_name.to_string(), new_enumeration(catalog, provider_name, Spec::named(provider_name))?);
					changed = true;
				},
			}

			let dst = self.graph.get_or_add_package(provider_name);
			if let Some(virtual_package) = self.virtual_packages.get_mut(name) {
				changed |= virtual_package.add_provider(provider_name);
			}
			changed |= self.graph.add_edge_once(src, dst, EdgeData::ProvidedBy);
		}

		Ok(changed)
	}
}
