//! Module for only ExpansionGraph functions not related to the overall expansion process.

use std::collections::{BTreeMap, BTreeSet};
use petgraph::prelude::*;
use serde::{Serialize, Deserialize};

use crate::catalog::DependencyType;

/// Records what the expansion discovered and how it got there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionGraph {
	pub graph: StableDiGraph<NodeData, EdgeData>,
	pub meta_node: NodeIndex,
	indices: BTreeMap<String, NodeIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
	/// Control node for giving the users requests a presence in the graph.
	Meta,
	/// A concrete package that might be in the tree.
	Package(String),
	/// A name that is only provided by other packages.
	Virtual(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeData {
	/// From the meta node to a package the user asked for.
	Requested,
	/// The source might depend on the target.
	Depends(BTreeSet<DependencyType>),
	/// From a virtual to a package that provides it.
	ProvidedBy,
}

impl Default for ExpansionGraph {
	fn default() -> Self {
		let mut graph = StableDiGraph::<NodeData, EdgeData>::default();
		let meta_node = graph.add_node(NodeData::Meta);
		Self { graph, meta_node, indices: BTreeMap::new() }
	}
}

impl ExpansionGraph {
	pub fn get_node_index(&self, name: &str) -> Option<NodeIndex> {
		self.indices.get(name).copied()
	}

	pub fn get_node_identifier(&self, src: NodeIndex) -> Option<&String> {
		match self.graph.node_weight(src)? {
			NodeData::Package(name) | NodeData::Virtual(name) => Some(name),
			NodeData::Meta => None,
		}
	}

	/// Returns the index of the node for `name`, adding a `Package` node if there isn't one.
	pub(super) fn get_or_add_package(&mut self, name: &str) -> NodeIndex {
		self.get_or_add(name, || NodeData::Package(name.to_string()))
	}

	/// Returns the index of the node for `name`, adding a `Virtual` node if there isn't one.
	pub(super) fn get_or_add_virtual(&mut self, name: &str) -> NodeIndex {
		self.get_or_add(name, || NodeData::Virtual(name.to_string()))
	}

	fn get_or_add(&mut self, name: &str, data: impl FnOnce() -> NodeData) -> NodeIndex {
		if let Some(i) = self.indices.get(name) {
			return *i;
		}
		let i = self.graph.add_node(data());
		self.indices.insert(name.to_string(), i);
		i
	}

	/// Adds an edge unless an identical one already connects the nodes.
	///
	/// Returns whether an edge was added.
	pub(super) fn add_edge_once(&mut self, a: NodeIndex, b: NodeIndex, data: EdgeData) -> bool {
		if self.graph.edges_directed(a, Outgoing).any(|e| e.target() == b && *e.weight() == data) {
			false
		} else {
			self.graph.add_edge(a, b, data);
			true
		}
	}

	/// Names of the packages the user asked for directly.
	pub fn requested(&self) -> Vec<&String> {
		let mut names: Vec<_> = self.graph.edges_directed(self.meta_node, Outgoing)
			.filter_map(|e| self.get_node_identifier(e.target()))
			.collect();
		names.sort();
		names.dedup();
		names
	}

	/// Names of the nodes `name` has edges to, in name order.
	pub fn successors(&self, name: &str) -> Vec<&String> {
		let Some(i) = self.get_node_index(name) else { return Vec::new() };
		let mut names: Vec<_> = self.graph.neighbors_directed(i, Outgoing)
			.filter_map(|n| self.get_node_identifier(n))
			.collect();
		names.sort();
		names.dedup();
		names
	}

	/// Number of package and virtual nodes, the meta node isn't counted.
	pub fn node_count(&self) -> usize {
		self.indices.len()
	}

	pub fn edge_count(&self) -> usize {
		self.graph.edge_count()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn graph_nodes_are_unique_by_name() {
		let mut graph = ExpansionGraph::default();
		let a = graph.get_or_add_package("enzo");
		assert_eq!(graph.get_or_add_package("enzo"), a);
		assert_eq!(graph.get_or_add_virtual("enzo"), a);
		assert_eq!(graph.node_count(), 1);
	}

	#[test]
	fn graph_edges_are_unique() {
		let mut graph = ExpansionGraph::default();
		let a = graph.get_or_add_package("enzo");
		let b = graph.get_or_add_virtual("mpi");
		assert!(graph.add_edge_once(a, b, EdgeData::Depends(DependencyType::defaults())));
		assert!(!graph.add_edge_once(a, b, EdgeData::Depends(DependencyType::defaults())));
		assert!(graph.add_edge_once(a, b, EdgeData::Depends(BTreeSet::from([DependencyType::Run]))));
		assert_eq!(graph.edge_count(), 2);
		assert_eq!(graph.successors("enzo"), vec!["mpi"]);
	}

	#[test]
	fn graph_requested() {
		let mut graph = ExpansionGraph::default();
		let a = graph.get_or_add_package("zlib");
		let b = graph.get_or_add_package("enzo");
		let meta = graph.meta_node;
		graph.add_edge_once(meta, a, EdgeData::Requested);
		graph.add_edge_once(meta, b, EdgeData::Requested);
		assert_eq!(graph.requested(), vec!["enzo", "zlib"]);
	}
}
