//! In-memory [`ElementTree`].

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::element::{ElementPosition, ElementTree};
use crate::error::TreeError;
use crate::ids::{AggregationName, ControlType, ElementId};
use crate::value::PropertyValue;

#[derive(Debug, Clone)]
struct Node {
	control_type: ControlType,
	parent: Option<(ElementId, AggregationName)>,
	properties: FxHashMap<Box<str>, PropertyValue>,
	aggregations: IndexMap<AggregationName, Vec<ElementId>>,
	associations: FxHashMap<Box<str>, Vec<ElementId>>,
}

impl Node {
	fn new(control_type: ControlType) -> Self {
		Self {
			control_type,
			parent: None,
			properties: FxHashMap::default(),
			aggregations: IndexMap::new(),
			associations: FxHashMap::default(),
		}
	}
}

/// Element tree held entirely in memory.
///
/// Ids starting with `__` are reported as framework-generated.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
	nodes: FxHashMap<ElementId, Node>,
}

impl MemoryTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a detached root element.
	pub fn add_root(
		&mut self,
		id: impl Into<ElementId>,
		control_type: impl Into<ControlType>,
	) -> Result<ElementId, TreeError> {
		let id = id.into();
		self.create(&id, &control_type.into())?;
		Ok(id)
	}

	/// Creates an element and appends it to `parent.aggregation`, declaring
	/// the aggregation if needed.
	pub fn add_child(
		&mut self,
		parent: &ElementId,
		aggregation: impl Into<AggregationName>,
		id: impl Into<ElementId>,
		control_type: impl Into<ControlType>,
	) -> Result<ElementId, TreeError> {
		let id = id.into();
		let aggregation = aggregation.into();
		self.declare_aggregation(parent, aggregation.clone())?;
		let len = self.aggregation(parent, &aggregation)?.len();
		self.create(&id, &control_type.into())?;
		self.insert(parent, &aggregation, len, &id)?;
		Ok(id)
	}

	/// Declares an empty aggregation on an element. Existing aggregations are kept.
	pub fn declare_aggregation(
		&mut self,
		id: &ElementId,
		aggregation: impl Into<AggregationName>,
	) -> Result<(), TreeError> {
		let node = self.node_mut(id)?;
		node.aggregations.entry(aggregation.into()).or_default();
		Ok(())
	}

	/// Replaces the targets of an association.
	pub fn set_association(
		&mut self,
		id: &ElementId,
		name: &str,
		targets: Vec<ElementId>,
	) -> Result<(), TreeError> {
		self.node_mut(id)?.associations.insert(name.into(), targets);
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn node(&self, id: &ElementId) -> Result<&Node, TreeError> {
		self.nodes
			.get(id)
			.ok_or_else(|| TreeError::UnknownElement(id.clone()))
	}

	fn node_mut(&mut self, id: &ElementId) -> Result<&mut Node, TreeError> {
		self.nodes
			.get_mut(id)
			.ok_or_else(|| TreeError::UnknownElement(id.clone()))
	}
}

impl ElementTree for MemoryTree {
	fn contains(&self, id: &ElementId) -> bool {
		self.nodes.contains_key(id)
	}

	fn control_type(&self, id: &ElementId) -> Option<ControlType> {
		self.nodes.get(id).map(|n| n.control_type.clone())
	}

	fn has_generated_id(&self, id: &ElementId) -> bool {
		id.looks_generated()
	}

	fn position(&self, id: &ElementId) -> Option<ElementPosition> {
		let (parent, aggregation) = self.nodes.get(id)?.parent.clone()?;
		let index = self
			.nodes
			.get(&parent)?
			.aggregations
			.get(&aggregation)?
			.iter()
			.position(|c| c == id)?;
		Some(ElementPosition {
			parent,
			aggregation,
			index,
		})
	}

	fn aggregation_names(&self, id: &ElementId) -> Vec<AggregationName> {
		self.nodes
			.get(id)
			.map(|n| n.aggregations.keys().cloned().collect())
			.unwrap_or_default()
	}

	fn aggregation(
		&self,
		id: &ElementId,
		aggregation: &AggregationName,
	) -> Result<Vec<ElementId>, TreeError> {
		self.node(id)?
			.aggregations
			.get(aggregation)
			.cloned()
			.ok_or_else(|| TreeError::UnknownAggregation {
				element: id.clone(),
				aggregation: aggregation.clone(),
			})
	}

	fn association(&self, id: &ElementId, name: &str) -> Vec<ElementId> {
		self.nodes
			.get(id)
			.and_then(|n| n.associations.get(name).cloned())
			.unwrap_or_default()
	}

	fn property(&self, id: &ElementId, name: &str) -> Result<PropertyValue, TreeError> {
		Ok(self
			.node(id)?
			.properties
			.get(name)
			.cloned()
			.unwrap_or_default())
	}

	fn set_property(
		&mut self,
		id: &ElementId,
		name: &str,
		value: PropertyValue,
	) -> Result<PropertyValue, TreeError> {
		let node = self.node_mut(id)?;
		let old = if value.is_unset() {
			node.properties.remove(name)
		} else {
			node.properties.insert(name.into(), value)
		};
		Ok(old.unwrap_or_default())
	}

	fn insert(
		&mut self,
		parent: &ElementId,
		aggregation: &AggregationName,
		index: usize,
		child: &ElementId,
	) -> Result<(), TreeError> {
		if self.node(child)?.parent.is_some() {
			return Err(TreeError::StillAttached(child.clone()));
		}
		if self.is_ancestor_or_self(child, parent) {
			return Err(TreeError::Rejected {
				element: child.clone(),
				reason: format!("cannot insert into own descendant {parent}"),
			});
		}
		let children = self
			.node_mut(parent)?
			.aggregations
			.get_mut(aggregation)
			.ok_or_else(|| TreeError::UnknownAggregation {
				element: parent.clone(),
				aggregation: aggregation.clone(),
			})?;
		if index > children.len() {
			return Err(TreeError::IndexOutOfRange {
				element: parent.clone(),
				aggregation: aggregation.clone(),
				index,
				len: children.len(),
			});
		}
		children.insert(index, child.clone());
		self.node_mut(child)?.parent = Some((parent.clone(), aggregation.clone()));
		Ok(())
	}

	fn remove(
		&mut self,
		parent: &ElementId,
		aggregation: &AggregationName,
		child: &ElementId,
	) -> Result<usize, TreeError> {
		let children = self
			.node_mut(parent)?
			.aggregations
			.get_mut(aggregation)
			.ok_or_else(|| TreeError::UnknownAggregation {
				element: parent.clone(),
				aggregation: aggregation.clone(),
			})?;
		let index = children
			.iter()
			.position(|c| c == child)
			.ok_or_else(|| TreeError::NotInAggregation {
				parent: parent.clone(),
				aggregation: aggregation.clone(),
				child: child.clone(),
			})?;
		children.remove(index);
		self.node_mut(child)?.parent = None;
		Ok(index)
	}

	fn create(&mut self, id: &ElementId, control_type: &ControlType) -> Result<(), TreeError> {
		if self.nodes.contains_key(id) {
			return Err(TreeError::DuplicateElement(id.clone()));
		}
		self.nodes.insert(id.clone(), Node::new(control_type.clone()));
		Ok(())
	}

	fn destroy(&mut self, id: &ElementId) -> Result<(), TreeError> {
		let node = self.node(id)?;
		if node.parent.is_some() {
			return Err(TreeError::StillAttached(id.clone()));
		}
		if node.aggregations.values().any(|c| !c.is_empty()) {
			return Err(TreeError::NotEmpty(id.clone()));
		}
		self.nodes.remove(id);
		Ok(())
	}
}
