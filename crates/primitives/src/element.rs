//! The element tree seam.
//!
//! The authoring core never owns host elements. Everything it needs to read
//! or mutate goes through [`ElementTree`], which the host implements over its
//! own UI object model. [`MemoryTree`](crate::MemoryTree) is the in-memory
//! implementation used by tests and by hosts without a tree of their own.

use crate::error::TreeError;
use crate::ids::{AggregationName, ControlType, ElementId};
use crate::value::PropertyValue;

/// Where an element sits inside its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementPosition {
	pub parent: ElementId,
	pub aggregation: AggregationName,
	pub index: usize,
}

impl ElementPosition {
	pub fn new(
		parent: impl Into<ElementId>,
		aggregation: impl Into<AggregationName>,
		index: usize,
	) -> Self {
		Self {
			parent: parent.into(),
			aggregation: aggregation.into(),
			index,
		}
	}
}

/// Host element tree consumed by the authoring core.
///
/// Mutating methods must be all-or-nothing: on `Err` the tree is unchanged.
pub trait ElementTree {
	/// Returns `true` if the element exists.
	fn contains(&self, id: &ElementId) -> bool;

	/// Returns the control type of the element.
	fn control_type(&self, id: &ElementId) -> Option<ControlType>;

	/// Returns `true` if the element id was generated by the framework
	/// rather than assigned by the application.
	fn has_generated_id(&self, id: &ElementId) -> bool;

	/// Returns the element's position in its parent, or `None` for roots and
	/// detached elements.
	fn position(&self, id: &ElementId) -> Option<ElementPosition>;

	/// Returns the names of the element's aggregations in declaration order.
	fn aggregation_names(&self, id: &ElementId) -> Vec<AggregationName>;

	/// Returns the children in one aggregation.
	fn aggregation(
		&self,
		id: &ElementId,
		aggregation: &AggregationName,
	) -> Result<Vec<ElementId>, TreeError>;

	/// Returns the targets of a named association. Unknown associations are empty.
	fn association(&self, id: &ElementId, name: &str) -> Vec<ElementId>;

	/// Reads a property. Properties that were never set read as
	/// [`PropertyValue::Unset`].
	fn property(&self, id: &ElementId, name: &str) -> Result<PropertyValue, TreeError>;

	/// Writes a property, returning the previous value.
	fn set_property(
		&mut self,
		id: &ElementId,
		name: &str,
		value: PropertyValue,
	) -> Result<PropertyValue, TreeError>;

	/// Inserts a detached element into `parent.aggregation` at `index`.
	fn insert(
		&mut self,
		parent: &ElementId,
		aggregation: &AggregationName,
		index: usize,
		child: &ElementId,
	) -> Result<(), TreeError>;

	/// Removes `child` from `parent.aggregation`, returning the index it had.
	fn remove(
		&mut self,
		parent: &ElementId,
		aggregation: &AggregationName,
		child: &ElementId,
	) -> Result<usize, TreeError>;

	/// Creates a new detached element.
	fn create(&mut self, id: &ElementId, control_type: &ControlType) -> Result<(), TreeError>;

	/// Destroys a detached element without children.
	fn destroy(&mut self, id: &ElementId) -> Result<(), TreeError>;

	/// Returns every direct child across all aggregations, in declaration order.
	fn children(&self, id: &ElementId) -> Vec<ElementId> {
		self.aggregation_names(id)
			.iter()
			.filter_map(|name| self.aggregation(id, name).ok())
			.flatten()
			.collect()
	}

	/// Returns `true` if `ancestor` is `id` or one of its ancestors.
	fn is_ancestor_or_self(&self, ancestor: &ElementId, id: &ElementId) -> bool {
		let mut current = Some(id.clone());
		while let Some(el) = current {
			if &el == ancestor {
				return true;
			}
			current = self.position(&el).map(|p| p.parent);
		}
		false
	}
}
