//! Error types for element tree and variant model operations.

use thiserror::Error;

use crate::ids::{AggregationName, ElementId, VariantKey, VariantScopeId};

/// Errors reported by an [`ElementTree`](crate::ElementTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
	/// The element is not (or no longer) part of the tree.
	#[error("unknown element: {0}")]
	UnknownElement(ElementId),

	/// The element has no aggregation with this name.
	#[error("element {element} has no aggregation {aggregation}")]
	UnknownAggregation {
		element: ElementId,
		aggregation: AggregationName,
	},

	/// Insertion index past the end of the aggregation.
	#[error("index {index} out of range for {element}.{aggregation} (len {len})")]
	IndexOutOfRange {
		element: ElementId,
		aggregation: AggregationName,
		index: usize,
		len: usize,
	},

	/// The child is not contained in the named aggregation.
	#[error("{child} is not in {parent}.{aggregation}")]
	NotInAggregation {
		parent: ElementId,
		aggregation: AggregationName,
		child: ElementId,
	},

	/// An element with this id already exists.
	#[error("duplicate element id: {0}")]
	DuplicateElement(ElementId),

	/// The element must be detached from its parent first.
	#[error("element {0} is still attached to a parent")]
	StillAttached(ElementId),

	/// The element still owns children and cannot be destroyed.
	#[error("element {0} still has children")]
	NotEmpty(ElementId),

	/// Host-specific failure.
	#[error("host rejected operation on {element}: {reason}")]
	Rejected { element: ElementId, reason: String },
}

/// Errors reported by a [`VariantModel`](crate::VariantModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
	#[error("unknown variant scope: {0}")]
	UnknownScope(VariantScopeId),

	/// A scope needs at least one variant to have a current one.
	#[error("variant scope {0} has no variants")]
	EmptyScope(VariantScopeId),

	#[error("unknown variant {key} in scope {scope}")]
	UnknownVariant { scope: VariantScopeId, key: VariantKey },

	#[error("variant {key} already exists in scope {scope}")]
	DuplicateKey { scope: VariantScopeId, key: VariantKey },

	/// The current variant of a scope cannot be removed.
	#[error("variant {key} is current in scope {scope}")]
	RemoveCurrent { scope: VariantScopeId, key: VariantKey },
}
