//! Core types shared by the authoring crates: identifiers, property values,
//! the element tree and variant model seams, and in-memory implementations
//! of both.

/// Element tree provider trait and positions.
pub mod element;
/// Error types for tree and variant operations.
pub mod error;
/// Identifier newtypes.
pub mod ids;
/// In-memory element tree.
pub mod tree;
/// Property values stored on elements.
pub mod value;
/// Variant data provider trait and in-memory model.
pub mod variant;

pub use element::{ElementPosition, ElementTree};
pub use error::{TreeError, VariantError};
pub use ids::{AggregationName, ChangeKind, ControlType, ElementId, VariantKey, VariantScopeId};
pub use tree::MemoryTree;
pub use value::PropertyValue;
pub use variant::{MemoryVariantModel, VariantEntry, VariantModel};
