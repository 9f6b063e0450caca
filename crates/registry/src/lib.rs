//! Read-only lookup tables consumed by the authoring core.
//!
//! * [`ChangeRegistry`]: which change handlers exist for a
//!   (control type, change kind) pair, filtered by authoring [`Layer`].
//! * [`DesignTimeRegistry`]: per control type, which authoring actions are
//!   offered on the element itself and on its aggregations.
//!
//! Both are assembled once per editing session through their builders and
//! are immutable afterwards.

pub mod change;
pub mod design_time;
pub mod error;
pub mod layer;

pub use change::{CapabilityDescriptor, ChangeRegistry, ChangeRegistryBuilder};
pub use design_time::{
	Action, ActionDescriptor, DesignTimeMetadata, DesignTimeRegistry, DesignTimeRegistryBuilder,
	StableElementsFn,
};
pub use error::RegistryError;
pub use layer::{Layer, LayerSet};
