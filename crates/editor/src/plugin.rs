//! Authoring plugins.
//!
//! The set of plugins is closed: each [`PluginKind`] contributes one
//! editability predicate, dispatched by [`PluginKind::is_editable`], and a
//! handful of gesture operations that the
//! [`AuthoringSession`](crate::AuthoringSession) exposes.

use rta_primitives::ElementTree;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::context::CapabilityContext;
use crate::overlay::{OverlayArena, OverlayId};

pub mod control_variant;
pub mod create_container;
pub mod drag_drop;
mod evaluator;
pub mod remove;
pub mod rename;

pub use evaluator::EditabilityEvaluator;

/// The plugins an editing session can run.
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	Display,
	EnumString,
	EnumIter,
	Serialize,
	Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "kebab-case")]
pub enum PluginKind {
	Rename,
	Remove,
	DragDrop,
	CreateContainer,
	ControlVariant,
}

/// Verdict of a plugin's editability predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editability {
	/// Applies regardless of insertion relationship.
	Uniform(bool),
	/// Differs between receiving a child and creating a sibling.
	Split { as_child: bool, as_sibling: bool },
}

/// Why editability is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationReason {
	/// The overlay was just registered.
	Registration,
	/// A visibility or aggregation change touched the overlay's container.
	Reevaluation,
}

/// Read-only view handed to editability predicates.
pub struct EvalInput<'a> {
	pub tree: &'a dyn ElementTree,
	pub overlays: &'a OverlayArena,
	pub context: &'a CapabilityContext,
	pub reason: EvaluationReason,
}

impl EvalInput<'_> {
	pub fn has_stable_id(&self, overlay: OverlayId) -> bool {
		self.context.has_stable_id(self.tree, self.overlays, overlay)
	}
}

impl PluginKind {
	/// Runs this plugin's editability predicate for `overlay`.
	pub fn is_editable(self, input: &EvalInput<'_>, overlay: OverlayId) -> Editability {
		match self {
			Self::Rename => rename::is_editable(input, overlay),
			Self::Remove => remove::is_editable(input, overlay),
			Self::DragDrop => drag_drop::is_editable(input, overlay),
			Self::CreateContainer => create_container::is_editable(input, overlay),
			Self::ControlVariant => control_variant::is_editable(input, overlay),
		}
	}
}
