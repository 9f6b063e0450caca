#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Authoring core for runtime UI adaptation.
//!
//! The crate keeps a shadow tree of [`Overlay`]s over a host element tree,
//! lets a fixed set of plugins vote on which overlays they can edit, turns
//! user gestures into reversible [`Command`]s and records them on a linear
//! [`CommandStack`].
//!
//! # Architecture
//!
//! ```text
//! host mutation ──► AuthoringSession::element_modified
//!                      │
//!                      ├─► OverlayArena (structure, relevant overlays)
//!                      └─► EditabilityEvaluator ──► plugin votes
//!
//! gesture ──► plugin op ──► CommandFactory ──► AuthoringEvent::ElementModified
//!                                                   │
//!                      CommandStack::push ◄─────────┘
//!                         │ undo / redo
//!                         └─► CommandEffect ──► element_modified (overlay sync)
//! ```
//!
//! The core never owns host elements. Every read and write goes through
//! [`ElementTree`](rta_primitives::ElementTree) and
//! [`VariantModel`](rta_primitives::VariantModel).

/// Commands, command factory and the undo/redo stack.
pub mod command;
/// Session configuration.
pub mod config;
/// Registry lookups shared by plugins and the command factory.
pub mod context;
pub mod error;
/// Events emitted towards the host shell.
pub mod event;
#[cfg(test)]
mod fixture;
/// Overlay arena and plugin votes.
pub mod overlay;
/// Plugin kinds, editability predicates and plugin operations.
pub mod plugin;
/// Variant rename gesture with cancellable confirmation.
pub mod rename;
/// The editing session tying everything together.
pub mod session;

pub use command::{Command, CommandContext, CommandFactory, CommandStack};
pub use config::AuthoringConfig;
pub use context::CapabilityContext;
pub use error::{
	DuplicateTitleError, ExecuteError, IllegalMoveError, PrepareError, RenameError, StackError,
	UndoInvariantViolation,
};
pub use event::{AuthoringEvent, ElementMutation};
pub use overlay::{Overlay, OverlayArena, OverlayId};
pub use plugin::{Editability, EditabilityEvaluator, EvaluationReason, PluginKind};
pub use session::AuthoringSession;
