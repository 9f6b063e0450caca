//! Error types of the authoring core.
//!
//! Validation-class errors ([`PrepareError`], [`IllegalMoveError`],
//! [`DuplicateTitleError`]) block a gesture before anything is mutated.
//! [`ExecuteError`] reports a mutation that failed and was rolled back.
//! [`UndoInvariantViolation`] means history no longer matches the tree and
//! halts the [`CommandStack`](crate::CommandStack).

use rta_primitives::{AggregationName, ChangeKind, ControlType, ElementId, TreeError, VariantError};
use rta_registry::Action;
use thiserror::Error;

use crate::plugin::PluginKind;

/// A command's preconditions are not met. Nothing was pushed or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepareError {
	#[error("overlay is gone")]
	OverlayGone,

	#[error("element {0} is not part of the tree")]
	ElementMissing(ElementId),

	/// No plugin of this kind currently votes for the overlay.
	#[error("element {element} is not editable by the {plugin} plugin")]
	NotEditable {
		element: ElementId,
		plugin: PluginKind,
	},

	/// The overlay does not belong to a variant-management scope.
	#[error("element {0} has no variant-management scope")]
	NoVariantScope(ElementId),

	#[error("element {0} has no stable id")]
	UnstableId(ElementId),

	#[error("control {control_type} declares no {action} action")]
	MissingAction {
		control_type: ControlType,
		action: Action,
	},

	#[error("no change handler for {change_kind} on {control_type}")]
	NoChangeHandler {
		control_type: ControlType,
		change_kind: ChangeKind,
	},

	/// The command would not change anything.
	#[error("command on {0} would not change anything")]
	NothingToChange(ElementId),

	#[error("invalid command arguments: {0}")]
	Invalid(String),

	#[error(transparent)]
	Tree(#[from] TreeError),

	#[error(transparent)]
	Variant(#[from] VariantError),
}

/// A mutation failed. The tree was restored to its pre-call state unless the
/// error is [`ExecuteError::RollbackFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
	#[error(transparent)]
	Tree(#[from] TreeError),

	#[error(transparent)]
	Variant(#[from] VariantError),

	/// The partial mutation could not be rolled back.
	#[error("rollback failed after {cause}: {rollback}")]
	RollbackFailed {
		cause: Box<ExecuteError>,
		rollback: Box<ExecuteError>,
	},
}

impl ExecuteError {
	/// Returns `true` if the tree may be left in a partially mutated state.
	pub fn is_corrupting(&self) -> bool {
		matches!(self, Self::RollbackFailed { .. })
	}
}

/// Undo did not invert execute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("undo of {command} on {element} failed: {source}")]
pub struct UndoInvariantViolation {
	pub command: &'static str,
	pub element: ElementId,
	#[source]
	pub source: ExecuteError,
}

/// Errors returned by [`CommandStack`](crate::CommandStack) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
	#[error("command {0} was not prepared")]
	NotPrepared(&'static str),

	#[error(transparent)]
	Execute(#[from] ExecuteError),

	#[error(transparent)]
	UndoInvariant(#[from] UndoInvariantViolation),

	/// A previous invariant violation stopped all further history operations.
	#[error("command stack halted after an undo invariant violation")]
	Halted,
}

/// A variant title collides with another visible variant in the same scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a visible variant titled {title:?} already exists")]
pub struct DuplicateTitleError {
	pub title: String,
}

/// Errors of the variant rename gesture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
	/// Another rename is still pending.
	#[error("a rename is already in progress")]
	InProgress,

	/// The rename was cancelled or superseded.
	#[error("rename was cancelled")]
	Cancelled,

	/// The overlay or its element disappeared.
	#[error("rename target is gone")]
	TargetGone,

	/// The overlay is not a variant-management overlay with a scope.
	#[error("overlay does not manage variants")]
	NotVariantManagement,

	#[error(transparent)]
	DuplicateTitle(#[from] DuplicateTitleError),

	/// The host's validator rejected the title.
	#[error("title rejected: {0}")]
	Rejected(String),

	#[error(transparent)]
	Prepare(#[from] PrepareError),

	#[error(transparent)]
	Variant(#[from] VariantError),
}

/// Reasons the element mover refuses a drop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMoveError {
	#[error("dragged overlay is gone")]
	OverlayGone,

	#[error("element {0} is not part of the tree")]
	ElementGone(ElementId),

	#[error("element {0} has no stable id")]
	UnstableId(ElementId),

	#[error("element {0} has no parent to move out of")]
	NotMovable(ElementId),

	#[error("{container}.{aggregation} offers no move action")]
	NoMoveAction {
		container: ElementId,
		aggregation: AggregationName,
	},

	#[error("no move handler for {change_kind} on {control_type}")]
	NoChangeHandler {
		control_type: ControlType,
		change_kind: ChangeKind,
	},

	#[error("cannot move {0} into itself or its descendants")]
	IntoOwnDescendant(ElementId),

	#[error("index {index} out of range (len {len})")]
	IndexOutOfRange { index: usize, len: usize },

	#[error("element is already at the target position")]
	SamePosition,

	#[error(transparent)]
	Tree(#[from] TreeError),

	#[error(transparent)]
	Prepare(#[from] PrepareError),
}

/// Errors loading an [`AuthoringConfig`](crate::AuthoringConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("config parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("I/O error reading {path}: {error}")]
	Io {
		path: std::path::PathBuf,
		error: std::io::Error,
	},
}
