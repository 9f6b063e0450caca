use rta_primitives::{ChangeKind, ControlType};

use crate::layer::LayerSet;

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// Two change handlers claim the same layer for one (control, change) pair.
	#[error("duplicate change handler: control={control_type} change={change_kind} layers={layers:?}")]
	DuplicateHandler {
		control_type: ControlType,
		change_kind: ChangeKind,
		layers: LayerSet,
	},

	/// Design-time metadata registered twice for one control type.
	#[error("duplicate design-time metadata for {0}")]
	DuplicateMetadata(ControlType),
}
