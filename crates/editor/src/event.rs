use rta_primitives::{AggregationName, ElementId};

use crate::command::Command;
use crate::overlay::OverlayId;

/// A change to a host element, reported by the host or derived from a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementMutation {
	PropertyChanged {
		name: Box<str>,
	},
	InsertAggregation {
		aggregation: AggregationName,
		child: ElementId,
	},
	RemoveAggregation {
		aggregation: AggregationName,
		child: ElementId,
	},
}

impl ElementMutation {
	pub fn property(name: &str) -> Self {
		Self::PropertyChanged { name: name.into() }
	}

	/// Only visibility changes and aggregation changes can alter editability.
	pub fn triggers_reevaluation(&self) -> bool {
		match self {
			Self::PropertyChanged { name } => &**name == "visible",
			Self::InsertAggregation { .. } | Self::RemoveAggregation { .. } => true,
		}
	}
}

/// Notifications for the host shell, drained with
/// [`AuthoringSession::take_events`](crate::AuthoringSession::take_events).
#[derive(Debug)]
pub enum AuthoringEvent {
	/// A plugin built a command. The host decides whether to push it.
	ElementModified(Command),
	DragStarted(OverlayId),
	OverlayRegistered(OverlayId),
	OverlayDeregistered(ElementId),
	/// A variant rename gesture began on the overlay.
	RenameStarted(OverlayId),
	/// A variant rename gesture ended, with or without a command.
	RenameEnded(OverlayId),
}

impl AuthoringEvent {
	pub fn command(&self) -> Option<&Command> {
		match self {
			Self::ElementModified(cmd) => Some(cmd),
			_ => None,
		}
	}
}
