//! Linear undo/redo history.
//!
//! ```text
//!  commands: [ C0  C1  C2 | C3  C4 ]
//!                      ^    └─ redo buffer
//!                   cursor (C2 executed last)
//! ```
//!
//! Pushing while the redo buffer is non-empty discards it. A failed execute
//! or redo is rolled back and leaves history untouched. The stack halts and
//! refuses every further operation until cleared when a failed undo breaks
//! the undo invariant, or when a failed execute or redo could not be rolled
//! back.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use tracing::{error, trace, warn};

use super::{Command, CommandContext};
use crate::error::{StackError, UndoInvariantViolation};

#[derive(Debug)]
pub struct CommandStack {
	commands: VecDeque<Command>,
	/// Number of executed commands; `commands[cursor..]` is the redo buffer.
	cursor: usize,
	limit: Option<NonZeroUsize>,
	/// Cursor position at the last save. `None` once the saved state was
	/// evicted or discarded.
	saved: Option<usize>,
	halted: bool,
}

impl Default for CommandStack {
	fn default() -> Self {
		Self::new()
	}
}

impl CommandStack {
	pub fn new() -> Self {
		Self {
			commands: VecDeque::new(),
			cursor: 0,
			limit: None,
			saved: Some(0),
			halted: false,
		}
	}

	/// Creates a stack that evicts its oldest command beyond `limit` entries.
	pub fn with_limit(limit: Option<NonZeroUsize>) -> Self {
		Self {
			limit,
			..Self::new()
		}
	}

	pub fn len(&self) -> usize {
		self.commands.len()
	}

	pub fn is_empty(&self) -> bool {
		self.commands.is_empty()
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn is_halted(&self) -> bool {
		self.halted
	}

	pub fn can_undo(&self) -> bool {
		!self.halted && self.cursor > 0
	}

	pub fn can_redo(&self) -> bool {
		!self.halted && self.cursor < self.commands.len()
	}

	/// Executed commands, oldest first.
	pub fn executed(&self) -> impl Iterator<Item = &Command> {
		self.commands.range(..self.cursor)
	}

	/// Executed commands that are recorded as changes, oldest first.
	pub fn persistable(&self) -> impl Iterator<Item = &Command> {
		self.executed().filter(|c| !c.is_runtime_only())
	}

	/// Commands that [`redo`](Self::redo) would re-execute, next first.
	pub fn redo_buffer(&self) -> impl Iterator<Item = &Command> {
		self.commands.range(self.cursor..)
	}

	/// Last executed command.
	pub fn top(&self) -> Option<&Command> {
		self.cursor.checked_sub(1).and_then(|i| self.commands.get(i))
	}

	/// Executes `command` and appends it, discarding the redo buffer.
	pub fn push(&mut self, mut command: Command, cx: &mut CommandContext<'_>) -> Result<&Command, StackError> {
		if self.halted {
			return Err(StackError::Halted);
		}
		if !command.is_prepared() {
			return Err(StackError::NotPrepared(command.name()));
		}
		if let Err(e) = command.execute(cx) {
			warn!(command = command.name(), element = %command.element(), error = %e, "command execution failed");
			if e.is_corrupting() {
				self.halt();
			}
			return Err(e.into());
		}

		if self.cursor < self.commands.len() {
			trace!(discarded = self.commands.len() - self.cursor, "redo buffer discarded");
			self.commands.truncate(self.cursor);
			if self.saved.is_some_and(|s| s > self.cursor) {
				self.saved = None;
			}
		}
		trace!(command = command.name(), element = %command.element(), cursor = self.cursor + 1, "command pushed");
		self.commands.push_back(command);
		self.cursor += 1;
		self.evict();
		Ok(&self.commands[self.cursor - 1])
	}

	fn evict(&mut self) {
		let Some(limit) = self.limit else {
			return;
		};
		while self.commands.len() > limit.get() {
			if let Some(evicted) = self.commands.pop_front() {
				trace!(command = evicted.name(), element = %evicted.element(), "command evicted");
			}
			self.cursor = self.cursor.saturating_sub(1);
			self.saved = match self.saved {
				Some(0) | None => None,
				Some(s) => Some(s - 1),
			};
		}
	}

	/// Undoes the last executed command. Returns `Ok(None)` when there is
	/// nothing to undo.
	pub fn undo(&mut self, cx: &mut CommandContext<'_>) -> Result<Option<&Command>, StackError> {
		if self.halted {
			return Err(StackError::Halted);
		}
		if self.cursor == 0 {
			return Ok(None);
		}
		let index = self.cursor - 1;
		let command = &mut self.commands[index];
		if let Err(source) = command.undo(cx) {
			let violation = UndoInvariantViolation {
				command: command.name(),
				element: command.element().clone(),
				source,
			};
			error!(error = %violation, "undo invariant violated, halting command stack");
			self.halt();
			return Err(violation.into());
		}
		self.cursor = index;
		trace!(command = self.commands[index].name(), cursor = self.cursor, "command undone");
		Ok(Some(&self.commands[index]))
	}

	/// Re-executes the next command of the redo buffer. Returns `Ok(None)`
	/// when the buffer is empty. A failed redo is rolled back and leaves the
	/// cursor in place.
	pub fn redo(&mut self, cx: &mut CommandContext<'_>) -> Result<Option<&Command>, StackError> {
		if self.halted {
			return Err(StackError::Halted);
		}
		let index = self.cursor;
		let Some(command) = self.commands.get_mut(index) else {
			return Ok(None);
		};
		if let Err(e) = command.execute(cx) {
			warn!(command = command.name(), element = %command.element(), error = %e, "redo failed");
			if e.is_corrupting() {
				self.halt();
			}
			return Err(e.into());
		}
		self.cursor += 1;
		trace!(command = self.commands[index].name(), cursor = self.cursor, "command redone");
		Ok(Some(&self.commands[index]))
	}

	fn halt(&mut self) {
		self.halted = true;
	}

	/// Marks the current state as saved.
	pub fn mark_saved(&mut self) {
		self.saved = Some(self.cursor);
	}

	/// Returns `true` if the state differs from the last save.
	pub fn is_dirty(&self) -> bool {
		self.saved != Some(self.cursor)
	}

	/// Drops all history and clears the halted state.
	pub fn clear(&mut self) {
		trace!(count = self.commands.len(), "command stack cleared");
		self.commands.clear();
		self.cursor = 0;
		self.saved = Some(0);
		self.halted = false;
	}
}
