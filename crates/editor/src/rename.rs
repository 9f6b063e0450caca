//! Variant rename gesture.
//!
//! Only one rename can be pending at a time. Starting one hands out a
//! [`RenameTicket`]; the host confirms the typed title through a
//! [`TitleValidator`], which may call out of process, and then finishes the
//! rename on the session. Removing the overlay (or any ancestor) while the
//! confirmation is in flight cancels the ticket's token, which resolves a
//! pending [`RenameTicket::confirm`] with [`RenameError::Cancelled`].

use async_trait::async_trait;
use rta_primitives::{VariantKey, VariantScopeId};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::RenameError;
use crate::overlay::OverlayId;

/// Confirms a new variant title with the host, e.g. against titles stored
/// outside the current session.
#[async_trait]
pub trait TitleValidator: Send + Sync {
	/// Returns `Err` with a user-facing reason to reject the title.
	async fn confirm(&self, scope: &VariantScopeId, key: &VariantKey, title: &str) -> Result<(), String>;
}

/// Accepts every title.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

#[async_trait]
impl TitleValidator for AcceptAll {
	async fn confirm(&self, _: &VariantScopeId, _: &VariantKey, _: &str) -> Result<(), String> {
		Ok(())
	}
}

/// Handle for one pending rename.
#[derive(Debug, Clone)]
pub struct RenameTicket {
	overlay: OverlayId,
	scope: VariantScopeId,
	key: VariantKey,
	generation: u64,
	token: CancellationToken,
}

impl RenameTicket {
	pub fn overlay(&self) -> OverlayId {
		self.overlay
	}

	pub fn scope(&self) -> &VariantScopeId {
		&self.scope
	}

	/// Variant being renamed.
	pub fn key(&self) -> &VariantKey {
		&self.key
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Runs the validator unless the rename is cancelled first.
	pub async fn confirm<V>(&self, validator: &V, title: String) -> Result<String, RenameError>
	where
		V: TitleValidator + ?Sized,
	{
		let confirmed = tokio::select! {
			biased;
			() = self.token.cancelled() => Err(RenameError::Cancelled),
			result = validator.confirm(&self.scope, &self.key, &title) => {
				result.map_err(RenameError::Rejected)
			}
		};
		confirmed.map(|()| title)
	}
}

#[derive(Debug)]
struct Pending {
	overlay: OverlayId,
	generation: u64,
	token: CancellationToken,
}

/// Enforces at most one pending rename.
#[derive(Debug, Default)]
pub struct RenameTracker {
	pending: Option<Pending>,
	generation: u64,
}

impl RenameTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn start(
		&mut self,
		overlay: OverlayId,
		scope: VariantScopeId,
		key: VariantKey,
	) -> Result<RenameTicket, RenameError> {
		if self.pending.is_some() {
			return Err(RenameError::InProgress);
		}
		self.generation += 1;
		let token = CancellationToken::new();
		self.pending = Some(Pending {
			overlay,
			generation: self.generation,
			token: token.clone(),
		});
		debug!(?overlay, %scope, %key, "variant rename started");
		Ok(RenameTicket {
			overlay,
			scope,
			key,
			generation: self.generation,
			token,
		})
	}

	pub fn pending_overlay(&self) -> Option<OverlayId> {
		self.pending.as_ref().map(|p| p.overlay)
	}

	/// Cancels the pending rename, returning its overlay.
	pub fn cancel(&mut self) -> Option<OverlayId> {
		let pending = self.pending.take()?;
		pending.token.cancel();
		debug!(overlay = ?pending.overlay, "variant rename cancelled");
		Some(pending.overlay)
	}

	/// Cancels the pending rename if its overlay is among `removed`.
	pub fn cancel_if_removed(&mut self, removed: &[OverlayId]) -> Option<OverlayId> {
		let overlay = self.pending_overlay()?;
		if removed.contains(&overlay) {
			self.cancel()
		} else {
			None
		}
	}

	/// Ends the rename `ticket` belongs to.
	///
	/// Fails with [`RenameError::Cancelled`] if the ticket was cancelled or
	/// is not the pending one.
	pub fn finish(&mut self, ticket: &RenameTicket) -> Result<(), RenameError> {
		match &self.pending {
			Some(p) if p.generation == ticket.generation => {
				self.pending = None;
			}
			_ => return Err(RenameError::Cancelled),
		}
		if ticket.is_cancelled() {
			return Err(RenameError::Cancelled);
		}
		Ok(())
	}
}
