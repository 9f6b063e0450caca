use rta_primitives::ElementTree;
use tracing::{debug, trace};

use super::{Editability, EvalInput, EvaluationReason, PluginKind};
use crate::context::CapabilityContext;
use crate::event::ElementMutation;
use crate::overlay::{OverlayArena, OverlayId, Relation, Vote};

/// Keeps per-overlay plugin votes in line with the element tree.
#[derive(Debug, Clone)]
pub struct EditabilityEvaluator {
	context: CapabilityContext,
	plugins: Vec<PluginKind>,
}

impl EditabilityEvaluator {
	pub fn new(context: CapabilityContext, plugins: Vec<PluginKind>) -> Self {
		Self { context, plugins }
	}

	pub fn context(&self) -> &CapabilityContext {
		&self.context
	}

	pub fn plugins(&self) -> &[PluginKind] {
		&self.plugins
	}

	pub fn is_active(&self, plugin: PluginKind) -> bool {
		self.plugins.contains(&plugin)
	}

	/// Evaluates every active plugin over `targets`.
	pub fn evaluate_editable(
		&self,
		tree: &dyn ElementTree,
		overlays: &mut OverlayArena,
		targets: &[OverlayId],
		reason: EvaluationReason,
	) {
		for &plugin in &self.plugins {
			self.evaluate_plugin(plugin, tree, overlays, targets, reason);
		}
	}

	/// Evaluates one plugin over `targets` and records its votes.
	///
	/// Overlays whose element already left the tree are skipped; their votes
	/// are retracted when the overlay is deregistered.
	pub fn evaluate_plugin(
		&self,
		plugin: PluginKind,
		tree: &dyn ElementTree,
		overlays: &mut OverlayArena,
		targets: &[OverlayId],
		reason: EvaluationReason,
	) {
		for &overlay in targets {
			let Some(element) = overlays.element(overlay) else {
				continue;
			};
			if !tree.contains(element) {
				trace!(%element, %plugin, "skipping overlay without element");
				continue;
			}
			let verdict = plugin.is_editable(
				&EvalInput {
					tree,
					overlays,
					context: &self.context,
					reason,
				},
				overlay,
			);
			match verdict {
				Editability::Uniform(editable) => {
					modify_plugin_list(overlays, overlay, plugin, editable, None);
				}
				Editability::Split {
					as_child,
					as_sibling,
				} => {
					modify_plugin_list(overlays, overlay, plugin, as_child, Some(Relation::AsChild));
					modify_plugin_list(
						overlays,
						overlay,
						plugin,
						as_sibling,
						Some(Relation::AsSibling),
					);
				}
			}
		}
	}

	pub fn register_overlay(&self, tree: &dyn ElementTree, overlays: &mut OverlayArena, overlay: OverlayId) {
		self.evaluate_editable(tree, overlays, &[overlay], EvaluationReason::Registration);
	}

	/// Retracts every vote of every active plugin, qualified or not.
	pub fn deregister_overlay(&self, overlays: &mut OverlayArena, overlay: OverlayId) {
		for &plugin in &self.plugins {
			for vote in Vote::all_of(plugin) {
				if overlays.remove_vote(overlay, vote) {
					trace!(?overlay, %vote, "vote retracted on deregistration");
				}
			}
		}
	}

	/// Re-evaluates the relevant overlays of `overlay` after `mutation`.
	///
	/// Returns the overlays that were evaluated, empty if the mutation cannot
	/// affect editability.
	pub fn reevaluate(
		&self,
		tree: &dyn ElementTree,
		overlays: &mut OverlayArena,
		overlay: OverlayId,
		mutation: &ElementMutation,
	) -> Vec<OverlayId> {
		if !mutation.triggers_reevaluation() {
			return Vec::new();
		}
		let targets = overlays.relevant_overlays(overlay);
		debug!(?overlay, ?mutation, count = targets.len(), "re-evaluating editability");
		self.evaluate_editable(tree, overlays, &targets, EvaluationReason::Reevaluation);
		targets
	}

	/// Returns `true` if `plugin` currently votes for `overlay` with `relation`.
	pub fn is_editable_by(
		&self,
		overlays: &OverlayArena,
		overlay: OverlayId,
		plugin: PluginKind,
		relation: Option<Relation>,
	) -> bool {
		overlays.get(overlay).is_some_and(|o| {
			o.votes().contains(Vote {
				plugin,
				relation,
			})
		})
	}
}

fn modify_plugin_list(
	overlays: &mut OverlayArena,
	overlay: OverlayId,
	plugin: PluginKind,
	editable: bool,
	relation: Option<Relation>,
) {
	let vote = Vote { plugin, relation };
	if editable {
		if overlays.add_vote(overlay, vote) {
			trace!(?overlay, %vote, "vote added");
		}
	} else if overlays.remove_vote(overlay, vote) {
		trace!(?overlay, %vote, "vote removed");
	}
}
