//! Applying resize actions to a graph
//!
//! Each call builds a fresh [`NodeIndex`] over the graph, then walks the
//! action's entries in order. An entry whose id does not resolve is skipped; a
//! resolved node gets each specified component of the new size, and keeps the
//! components that are left out. Entries later in the list win over earlier
//! ones for the same node.

use std::fmt;

use crate::model::{Dimension, ElementResize, ResizeAction, SGraph, SNode};

use super::config::{ResizeConfig, UnknownIdPolicy};
use super::error::{Axis, ResizeError};
use super::index::NodeIndex;

/// One entry that changed a node, with the size the node had before
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedResize {
    pub element_id: String,
    pub previous: Dimension,
    pub requested: Dimension,
}

/// Outcome of applying a resize action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizeReport {
    /// Entries that resolved to a node, in application order
    pub applied: Vec<AppliedResize>,
    /// Ids of entries that did not resolve, in action order
    pub skipped: Vec<String>,
}

impl ResizeReport {
    /// True when no node was touched
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

impl fmt::Display for ResizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applied, {} skipped",
            self.applied.len(),
            self.skipped.len()
        )?;
        if !self.skipped.is_empty() {
            write!(f, ": {}", self.skipped.join(", "))?;
        }
        Ok(())
    }
}

/// Apply a resize action with the default configuration
///
/// Unknown ids are ignored and no validation is done, so this never fails.
pub fn apply_resize_action(graph: &mut SGraph, action: &ResizeAction) -> ResizeReport {
    let index = NodeIndex::build(graph);
    apply_entries(graph, &index, &action.resizes, UnknownIdPolicy::Ignore)
}

/// Apply a resize action, honouring `config`
///
/// Validation happens before any node is changed: if an error is returned the
/// graph is untouched.
#[tracing::instrument(skip_all, fields(resizes = action.resizes.len()))]
pub fn apply_resize_action_with_config(
    graph: &mut SGraph,
    action: &ResizeAction,
    config: &ResizeConfig,
) -> Result<ResizeReport, ResizeError> {
    let index = NodeIndex::build(graph);
    if config.validates() {
        validate(&index, action, config)?;
    }
    Ok(apply_entries(graph, &index, &action.resizes, config.unknown_ids))
}

fn validate(
    index: &NodeIndex,
    action: &ResizeAction,
    config: &ResizeConfig,
) -> Result<(), ResizeError> {
    for resize in &action.resizes {
        if config.unknown_ids == UnknownIdPolicy::Error && !index.contains(&resize.element_id) {
            return Err(ResizeError::unknown(
                resize.element_id.clone(),
                index.similar_ids(&resize.element_id, 2),
            ));
        }
        if config.reject_non_finite {
            let components = [
                (Axis::Width, resize.new_size.width),
                (Axis::Height, resize.new_size.height),
            ];
            for (axis, value) in components {
                if let Some(value) = value.filter(|v| !v.is_finite()) {
                    return Err(ResizeError::non_finite(resize.element_id.clone(), axis, value));
                }
            }
        }
    }
    Ok(())
}

fn apply_entries(
    graph: &mut SGraph,
    index: &NodeIndex,
    resizes: &[ElementResize],
    policy: UnknownIdPolicy,
) -> ResizeReport {
    let mut report = ResizeReport::default();

    for resize in resizes {
        let Some(node) = index.resolve_mut(graph, &resize.element_id) else {
            if policy == UnknownIdPolicy::Warn {
                tracing::warn!(element_id = %resize.element_id, "resize target not found");
            } else {
                tracing::trace!(element_id = %resize.element_id, "skipping unknown resize target");
            }
            report.skipped.push(resize.element_id.clone());
            continue;
        };

        let previous = current_size(node);
        set_size(node, resize.new_size);
        report.applied.push(AppliedResize {
            element_id: resize.element_id.clone(),
            previous,
            requested: resize.new_size,
        });
    }

    tracing::debug!(
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        "applied resize action"
    );
    report
}

fn current_size(node: &SNode) -> Dimension {
    Dimension {
        width: node.width,
        height: node.height,
    }
}

/// Overwrite the components present in `size`
fn set_size(node: &mut SNode, size: Dimension) {
    if let Some(width) = size.width {
        node.width = Some(width);
    }
    if let Some(height) = size.height {
        node.height = Some(height);
    }
}

/// A resize action that can be executed, undone, and redone on a graph
///
/// The command remembers the sizes it overwrote. Undo restores them exactly,
/// including sizes that were unset before. The graph must not be restructured
/// between execute and undo.
#[derive(Debug, Clone)]
pub struct ResizeCommand {
    action: ResizeAction,
    config: ResizeConfig,
    report: Option<ResizeReport>,
}

impl ResizeCommand {
    pub fn new(action: ResizeAction) -> Self {
        Self {
            action,
            config: ResizeConfig::default(),
            report: None,
        }
    }

    /// Set the configuration used on execute and redo
    pub fn with_config(mut self, config: ResizeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn action(&self) -> &ResizeAction {
        &self.action
    }

    /// Report of the last execution, if the command is currently applied
    pub fn report(&self) -> Option<&ResizeReport> {
        self.report.as_ref()
    }

    pub fn is_applied(&self) -> bool {
        self.report.is_some()
    }

    /// Apply the action. Executing an already applied command re-applies it
    /// on top and keeps only the latest previous sizes.
    pub fn execute(&mut self, graph: &mut SGraph) -> Result<&ResizeReport, ResizeError> {
        let report = apply_resize_action_with_config(graph, &self.action, &self.config)?;
        Ok(self.report.insert(report))
    }

    /// Restore the sizes overwritten by the last execution.
    ///
    /// Returns false if the command was not applied.
    pub fn undo(&mut self, graph: &mut SGraph) -> bool {
        let Some(report) = self.report.take() else {
            return false;
        };

        let index = NodeIndex::build(graph);
        // Reverse order so repeated entries for one node end at the oldest size
        for applied in report.applied.iter().rev() {
            if let Some(node) = index.resolve_mut(graph, &applied.element_id) {
                node.width = applied.previous.width;
                node.height = applied.previous.height;
            }
        }
        tracing::debug!(restored = report.applied.len(), "undid resize action");
        true
    }

    /// Re-apply the action after an undo.
    ///
    /// Returns false without touching the graph if the command is already applied.
    pub fn redo(&mut self, graph: &mut SGraph) -> Result<bool, ResizeError> {
        if self.is_applied() {
            return Ok(false);
        }
        self.execute(graph)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GenericElement;
    use pretty_assertions::assert_eq;

    fn two_node_graph() -> SGraph {
        SGraph::new("g")
            .with_child(SNode::new("n1", 10.0, 20.0))
            .with_child(SNode::new("n2", 5.0, 5.0))
    }

    fn size_of(graph: &SGraph, id: &str) -> (Option<f64>, Option<f64>) {
        let node = NodeIndex::build(graph)
            .resolve(graph, id)
            .cloned()
            .expect("node should exist");
        (node.width, node.height)
    }

    #[test]
    fn test_partial_resize_and_unknown_id() {
        let mut graph = two_node_graph();
        let action = ResizeAction::new()
            .with_resize("n1", Dimension::width(15.0))
            .with_resize("n3", Dimension::new(99.0, 99.0));

        let report = apply_resize_action(&mut graph, &action);

        assert_eq!(size_of(&graph, "n1"), (Some(15.0), Some(20.0)));
        assert_eq!(size_of(&graph, "n2"), (Some(5.0), Some(5.0)));
        assert_eq!(report.skipped, vec!["n3".to_string()]);
        assert_eq!(
            report.applied,
            vec![AppliedResize {
                element_id: "n1".to_string(),
                previous: Dimension::new(10.0, 20.0),
                requested: Dimension::width(15.0),
            }]
        );
    }

    #[test]
    fn test_height_only() {
        let mut graph = two_node_graph();
        apply_resize_action(&mut graph, &ResizeAction::new().with_resize("n2", Dimension::height(8.0)));
        assert_eq!(size_of(&graph, "n2"), (Some(5.0), Some(8.0)));
    }

    #[test]
    fn test_empty_dimension_changes_nothing() {
        let mut graph = two_node_graph();
        let before = graph.clone();
        let report = apply_resize_action(
            &mut graph,
            &ResizeAction::new().with_resize("n1", Dimension::default()),
        );
        assert_eq!(graph, before);
        assert_eq!(report.applied.len(), 1);
    }

    #[test]
    fn test_empty_action_is_noop() {
        let mut graph = two_node_graph();
        let before = graph.clone();
        let report = apply_resize_action(&mut graph, &ResizeAction::new());
        assert_eq!(graph, before);
        assert!(report.is_noop());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_last_entry_wins() {
        let mut graph = two_node_graph();
        let action = ResizeAction::new()
            .with_resize("n1", Dimension::new(1.0, 1.0))
            .with_resize("n1", Dimension::width(2.0));
        apply_resize_action(&mut graph, &action);
        assert_eq!(size_of(&graph, "n1"), (Some(2.0), Some(1.0)));
    }

    #[test]
    fn test_idempotent() {
        let action = ResizeAction::new()
            .with_resize("n1", Dimension::width(30.0))
            .with_resize("n2", Dimension::new(7.0, 9.0));

        let mut once = two_node_graph();
        apply_resize_action(&mut once, &action);

        let mut twice = two_node_graph();
        apply_resize_action(&mut twice, &action);
        apply_resize_action(&mut twice, &action);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_non_node_ids_are_not_resized() {
        let mut graph = SGraph::new("g").with_child(
            GenericElement::new("comp", Some("c".to_string())).with_child(SNode::new("deep", 1.0, 1.0)),
        );
        let report = apply_resize_action(
            &mut graph,
            &ResizeAction::new()
                .with_resize("c", Dimension::new(3.0, 3.0))
                .with_resize("g", Dimension::new(3.0, 3.0))
                .with_resize("deep", Dimension::new(3.0, 3.0)),
        );
        assert_eq!(report.skipped, vec!["c".to_string(), "g".to_string()]);
        assert_eq!(size_of(&graph, "deep"), (Some(3.0), Some(3.0)));
    }

    #[test]
    fn test_strict_policy_rejects_without_mutation() {
        let mut graph = two_node_graph();
        let before = graph.clone();
        let action = ResizeAction::new()
            .with_resize("n1", Dimension::width(15.0))
            .with_resize("n11", Dimension::width(1.0));
        let config = ResizeConfig::new().with_unknown_ids(UnknownIdPolicy::Error);

        let err = apply_resize_action_with_config(&mut graph, &action, &config).unwrap_err();

        assert!(matches!(err, ResizeError::UnknownElement { .. }));
        assert_eq!(err.element_id(), "n11");
        assert_eq!(
            err.suggestions(),
            Some(&["n1".to_string(), "n2".to_string()][..])
        );
        assert_eq!(graph, before);
    }

    #[test]
    fn test_warn_policy_still_skips() {
        let mut graph = two_node_graph();
        let config = ResizeConfig::new().with_unknown_ids(UnknownIdPolicy::Warn);
        let report = apply_resize_action_with_config(
            &mut graph,
            &ResizeAction::new().with_resize("missing", Dimension::width(1.0)),
            &config,
        )
        .unwrap();
        assert_eq!(report.skipped, vec!["missing".to_string()]);
    }

    #[test]
    fn test_non_finite_rejected_when_configured() {
        let action = ResizeAction::new()
            .with_resize("n1", Dimension::width(1.0))
            .with_resize("n2", Dimension::height(f64::NAN));

        let mut graph = two_node_graph();
        let before = graph.clone();
        let config = ResizeConfig::new().with_reject_non_finite(true);
        let err = apply_resize_action_with_config(&mut graph, &action, &config).unwrap_err();
        assert!(matches!(
            err,
            ResizeError::NonFiniteDimension {
                axis: Axis::Height,
                ..
            }
        ));
        assert_eq!(graph, before);

        // Accepted with the default configuration
        let mut graph = two_node_graph();
        apply_resize_action(&mut graph, &action);
        assert!(size_of(&graph, "n2").1.is_some_and(f64::is_nan));
    }

    #[test]
    fn test_default_config_accepts_everything() {
        let action = ResizeAction::new()
            .with_resize("n2", Dimension::height(f64::INFINITY))
            .with_resize("n9", Dimension::width(1.0));
        let config = ResizeConfig::default();
        assert!(!config.validates());

        let mut graph = two_node_graph();
        let report = apply_resize_action_with_config(&mut graph, &action, &config).unwrap();
        assert_eq!(report.skipped, vec!["n9".to_string()]);
        assert_eq!(size_of(&graph, "n2"), (Some(5.0), Some(f64::INFINITY)));
    }

    #[test]
    fn test_report_display() {
        let mut graph = two_node_graph();
        let report = apply_resize_action(
            &mut graph,
            &ResizeAction::new()
                .with_resize("n1", Dimension::width(15.0))
                .with_resize("n3", Dimension::width(1.0))
                .with_resize("n4", Dimension::width(1.0)),
        );
        insta::assert_snapshot!(report.to_string(), @"1 applied, 2 skipped: n3, n4");
    }

    #[test]
    fn test_command_undo_restores_sizes() {
        let mut graph = two_node_graph();
        let before = graph.clone();
        let mut command = ResizeCommand::new(
            ResizeAction::new()
                .with_resize("n1", Dimension::new(1.0, 1.0))
                .with_resize("n1", Dimension::width(2.0))
                .with_resize("n2", Dimension::height(3.0)),
        );

        command.execute(&mut graph).unwrap();
        assert!(command.is_applied());
        let after = graph.clone();
        assert_eq!(size_of(&graph, "n1"), (Some(2.0), Some(1.0)));

        assert!(command.undo(&mut graph));
        assert_eq!(graph, before);
        assert!(!command.undo(&mut graph));

        assert!(command.redo(&mut graph).unwrap());
        assert_eq!(graph, after);
    }

    #[test]
    fn test_undo_restores_unset_size() {
        let bare = SNode {
            id: Some("bare".to_string()),
            ..SNode::anonymous().with_type("node:circle")
        };
        let mut graph = SGraph::new("g").with_child(bare);
        let before = graph.clone();

        let mut command = ResizeCommand::new(ResizeAction::new().with_resize("bare", Dimension::new(4.0, 4.0)));
        command.execute(&mut graph).unwrap();
        assert_eq!(size_of(&graph, "bare"), (Some(4.0), Some(4.0)));

        command.undo(&mut graph);
        assert_eq!(graph, before);
    }

    #[test]
    fn test_redo_when_applied_is_noop() {
        let mut graph = two_node_graph();
        let mut command = ResizeCommand::new(ResizeAction::new().with_resize("n1", Dimension::width(3.0)));
        command.execute(&mut graph).unwrap();
        assert!(!command.redo(&mut graph).unwrap());
        let report = command.report().unwrap();
        assert_eq!(report.applied[0].previous, Dimension::new(10.0, 20.0));
    }

    #[test]
    fn test_failed_execute_leaves_command_unapplied() {
        let mut graph = two_node_graph();
        let mut command = ResizeCommand::new(ResizeAction::new().with_resize("nope", Dimension::width(3.0)))
            .with_config(ResizeConfig::new().with_unknown_ids(UnknownIdPolicy::Error));
        assert!(command.execute(&mut graph).is_err());
        assert!(!command.is_applied());
        assert!(command.report().is_none());
        assert_eq!(command.action().resizes.len(), 1);
    }
}
