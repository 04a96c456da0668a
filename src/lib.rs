//! SGraph Layout - node index and resize actions for diagram models
//!
//! This library reads a diagram model (a tree of elements rooted at a graph),
//! indexes its nodes by id, and applies resize actions to them in place.
//!
//! # Example
//!
//! ```rust
//! use sgraph_layout::model::{Dimension, ResizeAction, SGraph, SNode};
//! use sgraph_layout::apply_resize_action;
//!
//! let mut graph = SGraph::new("g")
//!     .with_child(SNode::new("n1", 10.0, 20.0))
//!     .with_child(SNode::new("n2", 5.0, 5.0));
//!
//! let action = ResizeAction::new()
//!     .with_resize("n1", Dimension::width(15.0))
//!     .with_resize("n3", Dimension::new(99.0, 99.0));
//!
//! let report = apply_resize_action(&mut graph, &action);
//! assert_eq!(report.applied.len(), 1);
//! assert_eq!(report.skipped, vec!["n3".to_string()]);
//! ```

pub mod error;
pub mod layout;
pub mod model;

pub use error::{InputError, InputKind};
pub use layout::{
    apply_resize_action, apply_resize_action_with_config, create_id_to_node_map, NodeIndex,
    ResizeCommand, ResizeConfig, ResizeError, ResizeReport, UnknownIdPolicy,
};
pub use model::{Action, Dimension, ElementResize, ResizeAction, SGraph, SModelElement, SNode};

/// Errors that can occur in the JSON resize pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model or action could not be read
    #[error(transparent)]
    Input(#[from] InputError),

    /// The action was refused by the configuration
    #[error("resize error: {0}")]
    Resize(#[from] ResizeError),

    /// The updated model could not be serialized
    #[error("failed to write model JSON: {0}")]
    Output(#[from] serde_json::Error),
}

/// Parse a model whose root is a graph element
pub fn parse_graph(source: &str) -> Result<SGraph, InputError> {
    serde_json::from_str(source).map_err(|e| InputError::json(InputKind::Model, source, e))
}

/// Parse a `kind`-tagged resize action
pub fn parse_action(source: &str) -> Result<ResizeAction, InputError> {
    let action: Action =
        serde_json::from_str(source).map_err(|e| InputError::json(InputKind::Action, source, e))?;
    match action {
        Action::Resize(resize) => Ok(resize),
    }
}

/// Apply a JSON resize action to a JSON model and return the updated model
///
/// # Example
///
/// ```rust
/// use sgraph_layout::{apply_resize_json, ResizeConfig};
///
/// let model = r#"{ "type": "graph", "id": "g", "children": [
///     { "type": "node", "id": "n1", "width": 10, "height": 20 }
/// ] }"#;
/// let action = r#"{ "kind": "resize", "resizes": [
///     { "elementId": "n1", "newSize": { "height": 40 } }
/// ] }"#;
///
/// let updated = apply_resize_json(model, action, &ResizeConfig::default()).unwrap();
/// assert!(updated.contains("40.0"));
/// ```
pub fn apply_resize_json(
    model: &str,
    action: &str,
    config: &ResizeConfig,
) -> Result<String, Error> {
    let mut graph = parse_graph(model)?;
    let action = parse_action(action)?;

    let report = apply_resize_action_with_config(&mut graph, &action, config)?;
    tracing::debug!(%report, "resized model");

    Ok(serde_json::to_string_pretty(&graph)?)
}
