//! Node indexing and resize application
//!
//! This module takes a diagram model and updates node sizes in place from a
//! resize action, producing a report of what changed.

pub mod config;
pub mod error;
pub mod index;
pub mod resize;

pub use config::{ConfigError, ResizeConfig, UnknownIdPolicy};
pub use error::{Axis, ResizeError};
pub use index::{create_id_to_node_map, NodeIndex, NodePath};
pub use resize::{
    apply_resize_action, apply_resize_action_with_config, AppliedResize, ResizeCommand,
    ResizeReport,
};
