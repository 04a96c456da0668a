//! Diagram model types
//!
//! The element tree (`SGraph` and its children) and the actions that can be
//! applied to it, with their JSON wire representation.

pub mod action;
pub mod element;

pub use action::{Action, Dimension, ElementResize, ResizeAction};
pub use element::{
    basic_type, GenericElement, ModelElement, NotAGraph, SGraph, SModelElement, SNode, GRAPH_TYPE,
    NODE_TYPE,
};
