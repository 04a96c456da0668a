//! Actions that change a diagram model
//!
//! Actions are plain data tagged by `kind`, so they can be exchanged as JSON
//! with whatever produced them (a client, a test fixture, a file on disk).

use serde::{Deserialize, Serialize};

/// A declarative change to the model, discriminated by its `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Action {
    #[serde(rename = "resize")]
    Resize(ResizeAction),
}

impl Action {
    /// The `kind` discriminator of this action
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Resize(_) => ResizeAction::KIND,
        }
    }
}

impl From<ResizeAction> for Action {
    fn from(action: ResizeAction) -> Self {
        Action::Resize(action)
    }
}

/// A batch of element resize requests, applied in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResizeAction {
    #[serde(default)]
    pub resizes: Vec<ElementResize>,
}

impl ResizeAction {
    pub const KIND: &'static str = "resize";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resize request
    pub fn with_resize(mut self, element_id: impl Into<String>, new_size: Dimension) -> Self {
        self.resizes.push(ElementResize::new(element_id, new_size));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.resizes.is_empty()
    }
}

impl FromIterator<ElementResize> for ResizeAction {
    fn from_iter<I: IntoIterator<Item = ElementResize>>(iter: I) -> Self {
        Self {
            resizes: iter.into_iter().collect(),
        }
    }
}

/// One resize request: target element and its new size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementResize {
    pub element_id: String,
    #[serde(default)]
    pub new_size: Dimension,
}

impl ElementResize {
    pub fn new(element_id: impl Into<String>, new_size: Dimension) -> Self {
        Self {
            element_id: element_id.into(),
            new_size,
        }
    }
}

/// Width and height, each optional. A missing component means "unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Dimension {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Only the width is set
    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    /// Only the height is set
    pub fn height(height: f64) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    /// True when neither component is set
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}
