//! Element tree of a diagram model
//!
//! Every element carries a `type` string. The part before the first `:` is the
//! *basic type* and decides which variant the element becomes: `graph`
//! elements are roots, `node` elements have a size, everything else (edges,
//! labels, compartments, custom kinds) is kept as a generic element. Any
//! property this crate does not interpret is preserved verbatim so a model can
//! be read, resized, and written back without loss.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Basic type of root elements
pub const GRAPH_TYPE: &str = "graph";

/// Basic type of sized node elements
pub const NODE_TYPE: &str = "node";

/// Return the basic type of an element type string (`"node:circle"` -> `"node"`)
pub fn basic_type(element_type: &str) -> &str {
    match element_type.split_once(':') {
        Some((basic, _)) => basic,
        None => element_type,
    }
}

/// Capabilities shared by all elements of the tree
///
/// This is the only surface the indexing and resize code relies on: read the
/// identifier, walk the children, and view an element as a node when it is one.
pub trait ModelElement {
    /// Full element type, e.g. `node:circle`
    fn element_type(&self) -> &str;

    /// Element identifier, if any
    fn id(&self) -> Option<&str>;

    /// Ordered child elements
    fn children(&self) -> &[SModelElement];

    /// Mutable access to the ordered child elements
    fn children_mut(&mut self) -> &mut Vec<SModelElement>;

    /// View this element as a node
    fn as_node(&self) -> Option<&SNode> {
        None
    }

    /// View this element as a mutable node
    fn as_node_mut(&mut self) -> Option<&mut SNode> {
        None
    }
}

/// Root element of a diagram
#[derive(Debug, Clone, PartialEq)]
pub struct SGraph {
    pub element_type: String,
    pub id: Option<String>,
    pub children: Vec<SModelElement>,
    /// Properties not interpreted by this crate
    pub properties: Map<String, Value>,
}

/// A diagram element with a width and a height
#[derive(Debug, Clone, PartialEq)]
pub struct SNode {
    pub element_type: String,
    pub id: Option<String>,
    pub children: Vec<SModelElement>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Properties not interpreted by this crate
    pub properties: Map<String, Value>,
}

/// Any element that is neither a graph nor a node (edges, labels, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct GenericElement {
    pub element_type: String,
    pub id: Option<String>,
    pub children: Vec<SModelElement>,
    /// Properties not interpreted by this crate
    pub properties: Map<String, Value>,
}

/// A child element of the tree, classified by its basic type
#[derive(Debug, Clone, PartialEq)]
pub enum SModelElement {
    Graph(SGraph),
    Node(SNode),
    Generic(GenericElement),
}

/// Returned when a model root is not a graph
#[derive(Debug, Error)]
#[error("expected a 'graph' root element, found type '{found}'")]
pub struct NotAGraph {
    pub found: String,
}

impl SGraph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            element_type: GRAPH_TYPE.to_string(),
            id: Some(id.into()),
            children: Vec::new(),
            properties: Map::new(),
        }
    }

    /// Append a child element
    pub fn with_child(mut self, child: impl Into<SModelElement>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl SNode {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            element_type: NODE_TYPE.to_string(),
            id: Some(id.into()),
            children: Vec::new(),
            width: Some(width),
            height: Some(height),
            properties: Map::new(),
        }
    }

    /// A node without identifier or size
    pub fn anonymous() -> Self {
        Self {
            element_type: NODE_TYPE.to_string(),
            id: None,
            children: Vec::new(),
            width: None,
            height: None,
            properties: Map::new(),
        }
    }

    /// Override the element type (must keep the `node` basic type to stay a node)
    pub fn with_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = element_type.into();
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: impl Into<SModelElement>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl GenericElement {
    pub fn new(element_type: impl Into<String>, id: Option<String>) -> Self {
        Self {
            element_type: element_type.into(),
            id,
            children: Vec::new(),
            properties: Map::new(),
        }
    }

    /// Append a child element
    pub fn with_child(mut self, child: impl Into<SModelElement>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl From<SGraph> for SModelElement {
    fn from(graph: SGraph) -> Self {
        SModelElement::Graph(graph)
    }
}

impl From<SNode> for SModelElement {
    fn from(node: SNode) -> Self {
        SModelElement::Node(node)
    }
}

impl From<GenericElement> for SModelElement {
    fn from(element: GenericElement) -> Self {
        SModelElement::Generic(element)
    }
}

impl TryFrom<SModelElement> for SGraph {
    type Error = NotAGraph;

    fn try_from(element: SModelElement) -> Result<Self, Self::Error> {
        match element {
            SModelElement::Graph(graph) => Ok(graph),
            other => Err(NotAGraph {
                found: other.element_type().to_string(),
            }),
        }
    }
}

impl ModelElement for SGraph {
    fn element_type(&self) -> &str {
        &self.element_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn children(&self) -> &[SModelElement] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<SModelElement> {
        &mut self.children
    }
}

impl ModelElement for SNode {
    fn element_type(&self) -> &str {
        &self.element_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn children(&self) -> &[SModelElement] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<SModelElement> {
        &mut self.children
    }

    fn as_node(&self) -> Option<&SNode> {
        Some(self)
    }

    fn as_node_mut(&mut self) -> Option<&mut SNode> {
        Some(self)
    }
}

impl ModelElement for GenericElement {
    fn element_type(&self) -> &str {
        &self.element_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn children(&self) -> &[SModelElement] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<SModelElement> {
        &mut self.children
    }
}

impl ModelElement for SModelElement {
    fn element_type(&self) -> &str {
        match self {
            SModelElement::Graph(g) => g.element_type(),
            SModelElement::Node(n) => n.element_type(),
            SModelElement::Generic(e) => e.element_type(),
        }
    }

    fn id(&self) -> Option<&str> {
        match self {
            SModelElement::Graph(g) => g.id(),
            SModelElement::Node(n) => n.id(),
            SModelElement::Generic(e) => e.id(),
        }
    }

    fn children(&self) -> &[SModelElement] {
        match self {
            SModelElement::Graph(g) => g.children(),
            SModelElement::Node(n) => n.children(),
            SModelElement::Generic(e) => e.children(),
        }
    }

    fn children_mut(&mut self) -> &mut Vec<SModelElement> {
        match self {
            SModelElement::Graph(g) => g.children_mut(),
            SModelElement::Node(n) => n.children_mut(),
            SModelElement::Generic(e) => e.children_mut(),
        }
    }

    fn as_node(&self) -> Option<&SNode> {
        match self {
            SModelElement::Node(n) => Some(n),
            _ => None,
        }
    }

    fn as_node_mut(&mut self) -> Option<&mut SNode> {
        match self {
            SModelElement::Node(n) => Some(n),
            _ => None,
        }
    }
}

// Wire representation shared by all variants. `width`/`height` are only
// lifted out of `properties` for nodes.

#[derive(Deserialize)]
struct ElementSchema {
    #[serde(rename = "type")]
    element_type: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    children: Vec<SModelElement>,
    #[serde(flatten)]
    properties: Map<String, Value>,
}

#[derive(Serialize)]
struct ElementSchemaRef<'a> {
    #[serde(rename = "type")]
    element_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "no_children")]
    children: &'a [SModelElement],
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(flatten)]
    properties: UntypedProperties<'a>,
}

/// Properties minus any key shadowed by a typed size field
struct UntypedProperties<'a> {
    properties: &'a Map<String, Value>,
    skip_width: bool,
    skip_height: bool,
}

impl<'a> UntypedProperties<'a> {
    fn new(properties: &'a Map<String, Value>, width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            properties,
            skip_width: width.is_some(),
            skip_height: height.is_some(),
        }
    }
}

impl Serialize for UntypedProperties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.properties.iter().filter(|(key, _)| {
            !(self.skip_width && key.as_str() == "width"
                || self.skip_height && key.as_str() == "height")
        }))
    }
}

fn no_children(children: &&[SModelElement]) -> bool {
    children.is_empty()
}

/// `"children": null` reads as no children
fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<SModelElement>, D::Error> {
    Ok(Option::<Vec<SModelElement>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Take a numeric property out of the map; non-numeric values stay in place
fn take_number(properties: &mut Map<String, Value>, key: &str) -> Option<f64> {
    let value = properties.get(key)?.as_f64()?;
    properties.remove(key);
    Some(value)
}

impl From<ElementSchema> for SModelElement {
    fn from(schema: ElementSchema) -> Self {
        let ElementSchema {
            element_type,
            id,
            children,
            mut properties,
        } = schema;

        match basic_type(&element_type) {
            GRAPH_TYPE => SModelElement::Graph(SGraph {
                element_type,
                id,
                children,
                properties,
            }),
            NODE_TYPE => {
                let width = take_number(&mut properties, "width");
                let height = take_number(&mut properties, "height");
                SModelElement::Node(SNode {
                    element_type,
                    id,
                    children,
                    width,
                    height,
                    properties,
                })
            }
            _ => SModelElement::Generic(GenericElement {
                element_type,
                id,
                children,
                properties,
            }),
        }
    }
}

impl SModelElement {
    fn schema_ref(&self) -> ElementSchemaRef<'_> {
        let (width, height, properties) = match self {
            SModelElement::Graph(g) => (None, None, &g.properties),
            SModelElement::Node(n) => (n.width, n.height, &n.properties),
            SModelElement::Generic(e) => (None, None, &e.properties),
        };
        ElementSchemaRef {
            element_type: self.element_type(),
            id: self.id(),
            children: self.children(),
            width,
            height,
            properties: UntypedProperties::new(properties, width, height),
        }
    }
}

impl Serialize for SModelElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.schema_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SModelElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ElementSchema::deserialize(deserializer).map(SModelElement::from)
    }
}

impl Serialize for SGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ElementSchemaRef {
            element_type: &self.element_type,
            id: self.id.as_deref(),
            children: &self.children,
            width: None,
            height: None,
            properties: UntypedProperties::new(&self.properties, None, None),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let element = SModelElement::deserialize(deserializer)?;
        SGraph::try_from(element).map_err(D::Error::custom)
    }
}
