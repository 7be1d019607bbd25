use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a diagram element, owned by the diagram surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub(crate) String);

impl ElementId {
    /// Create a new element ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Create an endpoint handle for one of this element's ports
    pub fn port(&self, port: &str) -> Endpoint {
        Endpoint {
            element_id: self.clone(),
            port_id: PortId::new(port),
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a port, unique within its element. Format: `{side}_{index}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortId(pub(crate) String);

impl PortId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the canonical ID for the `index`-th port on `side`
    pub fn on_side(side: Side, index: usize) -> Self {
        Self(format!("{}_{}", side.as_str(), index))
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Resolve the side encoded in the ID prefix, if any
    pub fn parse_side(&self) -> Option<Side> {
        let (prefix, _) = self.0.split_once('_')?;
        prefix.parse().ok()
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PortId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a connection, owned by the diagram surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four edges of an element's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in canonical order
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Side::Top),
            "right" => Ok(Side::Right),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            other => Err(format!("Unknown side '{}'", other)),
        }
    }
}

/// A connection anchor on one side of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub(crate) id: PortId,
    pub(crate) side: Side,
    pub(crate) occupied: bool,
    pub(crate) link_id: Option<ConnectionId>,
    /// Fraction along the side, written by the layout engine
    pub(crate) offset: f64,
}

impl Port {
    /// Create a free port. Its offset is assigned on the next relayout
    pub fn new(id: PortId, side: Side) -> Self {
        Self {
            id,
            side,
            occupied: false,
            link_id: None,
            offset: 0.0,
        }
    }

    pub fn id(&self) -> &PortId {
        &self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn link_id(&self) -> Option<ConnectionId> {
        self.link_id
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// Point in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Bounding box of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// An element as handed over by the diagram surface on registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub bounds: Bounds,
    /// Port definitions the element already carries, by ID
    #[serde(default)]
    pub ports: Vec<PortId>,
}

impl Element {
    pub fn new(id: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id: ElementId::new(id),
            bounds,
            ports: Vec::new(),
        }
    }

    /// Attach predefined port IDs
    pub fn with_ports<I, P>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PortId>,
    {
        self.ports = ports.into_iter().map(Into::into).collect();
        self
    }
}

/// An (element, port) pair on either end of a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub element_id: ElementId,
    pub port_id: PortId,
}

impl Endpoint {
    pub fn new(element_id: ElementId, port_id: PortId) -> Self {
        Self { element_id, port_id }
    }
}

/// A committed connection between two ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: Endpoint,
    pub target: Endpoint,
}

impl Connection {
    /// Create a connection with a fresh ID
    pub fn new(source: Endpoint, target: Endpoint) -> Self {
        Self {
            id: ConnectionId::new(),
            source,
            target,
        }
    }

    /// Check if this connection has an endpoint on a specific element
    pub fn involves_element(&self, element_id: &ElementId) -> bool {
        &self.source.element_id == element_id || &self.target.element_id == element_id
    }

    /// Check if this connection links exactly these two endpoints, in either direction
    pub fn links(&self, a: &Endpoint, b: &Endpoint) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    /// The endpoint opposite to the one on `element_id`
    pub fn far_end(&self, element_id: &ElementId) -> Option<&Endpoint> {
        if &self.source.element_id == element_id {
            Some(&self.target)
        } else if &self.target.element_id == element_id {
            Some(&self.source)
        } else {
            None
        }
    }
}
