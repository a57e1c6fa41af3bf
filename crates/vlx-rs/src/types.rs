use alloc::string::String;
use core::convert::TryFrom;
use core::fmt;

// --- Protocol Constants ---

/// Number of entries in the gateway's actuator table.
pub const MAX_NODES: u8 = 200;

/// Maximum number of node ids carried by a single GW_STATUS_REQUEST_REQ.
pub const STATUS_REQUEST_MAX_NODES: usize = 20;

/// Represents a gateway node index, wrapping a `u8` to ensure type safety.
///
/// The gateway addresses its actuators by their slot in the node table
/// (0-199). This newtype pattern prevents accidental use of arbitrary `u8`
/// values where a node index is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u8);

/// Error type for invalid Node ID creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIdError {
    /// Node ID is outside the gateway's node table.
    InvalidRange(u8),
}

impl fmt::Display for NodeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeIdError::InvalidRange(value) => write!(
                f,
                "Invalid NodeId value: {}. Valid range is 0-{}.",
                value,
                MAX_NODES - 1
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NodeIdError {}

impl TryFrom<u8> for NodeId {
    type Error = NodeIdError;

    /// Creates a `NodeId` from a `u8`, returning an error if the value does not
    /// address a slot of the gateway's node table.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < MAX_NODES {
            Ok(NodeId(value))
        } else {
            Err(NodeIdError::InvalidRange(value))
        }
    }
}

impl From<NodeId> for u8 {
    /// Converts a `NodeId` back into its underlying `u8` representation.
    fn from(node_id: NodeId) -> Self {
        node_id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of actuator registered in a node slot.
///
/// Several gateway node types collapse into one kind (e.g. every venetian or
/// louver blind is a `Blind`). Discovery assigns the kind when it fills the
/// node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Blind,
    RollerShutter,
    DualRollerShutter,
    Window,
    Awning,
    GarageDoor,
    Gate,
    Blade,
    Light,
    OnOffSwitch,
    /// A node type this client does not model.
    Unknown,
}

impl DeviceKind {
    /// Blinds need a targeted status request after every house status
    /// broadcast: the broadcast carries a wrong orientation (FP3) value for them.
    pub fn is_blind(&self) -> bool {
        matches!(self, DeviceKind::Blind)
    }
}

/// One entry of the gateway's node table as known to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntry {
    pub node_id: NodeId,
    pub name: String,
    pub kind: DeviceKind,
}

impl NodeEntry {
    pub fn new(node_id: NodeId, name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            node_id,
            name: name.into(),
            kind,
        }
    }
}
