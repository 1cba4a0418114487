pub mod conversion;
pub mod definition;
pub mod edge;
pub mod node;

pub use conversion::*;
pub use definition::*;
pub use edge::*;
pub use node::*;

/// Identifier of a node within a snapshot.
pub type NodeId = String;

/// Identifier of an edge within a snapshot.
pub type EdgeId = String;
