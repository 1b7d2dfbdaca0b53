pub mod audit;
pub mod cap;
pub mod compose;
pub mod facet;
pub mod handles;
pub mod polyhedron;
pub mod solid_data;

pub use audit::{MeshAudit, audit, euler_characteristic};
pub use cap::{Cap, CapKind, CapSearch, Peak};
pub use compose::{attach, remove_cap};
pub use facet::Facet;
pub use handles::{Edge, Face, Vertex};
pub use polyhedron::Polyhedron;
pub use solid_data::SolidData;

/// Defensive bound for walks around a vertex. No CRF solid has a vertex of
/// degree above six; exceeding this means the mesh is corrupt.
pub const MAX_VERTEX_DEGREE: usize = 12;
