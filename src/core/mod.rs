use std::fmt::{Display, Formatter};

pub mod collision;
pub mod config;
pub mod prelude;
pub mod scene;

/// A unique identifier for nodes within a [`SceneGraph`](scene::SceneGraph).
///
/// IDs are handed out by the scene graph starting at 1. `ObjectId(0)` represents the root,
/// which never actually exists in the scene: it is the parent of every top-level node, and
/// using it where a real node is required is a precondition violation.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn is_root(self) -> bool {
        self.0 == 0
    }
    pub fn root() -> Self {
        ObjectId(0)
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a layer: a partition of the scene whose collidable shapes are only ever
/// compared with each other.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct LayerId(pub(crate) usize);

impl Display for LayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer {}", self.0)
    }
}
