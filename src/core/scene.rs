use crate::core::prelude::*;
use std::collections::BTreeMap;

/// The view of the scene that collision queries need: where each node is in the world, and
/// which layer it belongs to.
///
/// World transforms are composed through the parent chain on every call and never cached.
pub trait SceneTransforms {
    fn world_transform(&self, id: ObjectId) -> Transform;
    fn parent_layer(&self, id: ObjectId) -> Option<LayerId>;
    fn contains(&self, id: ObjectId) -> bool;

    fn world_position(&self, id: ObjectId) -> Vec2 {
        self.world_transform(id).centre
    }
    /// World rotation in degrees.
    fn world_rotation(&self, id: ObjectId) -> f32 {
        self.world_transform(id).rotation
    }
}

#[derive(Debug, Clone)]
struct SceneNode {
    parent: ObjectId,
    layer: Option<LayerId>,
    transform: Transform,
    children: Vec<ObjectId>,
    nickname: Option<String>,
}

/// An arena of scene nodes, each with a transform relative to its parent.
///
/// Top-level nodes are added to a layer and their descendants inherit it. Nodes added with
/// [`add_detached`](SceneGraph::add_detached) belong to no layer and cannot collide.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: BTreeMap<ObjectId, SceneNode>,
    layers: BTreeMap<LayerId, String>,
    next_object_id: usize,
    next_layer_id: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            layers: BTreeMap::new(),
            // Start at 1 because ObjectId(0) represents the root.
            next_object_id: 1,
            next_layer_id: 0,
        }
    }

    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        self.layers.insert(id, name.into());
        id
    }
    pub fn layer_name(&self, layer: LayerId) -> Option<&str> {
        self.layers.get(&layer).map(String::as_str)
    }
    pub fn layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    /// Adds a top-level node to `layer`.
    pub fn add_node(&mut self, layer: LayerId, transform: Transform) -> ObjectId {
        check!(
            self.layers.contains_key(&layer),
            format!("no such layer: {layer}")
        );
        self.insert(ObjectId::root(), Some(layer), transform)
    }

    /// Adds a node under `parent`; it inherits the parent's layer.
    pub fn add_child(&mut self, parent: ObjectId, transform: Transform) -> Result<ObjectId> {
        let Some(parent_node) = self.nodes.get(&parent) else {
            bail!("cannot add child: parent {parent} does not exist");
        };
        let layer = parent_node.layer;
        Ok(self.insert(parent, layer, transform))
    }

    /// Adds a top-level node that belongs to no layer.
    pub fn add_detached(&mut self, transform: Transform) -> ObjectId {
        self.insert(ObjectId::root(), None, transform)
    }

    fn insert(&mut self, parent: ObjectId, layer: Option<LayerId>, transform: Transform) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                parent,
                layer,
                transform,
                children: Vec::new(),
                nickname: None,
            },
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        id
    }

    fn node(&self, id: ObjectId) -> &SceneNode {
        self.nodes
            .get(&id)
            .unwrap_or_else(|| panic!("missing object_id in scene: {id:?}"))
    }
    fn node_mut(&mut self, id: ObjectId) -> &mut SceneNode {
        self.nodes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("missing object_id in scene: {id:?}"))
    }

    /// The node's transform relative to its parent.
    pub fn transform(&self, id: ObjectId) -> Transform {
        self.node(id).transform
    }
    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) {
        self.node_mut(id).transform = transform;
    }
    pub fn set_position(&mut self, id: ObjectId, centre: Vec2) {
        self.node_mut(id).transform.centre = centre;
    }
    pub fn set_rotation(&mut self, id: ObjectId, degrees: f32) {
        self.node_mut(id).transform.rotation = degrees;
    }
    pub fn set_scale(&mut self, id: ObjectId, scale: Vec2) {
        self.node_mut(id).transform.scale = scale;
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        Some(self.node(id).parent).filter(|parent| !parent.is_root())
    }
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        &self.node(id).children
    }

    pub fn set_nickname(&mut self, id: ObjectId, name: impl Into<String>) {
        self.node_mut(id).nickname = Some(name.into());
    }
    pub fn nickname_or_id(&self, id: ObjectId) -> String {
        self.nodes
            .get(&id)
            .and_then(|node| node.nickname.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gives the node a collision shape built from owner-local `vertices` and registers it in
    /// the node's layer. Replaces any shape the node already had.
    pub fn set_collision_shape(
        &self,
        collision: &mut CollisionService,
        id: ObjectId,
        vertices: &[Vec2],
    ) -> Result<()> {
        check!(self.contains(id), format!("missing object_id in scene: {id:?}"));
        let shape = PolygonShape::new(id, vertices)
            .with_context(|| format!("building collision shape for {}", self.nickname_or_id(id)))?;
        collision.register_collidable(self, shape);
        Ok(())
    }

    pub fn clear_collision_shape(
        &self,
        collision: &mut CollisionService,
        id: ObjectId,
    ) -> Option<PolygonShape> {
        collision.unregister_collidable(id)
    }

    /// Removes `id` and all of its descendants, unregistering their collision shapes. Returns
    /// the removed IDs, parents before children.
    pub fn remove_node(&mut self, collision: &mut CollisionService, id: ObjectId) -> Vec<ObjectId> {
        let parent = self.node(id).parent;
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|child| *child != id);
        }

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children.iter().rev());
                collision.unregister_collidable(next);
                removed.push(next);
            }
        }
        debug!("removed {} node(s) starting at {id}", removed.len());
        removed
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTransforms for SceneGraph {
    fn world_transform(&self, id: ObjectId) -> Transform {
        let node = self.node(id);
        if node.parent.is_root() {
            node.transform
        } else {
            self.world_transform(node.parent).then(&node.transform)
        }
    }

    fn parent_layer(&self, id: ObjectId) -> Option<LayerId> {
        self.node(id).layer
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }
}
