use crate::core::prelude::*;
use crate::util::gg_range;
use crate::warn_every_seconds;
use std::collections::BTreeMap;

/// The obstacle that stopped a movement, and how the mover was placed against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub other: ObjectId,
    /// Face normal of the mover that the correction was applied along.
    pub axis: Vec2,
    /// Swept overlap along `axis`; the mover was placed this far from its old position.
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementOutcome {
    Unobstructed,
    /// The mover already overlapped `other` before moving, so it was left where it was.
    Refused {
        other: ObjectId,
    },
    Blocked(Contact),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMovement {
    pub position: Vec2,
    pub outcome: MovementOutcome,
}

/// Registry of collidable shapes, grouped by layer, and the queries that run over it.
///
/// Shapes only ever interact with shapes in the same layer. All queries are all-pairs within
/// a layer; there is no broad phase.
#[derive(Debug, Default)]
pub struct CollisionService {
    shapes_by_layer: BTreeMap<LayerId, BTreeMap<ObjectId, PolygonShape>>,
    layer_by_object: BTreeMap<ObjectId, LayerId>,
}

impl CollisionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `shape` in its owner's layer, replacing any shape the owner already had.
    pub fn register_collidable<S: SceneTransforms + ?Sized>(
        &mut self,
        scene: &S,
        shape: PolygonShape,
    ) {
        let owner = shape.owner();
        let layer = Self::layer_of(scene, owner);
        if let Some(previous) = self.layer_by_object.insert(owner, layer) {
            if let Some(shapes) = self.shapes_by_layer.get_mut(&previous) {
                shapes.remove(&owner);
            }
            debug!("{owner}: replacing collision shape");
        }
        debug!("{owner}: registered {}-gon in {layer}", shape.len());
        self.shapes_by_layer
            .entry(layer)
            .or_default()
            .insert(owner, shape);
    }

    /// Removes the shape owned by `id`, if any.
    pub fn unregister_collidable(&mut self, id: ObjectId) -> Option<PolygonShape> {
        let layer = self.layer_by_object.remove(&id)?;
        let shape = self.shapes_by_layer.get_mut(&layer)?.remove(&id);
        if shape.is_some() {
            debug!("{id}: unregistered from {layer}");
        }
        shape
    }

    pub fn shape(&self, id: ObjectId) -> Option<&PolygonShape> {
        let layer = self.layer_by_object.get(&id)?;
        self.shapes_by_layer.get(layer)?.get(&id)
    }
    pub fn is_collidable(&self, id: ObjectId) -> bool {
        self.layer_by_object.contains_key(&id)
    }
    /// Shapes registered in `layer`, in ascending owner order.
    pub fn shapes_in_layer(&self, layer: LayerId) -> impl Iterator<Item = &PolygonShape> {
        self.shapes_by_layer
            .get(&layer)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    fn layer_of<S: SceneTransforms + ?Sized>(scene: &S, id: ObjectId) -> LayerId {
        check!(scene.contains(id), format!("missing object_id in scene: {id:?}"));
        scene
            .parent_layer(id)
            .unwrap_or_else(|| panic!("{id} is not in a layer, so it cannot collide"))
    }

    /// Static SAT test between two shapes in the same layer, at their current world
    /// transforms. Shapes that only touch do not intersect.
    ///
    /// Panics if either owner is missing from the scene, has no layer, or if the layers
    /// differ.
    pub fn intersect<S: SceneTransforms + ?Sized>(
        &self,
        scene: &S,
        a: &PolygonShape,
        b: &PolygonShape,
    ) -> bool {
        check_eq!(
            Self::layer_of(scene, a.owner()),
            Self::layer_of(scene, b.owner()),
            format!("cannot compare {} and {}", a.owner(), b.owner())
        );
        Self::overlaps(
            a,
            &scene.world_transform(a.owner()),
            b,
            &scene.world_transform(b.owner()),
        )
    }

    fn overlaps(a: &PolygonShape, ta: &Transform, b: &PolygonShape, tb: &Transform) -> bool {
        a.world_normals(ta).chain(b.world_normals(tb)).all(|axis| {
            let gap = gg_range::gap_f32(
                &a.project_polygon(ta, axis, Vec2::zero()),
                &b.project_polygon(tb, axis, Vec2::zero()),
            );
            gap < 0.
        })
    }

    /// Sweeps `mover` by `delta` against `other`, testing only the mover's own face normals.
    ///
    /// Returns `None` if some axis has a positive gap, so the pair cannot collide this frame.
    /// Otherwise returns the mover axis with the smallest swept overlap and that overlap; on
    /// equal overlaps the first axis in edge order is kept.
    fn sweep(
        mover: &PolygonShape,
        mover_transform: &Transform,
        other: &PolygonShape,
        other_transform: &Transform,
        delta: Vec2,
    ) -> Option<(Vec2, f32)> {
        let mut separated = false;
        let mut best: Option<(Vec2, f32)> = None;
        for axis in mover.world_normals(mover_transform) {
            let swept = gg_range::swept_f32(
                &mover.project_polygon(mover_transform, axis, Vec2::zero()),
                axis.dot(delta),
            );
            let obstacle = other.project_polygon(other_transform, axis, Vec2::zero());
            let gap = gg_range::gap_f32(&swept, &obstacle);
            if gap > 0. {
                separated = true;
                continue;
            }
            let overlap = gap.abs();
            if best.map_or(true, |(_, min)| overlap < min - EPSILON) {
                best = Some((axis, overlap));
            }
        }
        if separated { None } else { best }
    }

    /// Returns where `moving` can safely go this frame when trying to move from `old` to
    /// `new` (both world positions).
    pub fn validate_movement<S: SceneTransforms + ?Sized>(
        &self,
        scene: &S,
        moving: ObjectId,
        old: Vec2,
        new: Vec2,
    ) -> Vec2 {
        self.resolve_movement(scene, moving, old, new).position
    }

    /// Like [`validate_movement`](Self::validate_movement), but also reports what, if
    /// anything, got in the way.
    ///
    /// The mover is placed at `old` with its current world rotation and scale, then swept
    /// towards `new` against every other shape in its layer:
    /// - if it already overlaps something at `old`, it stays at `old` exactly;
    /// - if the sweep hits something, it moves from `old` along the mover face normal with
    ///   the smallest swept overlap, by that overlap;
    /// - otherwise it gets `new` exactly.
    ///
    /// The smallest overlap is taken over every obstacle hit, scanned in ascending
    /// [`ObjectId`] order; equal overlaps keep the obstacle and axis found first. The normal
    /// is negated when it points against `new - old`. The stopped position is not re-checked
    /// against the other obstacles.
    pub fn resolve_movement<S: SceneTransforms + ?Sized>(
        &self,
        scene: &S,
        moving: ObjectId,
        old: Vec2,
        new: Vec2,
    ) -> ResolvedMovement {
        let layer = Self::layer_of(scene, moving);
        let mover = self
            .shape(moving)
            .unwrap_or_else(|| panic!("{moving} has no registered collision shape"));
        let mover_transform = Transform {
            centre: old,
            ..scene.world_transform(moving)
        };
        let delta = new - old;

        let mut blocked: Option<Contact> = None;
        for (&other_id, other) in self.shapes_by_layer.get(&layer).into_iter().flatten() {
            if other_id == moving {
                continue;
            }
            let other_transform = scene.world_transform(other_id);
            if Self::overlaps(mover, &mover_transform, other, &other_transform) {
                warn_every_seconds!(
                    1,
                    "{}: already overlapping {} at {}, refusing to move",
                    moving,
                    other_id,
                    old
                );
                return ResolvedMovement {
                    position: old,
                    outcome: MovementOutcome::Refused { other: other_id },
                };
            }
            let Some((axis, distance)) =
                Self::sweep(mover, &mover_transform, other, &other_transform, delta)
            else {
                continue;
            };
            trace!("{moving}: sweep hits {other_id}, overlap {distance} along {axis}");
            if blocked.map_or(true, |contact| distance < contact.distance - EPSILON) {
                blocked = Some(Contact {
                    other: other_id,
                    axis,
                    distance,
                });
            }
        }

        match blocked {
            Some(mut contact) => {
                if delta.dot(contact.axis) < 0. {
                    contact.axis = -contact.axis;
                }
                let position = old + contact.axis * contact.distance;
                debug!(
                    "{moving}: blocked by {} moving {old} -> {new}, placed at {position}",
                    contact.other
                );
                ResolvedMovement {
                    position,
                    outcome: MovementOutcome::Blocked(contact),
                }
            }
            None => ResolvedMovement {
                position: new,
                outcome: MovementOutcome::Unobstructed,
            },
        }
    }

    /// Every pair of shapes in `layer` that currently intersect, in ascending order.
    pub fn intersecting_pairs<S: SceneTransforms + ?Sized>(
        &self,
        scene: &S,
        layer: LayerId,
    ) -> Vec<UnorderedPair<ObjectId>> {
        let Some(shapes) = self.shapes_by_layer.get(&layer) else {
            return Vec::new();
        };
        shapes
            .iter()
            .tuple_combinations()
            .filter(|((_, a), (_, b))| self.intersect(scene, a, b))
            .map(|((&a, _), (&b, _))| UnorderedPair::new(a, b))
            .collect()
    }
}
