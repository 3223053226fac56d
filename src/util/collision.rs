use crate::core::prelude::*;
use crate::util::gg_float::GgFloat;
use std::ops::Range;
use thiserror::Error;

/// Geometry that cannot form a valid convex polygon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DegenerateShapeError {
    #[error("vertex {index} is not finite: {vertex}")]
    NonFiniteVertex { index: usize, vertex: Vec2 },
    #[error("edge {index} has zero length: {p1} -> {p2}")]
    ZeroLengthEdge { index: usize, p1: Vec2, p2: Vec2 },
    #[error("polygon has zero area (signed area {area})")]
    ZeroArea { area: f32 },
}

mod polygon {
    use crate::core::prelude::*;

    /// Reorders vertices in convex position into counter-clockwise order, in place.
    ///
    /// For each position `i`, any later vertex lying clockwise of the edge `v[i] -> v[i + 1]`
    /// is swapped into `v[i + 1]`. Each pass leaves the most clockwise remaining vertex next,
    /// which for a convex polygon is its counter-clockwise successor.
    pub fn wind_ccw(vertices: &mut [Vec2]) {
        let n = vertices.len();
        for i in 0..n.saturating_sub(2) {
            for k in (i + 2)..n {
                let edge = vertices[i + 1] - vertices[i];
                if edge.cross(vertices[k] - vertices[i]) < 0. {
                    vertices.swap(i + 1, k);
                }
            }
        }
    }

    pub fn signed_area(vertices: &[Vec2]) -> f32 {
        vertices
            .iter()
            .circular_tuple_windows::<(_, _)>()
            .map(|(u, v)| u.cross(*v))
            .sum::<f32>()
            / 2.
    }

    pub fn centre_of(vertices: &[Vec2]) -> Vec2 {
        let (area, x, y) = vertices
            .iter()
            .circular_tuple_windows::<(_, _)>()
            .map(|(&u, &v)| {
                let area = u.cross(v);
                (area, (u.x + v.x) * area, (u.y + v.y) * area)
            })
            .fold((0., 0., 0.), |acc, next| {
                (acc.0 + next.0, acc.1 + next.1, acc.2 + next.2)
            });
        Vec2 {
            x: x / (3. * area),
            y: y / (3. * area),
        }
    }

    pub fn extent_of(vertices: &[Vec2]) -> Vec2 {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for vertex in vertices {
            min_x = vertex.x.min(min_x);
            min_y = vertex.y.min(min_y);
            max_x = vertex.x.max(max_x);
            max_y = vertex.y.max(max_y);
        }
        Vec2 {
            x: max_x - min_x,
            y: max_y - min_y,
        }
    }
}

/// One boundary segment of a [`PolygonShape`], stored in the owner's local space.
///
/// The world-space accessors take the owner's current world transform and recompute on every
/// call; nothing is cached, since the owner can move every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    p1: Vec2,
    p2: Vec2,
    mid: Vec2,
    normal: Vec2,
}

impl Edge {
    fn new(p1: Vec2, p2: Vec2) -> Self {
        Self {
            p1,
            p2,
            mid: (p1 + p2) / 2.,
            normal: (p2 - p1).orthog().normed(),
        }
    }

    pub fn p1(&self) -> Vec2 {
        self.p1
    }
    pub fn p2(&self) -> Vec2 {
        self.p2
    }
    pub fn mid(&self) -> Vec2 {
        self.mid
    }
    /// Outward unit normal in the owner's local space.
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    pub fn world_p1(&self, transform: &Transform) -> Vec2 {
        transform.transform_point(self.p1)
    }
    pub fn world_p2(&self, transform: &Transform) -> Vec2 {
        transform.transform_point(self.p2)
    }
    pub fn world_mid(&self, transform: &Transform) -> Vec2 {
        transform.transform_point(self.mid)
    }
    pub fn world_normal(&self, transform: &Transform) -> Vec2 {
        transform.rotate_direction(self.normal)
    }

    /// Signed distance-like value of `point` relative to this edge: non-negative in front of
    /// (outside) the edge, negative behind it.
    pub fn relative_dot(&self, transform: &Transform, point: Vec2) -> f32 {
        self.world_normal(transform)
            .dot(point - self.world_mid(transform))
    }

    pub fn is_facing(&self, transform: &Transform, point: Vec2) -> bool {
        self.relative_dot(transform, point) >= 0.
    }
}

/// A convex polygon owned by one scene node.
///
/// Edges are wound counter-clockwise and every edge normal faces out of the polygon; both are
/// established at construction and the topology never changes afterwards. The shape refers to
/// its owner by [`ObjectId`] only, and asks a [`SceneTransforms`] for the owner's world
/// transform whenever a query needs world coordinates.
#[derive(Debug, Clone)]
pub struct PolygonShape {
    owner: ObjectId,
    edges: Vec<Edge>,
}

impl PolygonShape {
    /// Builds a shape from owner-local vertices given in any order.
    ///
    /// # Panics
    /// If fewer than [`MIN_POLYGON_VERTICES`] vertices are given, or `owner` is the root.
    ///
    /// # Errors
    /// [`DegenerateShapeError`] if a vertex is not finite, two vertices coincide, or the
    /// vertices are collinear.
    ///
    /// # Examples
    /// ```
    /// use gg_collide::core::prelude::*;
    ///
    /// let mut scene = SceneGraph::new();
    /// let layer = scene.add_layer("world");
    /// let node = scene.add_node(layer, Transform::default());
    /// // Clockwise input is rewound.
    /// let shape = PolygonShape::new(node, &[
    ///     Vec2 { x: 0.0, y: 0.0 },
    ///     Vec2 { x: 0.0, y: 1.0 },
    ///     Vec2 { x: 1.0, y: 0.0 },
    /// ]).unwrap();
    /// assert_eq!(shape.len(), 3);
    /// assert!(shape.shape_contains(&scene, Vec2 { x: 0.25, y: 0.25 }));
    /// ```
    pub fn new(owner: ObjectId, vertices: &[Vec2]) -> Result<Self, DegenerateShapeError> {
        check_ge!(
            vertices.len(),
            MIN_POLYGON_VERTICES,
            format!("polygon owned by {owner}")
        );
        check_false!(owner.is_root(), "a polygon shape needs an owning node");

        if let Some((index, vertex)) = vertices.iter().find_position(|v| !v.is_finite()) {
            return Err(DegenerateShapeError::NonFiniteVertex {
                index,
                vertex: *vertex,
            });
        }

        let mut vertices = vertices.to_vec();
        polygon::wind_ccw(&mut vertices);

        if let Some((index, (&p1, &p2))) = vertices
            .iter()
            .circular_tuple_windows::<(_, _)>()
            .find_position(|(p1, p2)| (**p2 - **p1).len() < EPSILON)
        {
            return Err(DegenerateShapeError::ZeroLengthEdge { index, p1, p2 });
        }
        let area = polygon::signed_area(&vertices);
        if area.abs() < EPSILON {
            return Err(DegenerateShapeError::ZeroArea { area });
        }

        let mut edges = vertices
            .iter()
            .circular_tuple_windows::<(_, _)>()
            .map(|(&p1, &p2)| Edge::new(p1, p2))
            .collect_vec();

        // Orient each normal away from the far endpoint of the following edge.
        let n = edges.len();
        for i in 0..n {
            let far = edges[(i + 1) % n].p2;
            let edge = &mut edges[i];
            if edge.normal.dot(far - edge.mid) > 0. {
                warn!(
                    "{owner}: edge {i} ({} -> {}) had an inward normal, flipping",
                    edge.p1, edge.p2
                );
                edge.normal = -edge.normal;
            }
        }

        Ok(Self { owner, edges })
    }

    /// An axis-aligned rectangle centred on the owner's origin.
    pub fn rect(owner: ObjectId, half_widths: Vec2) -> Result<Self, DegenerateShapeError> {
        let Vec2 { x, y } = half_widths.abs();
        Self::new(
            owner,
            &[
                Vec2 { x: -x, y: -y },
                Vec2 { x, y: -y },
                Vec2 { x, y },
                Vec2 { x: -x, y },
            ],
        )
    }
    pub fn square(owner: ObjectId, width: f32) -> Result<Self, DegenerateShapeError> {
        Self::rect(owner, Vec2::splat(width / 2.))
    }

    pub fn owner(&self) -> ObjectId {
        self.owner
    }
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    pub fn len(&self) -> usize {
        self.edges.len()
    }
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Vertices in the owner's local space, in counter-clockwise order.
    pub fn vertices(&self) -> Vec<Vec2> {
        self.edges.iter().map(Edge::p1).collect()
    }
    pub fn world_vertices(&self, transform: &Transform) -> Vec<Vec2> {
        self.edges.iter().map(|e| e.world_p1(transform)).collect()
    }
    pub fn world_normals(&self, transform: &Transform) -> impl Iterator<Item = Vec2> + '_ {
        let transform = *transform;
        self.edges.iter().map(move |e| e.world_normal(&transform))
    }

    /// Area centroid in the owner's local space.
    pub fn centroid(&self) -> Vec2 {
        polygon::centre_of(&self.vertices())
    }
    /// Size of the local-space axis-aligned bounding box.
    pub fn aa_extent(&self) -> Vec2 {
        polygon::extent_of(&self.vertices())
    }

    /// True iff `point` (world space) lies strictly behind every edge.
    pub fn shape_contains<S: SceneTransforms + ?Sized>(&self, scene: &S, point: Vec2) -> bool {
        self.contains_with(&scene.world_transform(self.owner), point)
    }
    pub fn contains_with(&self, transform: &Transform, point: Vec2) -> bool {
        self.edges
            .iter()
            .all(|edge| edge.relative_dot(transform, point) < 0.)
    }

    /// Projects the shape, placed by `transform` and then shifted by `offset`, onto `axis`.
    ///
    /// Both endpoints of every edge are sampled, so shared vertices are visited twice.
    pub fn project_polygon(&self, transform: &Transform, axis: Vec2, offset: Vec2) -> Range<f32> {
        let mut start = f32::MAX;
        let mut end = f32::MIN;
        for edge in &self.edges {
            for vertex in [edge.world_p1(transform), edge.world_p2(transform)] {
                let projection = axis.dot(vertex + offset);
                start = start.min(projection);
                end = end.max(projection);
            }
        }
        start..end
    }
    pub fn project_in<S: SceneTransforms + ?Sized>(&self, scene: &S, axis: Vec2) -> Range<f32> {
        self.project_polygon(&scene.world_transform(self.owner), axis, Vec2::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> ObjectId {
        ObjectId(1)
    }

    fn unit_square_ccw() -> Vec<Vec2> {
        vec![
            Vec2 { x: -0.5, y: -0.5 },
            Vec2 { x: 0.5, y: -0.5 },
            Vec2 { x: 0.5, y: 0.5 },
            Vec2 { x: -0.5, y: 0.5 },
        ]
    }

    fn assert_well_formed(shape: &PolygonShape) {
        let vertices = shape.vertices();
        assert!(polygon::signed_area(&vertices) > 0.);
        for (a, b) in shape.edges().iter().circular_tuple_windows() {
            let turn = (a.p2() - a.p1()).cross(b.p2() - b.p1());
            assert!(turn > 0., "edges turn clockwise: {a:?} then {b:?}");
        }
        let centroid = shape.centroid();
        for edge in shape.edges() {
            assert!((edge.normal().len() - 1.).abs() < EPSILON);
            assert!(edge.normal().dot(edge.mid() - centroid) > 0.);
        }
        assert!(shape.contains_with(&Transform::default(), centroid));
    }

    #[test]
    fn square_normals_face_outwards() {
        let shape = PolygonShape::new(owner(), &unit_square_ccw()).unwrap();
        assert_eq!(shape.len(), 4);
        assert_well_formed(&shape);
        let normals = shape.edges().iter().map(Edge::normal).collect_vec();
        assert_eq!(
            normals,
            vec![Vec2::down(), Vec2::right(), Vec2::up(), Vec2::left()]
        );
    }

    #[test]
    fn clockwise_input_is_rewound() {
        let mut vertices = unit_square_ccw();
        vertices.reverse();
        let shape = PolygonShape::new(owner(), &vertices).unwrap();
        assert_well_formed(&shape);
    }

    #[test]
    fn scrambled_hexagon_is_rewound() {
        let hexagon = (0..6)
            .map(|i| Vec2::right().rotated(60. * i as f32) * 2.)
            .collect_vec();
        let scrambled = [3_usize, 0, 5, 1, 4, 2].map(|i| hexagon[i]);
        let shape = PolygonShape::new(owner(), &scrambled).unwrap();
        assert_eq!(shape.len(), 6);
        assert_well_formed(&shape);
        assert!(shape.centroid().almost_eq(Vec2::zero()));
    }

    #[test]
    fn triangle_either_winding() {
        let ccw = [Vec2::zero(), Vec2::right(), Vec2::up()];
        let cw = [Vec2::zero(), Vec2::up(), Vec2::right()];
        for vertices in [ccw, cw] {
            let shape = PolygonShape::new(owner(), &vertices).unwrap();
            assert_well_formed(&shape);
            assert!(shape.centroid().almost_eq(Vec2::splat(1. / 3.)));
        }
    }

    #[test]
    #[should_panic(expected = "check failed")]
    fn too_few_vertices_panics() {
        let _ = PolygonShape::new(owner(), &[Vec2::zero(), Vec2::one()]);
    }

    #[test]
    #[should_panic(expected = "owning node")]
    fn root_owner_panics() {
        let _ = PolygonShape::new(ObjectId::root(), &unit_square_ccw());
    }

    #[test]
    fn coincident_vertices_are_degenerate() {
        let err = PolygonShape::new(
            owner(),
            &[Vec2::zero(), Vec2::zero(), Vec2::right(), Vec2::up()],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DegenerateShapeError::ZeroLengthEdge { index: 0, .. }
        ));
    }

    #[test]
    fn collinear_vertices_are_degenerate() {
        let err = PolygonShape::new(
            owner(),
            &[Vec2::zero(), Vec2::right(), Vec2 { x: 2., y: 0. }],
        )
        .unwrap_err();
        assert!(matches!(err, DegenerateShapeError::ZeroArea { .. }));
        assert!(err.to_string().contains("zero area"));
    }

    #[test]
    fn non_finite_vertex_is_degenerate() {
        let err = PolygonShape::new(
            owner(),
            &[
                Vec2::zero(),
                Vec2 { x: f32::NAN, y: 1. },
                Vec2::right(),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DegenerateShapeError::NonFiniteVertex { index: 1, .. }
        ));
    }

    #[test]
    fn rect_and_square_constructors() {
        let square = PolygonShape::square(owner(), 2.).unwrap();
        assert_eq!(square.aa_extent(), Vec2::splat(2.));
        let rect = PolygonShape::rect(owner(), Vec2 { x: 3., y: -1. }).unwrap();
        assert_eq!(rect.aa_extent(), Vec2 { x: 6., y: 2. });
        assert_well_formed(&rect);
        assert!(PolygonShape::square(owner(), 0.).is_err());
    }

    #[test]
    fn edge_world_accessors_follow_transform() {
        let shape = PolygonShape::new(owner(), &unit_square_ccw()).unwrap();
        let transform = Transform {
            centre: Vec2 { x: 10., y: 0. },
            rotation: 90.,
            scale: Vec2::splat(2.),
        };
        // The bottom edge: (-0.5, -0.5) -> (0.5, -0.5), normal down.
        let edge = shape.edges()[0];
        assert!(
            edge.world_p1(&transform)
                .almost_eq(Vec2 { x: 11., y: -1. })
        );
        assert!(
            edge.world_p2(&transform)
                .almost_eq(Vec2 { x: 11., y: 1. })
        );
        assert!(
            edge.world_mid(&transform)
                .almost_eq(Vec2 { x: 11., y: 0. })
        );
        // Normals rotate but are neither scaled nor translated.
        assert!(edge.world_normal(&transform).almost_eq(Vec2::right()));
    }

    #[test]
    fn relative_dot_sign_convention() {
        let shape = PolygonShape::new(owner(), &unit_square_ccw()).unwrap();
        let transform = Transform::default();
        let right_edge = shape.edges()[1];
        assert!(right_edge.relative_dot(&transform, Vec2 { x: 2., y: 0. }) > 0.);
        assert!(right_edge.is_facing(&transform, Vec2 { x: 0.5, y: 0.3 }));
        assert!(!right_edge.is_facing(&transform, Vec2::zero()));
    }

    #[test]
    fn contains_is_strict() {
        let shape = PolygonShape::new(owner(), &unit_square_ccw()).unwrap();
        let transform = Transform::with_centre(Vec2 { x: 5., y: 5. });
        assert!(shape.contains_with(&transform, Vec2 { x: 5.2, y: 4.9 }));
        assert!(!shape.contains_with(&transform, Vec2 { x: 5.5, y: 5. }));
        assert!(!shape.contains_with(&transform, Vec2::zero()));
    }

    #[test]
    fn projection_with_and_without_offset() {
        let shape = PolygonShape::new(owner(), &unit_square_ccw()).unwrap();
        let transform = Transform::with_centre(Vec2 { x: 3., y: 0. });
        let projected = shape.project_polygon(&transform, Vec2::right(), Vec2::zero());
        assert_eq!(projected, 2.5..3.5);
        let offset = shape.project_polygon(&transform, Vec2::right(), Vec2 { x: 2., y: 7. });
        assert_eq!(offset, 4.5..5.5);
        let vertical = shape.project_polygon(&transform, Vec2::up(), Vec2 { x: 2., y: 7. });
        assert_eq!(vertical, 6.5..7.5);
    }

    #[test]
    fn projection_of_rotated_square() {
        let shape = PolygonShape::new(owner(), &unit_square_ccw()).unwrap();
        let projected =
            shape.project_polygon(&Transform::with_rotation(45.), Vec2::right(), Vec2::zero());
        let half_diagonal = std::f32::consts::FRAC_1_SQRT_2;
        assert!((projected.start + half_diagonal).abs() < EPSILON);
        assert!((projected.end - half_diagonal).abs() < EPSILON);
    }

    #[test]
    fn world_vertices_and_normals() {
        let shape = PolygonShape::new(owner(), &unit_square_ccw()).unwrap();
        let transform = Transform::with_centre(Vec2 { x: 1., y: 1. });
        assert_eq!(
            shape.world_vertices(&transform),
            vec![
                Vec2 { x: 0.5, y: 0.5 },
                Vec2 { x: 1.5, y: 0.5 },
                Vec2 { x: 1.5, y: 1.5 },
                Vec2 { x: 0.5, y: 1.5 },
            ]
        );
        assert_eq!(
            shape.world_normals(&transform).collect_vec(),
            vec![Vec2::down(), Vec2::right(), Vec2::up(), Vec2::left()]
        );
    }
}
