//! Convex-polygon collision for a 2D scene graph: a Separating Axis Theorem intersection test
//! and a swept movement resolver that stops a moving shape before it tunnels through, or
//! penetrates, a stationary one.
//!
//! Shapes are defined in their owning node's local space and are carried into world space
//! through the node's parent chain on every query. See [`core::collision::CollisionService`]
//! for the query API and [`core::scene::SceneGraph`] for the node arena it reads from.

pub mod core;
pub mod util;
