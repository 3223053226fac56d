#[allow(unused_imports)]
pub use itertools::Itertools;
#[allow(unused_imports)]
pub use num_traits;

#[allow(unused_imports)]
pub use anyhow::{Context, Result, anyhow, bail};
#[allow(unused_imports)]
pub use tracing::{debug, error, info, trace, warn};

#[allow(unused_imports)]
pub use crate::{
    core::{
        LayerId, ObjectId,
        collision::{CollisionService, Contact, MovementOutcome, ResolvedMovement},
        config::*,
        scene::{SceneGraph, SceneTransforms},
    },
    util::{
        UnorderedPair,
        assert::*,
        collision::{DegenerateShapeError, Edge, PolygonShape},
        linalg,
        linalg::{Transform, Vec2},
    },
};
