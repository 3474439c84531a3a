#![forbid(unsafe_code)]
//! cube_scatter: randomized cube scattering with seeded planning and scene-graph materialization.
//!
//! Modules:
//! - sampling: uniform float and integer draws
//! - scatter: requests, planner, scene binding contract, batch orchestration, events
//!
//! Plan placements with [`scatter::planner::ScatterPlanner`], then materialize them through
//! any [`scatter::scene::SceneBinding`] with [`scatter::batch::scatter_cubes`].
pub mod error;
pub mod sampling;
pub mod scatter;

/// Convenient re-exports for common types. Import with `use cube_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::scatter::batch::{
        materialize, scatter_cubes, scatter_cubes_with_events, BatchOptions, BatchReport,
        DEFAULT_BASE_NAME,
    };
    pub use crate::scatter::bounds::Aabb;
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, ScatterEvent, ScatterEventKind, VecSink,
    };
    pub use crate::scatter::input::{parse_count_text, ScatterForm};
    pub use crate::scatter::memory::{
        MemoryScene, NodeId, NodeKind, SceneNode, UNIT_CUBE_HALF_EXTENTS,
    };
    pub use crate::scatter::naming::{matches_pattern, NameRegistry};
    pub use crate::scatter::planner::{
        generate_with_rng, resolve_count, validate_ranges, CountPolicy, Placement,
        PlannerConfig, RngMode, ScatterPlanner, ScatterResult, CLASSIC_SEED,
    };
    pub use crate::scatter::range::{PositionRange, ScalarRange};
    pub use crate::scatter::request::{
        ScatterRequest, MAX_COUNT, RANDOM_COUNT_MAX, RANDOM_COUNT_MIN,
    };
    pub use crate::scatter::scene::SceneBinding;
}
