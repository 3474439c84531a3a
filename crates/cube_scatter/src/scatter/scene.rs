//! Contract for the host scene graph that scattered cubes are materialized into.
//!
//! The batch orchestrator in [`crate::scatter::batch`] only talks to the host through
//! this trait. Implementations report their own failures as
//! [`crate::error::Error::SceneBinding`]; the orchestrator propagates them as-is and
//! does not roll back objects that were already created.
use crate::error::Result;
use crate::scatter::planner::Placement;

/// Scene mutations needed to materialize a scatter batch.
///
/// Names passed to the `create_*` and [`SceneBinding::instantiate`] methods may end in
/// [`crate::scatter::naming::AUTO_SUFFIX`]; the binding replaces it with a number that
/// makes the name unique and reports the realized name through
/// [`SceneBinding::object_name`] / [`SceneBinding::group_name`].
pub trait SceneBinding {
    /// Handle to a shape-bearing object (the base cube or one of its instances).
    type Object: Clone;
    /// Handle to an empty transform used as the parent of all instances.
    type Group: Clone;

    /// Deletes every object and group whose name matches `pattern` (`*` wildcards).
    /// Returns the number of deleted nodes.
    fn delete_matching(&mut self, pattern: &str) -> Result<usize>;

    /// Creates a unit cube named after `name`.
    fn create_base_primitive(&mut self, name: &str) -> Result<Self::Object>;

    /// Creates an empty group named after `name`.
    fn create_group(&mut self, name: &str) -> Result<Self::Group>;

    /// Creates an instance sharing `base`'s geometry.
    fn instantiate(&mut self, base: &Self::Object, name: &str) -> Result<Self::Object>;

    /// Sets absolute translation, rotation (degrees) and uniform scale.
    fn apply_transform(&mut self, object: &Self::Object, placement: &Placement) -> Result<()>;

    /// Makes `group` the parent of `child`.
    fn parent(&mut self, child: &Self::Object, group: &Self::Group) -> Result<()>;

    fn hide(&mut self, object: &Self::Object) -> Result<()>;

    /// Moves the group's pivot to the center of its contents' bounds, leaving the
    /// children where they are in world space.
    fn recenter_pivot(&mut self, group: &Self::Group) -> Result<()>;

    fn object_name(&self, object: &Self::Object) -> String;

    fn group_name(&self, group: &Self::Group) -> String;
}
