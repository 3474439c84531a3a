//! In-process scene graph implementing [`SceneBinding`].
//!
//! Useful for tests, benches and headless tools. Groups keep an explicit pivot the
//! way DCC hosts do, so recentering never moves any child.
use std::collections::BTreeMap;

use glam::Vec3;

use crate::error::{Error, Result};
use crate::scatter::bounds::Aabb;
use crate::scatter::naming::{matches_pattern, NameRegistry};
use crate::scatter::planner::Placement;
use crate::scatter::scene::SceneBinding;

/// Half extents of the unit cube created by [`SceneBinding::create_base_primitive`].
pub const UNIT_CUBE_HALF_EXTENTS: Vec3 = Vec3::splat(0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryId(u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// A shape referencing shared geometry.
    Mesh(GeometryId),
    /// An empty transform.
    Group,
}

/// A node in the [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub placement: Placement,
    /// Pivot in the node's parent space.
    pub pivot: Vec3,
    pub visible: bool,
}

impl SceneNode {
    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            parent: None,
            placement: Placement::new(Vec3::ZERO, Vec3::ZERO, 1.0),
            pivot: Vec3::ZERO,
            visible: true,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }
}

/// Flat scene graph with shared geometry and unique names.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: BTreeMap<NodeId, SceneNode>,
    geometries: BTreeMap<GeometryId, Vec3>,
    names: NameRegistry,
    next_node: u32,
    next_geometry: u32,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| *id)
    }

    /// Direct children of `parent`, in creation order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn geometry_half_extents(&self, geometry: GeometryId) -> Option<Vec3> {
        self.geometries.get(&geometry).copied()
    }

    /// Resizes shared geometry; every node referencing it follows.
    pub fn set_geometry_half_extents(&mut self, geometry: GeometryId, half: Vec3) -> Result<()> {
        let slot = self
            .geometries
            .get_mut(&geometry)
            .ok_or_else(|| Error::scene(format!("unknown geometry {geometry:?}")))?;
        *slot = half;
        Ok(())
    }

    /// Bounds of a mesh node in its parent's space.
    pub fn local_bounds(&self, id: NodeId) -> Option<Aabb> {
        let node = self.nodes.get(&id)?;
        match node.kind {
            NodeKind::Mesh(geometry) => {
                let half = self.geometries.get(&geometry)?;
                Some(Aabb::of_cube(*half, &node.placement))
            }
            NodeKind::Group => None,
        }
    }

    fn insert(&mut self, requested: &str, kind: NodeKind) -> NodeId {
        let name = self.names.claim(requested);
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, SceneNode::new(name, kind));
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| Error::scene(format!("no node with id {id:?}")))
    }

    fn expect_kind(&self, id: NodeId, group: bool) -> Result<&SceneNode> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| Error::scene(format!("no node with id {id:?}")))?;
        if node.is_group() != group {
            let wanted = if group { "group" } else { "mesh" };
            return Err(Error::scene(format!("'{}' is not a {wanted}", node.name)));
        }
        Ok(node)
    }

    fn remove_subtree(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.remove(&id) else {
            return 0;
        };
        self.names.release(&node.name);
        let mut removed = 1;
        for child in self.children(id) {
            removed += self.remove_subtree(child);
        }
        removed
    }

    fn drop_unused_geometry(&mut self) {
        let nodes = &self.nodes;
        self.geometries.retain(|geometry, _| {
            nodes
                .values()
                .any(|node| node.kind == NodeKind::Mesh(*geometry))
        });
    }
}

impl SceneBinding for MemoryScene {
    type Object = NodeId;
    type Group = NodeId;

    fn delete_matching(&mut self, pattern: &str) -> Result<usize> {
        let doomed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| matches_pattern(&node.name, pattern))
            .map(|(id, _)| *id)
            .collect();

        let removed: usize = doomed.into_iter().map(|id| self.remove_subtree(id)).sum();
        self.drop_unused_geometry();
        Ok(removed)
    }

    fn create_base_primitive(&mut self, name: &str) -> Result<NodeId> {
        let geometry = GeometryId(self.next_geometry);
        self.next_geometry += 1;
        self.geometries.insert(geometry, UNIT_CUBE_HALF_EXTENTS);
        Ok(self.insert(name, NodeKind::Mesh(geometry)))
    }

    fn create_group(&mut self, name: &str) -> Result<NodeId> {
        Ok(self.insert(name, NodeKind::Group))
    }

    fn instantiate(&mut self, base: &NodeId, name: &str) -> Result<NodeId> {
        let kind = self.expect_kind(*base, false)?.kind;
        Ok(self.insert(name, kind))
    }

    fn apply_transform(&mut self, object: &NodeId, placement: &Placement) -> Result<()> {
        self.node_mut(*object)?.placement = *placement;
        Ok(())
    }

    fn parent(&mut self, child: &NodeId, group: &NodeId) -> Result<()> {
        self.expect_kind(*group, true)?;
        if child == group {
            return Err(Error::scene("cannot parent a node to itself"));
        }
        self.node_mut(*child)?.parent = Some(*group);
        Ok(())
    }

    fn hide(&mut self, object: &NodeId) -> Result<()> {
        self.node_mut(*object)?.visible = false;
        Ok(())
    }

    fn recenter_pivot(&mut self, group: &NodeId) -> Result<()> {
        self.expect_kind(*group, true)?;
        let bounds = Aabb::union_all(
            self.children(*group)
                .into_iter()
                .filter_map(|child| self.local_bounds(child)),
        );
        let node = self.node_mut(*group)?;
        // Pivot lives in parent space; children are in group space.
        node.pivot = match bounds {
            Some(b) => node.placement.to_matrix().transform_point3(b.center()),
            None => node.placement.position,
        };
        Ok(())
    }

    fn object_name(&self, object: &NodeId) -> String {
        self.nodes
            .get(object)
            .map(|n| n.name.clone())
            .unwrap_or_default()
    }

    fn group_name(&self, group: &NodeId) -> String {
        self.object_name(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::batch::{scatter_cubes, BatchOptions};
    use crate::scatter::planner::ScatterPlanner;
    use crate::scatter::range::PositionRange;
    use crate::scatter::request::ScatterRequest;

    fn run(scene: &mut MemoryScene, request: &ScatterRequest) -> usize {
        let mut planner = ScatterPlanner::seeded(1234);
        scatter_cubes(&mut planner, scene, request, &BatchOptions::default())
            .expect("batch succeeds")
            .count()
    }

    #[test]
    fn batch_builds_hidden_base_and_group() {
        let mut scene = MemoryScene::new();
        let count = run(&mut scene, &ScatterRequest::new().with_count(4));
        assert_eq!(count, 4);

        let base = scene.find("myCube1").expect("base");
        let group = scene.find("myCube1_instance_grp1").expect("group");
        assert!(!scene.node(base).unwrap().visible);
        assert_eq!(scene.children(group).len(), 4);
        assert_eq!(scene.geometry_count(), 1);
        for name in ["myCube1_instance1", "myCube1_instance4"] {
            let id = scene.find(name).expect("instance");
            let node = scene.node(id).unwrap();
            assert!(node.visible);
            assert_eq!(node.parent, Some(group));
            assert_eq!(node.kind, scene.node(base).unwrap().kind);
        }
    }

    #[test]
    fn rerun_replaces_previous_batch() {
        let mut scene = MemoryScene::new();
        let other = scene.create_group("persp").unwrap();
        run(&mut scene, &ScatterRequest::new().with_count(10));
        run(&mut scene, &ScatterRequest::new().with_count(3));

        // 3 instances + base + group, plus the unrelated node.
        assert_eq!(scene.len(), 6);
        assert!(scene.node(other).is_some());
        assert!(scene.find("myCube1").is_some());
        assert!(scene.find("myCube2").is_none());
        assert_eq!(scene.geometry_count(), 1);
    }

    #[test]
    fn pivot_moves_to_bounds_center() {
        let mut scene = MemoryScene::new();
        let request = ScatterRequest::new()
            .with_count(3)
            .with_scale_range(1.0, 1.0)
            .with_position_range(PositionRange::point(4.0, 2.0, -6.0));
        run(&mut scene, &request);

        let group = scene.find("myCube1_instance_grp1").unwrap();
        let pivot = scene.node(group).unwrap().pivot;
        assert!((pivot - Vec3::new(4.0, 2.0, -6.0)).length() < 1e-4);

        // Recentering leaves children untouched.
        for child in scene.children(group) {
            let p = scene.node(child).unwrap().placement.position;
            assert_eq!(p, Vec3::new(4.0, 2.0, -6.0));
        }
    }

    #[test]
    fn empty_group_pivot_stays_at_origin() {
        let mut scene = MemoryScene::new();
        let group = scene.create_group("grp#").unwrap();
        scene.recenter_pivot(&group).unwrap();
        assert_eq!(scene.node(group).unwrap().pivot, Vec3::ZERO);
    }

    #[test]
    fn shared_geometry_edits_reach_instances() {
        let mut scene = MemoryScene::new();
        let base = scene.create_base_primitive("box#").unwrap();
        let inst = scene.instantiate(&base, "box1_instance#").unwrap();
        let NodeKind::Mesh(geometry) = scene.node(base).unwrap().kind else {
            panic!("base is a mesh");
        };

        scene
            .set_geometry_half_extents(geometry, Vec3::splat(2.0))
            .unwrap();
        let bounds = scene.local_bounds(inst).unwrap();
        assert_eq!(bounds.size(), Vec3::splat(4.0));
    }

    #[test]
    fn binding_errors_are_scene_failures() {
        let mut scene = MemoryScene::new();
        let group = scene.create_group("grp").unwrap();
        let err = scene.instantiate(&group, "x#").expect_err("groups have no geometry");
        assert!(matches!(err, Error::SceneBinding(_)));

        let base = scene.create_base_primitive("box#").unwrap();
        assert!(scene.parent(&group, &base).is_err());
        assert!(scene.hide(&NodeId(999)).is_err());
    }

    #[test]
    fn delete_matching_removes_descendants() {
        let mut scene = MemoryScene::new();
        let group = scene.create_group("tmp_grp").unwrap();
        let base = scene.create_base_primitive("keep#").unwrap();
        let child = scene.instantiate(&base, "child").unwrap();
        scene.parent(&child, &group).unwrap();

        assert_eq!(scene.delete_matching("tmp*").unwrap(), 2);
        assert!(scene.node(child).is_none());
        assert!(scene.node(base).is_some());
        assert_eq!(scene.geometry_count(), 1);
    }
}
