//! [`SceneBinding`] over a Bevy [`World`].
//!
//! Every created entity carries a [`Name`], a [`Transform`] and a [`Visibility`].
//! Instances share their base's [`CubeShape`]; attaching a mesh is left to the app.
use bevy::prelude::*;
use cube_scatter::error::{Error, Result};
use cube_scatter::prelude::{
    matches_pattern, Aabb, NameRegistry, Placement, SceneBinding, UNIT_CUBE_HALF_EXTENTS,
};

/// Box geometry of a scattered cube, in local units.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CubeShape {
    pub half_extents: Vec3,
}

impl Default for CubeShape {
    fn default() -> Self {
        Self {
            half_extents: UNIT_CUBE_HALF_EXTENTS,
        }
    }
}

/// Marks the hidden source cube of a batch.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ScatterBase;

/// Marks the parent entity of a batch.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ScatterGroup;

/// Marks an instance and points back at the cube it was created from.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterInstance {
    pub base: Entity,
}

/// Scene binding borrowing a [`World`] for the duration of one batch.
///
/// Names already present in the world are taken into account when resolving
/// `#` suffixes, so a batch never reuses the name of an unrelated entity.
pub struct WorldSceneBinding<'w> {
    world: &'w mut World,
    names: NameRegistry,
}

impl<'w> WorldSceneBinding<'w> {
    pub fn new(world: &'w mut World) -> Self {
        let mut query = world.query::<&Name>();
        let names = query
            .iter(world)
            .map(|name| name.as_str().to_owned())
            .collect();
        Self { world, names }
    }

    pub fn world(&self) -> &World {
        self.world
    }

    fn spawn_named(&mut self, requested: &str, bundle: impl Bundle) -> Entity {
        let name = self.names.claim(requested);
        self.world.spawn((Name::new(name), bundle)).id()
    }

    fn require<C: Component>(&self, entity: Entity, what: &str) -> Result<()> {
        if self.world.get::<C>(entity).is_none() {
            return Err(Error::scene(format!("entity {entity:?} is not a {what}")));
        }
        Ok(())
    }

    fn entity_mut(&mut self, entity: Entity) -> Result<EntityWorldMut<'_>> {
        self.world
            .get_entity_mut(entity)
            .map_err(|_| Error::scene(format!("entity {entity:?} does not exist")))
    }

    fn children_of(&self, entity: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(entity)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    fn subtree(&self, root: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(entity) = stack.pop() {
            out.push(entity);
            stack.extend(self.children_of(entity));
        }
        out
    }
}

impl SceneBinding for WorldSceneBinding<'_> {
    type Object = Entity;
    type Group = Entity;

    fn delete_matching(&mut self, pattern: &str) -> Result<usize> {
        let mut query = self.world.query::<(Entity, &Name)>();
        let doomed: Vec<Entity> = query
            .iter(self.world)
            .filter(|(_, name)| matches_pattern(name.as_str(), pattern))
            .map(|(entity, _)| entity)
            .collect();

        let mut removed = 0;
        for root in doomed {
            // Already gone with a matching ancestor.
            if self.world.get_entity(root).is_err() {
                continue;
            }
            for entity in self.subtree(root) {
                if let Some(name) = self.world.get::<Name>(entity) {
                    self.names.release(name.as_str());
                }
                removed += 1;
            }
            self.world.despawn(root);
        }
        Ok(removed)
    }

    fn create_base_primitive(&mut self, name: &str) -> Result<Entity> {
        Ok(self.spawn_named(
            name,
            (
                Transform::IDENTITY,
                Visibility::Visible,
                CubeShape::default(),
                ScatterBase,
            ),
        ))
    }

    fn create_group(&mut self, name: &str) -> Result<Entity> {
        Ok(self.spawn_named(
            name,
            (Transform::IDENTITY, Visibility::Visible, ScatterGroup),
        ))
    }

    fn instantiate(&mut self, base: &Entity, name: &str) -> Result<Entity> {
        let shape = *self
            .world
            .get::<CubeShape>(*base)
            .ok_or_else(|| Error::scene(format!("entity {base:?} has no cube shape")))?;
        Ok(self.spawn_named(
            name,
            (
                Transform::IDENTITY,
                Visibility::Inherited,
                shape,
                ScatterInstance { base: *base },
            ),
        ))
    }

    fn apply_transform(&mut self, object: &Entity, placement: &Placement) -> Result<()> {
        self.entity_mut(*object)?.insert(Transform {
            translation: placement.position,
            rotation: placement.rotation(),
            scale: placement.scale(),
        });
        Ok(())
    }

    fn parent(&mut self, child: &Entity, group: &Entity) -> Result<()> {
        self.require::<ScatterGroup>(*group, "scatter group")?;
        if child == group {
            return Err(Error::scene("cannot parent an entity to itself"));
        }
        self.entity_mut(*child)?.insert(ChildOf(*group));
        Ok(())
    }

    fn hide(&mut self, object: &Entity) -> Result<()> {
        self.entity_mut(*object)?.insert(Visibility::Hidden);
        Ok(())
    }

    /// Bevy has no separate pivot: the group moves to the bounds center and its
    /// children are shifted back by the same amount.
    fn recenter_pivot(&mut self, group: &Entity) -> Result<()> {
        self.require::<ScatterGroup>(*group, "scatter group")?;
        let children = self.children_of(*group);
        let bounds = Aabb::union_all(children.iter().filter_map(|&child| {
            let transform = self.world.get::<Transform>(child)?;
            let shape = self.world.get::<CubeShape>(child)?;
            Some(Aabb::of_transformed(
                shape.half_extents,
                transform.translation,
                transform.rotation,
                transform.scale,
            ))
        }));
        let Some(bounds) = bounds else {
            return Ok(());
        };

        let center = bounds.center();
        for child in children {
            if let Some(mut transform) = self.world.get_mut::<Transform>(child) {
                transform.translation -= center;
            }
        }
        let mut transform = self
            .world
            .get_mut::<Transform>(*group)
            .ok_or_else(|| Error::scene(format!("group {group:?} has no transform")))?;
        let offset = transform.rotation * (transform.scale * center);
        transform.translation += offset;
        Ok(())
    }

    fn object_name(&self, object: &Entity) -> String {
        self.world
            .get::<Name>(*object)
            .map(|name| name.as_str().to_owned())
            .unwrap_or_default()
    }

    fn group_name(&self, group: &Entity) -> String {
        self.object_name(group)
    }
}

#[cfg(test)]
mod tests {
    use cube_scatter::prelude::{
        scatter_cubes, BatchOptions, PositionRange, ScatterPlanner, ScatterRequest,
    };

    use super::*;

    fn run(world: &mut World, request: &ScatterRequest) -> Entity {
        let mut planner = ScatterPlanner::seeded(1234);
        let mut scene = WorldSceneBinding::new(world);
        scatter_cubes(&mut planner, &mut scene, request, &BatchOptions::default())
            .expect("batch succeeds")
            .group
    }

    fn find(world: &mut World, wanted: &str) -> Option<Entity> {
        let mut query = world.query::<(Entity, &Name)>();
        query
            .iter(world)
            .find(|(_, name)| name.as_str() == wanted)
            .map(|(entity, _)| entity)
    }

    #[test]
    fn batch_spawns_named_hierarchy() {
        let mut world = World::new();
        let group = run(&mut world, &ScatterRequest::new().with_count(5));

        let base = find(&mut world, "myCube1").expect("base");
        assert_eq!(world.get::<Visibility>(base), Some(&Visibility::Hidden));
        assert_eq!(
            world.get::<Name>(group).map(|n| n.as_str()),
            Some("myCube1_instance_grp1")
        );

        let children = world.get::<Children>(group).expect("children").to_vec();
        assert_eq!(children.len(), 5);
        for child in children {
            assert_eq!(
                world.get::<ScatterInstance>(child),
                Some(&ScatterInstance { base })
            );
            assert_eq!(world.get::<Visibility>(child), Some(&Visibility::Inherited));
        }
        assert!(find(&mut world, "myCube1_instance5").is_some());
    }

    #[test]
    fn rerun_replaces_previous_batch_only() {
        let mut world = World::new();
        let camera = world.spawn(Name::new("Camera")).id();
        run(&mut world, &ScatterRequest::new().with_count(8));
        run(&mut world, &ScatterRequest::new().with_count(2));

        let mut query = world.query::<&Name>();
        assert_eq!(query.iter(&world).count(), 1 + 1 + 1 + 2);
        assert!(world.get_entity(camera).is_ok());
        assert!(find(&mut world, "myCube1").is_some());
        assert!(find(&mut world, "myCube2").is_none());
    }

    #[test]
    fn existing_names_are_not_reused() {
        let mut world = World::new();
        world.spawn(Name::new("box1"));
        let mut scene = WorldSceneBinding::new(&mut world);
        let base = scene.create_base_primitive("box#").unwrap();
        assert_eq!(scene.object_name(&base), "box2");
    }

    #[test]
    fn recentering_keeps_world_positions() {
        let mut world = World::new();
        let request = ScatterRequest::new()
            .with_count(3)
            .with_scale_range(1.0, 1.0)
            .with_position_range(PositionRange::point(4.0, 2.0, -6.0));
        let group = run(&mut world, &request);

        let group_translation = world.get::<Transform>(group).unwrap().translation;
        assert!((group_translation - Vec3::new(4.0, 2.0, -6.0)).length() < 1e-4);
        for child in world.get::<Children>(group).unwrap().to_vec() {
            let local = world.get::<Transform>(child).unwrap().translation;
            assert!(local.length() < 1e-4);
            assert!((group_translation + local - Vec3::new(4.0, 2.0, -6.0)).length() < 1e-4);
        }
    }

    #[test]
    fn misuse_is_a_scene_binding_error() {
        let mut world = World::new();
        let mut scene = WorldSceneBinding::new(&mut world);
        let group = scene.create_group("grp").unwrap();
        let base = scene.create_base_primitive("cube").unwrap();

        let err = scene.instantiate(&group, "bad").expect_err("groups have no shape");
        assert!(matches!(err, Error::SceneBinding(_)));
        let err = scene.parent(&group, &base).expect_err("base is not a group");
        assert!(matches!(err, Error::SceneBinding(_)));
    }
}
