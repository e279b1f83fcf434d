//! World plugin: the voxel block grid and a small demo arena.
//!
//! Blocks are entities with a static cube collider on the `World` layer, indexed by their
//! integer cell in `BlockGrid`. A block occupies `[cell, cell + 1)` on every axis, so a
//! world position maps to its cell by flooring each coordinate.

use avian3d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::plugins::grenade::ExplosionConfig;

const ARENA_HALF: i32 = 8;
const WALL_HEIGHT: i32 = 3;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub cell: IVec3,
    pub destructible: bool,
    /// Health a destructible block starts with once it is first damaged.
    pub durability: i32,
}

/// Result of a block lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub entity: Entity,
    pub destructible: bool,
}

/// Cell → block entity index. Air is the absence of an entry.
#[derive(Resource, Debug, Default)]
pub struct BlockGrid {
    cells: HashMap<IVec3, Entity>,
}

impl BlockGrid {
    pub fn insert(&mut self, cell: IVec3, entity: Entity) -> Option<Entity> {
        self.cells.insert(cell, entity)
    }

    pub fn remove(&mut self, cell: IVec3) -> Option<Entity> {
        self.cells.remove(&cell)
    }

    pub fn entity_at(&self, cell: IVec3) -> Option<Entity> {
        self.cells.get(&cell).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Cell containing a world-space position.
#[inline]
pub fn cell_of(position: Vec3) -> IVec3 {
    position.floor().as_ivec3()
}

/// Look up the block in `cell`, validating that the indexed entity still exists.
pub fn block_at(world: &World, cell: IVec3) -> Option<BlockInfo> {
    let entity = world.get_resource::<BlockGrid>()?.entity_at(cell)?;
    let block = world.get::<Block>(entity)?;
    Some(BlockInfo {
        entity,
        destructible: block.destructible,
    })
}

/// Components for a block entity at `cell`.
pub fn block_bundle(block: Block) -> impl Bundle {
    let layers = CollisionLayers::new(
        Layer::World,
        [Layer::Character, Layer::Projectile, Layer::Default],
    );
    (
        Name::new(format!("Block{}", block.cell)),
        block,
        Transform::from_translation(block.cell.as_vec3() + Vec3::splat(0.5)),
        RigidBody::Static,
        Collider::cuboid(1.0, 1.0, 1.0),
        layers,
    )
}

/// Spawn a block and index it. Replaces (and despawns) whatever occupied the cell.
pub fn place_block(world: &mut World, block: Block) -> Entity {
    let entity = world.spawn(block_bundle(block)).id();
    let previous = world.resource_mut::<BlockGrid>().insert(block.cell, entity);
    if let Some(previous) = previous {
        world.despawn(previous);
    }
    entity
}

pub fn plugin(app: &mut App) {
    app.init_resource::<BlockGrid>();
    app.add_systems(Startup, spawn_arena);
}

fn spawn_arena(mut commands: Commands, mut grid: ResMut<BlockGrid>) {
    let mut place = |block: Block, explosive: bool| {
        let mut entity = commands.spawn(block_bundle(block));
        if explosive {
            entity.insert(ExplosionConfig::default());
        }
        grid.insert(block.cell, entity.id());
    };

    // Bedrock floor.
    (-ARENA_HALF..=ARENA_HALF)
        .flat_map(|z| (-ARENA_HALF..=ARENA_HALF).map(move |x| IVec3::new(x, 0, z)))
        .for_each(|cell| {
            place(
                Block {
                    cell,
                    destructible: false,
                    durability: 0,
                },
                false,
            );
        });

    // Destructible back wall.
    for y in 1..=WALL_HEIGHT {
        for x in -ARENA_HALF..=ARENA_HALF {
            place(
                Block {
                    cell: IVec3::new(x, y, ARENA_HALF),
                    destructible: true,
                    durability: 10,
                },
                false,
            );
        }
    }

    // A single explosive block in front of the wall.
    place(
        Block {
            cell: IVec3::new(0, 1, ARENA_HALF - 2),
            destructible: true,
            durability: 5,
        },
        true,
    );
}
