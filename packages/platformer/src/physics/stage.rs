//! The stage: owner of a level's tile grid and bodies.

use super::{
    body::{
        Body,
        BodyKey,
    },
    collision::Collider,
    events::EventSink,
    resolver::tick_body,
};
use crate::settings::PhysicsSettings;
use tile_grid::{
    AaRect,
    TileGrid,
    TypeMask,
    TypeTable,
};
use slab::Slab;


/// A level being played: tile grid, bodies, and the settings they move by.
#[derive(Debug, Clone)]
pub struct Stage {
    pub(crate) bodies: Slab<Body>,
    grid: TileGrid,
    types: TypeTable,
    settings: PhysicsSettings,
}

impl Stage {
    /// Panics if `settings.max_substep` isn't a positive finite number.
    pub fn new(grid: TileGrid, types: TypeTable, settings: PhysicsSettings) -> Self {
        assert!(
            settings.max_substep > 0.0 && settings.max_substep.is_finite(),
            "max_substep must be positive and finite, got {}", settings.max_substep,
        );
        Stage {
            bodies: Slab::new(),
            grid,
            types,
            settings,
        }
    }

    pub fn add_body(&mut self, body: Body) -> BodyKey {
        let key = self.bodies.insert(body);
        debug!(key, types = %self.types.describe(self.bodies[key].types), "added body");
        key
    }

    /// Remove a body, releasing everything docked to it and every ladder lock
    /// onto it.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<Body> {
        if !self.bodies.contains(key) {
            return None;
        }
        self.undock(key);
        self.undock_riders(key);
        for (_, other) in self.bodies.iter_mut() {
            let Some(phys) = other.physics.as_mut() else { continue };
            if phys.on_ladder == Some(key) {
                phys.on_ladder = None;
                phys.gravity = true;
                if let Some(types) = phys.type_before_ladder.take() {
                    other.types = types;
                }
            }
            if phys.touched_ladder == Some(key) {
                phys.touched_ladder = None;
            }
        }
        debug!(key, "removed body");
        Some(self.bodies.remove(key))
    }

    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    pub fn bodies(&self) -> impl Iterator<Item=(BodyKey, &Body)> + '_ {
        self.bodies.iter()
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Rect of a body or tile, if it exists.
    pub fn collider_rect(&self, collider: Collider) -> Option<AaRect> {
        match collider {
            Collider::Body(key) => self.bodies.get(key).map(|body| body.rect),
            Collider::Tile(tc) => self.grid.tile_at(tc.x, tc.y).map(|tile| tile.rect),
        }
    }

    /// Type of a body or tile, if it exists.
    pub fn collider_types(&self, collider: Collider) -> Option<TypeMask> {
        match collider {
            Collider::Body(key) => self.bodies.get(key).map(|body| body.types),
            Collider::Tile(tc) => self.grid.tile_at(tc.x, tc.y).map(|tile| tile.types),
        }
    }

    /// Advance all bodies with physics by `dt` seconds, one after the other in
    /// key order.
    pub fn tick(&mut self, dt: f32, sink: &mut dyn EventSink) {
        let keys = self.bodies.iter()
            .filter(|(_, body)| body.physics.is_some())
            .map(|(key, _)| key)
            .collect::<Vec<_>>();
        for key in keys {
            tick_body(self, key, dt, sink);
        }
    }
}
