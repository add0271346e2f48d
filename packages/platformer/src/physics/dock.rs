//! Docking: bodies resting on and being carried by other bodies or tiles.
//!
//! Each body has at most one _support_ it's docked to, and a set of _riders_
//! docked to it. Riders may carry riders of their own, so the relation forms
//! a forest. Moving a body moves all its transitive riders by the same delta.

use super::{
    body::BodyKey,
    collision::Collider,
    stage::Stage,
};
use crate::error::PhysicsError;
use tile_grid::TypeMask;
use vek::*;


/// Docking state of a body.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DockingState {
    Docked,
    NotDocked,
    /// The body has moved this sub-step and it isn't yet known whether it's
    /// still supported.
    Undetermined,
}

/// Docking component of a body.
#[derive(Debug, Clone)]
pub struct Dockable {
    state: DockingState,
    previously_docked: bool,
    docked_to: Option<Collider>,
    riders: Vec<BodyKey>,
}

impl Default for Dockable {
    fn default() -> Self {
        Dockable {
            state: DockingState::NotDocked,
            previously_docked: false,
            docked_to: None,
            riders: Vec::new(),
        }
    }
}

impl Dockable {
    fn set_state(&mut self, state: DockingState) {
        self.previously_docked = self.is_docked();
        self.state = state;
    }

    /// Enter the undetermined state, remembering whether we were docked.
    pub fn to_determine(&mut self) {
        self.set_state(DockingState::Undetermined);
    }

    /// Docked, or undetermined but docked before that.
    pub fn is_docked(&self) -> bool {
        match self.state {
            DockingState::Docked => true,
            DockingState::NotDocked => false,
            DockingState::Undetermined => self.previously_docked,
        }
    }

    pub fn is_undetermined(&self) -> bool {
        self.state == DockingState::Undetermined
    }

    pub fn state(&self) -> DockingState {
        self.state
    }

    pub fn previously_docked(&self) -> bool {
        self.previously_docked
    }

    pub fn docked_to(&self) -> Option<Collider> {
        self.docked_to
    }

    /// Bodies currently docked to this one.
    pub fn riders(&self) -> &[BodyKey] {
        &self.riders
    }

    fn add_rider(&mut self, rider: BodyKey) {
        if !self.riders.contains(&rider) {
            self.riders.push(rider);
        }
    }

    fn remove_rider(&mut self, rider: BodyKey) {
        self.riders.retain(|&key| key != rider);
    }
}


impl Stage {
    /// Dock `rider` to `support`.
    ///
    /// Refused without changing anything if the support isn't dockable, or if
    /// it would make a body (transitively) carry itself.
    pub fn dock_to(&mut self, rider: BodyKey, support: Collider) -> Result<(), PhysicsError> {
        if !self.bodies.contains(rider) {
            return Err(PhysicsError::NoSuchBody(rider));
        }
        let support_types = match (self.collider_types(support), support) {
            (Some(types), _) => types,
            (None, Collider::Body(key)) => return Err(PhysicsError::NoSuchBody(key)),
            (None, Collider::Tile(_)) => return Err(PhysicsError::NotDockable { support }),
        };
        if !support_types.contains(TypeMask::DOCKABLE) {
            return Err(PhysicsError::NotDockable { support });
        }
        if support == Collider::Body(rider) {
            return Err(PhysicsError::SelfDock(rider));
        }
        if self.docking_chain(support).contains(&Collider::Body(rider)) {
            return Err(PhysicsError::DockingCycle { rider, support });
        }

        let dock = &mut self.bodies[rider].dock;
        let old = dock.docked_to.replace(support);
        dock.set_state(DockingState::Docked);
        if old != Some(support) {
            trace!(rider, ?support, ?old, "docked");
            if let Some(Collider::Body(old)) = old {
                self.bodies[old].dock.remove_rider(rider);
            }
        }
        if let Collider::Body(support) = support {
            self.bodies[support].dock.add_rider(rider);
        }
        Ok(())
    }

    /// Undock `rider` from whatever it's docked to, if anything.
    pub fn undock(&mut self, rider: BodyKey) {
        let Some(body) = self.bodies.get_mut(rider) else { return };
        body.dock.set_state(DockingState::NotDocked);
        if let Some(support) = body.dock.docked_to.take() {
            trace!(rider, ?support, "undocked");
            if let Collider::Body(support) = support {
                if let Some(support) = self.bodies.get_mut(support) {
                    support.dock.remove_rider(rider);
                }
            }
        }
    }

    /// Undock all bodies docked to `support`.
    pub fn undock_riders(&mut self, support: BodyKey) {
        let riders = match self.bodies.get(support) {
            Some(body) => body.dock.riders.clone(),
            None => return,
        };
        for rider in riders {
            self.undock(rider);
        }
    }

    /// The chain of supports below `start`, nearest first, starting with
    /// `start` itself.
    pub fn docking_chain(&self, start: Collider) -> Vec<Collider> {
        let mut chain = vec![start];
        let mut curr = start;
        while let Some(next) = curr.body()
            .and_then(|key| self.bodies.get(key))
            .and_then(|body| body.dock.docked_to)
        {
            // can't happen unless the docking tree is corrupt, but don't loop forever
            if chain.contains(&next) {
                error!(?chain, ?next, "docking cycle detected");
                break;
            }
            chain.push(next);
            curr = next;
        }
        chain
    }

    /// Move a body and all its transitive riders by `delta`.
    pub fn move_body(&mut self, key: BodyKey, delta: Vec2<f32>) {
        let mut visited = Vec::new();
        let mut worklist = vec![key];
        while let Some(key) = worklist.pop() {
            if visited.contains(&key) {
                continue;
            }
            visited.push(key);
            if let Some(body) = self.bodies.get_mut(key) {
                body.rect.pos += delta;
                worklist.extend(body.dock.riders.iter().copied());
            }
        }
    }

    /// Move a body to an absolute position on either or both axes. Riders are
    /// moved by the same relative delta.
    pub fn move_body_to(&mut self, key: BodyKey, x: Option<f32>, y: Option<f32>) {
        let Some(body) = self.bodies.get(key) else { return };
        let delta = Vec2::new(
            x.map(|x| x - body.rect.pos.x).unwrap_or(0.0),
            y.map(|y| y - body.rect.pos.y).unwrap_or(0.0),
        );
        self.move_body(key, delta);
    }
}
