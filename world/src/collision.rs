//! Bloon/projectile collision, hit effects and popping.

use std::mem;

use bloon_defence_core::{Abilities, Event, Modifiers, Position};
use bloon_defence_system_movement::DamageOverTime;
use bloon_defence_system_tower_combat::Payload;
use tracing::debug;

use crate::{
    bloons::{boxes_overlap, Projectile},
    list::NodeHandle,
    towers::tower_handle,
    World, POP_REWARD,
};

impl World {
    /// Walks every active bloon bucket and resolves at most one hit per bloon.
    pub(crate) fn resolve_collisions(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while let Some(&cell) = self.bloons.active_buckets().get(index) {
            index += 1;
            if self.bloons.bucket_len(cell) == 0 || self.projectiles.bucket_len(cell) == 0 {
                continue;
            }

            let mut cursor = self.bloons.first_in(cell);
            while let Some(handle) = cursor {
                cursor = self.bloons.next_of(handle);
                self.collide_bloon(cell, handle, out_events);
            }
        }

        self.fix_knocked();
    }

    fn collide_bloon(&mut self, cell: usize, handle: NodeHandle, out_events: &mut Vec<Event>) {
        let Some(bloon) = self.bloons.get(handle).copied() else {
            return;
        };
        if !bloon.is_alive() {
            return;
        }
        let Some(size) = self.catalog.bloon(bloon.kind).map(|stats| stats.size) else {
            return;
        };

        let mut cursor = self.projectiles.first_in(cell);
        while let Some(projectile_handle) = cursor {
            cursor = self.projectiles.next_of(projectile_handle);
            let Some(projectile) = self.projectiles.get(projectile_handle).copied() else {
                continue;
            };
            if projectile.last_hit == Some(handle)
                || !boxes_overlap(
                    bloon.position(),
                    size,
                    projectile.position(),
                    projectile.size,
                )
            {
                continue;
            }

            self.resolve_hit(handle, bloon.position(), projectile_handle, projectile, out_events);
            break;
        }
    }

    fn resolve_hit(
        &mut self,
        target: NodeHandle,
        impact: Position,
        projectile_handle: NodeHandle,
        projectile: Projectile,
        out_events: &mut Vec<Event>,
    ) {
        let mut payload = projectile.payload;
        self.strike(target, &payload);

        if payload.consume_pierce() {
            let _ = self
                .projectiles
                .remove(projectile.position(), projectile_handle);
        } else if let Some(slot) = self.projectiles.get_mut(projectile_handle) {
            slot.payload = payload;
            slot.last_hit = Some(target);
        }

        if payload.splash > 0 {
            self.splash(target, impact, &payload);
        }

        if self.bloons.get(target).is_some_and(|bloon| !bloon.is_alive()) {
            self.pop(target, out_events);
        }
    }

    /// Applies one hit to a bloon. Immune bloons take no damage and no effects.
    pub(crate) fn strike(&mut self, target: NodeHandle, payload: &Payload) {
        let Some(old_cell) = self
            .bloons
            .get(target)
            .map(|bloon| self.bloons.cell_of(bloon.position()))
        else {
            return;
        };
        let Some(bloon) = self.bloons.get_mut(target) else {
            return;
        };
        let Some(stats) = self.catalog.bloon(bloon.kind) else {
            return;
        };
        if stats.immunity.blocks(payload.damage_type) {
            return;
        }

        bloon.damage(payload.damage_against(stats.moab_class), payload.tower);
        if !bloon.is_alive() {
            return;
        }

        if payload.slow > 0 {
            bloon.motion.slow = payload.slow;
        }
        if payload.stun > 0 {
            bloon.motion.stun = payload.stun;
        }
        if payload.dot_damage > 0 {
            bloon.dot = DamageOverTime::new(
                payload.dot_damage,
                payload.dot_interval,
                self.config.dot_duration,
                payload.tower,
            );
        }
        if payload.abilities.contains(Abilities::CAMO_STRIP) {
            bloon.modifiers.remove(Modifiers::CAMO);
        }
        if payload.abilities.contains(Abilities::GLUE_SOAK) {
            bloon.glued = true;
        }
        if payload.abilities.contains(Abilities::DISTRACTION) && !stats.moab_class {
            self.movement
                .knock_back(&self.path, &mut bloon.motion, self.config.knockback);
            self.scratch.knocked.push((target, old_cell));
        }
    }

    /// Rebuckets bloons whose position changed outside of the movement phase.
    pub(crate) fn fix_knocked(&mut self) {
        let mut knocked = mem::take(&mut self.scratch.knocked);
        for (handle, old_cell) in knocked.drain(..) {
            if let Some(position) = self.bloons.get(handle).map(|bloon| bloon.position()) {
                let _ = self.bloons.fix(old_cell, handle, position);
            }
        }
        self.scratch.knocked = knocked;
    }

    fn splash(&mut self, direct: NodeHandle, impact: Position, payload: &Payload) {
        self.bloons.neighborhood(impact, 1, &mut self.scratch.cells);
        let radius = i64::from(payload.splash);
        let limit = self.config.splash_max_targets;

        self.scratch.splashed.clear();
        'cells: for &cell in &self.scratch.cells {
            for (handle, bloon) in self.bloons.bucket(cell) {
                if self.scratch.splashed.len() == limit {
                    break 'cells;
                }
                if handle != direct
                    && bloon.is_alive()
                    && impact.distance_squared(bloon.position()) <= radius * radius
                {
                    self.scratch.splashed.push(handle);
                }
            }
        }

        for &handle in &self.scratch.splashed {
            let Some(bloon) = self.bloons.get_mut(handle) else {
                continue;
            };
            let Some(stats) = self.catalog.bloon(bloon.kind) else {
                continue;
            };
            if !stats.immunity.blocks(payload.damage_type) {
                bloon.damage(payload.damage_against(stats.moab_class), payload.tower);
            }
        }
    }

    /// Pops every bloon left with no health after the collision pass.
    pub(crate) fn pop_sweep(&mut self, out_events: &mut Vec<Event>) {
        let mut handles = mem::take(&mut self.scratch.handles);
        handles.clear();
        handles.extend(
            self.bloons
                .iter()
                .filter(|(_, bloon)| !bloon.is_alive())
                .map(|(handle, _)| handle),
        );
        for &handle in &handles {
            self.pop(handle, out_events);
        }
        self.scratch.handles = handles;
    }

    /// Removes a bloon, pays for it and releases its children at its position.
    ///
    /// The popped bloon still counts against the population cap when deciding
    /// which children spawn now and which wait in the deferred queue.
    fn pop(&mut self, handle: NodeHandle, out_events: &mut Vec<Event>) {
        let Some(bloon) = self.bloons.get(handle).copied() else {
            return;
        };
        let position = bloon.position();
        let mut room = self
            .config
            .max_live_bloons
            .saturating_sub(self.bloons.total());
        let _ = self.bloons.remove(position, handle);
        self.coins = self.coins.saturating_add(POP_REWARD);

        let credited = bloon.attacker.and_then(|id| {
            let tower = self.towers.get_mut(tower_handle(id))?;
            tower.pops = tower.pops.saturating_add(1);
            Some(id)
        });
        out_events.push(Event::BloonPopped {
            kind: bloon.kind,
            position,
            tower: credited,
        });

        let mut group = 0;
        while let Some(spawn) = self
            .catalog
            .bloon(bloon.kind)
            .and_then(|stats| stats.children.get(group))
            .copied()
        {
            group += 1;
            for _ in 0..spawn.count {
                let seed = bloon.child(spawn.kind);
                if room == 0 {
                    match self.deferred.push(seed) {
                        Ok(()) => out_events.push(Event::ChildDeferred { kind: spawn.kind }),
                        Err(_) => {
                            debug!(kind = spawn.kind.get(), "deferred queue full, child dropped");
                            out_events.push(Event::ChildDropped { kind: spawn.kind });
                        }
                    }
                    continue;
                }

                if let Err(reason) = self.spawn_seed(seed) {
                    debug!(kind = spawn.kind.get(), %reason, "remaining children abandoned");
                    return;
                }
                room -= 1;
            }
        }
    }
}
