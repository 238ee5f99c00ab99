//! Orb pool and spawn scheduler
//!
//! A fixed arena of orb slots. Spawning is driven by distance travelled, not
//! by time, so pacing holds at any tick rate. A single long tick catches up by
//! spawning several orbs rather than skipping any.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::SpawnTuning;

/// Handle to a pool slot. Stale once the slot is respawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrbId {
    pub slot: usize,
    pub generation: u32,
}

/// A pooled collectible
#[derive(Debug, Clone, Default)]
pub struct Orb {
    pub spawned: bool,
    /// x = lane offset, y = height, z = depth ahead of the player
    pub pos: Vec3,
    /// Depth at the start of the last tick (for swept pickup tests)
    pub prev_z: f32,
    pub lane: usize,
    generation: u32,
}

impl Orb {
    fn spawn(&mut self, pos: Vec3, lane: usize) {
        self.spawned = true;
        self.pos = pos;
        self.prev_z = pos.z;
        self.lane = lane;
        self.generation = self.generation.wrapping_add(1);
    }

    fn despawn(&mut self) {
        self.spawned = false;
    }
}

/// What the pool did during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbEvent {
    Spawned { id: OrbId, lane: usize },
    /// Orb passed behind the player uncollected
    Missed { id: OrbId },
}

/// Pickup volume around the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupProbe {
    pub x: f32,
    pub half_width: f32,
    pub half_depth: f32,
}

/// Fixed-capacity orb arena plus spawn pacing
#[derive(Debug, Clone)]
pub struct OrbPool {
    slots: Vec<Orb>,
    running: bool,
    distance_until_next_spawn: f32,
    move_speed: f32,
    lane_width: f32,
    tuning: SpawnTuning,
    rng: Pcg32,
}

impl OrbPool {
    pub fn new(tuning: SpawnTuning, seed: u64) -> Self {
        let mut tuning = tuning;
        if tuning.max_spacing < tuning.min_spacing {
            std::mem::swap(&mut tuning.min_spacing, &mut tuning.max_spacing);
        }
        if tuning.max_height < tuning.min_height {
            std::mem::swap(&mut tuning.min_height, &mut tuning.max_height);
        }
        // Zero spacing would spawn forever in one tick
        tuning.min_spacing = tuning.min_spacing.max(0.01);
        tuning.max_spacing = tuning.max_spacing.max(tuning.min_spacing);

        Self {
            slots: vec![Orb::default(); tuning.pool_size],
            running: false,
            distance_until_next_spawn: 0.0,
            move_speed: tuning.move_speed,
            lane_width: 2.8,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Set run speed and lane spacing (any time)
    pub fn configure(&mut self, speed: f32, lane_width: f32) {
        self.move_speed = speed.max(0.0);
        self.lane_width = lane_width.max(1.0);
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn distance_until_next_spawn(&self) -> f32 {
        self.distance_until_next_spawn
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|o| o.spawned).count()
    }

    /// Iterate spawned orbs with their handles
    pub fn active(&self) -> impl Iterator<Item = (OrbId, &Orb)> {
        self.slots.iter().enumerate().filter(|(_, o)| o.spawned).map(|(slot, orb)| {
            (
                OrbId {
                    slot,
                    generation: orb.generation,
                },
                orb,
            )
        })
    }

    /// Despawn everything and restart pacing
    pub fn reset(&mut self) {
        for orb in &mut self.slots {
            orb.despawn();
        }
        self.distance_until_next_spawn = 0.0;
    }

    /// Advance orbs and spawn new ones. Events are appended to `out`.
    pub fn tick(&mut self, dt: f32, out: &mut Vec<OrbEvent>) {
        if !self.running {
            return;
        }
        let travel = self.move_speed * dt;
        if travel <= 0.0 {
            return;
        }

        self.move_orbs_backward(travel, out);

        self.distance_until_next_spawn -= travel;
        while self.distance_until_next_spawn <= 0.0 {
            if let Some(event) = self.spawn_orb() {
                out.push(event);
            }
            let spacing = self
                .rng
                .random_range(self.tuning.min_spacing..=self.tuning.max_spacing);
            self.distance_until_next_spawn += spacing;
        }
    }

    /// Orb was picked up by the player. No event; stale handles are ignored.
    pub fn notify_collected(&mut self, id: OrbId) -> bool {
        match self.slots.get_mut(id.slot) {
            Some(orb) if orb.spawned && orb.generation == id.generation => {
                orb.despawn();
                true
            }
            _ => false,
        }
    }

    /// Orbs whose path during the last tick crossed the pickup volume
    pub fn pickups(&self, probe: &PickupProbe) -> Vec<OrbId> {
        self.active()
            .filter(|(_, orb)| {
                let near = orb.pos.z.min(orb.prev_z);
                let far = orb.pos.z.max(orb.prev_z);
                far >= -probe.half_depth
                    && near <= probe.half_depth
                    && (orb.pos.x - probe.x).abs() <= probe.half_width
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn move_orbs_backward(&mut self, travel: f32, out: &mut Vec<OrbEvent>) {
        for (slot, orb) in self.slots.iter_mut().enumerate() {
            if !orb.spawned {
                continue;
            }

            orb.prev_z = orb.pos.z;
            orb.pos.z -= travel;

            if orb.pos.z < -self.tuning.despawn_behind {
                orb.despawn();
                out.push(OrbEvent::Missed {
                    id: OrbId {
                        slot,
                        generation: orb.generation,
                    },
                });
            }
        }
    }

    fn spawn_orb(&mut self) -> Option<OrbEvent> {
        let slot = self.slots.iter().position(|o| !o.spawned)?;

        let lane = self.rng.random_range(0..LANE_COUNT);
        let x = (lane as f32 - CENTER_LANE as f32) * self.lane_width;
        let y = self
            .rng
            .random_range(self.tuning.min_height..=self.tuning.max_height);

        let orb = &mut self.slots[slot];
        orb.spawn(Vec3::new(x, y, self.tuning.spawn_ahead), lane);
        log::debug!("Orb spawned in slot {} lane {}", slot, lane);

        Some(OrbEvent::Spawned {
            id: OrbId {
                slot,
                generation: orb.generation,
            },
            lane,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_pool(seed: u64) -> OrbPool {
        let mut pool = OrbPool::new(SpawnTuning::default(), seed);
        pool.configure(14.0, 2.8);
        pool.set_running(true);
        pool
    }

    fn spawned(events: &[OrbEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, OrbEvent::Spawned { .. }))
            .count()
    }

    #[test]
    fn test_idle_pool_does_nothing() {
        let mut pool = OrbPool::new(SpawnTuning::default(), 1);
        let mut events = Vec::new();
        pool.tick(1.0, &mut events);
        assert!(events.is_empty());
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_zero_dt_is_inert() {
        let mut pool = running_pool(1);
        let mut events = Vec::new();
        pool.tick(0.0, &mut events);
        pool.tick(-1.0, &mut events);
        assert!(events.is_empty());
        assert_eq!(pool.distance_until_next_spawn(), 0.0);
    }

    #[test]
    fn test_first_tick_spawns_ahead_in_a_lane() {
        let mut pool = running_pool(7);
        let mut events = Vec::new();
        pool.tick(1.0 / 60.0, &mut events);
        assert_eq!(spawned(&events), 1);

        let (_, orb) = pool.active().next().unwrap();
        assert_eq!(orb.pos.z, 62.0);
        assert!((1.05..=1.95).contains(&orb.pos.y));
        assert!([-2.8, 0.0, 2.8].iter().any(|x| (orb.pos.x - x).abs() < 1e-5));
        assert!(pool.distance_until_next_spawn() >= 5.0 - 14.0 / 60.0);
    }

    #[test]
    fn test_long_tick_catches_up() {
        let mut pool = running_pool(3);
        let mut events = Vec::new();
        // 140 units in one tick: at least 1 + 140/10 spawns
        pool.tick(10.0, &mut events);
        assert!(spawned(&events) >= 15);
        assert!(pool.distance_until_next_spawn() > 0.0);
    }

    #[test]
    fn test_exhausted_pool_skips_silently() {
        let tuning = SpawnTuning {
            pool_size: 2,
            ..Default::default()
        };
        let mut pool = OrbPool::new(tuning, 5);
        pool.configure(14.0, 2.8);
        pool.set_running(true);
        let mut events = Vec::new();
        pool.tick(2.0, &mut events);
        assert_eq!(spawned(&events), 2);
        assert_eq!(pool.active_count(), 2);
        assert!(pool.distance_until_next_spawn() > 0.0);
    }

    #[test]
    fn test_orbs_behind_player_are_missed() {
        let mut pool = running_pool(11);
        let mut events = Vec::new();
        pool.tick(1.0 / 60.0, &mut events);
        pool.set_running(true);
        let (id, _) = pool.active().next().unwrap();

        // 62 ahead + 10 behind = 72 units of travel before the miss
        events.clear();
        let mut ticks = 0;
        while !events.contains(&OrbEvent::Missed { id }) {
            pool.tick(0.5, &mut events);
            ticks += 1;
            assert!(ticks < 20);
        }
        assert!(!pool.orbs()[id.slot].spawned || pool.orbs()[id.slot].generation != id.generation);
    }

    #[test]
    fn test_collect_and_stale_handles() {
        let mut pool = running_pool(2);
        let mut events = Vec::new();
        pool.tick(1.0 / 60.0, &mut events);
        let (id, _) = pool.active().next().unwrap();

        assert!(pool.notify_collected(id));
        assert!(!pool.notify_collected(id));
        assert!(!pool.notify_collected(OrbId {
            slot: 999,
            generation: 0
        }));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_pickups_use_swept_depth() {
        let mut pool = running_pool(4);
        let mut events = Vec::new();
        pool.tick(1.0 / 60.0, &mut events);
        pool.set_running(false);
        let (id, orb) = pool.active().next().unwrap();
        let probe = PickupProbe {
            x: orb.pos.x,
            half_width: 1.0,
            half_depth: 0.9,
        };
        assert!(pool.pickups(&probe).is_empty());

        // Jump straight past the player in one tick
        pool.set_running(true);
        pool.configure(62.0 + 5.0, 2.8);
        events.clear();
        pool.tick(1.0, &mut events);
        assert_eq!(pool.pickups(&probe), vec![id]);

        let elsewhere = PickupProbe { x: probe.x + 2.8, ..probe };
        assert!(!pool.pickups(&elsewhere).contains(&id));
    }

    #[test]
    fn test_reset_clears_pool() {
        let mut pool = running_pool(9);
        let mut events = Vec::new();
        pool.tick(3.0, &mut events);
        assert!(pool.active_count() > 0);
        pool.reset();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.distance_until_next_spawn(), 0.0);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = running_pool(1234);
        let mut b = running_pool(1234);
        let (mut ea, mut eb) = (Vec::new(), Vec::new());
        for _ in 0..300 {
            a.tick(1.0 / 60.0, &mut ea);
            b.tick(1.0 / 60.0, &mut eb);
        }
        assert_eq!(ea, eb);
    }
}
