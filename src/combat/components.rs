//! Combat-related components.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::spread::SpreadAngles;
use crate::core::{DamageType, SurfaceKind};
use crate::net::QuantizedVec3;

/// Component for entities that can take damage.
#[derive(Component, Debug)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

/// Hitscan weapon definition component.
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    pub name: String,
    pub base_damage: f32,
    /// Applied when the hit surface is vulnerable flesh
    pub headshot_multiplier: f32,
    /// Rounds per minute
    pub rate_of_fire: f32,
    pub spread: SpreadAngles,
    pub damage_type: DamageType,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            name: "Assault Rifle".to_string(),
            base_damage: 20.0,
            headshot_multiplier: 2.0,
            rate_of_fire: 600.0,
            spread: SpreadAngles::default(),
            damage_type: DamageType::Bullet,
        }
    }
}

impl Weapon {
    /// Seconds between consecutive shots while the trigger is held.
    pub fn time_between_shots(&self) -> f64 {
        60.0 / self.rate_of_fire as f64
    }

    /// Damage dealt by a hit on the given surface.
    pub fn damage_for_surface(&self, surface: SurfaceKind) -> f32 {
        if surface == SurfaceKind::FleshVulnerable {
            self.base_damage * self.headshot_multiplier
        } else {
            self.base_damage
        }
    }
}

/// Rounds in the clip. Only the authority's fire attempt and reload write it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ammo {
    pub current: u32,
    pub clip_size: u32,
    pub max: u32,
}

impl Ammo {
    pub fn new(current: u32, clip_size: u32, max: u32) -> Self {
        Self {
            current,
            clip_size,
            max,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Take one round out of the clip. Returns false when the clip is empty.
    pub fn consume_round(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Refill the clip regardless of how many rounds are left.
    pub fn reload(&mut self) {
        self.current = self.clip_size;
    }
}

/// Recurring fire schedule for a held trigger.
///
/// At most one schedule exists per weapon: starting again replaces the
/// pending one. The schedule is polled by the fire-rate system every frame,
/// which fires once for every interval that has elapsed.
#[derive(Component, Debug, Clone, Default)]
pub struct FireTimer {
    next_shot_at: Option<f64>,
    /// World time of the last accepted shot
    pub last_fire_time: Option<f64>,
}

impl FireTimer {
    /// Delay before the first shot of a new schedule.
    ///
    /// Releasing and re-pressing the trigger cannot beat the rate of fire.
    pub fn first_delay(&self, now: f64, time_between_shots: f64) -> f64 {
        self.last_fire_time
            .map_or(0.0, |last| (last + time_between_shots - now).max(0.0))
    }

    pub fn start(&mut self, now: f64, time_between_shots: f64) {
        self.next_shot_at = Some(now + self.first_delay(now, time_between_shots));
    }

    pub fn stop(&mut self) {
        self.next_shot_at = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_shot_at.is_some()
    }

    pub fn next_shot_at(&self) -> Option<f64> {
        self.next_shot_at
    }

    /// Number of scheduled shots due at `now`, advancing the schedule past them.
    pub fn take_due(&mut self, now: f64, time_between_shots: f64) -> u32 {
        let Some(mut next) = self.next_shot_at else {
            return 0;
        };

        if time_between_shots <= 0.0 {
            // Degenerate rate: fire once per poll
            if next <= now {
                self.next_shot_at = Some(now);
                return 1;
            }
            return 0;
        }

        let mut due = 0;
        while next <= now {
            due += 1;
            next += time_between_shots;
        }
        self.next_shot_at = Some(next);
        due
    }

    pub fn record_shot(&mut self, now: f64) {
        self.last_fire_time = Some(now);
    }
}

/// Links a weapon to the character carrying it. Set at spawn, never changed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponOwner(pub Entity);

/// Muzzle position relative to the weapon, used for tracer and flash effects.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MuzzleOffset(pub Vec3);

/// Visual target of the most recent shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShotRecord {
    end_point: QuantizedVec3,
    pub surface: SurfaceKind,
}

impl ShotRecord {
    pub fn new(end_point: Vec3, surface: SurfaceKind) -> Self {
        Self {
            end_point: QuantizedVec3::from_vec3(end_point),
            surface,
        }
    }

    pub fn end_point(&self) -> Vec3 {
        self.end_point.to_vec3()
    }
}

/// Replicated shot record with a write counter.
///
/// The authority bumps the version on every write; observers accept a
/// delivered record only if it is newer than what they hold. Only the latest
/// shot is kept, so shots faster than the replication rate can coalesce.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ReplicatedShot {
    pub record: ShotRecord,
    pub version: u32,
}

impl ReplicatedShot {
    /// Authority-side overwrite.
    pub fn publish(&mut self, record: ShotRecord) {
        self.record = record;
        self.version = self.version.wrapping_add(1);
    }

    /// Observer-side update. Returns true if the delivered record was applied.
    pub fn apply_remote(&mut self, version: u32, record: ShotRecord) -> bool {
        if !is_newer(version, self.version) {
            return false;
        }
        self.record = record;
        self.version = version;
        true
    }
}

/// Wrapping sequence comparison.
fn is_newer(candidate: u32, current: u32) -> bool {
    (candidate.wrapping_sub(current) as i32) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_of_fire_600_is_a_tenth_of_a_second() {
        let weapon = Weapon::default();
        assert!((weapon.time_between_shots() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn headshot_multiplier_only_on_vulnerable_flesh() {
        let weapon = Weapon::default();
        assert_eq!(weapon.damage_for_surface(SurfaceKind::FleshVulnerable), 40.0);
        assert_eq!(weapon.damage_for_surface(SurfaceKind::FleshDefault), 20.0);
        assert_eq!(weapon.damage_for_surface(SurfaceKind::Default), 20.0);
    }

    #[test]
    fn consuming_rounds_stops_at_zero() {
        for start in 1..=30 {
            let mut ammo = Ammo::new(start, 30, 120);
            assert!(ammo.consume_round());
            assert_eq!(ammo.current, start - 1);
        }

        let mut empty = Ammo::new(0, 30, 120);
        assert!(!empty.consume_round());
        assert_eq!(empty.current, 0);
    }

    #[test]
    fn reload_always_fills_the_clip() {
        for start in [0, 7, 30, 45] {
            let mut ammo = Ammo::new(start, 30, 120);
            ammo.reload();
            assert_eq!(ammo.current, 30);
        }
    }

    #[test]
    fn first_shot_is_immediate_after_a_long_pause() {
        let mut timer = FireTimer {
            last_fire_time: Some(-1.0),
            ..default()
        };
        timer.start(0.0, 0.1);
        assert_eq!(timer.next_shot_at(), Some(0.0));
        assert_eq!(timer.take_due(0.0, 0.1), 1);
        assert_eq!(timer.take_due(0.05, 0.1), 0);
        assert_eq!(timer.take_due(0.1, 0.1), 1);
    }

    #[test]
    fn fires_every_interval_while_held() {
        let mut timer = FireTimer::default();
        timer.start(2.0, 0.25);

        let due: u32 = (0..=8).map(|i| timer.take_due(2.0 + i as f64 * 0.125, 0.25)).sum();
        // Shots at 2.0, 2.25, 2.5, 2.75 and 3.0
        assert_eq!(due, 5);
    }

    #[test]
    fn retriggering_cannot_beat_the_rate() {
        let mut timer = FireTimer::default();
        timer.start(0.0, 0.25);
        assert_eq!(timer.take_due(0.0, 0.25), 1);
        timer.record_shot(0.0);
        timer.stop();

        timer.start(0.125, 0.25);
        assert_eq!(timer.next_shot_at(), Some(0.25));
        assert_eq!(timer.take_due(0.125, 0.25), 0);
        assert_eq!(timer.take_due(0.25, 0.25), 1);
    }

    #[test]
    fn stop_before_first_tick_fires_nothing() {
        let mut timer = FireTimer::default();
        timer.start(0.0, 0.25);
        timer.stop();
        assert!(!timer.is_active());
        assert_eq!(timer.take_due(10.0, 0.25), 0);

        // Stopping twice is harmless
        timer.stop();
        assert!(!timer.is_active());
    }

    #[test]
    fn starting_twice_keeps_a_single_schedule() {
        let mut timer = FireTimer::default();
        timer.start(0.0, 0.25);
        timer.start(0.0, 0.25);
        assert_eq!(timer.take_due(0.0, 0.25), 1);
        assert_eq!(timer.take_due(0.5, 0.25), 2);
    }

    #[test]
    fn frame_spanning_several_intervals_fires_each() {
        let mut timer = FireTimer::default();
        timer.start(0.0, 0.25);
        assert_eq!(timer.take_due(1.0, 0.25), 5);
        assert_eq!(timer.next_shot_at(), Some(1.25));
    }

    #[test]
    fn observers_only_accept_newer_records() {
        let mut authority = ReplicatedShot::default();
        authority.publish(ShotRecord::new(Vec3::new(1.0, 2.0, 3.0), SurfaceKind::FleshDefault));
        authority.publish(ShotRecord::new(Vec3::new(4.0, 5.0, 6.0), SurfaceKind::Default));
        assert_eq!(authority.version, 2);

        let mut observer = ReplicatedShot::default();
        assert!(observer.apply_remote(2, authority.record));
        assert!(!observer.apply_remote(1, ShotRecord::default()));
        assert!(!observer.apply_remote(2, ShotRecord::default()));
        assert_eq!(observer.record.end_point(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn versions_survive_wrapping() {
        let mut observer = ReplicatedShot {
            version: u32::MAX,
            ..default()
        };
        assert!(observer.apply_remote(0, ShotRecord::default()));
        assert_eq!(observer.version, 0);
    }
}
