//! Combat resolution - damage table lookup and rate-limited firing.
//!
//! A shot is only taken when the shooter's `FireControl` cooldown has elapsed
//! on the wall clock. Damage lands immediately and leaves a hit effect.

use crate::components::*;
use crate::config::DamageTable;
use crate::systems::effects::EffectBuffer;

/// What a shot is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetClass {
    Drone,
    Asset,
}

/// Damage of one shot from an attacker of `side`/`kind` against `target`.
///
/// Friendlies only ever shoot drones, so their damage does not depend on the
/// target class.
pub fn shot_damage(table: &DamageTable, side: Allegiance, kind: DroneKind, target: TargetClass) -> f32 {
    match (side, kind, target) {
        (Allegiance::Friendly, DroneKind::Interceptor, _) => table.friendly_interceptor,
        (Allegiance::Friendly, DroneKind::Bomber, _) => table.friendly_bomber,
        (Allegiance::Hostile, DroneKind::Interceptor, TargetClass::Drone) => table.hostile_interceptor_vs_drone,
        (Allegiance::Hostile, DroneKind::Bomber, TargetClass::Drone) => table.hostile_bomber_vs_drone,
        (Allegiance::Hostile, DroneKind::Interceptor, TargetClass::Asset) => table.hostile_interceptor_vs_asset,
        (Allegiance::Hostile, DroneKind::Bomber, TargetClass::Asset) => table.hostile_bomber_vs_asset,
    }
}

/// Everything needed to resolve one shot.
#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub damage: f32,
    pub now_ms: u64,
    pub cooldown_ms: u64,
    pub hit_effect_ticks: u32,
}

/// Fire if the cooldown allows it; returns whether damage was dealt.
pub fn resolve_shot(
    shot: &Shot,
    fire_control: &mut FireControl,
    target_health: &mut Health,
    target_pos: &Position,
    effects: &mut EffectBuffer,
) -> bool {
    if !target_health.is_alive() {
        return false;
    }
    if !fire_control.try_fire(shot.now_ms, shot.cooldown_ms) {
        return false;
    }
    target_health.damage(shot.damage);
    effects.push_hit(*target_pos, shot.hit_effect_ticks);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_table_ratios() {
        let table = DamageTable::default();
        let base = shot_damage(&table, Allegiance::Friendly, DroneKind::Interceptor, TargetClass::Drone);
        let heavy = shot_damage(&table, Allegiance::Friendly, DroneKind::Bomber, TargetClass::Drone);
        assert!((heavy / base - 10.0).abs() < 0.001);

        let small = shot_damage(&table, Allegiance::Hostile, DroneKind::Interceptor, TargetClass::Drone);
        let big = shot_damage(&table, Allegiance::Hostile, DroneKind::Bomber, TargetClass::Drone);
        assert!((big / small - 10.0).abs() < 0.001);

        let moderate = shot_damage(&table, Allegiance::Hostile, DroneKind::Interceptor, TargetClass::Asset);
        let structural = shot_damage(&table, Allegiance::Hostile, DroneKind::Bomber, TargetClass::Asset);
        assert!(structural > moderate && moderate > small);
    }

    #[test]
    fn test_resolve_shot_respects_cooldown() {
        let mut fire = FireControl::default();
        let mut health = Health::new(100.0);
        let mut effects = EffectBuffer::default();
        let target = Position::new(5.0, 5.0);
        let mut shot = Shot {
            damage: 10.0,
            now_ms: 1_000,
            cooldown_ms: 500,
            hit_effect_ticks: 12,
        };

        assert!(resolve_shot(&shot, &mut fire, &mut health, &target, &mut effects));
        shot.now_ms = 1_100;
        assert!(!resolve_shot(&shot, &mut fire, &mut health, &target, &mut effects));
        shot.now_ms = 1_500;
        assert!(resolve_shot(&shot, &mut fire, &mut health, &target, &mut effects));

        assert_eq!(health.current, 80.0);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_no_shot_at_dead_target() {
        let mut fire = FireControl::default();
        let mut health = Health::new(10.0);
        health.damage(10.0);
        let mut effects = EffectBuffer::default();
        let shot = Shot {
            damage: 10.0,
            now_ms: 0,
            cooldown_ms: 500,
            hit_effect_ticks: 12,
        };
        assert!(!resolve_shot(&shot, &mut fire, &mut health, &Position::default(), &mut effects));
        assert_eq!(fire.last_fired_at_ms, None);
        assert!(effects.is_empty());
    }
}
