//! Hostile drone update - tick step 4.
//!
//! Hostiles run after every friendly has moved, in roster order, against the
//! same live collections. Their firing priority is exclusive: a friendly
//! inside firing range draws self-defense fire and the asset is spared for
//! that tick. Jammed hostiles hold fire and crawl.

use crate::clock::SimClock;
use crate::components::*;
use crate::config::SimConfig;
use crate::systems::combat::{resolve_shot, shot_damage, Shot, TargetClass};
use crate::systems::effects::EffectBuffer;
use crate::systems::movement::integrate;
use crate::systems::view::*;
use bevy_ecs::prelude::*;

/// What a hostile shoots at this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostileFire {
    Drone(DroneId),
    Asset(AssetId),
}

impl HostileFire {
    fn class(&self) -> TargetClass {
        match self {
            HostileFire::Drone(_) => TargetClass::Drone,
            HostileFire::Asset(_) => TargetClass::Asset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostilePlan {
    pub velocity: Velocity,
    pub fire: Option<HostileFire>,
}

/// Decide what hostile `me` does this tick.
pub fn plan_hostile(
    me: &DroneView,
    friendlies: &[DroneView],
    assets: &[AssetView],
    config: &SimConfig,
) -> HostilePlan {
    let mut speed = config.speeds.speed(Allegiance::Hostile, me.kind);
    if me.jammed {
        speed *= config.jammed_speed_factor;
    }

    let nearest_friendly = nearest_drone(&me.position, friendlies);
    let nearest_site = nearest_asset(&me.position, assets);

    let fire = if me.jammed {
        None
    } else {
        match (nearest_friendly, nearest_site) {
            (Some((friendly, dist)), _) if dist <= config.firing_range => Some(HostileFire::Drone(friendly.id)),
            (_, Some((asset, dist))) if dist <= config.firing_range => Some(HostileFire::Asset(asset.id)),
            _ => None,
        }
    };

    let asset_in_range = nearest_site.is_some_and(|(_, dist)| dist <= config.firing_range);
    let standoff = config.firing_range * config.hostile_standoff;

    let goal = match (nearest_friendly, nearest_site) {
        (Some((friendly, dist)), _) if !asset_in_range && dist <= config.hostile_pursuit_range => {
            Some(friendly.position)
        }
        (_, Some((asset, dist))) if dist > standoff => Some(asset.position),
        (Some((friendly, _)), None) => Some(friendly.position),
        _ => None,
    };

    HostilePlan {
        velocity: goal
            .map(|g| Velocity::toward(&me.position, &g, speed))
            .unwrap_or_default(),
        fire,
    }
}

/// Tick step 4: update every live hostile in roster order.
pub fn hostile_update_system(
    config: Res<SimConfig>,
    clock: Res<SimClock>,
    mut effects: ResMut<EffectBuffer>,
    mut friendlies: FriendlyQuery,
    mut hostiles: HostileQuery,
    mut assets: AssetQuery,
) {
    let now_ms = clock.now_ms();
    let roster = hostile_views(&hostiles);

    for entity in roster.iter().map(|v| v.entity) {
        let foes = hostile_views(&hostiles);
        let Some(me) = foes.iter().find(|h| h.entity == entity).copied() else {
            continue;
        };
        let friends = friendly_views(&friendlies);
        let sites = asset_views(&assets);
        let plan = plan_hostile(&me, &friends, &sites, &config);

        let Ok((_, _, kind, mut pos, mut vel, _, mut trail, fire_control, _)) = hostiles.get_mut(entity) else {
            continue;
        };
        trail.record(*pos);
        *vel = plan.velocity;
        integrate(&mut pos, &vel);

        let Some(fire) = plan.fire else {
            continue;
        };
        let shot = Shot {
            damage: shot_damage(&config.damage, Allegiance::Hostile, *kind, fire.class()),
            now_ms,
            cooldown_ms: config.fire_cooldown_ms,
            hit_effect_ticks: config.hit_effect_ticks,
        };
        let mut fire_state = *fire_control;

        let fired = match fire {
            HostileFire::Drone(id) => match friends.iter().find(|f| f.id == id) {
                Some(target) => match friendlies.get_mut(target.entity) {
                    Ok((_, _, _, _, _, mut health, ..)) => {
                        resolve_shot(&shot, &mut fire_state, &mut health, &target.position, &mut effects)
                    }
                    Err(_) => false,
                },
                None => false,
            },
            HostileFire::Asset(id) => match sites.iter().find(|a| a.id == id) {
                Some(target) => match assets.get_mut(target.entity) {
                    Ok((_, _, _, _, mut health)) => {
                        resolve_shot(&shot, &mut fire_state, &mut health, &target.position, &mut effects)
                    }
                    Err(_) => false,
                },
                None => false,
            },
        };

        if fired {
            if let Ok((.., mut fire_control, _)) = hostiles.get_mut(entity) {
                *fire_control = fire_state;
            }
        }
    }
}
