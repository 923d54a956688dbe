//! Friendly drone update - tick step 3.
//!
//! Friendlies are updated one at a time in roster order. Each one sees the
//! world as its predecessors left it (sequential mutation, no double
//! buffering). Per drone, in order:
//!
//! 1. jam every hostile in range (when jamming is on)
//! 2. pick a behavior against fresh views, highest priority first:
//!    autonomous (comms down) > rescue > engagement > defend > formation patrol
//! 3. record the trail, integrate velocity, then apply the separation push
//! 4. resolve any shot and reconnect any rescued squadmate

use crate::clock::SimClock;
use crate::components::*;
use crate::config::{Formation, RunFlags, ScenarioConfig, SimConfig};
use crate::rng::SimRng;
use crate::systems::combat::{resolve_shot, shot_damage, Shot, TargetClass};
use crate::systems::effects::EffectBuffer;
use crate::systems::formation::{defensive_position, separation_correction, slot_position};
use crate::systems::jamming::{apply_jamming, hostiles_in_jamming_range};
use crate::systems::lifecycle::SimTick;
use crate::systems::movement::{integrate, steer_to};
use crate::systems::rescue::{lost_mark_for, rescue_action, RescueAction};
use crate::systems::threat::{decide_engagement, select_target, EngagementDecision, ThreatContext};
use crate::systems::view::*;
use bevy_ecs::prelude::*;

/// Behavior a friendly settled on for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendlyMode {
    Autonomous,
    Rescue,
    Engage,
    Defend,
    Patrol,
    Idle,
}

/// Everything a friendly drone decided for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriendlyPlan {
    pub mode: FriendlyMode,
    pub targeting: Targeting,
    pub velocity: Velocity,
    pub fire_at: Option<DroneId>,
    pub mark_lost: Option<Position>,
    pub reconnect: Option<DroneId>,
}

impl FriendlyPlan {
    fn idle() -> Self {
        Self {
            mode: FriendlyMode::Idle,
            targeting: Targeting::default(),
            velocity: Velocity::default(),
            fire_at: None,
            mark_lost: None,
            reconnect: None,
        }
    }
}

/// State of the world as one friendly sees it.
#[derive(Debug, Clone, Copy)]
pub struct FriendlyContext<'a> {
    pub config: &'a SimConfig,
    pub flags: RunFlags,
    pub formation: Formation,
    pub orbit_phase: f32,
    pub friendlies: &'a [DroneView],
    pub hostiles: &'a [DroneView],
    pub assets: &'a [AssetView],
}

/// Decide what friendly `me` (at roster position `index`) does this tick.
pub fn plan_friendly(me: &DroneView, index: usize, ctx: &FriendlyContext, rng: &mut SimRng) -> FriendlyPlan {
    let config = ctx.config;
    let speed = config.speeds.speed(Allegiance::Friendly, me.kind);

    if !ctx.flags.communication {
        return plan_autonomous(me, ctx, speed, rng);
    }

    let mut plan = FriendlyPlan::idle();

    let swarm_centroid = Position::centroid(ctx.friendlies.iter().map(|f| &f.position));
    plan.mark_lost = lost_mark_for(me, swarm_centroid, config.lost_distance);

    match rescue_action(me, ctx.friendlies, config.reconnect_radius) {
        Some(RescueAction::Reconnect { neighbor }) => plan.reconnect = Some(neighbor),
        Some(RescueAction::MoveToward { mark, .. }) => {
            plan.mode = FriendlyMode::Rescue;
            plan.velocity = Velocity::toward(&me.position, &mark, speed * config.rescue_speed_factor);
            return plan;
        }
        None => {}
    }

    let threat_ctx = ThreatContext {
        config,
        friendlies: ctx.friendlies,
        assets: ctx.assets,
        communication: ctx.flags.communication,
    };
    let asset_centroid = asset_centroid(ctx.assets);
    let roster_size = ctx.friendlies.len();

    match select_target(me, ctx.hostiles, &threat_ctx) {
        Some(target) => match decide_engagement(me, target, &threat_ctx) {
            EngagementDecision::Engage => {
                plan.mode = FriendlyMode::Engage;
                plan.targeting = Targeting {
                    target: Some(target.id),
                    engaging: true,
                };
                if me.distance_to(&target.position) > config.firing_range {
                    plan.velocity = Velocity::toward(&me.position, &target.position, speed);
                } else {
                    plan.fire_at = Some(target.id);
                }
            }
            EngagementDecision::Defend => {
                if let Some(centroid) = asset_centroid {
                    plan.mode = FriendlyMode::Defend;
                    let post = defensive_position(&centroid, index, roster_size, config.defensive_radius);
                    plan.velocity = steer_to(&me.position, &post, speed, config.snap_tolerance);
                }
            }
        },
        None => {
            if let Some(centroid) = asset_centroid {
                plan.mode = FriendlyMode::Patrol;
                let slot = slot_position(&centroid, ctx.formation, index, roster_size, ctx.orbit_phase, config);
                plan.velocity = steer_to(&me.position, &slot, speed, config.snap_tolerance);
            }
        }
    }

    plan
}

/// Comms are down: no coordination, no rescue, no shared targeting.
fn plan_autonomous(me: &DroneView, ctx: &FriendlyContext, speed: f32, rng: &mut SimRng) -> FriendlyPlan {
    let config = ctx.config;
    let mut plan = FriendlyPlan::idle();
    plan.mode = FriendlyMode::Autonomous;

    let nearest_hostile = nearest_drone(&me.position, ctx.hostiles);
    let seek_asset = !ctx.assets.is_empty() && rng.chance(config.autonomous_asset_bias);

    if seek_asset {
        if let Some((asset, _)) = nearest_asset(&me.position, ctx.assets) {
            plan.velocity = steer_to(&me.position, &asset.position, speed, config.snap_tolerance);
        }
    } else if let Some((hostile, _)) = nearest_hostile {
        plan.velocity = Velocity::toward(&me.position, &hostile.position, speed);
    } else {
        plan.velocity = Velocity::new(rng.jitter(config.idle_jitter), rng.jitter(config.idle_jitter));
    }

    // Weapons stay free: shoot whatever drifts into range.
    if let Some((hostile, dist)) = nearest_hostile {
        if dist <= config.firing_range {
            plan.fire_at = Some(hostile.id);
        }
    }

    plan
}

/// Tick step 3: update every live friendly in roster order.
#[allow(clippy::too_many_arguments)]
pub fn friendly_update_system(
    config: Res<SimConfig>,
    flags: Res<RunFlags>,
    scenario: Res<ScenarioConfig>,
    tick: Res<SimTick>,
    clock: Res<SimClock>,
    mut rng: ResMut<SimRng>,
    mut effects: ResMut<EffectBuffer>,
    mut friendlies: FriendlyQuery,
    mut hostiles: HostileQuery,
    assets: AssetQuery,
) {
    let flags = *flags;
    let now_ms = clock.now_ms();
    let orbit_phase = tick.0 as f32 * config.orbit_step;
    let roster: Vec<DroneView> = friendly_views(&friendlies);

    for entity in roster.iter().map(|v| v.entity) {
        let friends = friendly_views(&friendlies);
        let Some(index) = friends.iter().position(|f| f.entity == entity) else {
            continue;
        };
        let me = friends[index];

        // Jamming comes first so the hostile update sees this tick's marks.
        let mut jamming_targets = Vec::new();
        if flags.jamming {
            let in_range = hostiles_in_jamming_range(&me.position, &hostile_views(&hostiles), config.jamming_range);
            for hostile in in_range {
                if let Ok((.., mut health, _, _, mut jammed)) = hostiles.get_mut(hostile.entity) {
                    apply_jamming(&mut jammed, &mut health, config.jamming_damage);
                    jamming_targets.push(hostile.id);
                }
            }
        }

        let foes = hostile_views(&hostiles);
        let sites = asset_views(&assets);
        let ctx = FriendlyContext {
            config: &config,
            flags,
            formation: scenario.formation,
            orbit_phase,
            friendlies: &friends,
            hostiles: &foes,
            assets: &sites,
        };
        let plan = plan_friendly(&me, index, &ctx, &mut rng);

        let target_hit = plan
            .fire_at
            .and_then(|id| foes.iter().find(|h| h.id == id))
            .map(|h| (h.entity, h.position));

        let mut fire_state = None;
        if let Ok((_, _, kind, mut pos, mut vel, _, mut targeting, mut trail, fire, mut lost, mut jamming)) =
            friendlies.get_mut(entity)
        {
            trail.record(*pos);

            *targeting = plan.targeting;
            *vel = plan.velocity;
            integrate(&mut pos, &vel);

            let (push_x, push_y) = separation_correction(
                me.id,
                &pos,
                &friends,
                config.separation_radius,
                config.separation_strength,
            );
            pos.x += push_x;
            pos.y += push_y;

            if let Some(mark) = plan.mark_lost {
                lost.0 = Some(mark);
                tracing::trace!(drone = me.id.0, x = mark.x, y = mark.y, "friendly drifted from swarm");
            }
            jamming.0 = jamming_targets;
            fire_state = Some((*kind, *fire));
        }

        if let (Some((kind, mut fire)), Some((target_entity, target_pos))) = (fire_state, target_hit) {
            let shot = Shot {
                damage: shot_damage(&config.damage, Allegiance::Friendly, kind, TargetClass::Drone),
                now_ms,
                cooldown_ms: config.fire_cooldown_ms,
                hit_effect_ticks: config.hit_effect_ticks,
            };
            let fired = match hostiles.get_mut(target_entity) {
                Ok((_, _, _, _, _, mut health, ..)) => {
                    resolve_shot(&shot, &mut fire, &mut health, &target_pos, &mut effects)
                }
                Err(_) => false,
            };
            if fired {
                if let Ok((.., mut fire_control, _, _)) = friendlies.get_mut(entity) {
                    *fire_control = fire;
                }
            }
        }

        if let Some(neighbor) = plan.reconnect {
            if let Some(view) = friends.iter().find(|f| f.id == neighbor) {
                if let Ok((_, _, _, _, _, _, _, _, _, mut lost, _)) = friendlies.get_mut(view.entity) {
                    lost.0 = None;
                    tracing::trace!(drone = neighbor.0, rescuer = me.id.0, "lost drone reconnected");
                }
            }
        }
    }
}
