//! Threat assessment for friendly drones.
//!
//! Every live hostile gets a score; the highest score becomes the drone's
//! candidate target. A second pass decides whether the drone actually commits
//! to it or falls back to the defensive perimeter.
//!
//! Ties keep the first maximum in roster order. That matches the
//! historical behavior and is deliberately left as-is.

use crate::components::*;
use crate::config::SimConfig;
use crate::systems::view::{nearest_asset, AssetView, DroneView};

/// Inputs shared by every score computed for one friendly in one tick.
#[derive(Debug, Clone, Copy)]
pub struct ThreatContext<'a> {
    pub config: &'a SimConfig,
    pub friendlies: &'a [DroneView],
    pub assets: &'a [AssetView],
    pub communication: bool,
}

impl<'a> ThreatContext<'a> {
    fn friendly_bombers_airborne(&self) -> bool {
        self.friendlies.iter().any(|f| f.kind == DroneKind::Bomber)
    }
}

/// Outcome of the commit/decline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementDecision {
    Engage,
    Defend,
}

/// True when `pos` lies inside the threatening range of any asset.
pub fn is_critical(pos: &Position, assets: &[AssetView], threat_range: f32) -> bool {
    assets
        .iter()
        .any(|a| a.position.distance_to(pos) <= threat_range)
}

/// Number of hostiles currently inside the threatening range of some asset.
pub fn threats_in_range<'a>(
    hostiles: impl IntoIterator<Item = &'a Position>,
    assets: &[AssetView],
    threat_range: f32,
) -> usize {
    hostiles
        .into_iter()
        .filter(|pos| is_critical(pos, assets, threat_range))
        .count()
}

/// Score one hostile from the point of view of friendly `me`.
pub fn score_hostile(me: &DroneView, hostile: &DroneView, ctx: &ThreatContext) -> f32 {
    let weights = &ctx.config.threat;
    let mut score = 0.0;

    if is_critical(&hostile.position, ctx.assets, ctx.config.threat_range) {
        let priority = nearest_asset(&hostile.position, ctx.assets)
            .map(|(asset, _)| asset.priority)
            .unwrap_or(0.0);
        score += weights.critical_bonus + priority * weights.priority_weight;
    }

    if ctx.friendly_bombers_airborne() {
        // Friendly bombers take the hostile bombers; interceptors screen for them.
        match hostile.kind {
            DroneKind::Interceptor => score += weights.interceptor_bonus_with_bombers,
            DroneKind::Bomber => score -= weights.bomber_penalty_with_bombers,
        }
    } else if hostile.kind == DroneKind::Bomber {
        score += weights.bomber_bonus;
    }

    score += weights.ground_attack_bonus;

    let dist = me.distance_to(&hostile.position).max(1.0);
    score += weights.proximity_weight / dist;

    if ctx.communication {
        let already_targeting = ctx
            .friendlies
            .iter()
            .filter(|f| f.id != me.id && f.target == Some(hostile.id))
            .count();
        score -= already_targeting as f32 * weights.saturation_penalty;
    }

    score
}

/// Highest-scoring hostile; the first one wins a tie.
pub fn select_target<'h>(
    me: &DroneView,
    hostiles: &'h [DroneView],
    ctx: &ThreatContext,
) -> Option<&'h DroneView> {
    let mut best: Option<(&DroneView, f32)> = None;
    for hostile in hostiles.iter().filter(|h| h.health > 0.0) {
        let score = score_hostile(me, hostile, ctx);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((hostile, score));
        }
    }
    best.map(|(hostile, _)| hostile)
}

/// Decide whether `me` commits to `target`.
///
/// Critical targets are always engaged. Otherwise the drone engages when it is
/// already close, or when fewer than `engage_ratio` of the roster is on it.
pub fn decide_engagement(me: &DroneView, target: &DroneView, ctx: &ThreatContext) -> EngagementDecision {
    let config = ctx.config;
    if is_critical(&target.position, ctx.assets, config.threat_range) {
        return EngagementDecision::Engage;
    }

    if me.distance_to(&target.position) < config.engage_distance {
        return EngagementDecision::Engage;
    }

    let engaged = ctx
        .friendlies
        .iter()
        .filter(|f| f.id != me.id && f.engaging && f.target == Some(target.id))
        .count();

    if engaged < engagement_cap(config.engage_ratio, ctx.friendlies.len()) {
        EngagementDecision::Engage
    } else {
        EngagementDecision::Defend
    }
}

/// Most friendlies that may commit to one non-critical target: `ceil(ratio * roster)`.
///
/// The ratio is taken to a thousandth so the ceiling runs in integers.
pub fn engagement_cap(ratio: f32, roster_size: usize) -> usize {
    let per_mille = (ratio.max(0.0) * 1000.0).round() as u64;
    let roster = roster_size.max(1) as u64;
    ((per_mille * roster).div_ceil(1000)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    fn drone(id: u32, kind: DroneKind, x: f32, y: f32) -> DroneView {
        DroneView::new(Entity::from_raw(id), id, kind, Position::new(x, y))
    }

    fn asset(x: f32, y: f32, priority: f32) -> AssetView {
        AssetView {
            entity: Entity::from_raw(900),
            id: AssetId(0),
            position: Position::new(x, y),
            priority,
            health: 100.0,
        }
    }

    #[test]
    fn test_critical_hostile_outranks_closer_one() {
        let config = SimConfig::default();
        let me = drone(0, DroneKind::Interceptor, 0.0, 0.0);
        let friendlies = [me];
        let assets = [asset(500.0, 500.0, 2.0)];
        let ctx = ThreatContext {
            config: &config,
            friendlies: &friendlies,
            assets: &assets,
            communication: true,
        };
        let hostiles = [
            drone(1, DroneKind::Interceptor, 30.0, 0.0),
            drone(2, DroneKind::Interceptor, 480.0, 480.0),
        ];
        let picked = select_target(&me, &hostiles, &ctx).unwrap();
        assert_eq!(picked.id, DroneId(2));
    }

    #[test]
    fn test_bomber_preference_flips_with_friendly_bombers() {
        let config = SimConfig::default();
        let me = drone(0, DroneKind::Interceptor, 0.0, 0.0);
        let hostiles = [
            drone(1, DroneKind::Interceptor, 300.0, 0.0),
            drone(2, DroneKind::Bomber, 0.0, 300.0),
        ];

        let alone = [me];
        let ctx = ThreatContext {
            config: &config,
            friendlies: &alone,
            assets: &[],
            communication: true,
        };
        assert_eq!(select_target(&me, &hostiles, &ctx).unwrap().id, DroneId(2));

        let with_bomber = [me, drone(7, DroneKind::Bomber, 10.0, 10.0)];
        let ctx = ThreatContext {
            friendlies: &with_bomber,
            ..ctx
        };
        assert_eq!(select_target(&me, &hostiles, &ctx).unwrap().id, DroneId(1));
    }

    #[test]
    fn test_saturation_penalty_only_with_communication() {
        let config = SimConfig::default();
        let me = drone(0, DroneKind::Interceptor, 0.0, 0.0);
        let mut buddy = drone(1, DroneKind::Interceptor, 5.0, 0.0);
        buddy.target = Some(DroneId(10));
        let friendlies = [me, buddy];
        let hostile = drone(10, DroneKind::Interceptor, 100.0, 0.0);

        let on = ThreatContext {
            config: &config,
            friendlies: &friendlies,
            assets: &[],
            communication: true,
        };
        let off = ThreatContext {
            communication: false,
            ..on
        };
        let diff = score_hostile(&me, &hostile, &off) - score_hostile(&me, &hostile, &on);
        assert!((diff - config.threat.saturation_penalty).abs() < 0.001);
    }

    #[test]
    fn test_tie_resolves_to_first_in_roster() {
        let config = SimConfig::default();
        let me = drone(0, DroneKind::Interceptor, 0.0, 0.0);
        let friendlies = [me];
        let ctx = ThreatContext {
            config: &config,
            friendlies: &friendlies,
            assets: &[],
            communication: false,
        };
        let hostiles = [
            drone(4, DroneKind::Interceptor, 100.0, 0.0),
            drone(3, DroneKind::Interceptor, -100.0, 0.0),
        ];
        assert_eq!(select_target(&me, &hostiles, &ctx).unwrap().id, DroneId(4));
    }

    #[test]
    fn test_engagement_ratio_caps_non_critical_target() {
        let config = SimConfig::default();
        let target = drone(50, DroneKind::Interceptor, 1000.0, 0.0);
        let mut friendlies: Vec<DroneView> = (0..10)
            .map(|i| drone(i, DroneKind::Interceptor, 0.0, i as f32 * 10.0))
            .collect();
        for f in friendlies.iter_mut().take(3) {
            f.target = Some(target.id);
            f.engaging = true;
        }
        let ctx = ThreatContext {
            config: &config,
            friendlies: &friendlies,
            assets: &[],
            communication: true,
        };

        // Three of ten already on it: a fourth declines.
        assert_eq!(decide_engagement(&friendlies[5], &target, &ctx), EngagementDecision::Defend);
        // One of the three re-evaluating sees only two others.
        assert_eq!(decide_engagement(&friendlies[0], &target, &ctx), EngagementDecision::Engage);
    }

    #[test]
    fn test_critical_or_close_target_always_engaged() {
        let config = SimConfig::default();
        let mut friendlies: Vec<DroneView> = (0..10)
            .map(|i| drone(i, DroneKind::Interceptor, 0.0, 0.0))
            .collect();
        let critical = drone(60, DroneKind::Interceptor, 1000.0, 1000.0);
        for f in friendlies.iter_mut() {
            f.target = Some(critical.id);
            f.engaging = true;
        }
        let assets = [asset(1000.0, 1050.0, 1.0)];
        let ctx = ThreatContext {
            config: &config,
            friendlies: &friendlies,
            assets: &assets,
            communication: true,
        };
        assert_eq!(decide_engagement(&friendlies[9], &critical, &ctx), EngagementDecision::Engage);

        let close = drone(61, DroneKind::Interceptor, 50.0, 0.0);
        for f in friendlies.iter_mut() {
            f.target = Some(close.id);
        }
        let ctx = ThreatContext {
            config: &config,
            friendlies: &friendlies,
            assets: &[],
            communication: true,
        };
        assert_eq!(decide_engagement(&friendlies[9], &close, &ctx), EngagementDecision::Engage);
    }

    #[test]
    fn test_threats_in_range_count() {
        let assets = [asset(0.0, 0.0, 1.0)];
        let positions = [Position::new(10.0, 0.0), Position::new(500.0, 0.0), Position::new(0.0, 149.0)];
        assert_eq!(threats_in_range(positions.iter(), &assets, 150.0), 2);
        assert_eq!(threats_in_range(positions.iter(), &[], 150.0), 0);
    }

    #[test]
    fn test_engagement_cap_is_ratio_ceiling() {
        assert_eq!(engagement_cap(0.3, 10), 3);
        assert_eq!(engagement_cap(0.3, 12), 4);
        assert_eq!(engagement_cap(0.3, 1), 1);
        assert_eq!(engagement_cap(0.3, 0), 1);
        assert_eq!(engagement_cap(0.25, 3), 1);
    }

    #[test]
    fn test_engagement_cap_exact_on_large_rosters() {
        assert_eq!(engagement_cap(0.3, 100_000), 30_000);
        assert_eq!(engagement_cap(0.3, 1_000_001), 300_001);
        assert_eq!(engagement_cap(0.1, 10_000_000), 1_000_000);
        assert_eq!(engagement_cap(0.0, 50), 0);
    }
}
