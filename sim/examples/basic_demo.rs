//! Basic demonstration of the swarm defense simulation.
//!
//! Run with: cargo run --example basic_demo
//! Set RUST_LOG=swarm_sim=debug to see casualties as they happen.

use swarm_sim::{Allegiance, Formation, ScenarioConfig, SimError, SimStatus, SimWorld};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SimError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Swarm Defense - Simulation Demo ===\n");

    let mut sim = SimWorld::new();
    sim.initialize(&ScenarioConfig {
        map: "city".to_string(),
        friendly_count: 12,
        hostile_count: 15,
        friendly_bomber_count: 1,
        hostile_bomber_count: 3,
        formation: Formation::Arrowhead,
    })?;

    println!("Initial state:");
    print_stats(&mut sim);

    // 60 ticks per second, ~30 seconds of engagement.
    for tick in 0..1800u32 {
        // Comms blackout between 10s and 15s.
        let communication = !(600..900).contains(&tick);
        sim.tick(communication, true);

        if tick == 300 {
            println!("\n--- Hostile reinforcements: one bomber ---\n");
            sim.add_bomber(Allegiance::Hostile);
        }

        if (tick + 1) % 300 == 0 {
            println!("--- Tick {} (comms {}) ---", sim.current_tick(), if communication { "up" } else { "down" });
            print_stats(&mut sim);
        }

        if sim.status() != SimStatus::Running {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(16));
    }

    println!("\n=== Final State (JSON) ===\n");
    println!("{}", sim.snapshot().to_json_pretty()?);
    Ok(())
}

fn print_stats(sim: &mut SimWorld) {
    let snapshot = sim.snapshot();

    println!(
        "  friendlies={} hostiles={} assets={} destroyed={}",
        snapshot.friendlies().count(),
        snapshot.hostiles().count(),
        snapshot.assets.len(),
        snapshot.destroyed_assets.len()
    );
    if let Some(stats) = &snapshot.stats {
        println!(
            "  engaged={} threats={} eliminated={} losses={} integrity={:.1}% status={:?}",
            stats.engaged_count,
            stats.threats_in_range,
            stats.eliminated_total,
            stats.friendly_losses,
            stats.integrity_percent,
            stats.status
        );
    }
    for asset in &snapshot.assets {
        println!("    {:<14} hp={:.0}/{:.0}", asset.label, asset.health, asset.health_max);
    }
}
