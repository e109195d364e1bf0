use society_sim::sim::{Engine, RandomEventGenerator};
use society_sim::worldgen::default_world;
use society_sim::{EngineConfig, GeneratorConfig};

fn main() {
    let engine = Engine::new(EngineConfig::default()).expect("default config is valid");
    let mut generator =
        RandomEventGenerator::new(GeneratorConfig::with_seed(42)).expect("default config is valid");
    let mut world = default_world();

    let summaries = match engine.run(&mut world, 30, &mut generator) {
        Ok(summaries) => summaries,
        Err(err) => {
            eprintln!("simulation halted: {err}");
            std::process::exit(1);
        }
    };

    for s in &summaries {
        eprintln!(
            "Day {:>3}: events={} policies={} revenue={:.0} share_price={:.2} satisfaction={:.3}",
            s.day, s.events_count, s.active_policies_count, s.total_revenue, s.mean_share_price,
            s.mean_satisfaction
        );
    }

    // Final standings
    if let Some(last) = summaries.last() {
        for p in &last.parties {
            eprintln!("Party {} ({}): popularity={:.3} reputation={:.3}", p.party_id, p.name, p.popularity, p.reputation);
        }
        for c in &last.top_companies {
            eprintln!("Company {} ({}): revenue={:.0} reputation={:.3} share={:.2}", c.company_id, c.name, c.revenue, c.reputation, c.share_price);
        }
    }

    let retired = world.retired_policies.len();
    eprintln!("Policies: active={} retired={}", world.active_policies.len(), retired);
}
