#![allow(dead_code)]

use society_sim::model::*;
use society_sim::scenario::Scenario;

/// Two competitors in one sector, one segment spending everything there.
pub fn duopoly(rep_x: f64, rep_y: f64) -> (WorldState, u64, u64) {
    let mut s = Scenario::new();
    let x = s.company("X", Sector::Food, 10.0).reputation(rep_x).id();
    let y = s.company("Y", Sector::Food, 10.0).reputation(rep_y).id();
    s.segment("Everyone", 1_000, 100.0).propensity(Sector::Food, 1.0);
    s.party("Civic Union", IdeologicalBias::Center).popularity(0.4);
    (s.build(), x, y)
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Assert every bounded attribute is in range.
pub fn assert_bounded(world: &WorldState) {
    for c in world.companies.values() {
        assert!((0.0..=1.0).contains(&c.reputation), "{} reputation {}", c.name, c.reputation);
        assert!(c.share_price > 0.0, "{} share price {}", c.name, c.share_price);
    }
    for p in world.parties.values() {
        assert!((0.0..=1.0).contains(&p.popularity), "{} popularity {}", p.name, p.popularity);
        assert!((0.0..=1.0).contains(&p.reputation), "{} reputation {}", p.name, p.reputation);
    }
    for s in world.segments.values() {
        assert!(
            (0.0..=1.0).contains(&s.satisfaction),
            "{} satisfaction {}",
            s.name,
            s.satisfaction
        );
    }
}
