//! The canonical starting world: eight companies across the six named
//! sectors, four parties with the center-left in government, and four
//! income classes.

use crate::model::{CitizenSegment, Company, IdeologicalBias, Party, Sector, WorldState};

/// How each class splits its consumption across sectors. Scaled by the
/// class's overall consumption rate.
const SECTOR_MIX: [(Sector, f64); 6] = [
    (Sector::Housing, 0.30),
    (Sector::Food, 0.25),
    (Sector::Healthcare, 0.15),
    (Sector::Technology, 0.12),
    (Sector::Finance, 0.10),
    (Sector::Construction, 0.08),
];

struct CompanySeed {
    name: &'static str,
    sector: Sector,
    quality: f64,
    price: f64,
    reputation: f64,
    share_price: f64,
    cash: f64,
}

const COMPANIES: [CompanySeed; 8] = [
    CompanySeed { name: "InmoHogar", sector: Sector::Housing, quality: 0.7, price: 0.6, reputation: 0.55, share_price: 120.0, cash: 2_000_000.0 },
    CompanySeed { name: "AlimentosFrescos", sector: Sector::Food, quality: 0.8, price: 0.4, reputation: 0.60, share_price: 80.0, cash: 1_500_000.0 },
    CompanySeed { name: "SuperEconómico", sector: Sector::Food, quality: 0.5, price: 0.2, reputation: 0.45, share_price: 50.0, cash: 800_000.0 },
    CompanySeed { name: "TechInnovadora", sector: Sector::Technology, quality: 0.9, price: 0.8, reputation: 0.70, share_price: 200.0, cash: 5_000_000.0 },
    CompanySeed { name: "SoftwareSoluciones", sector: Sector::Technology, quality: 0.7, price: 0.5, reputation: 0.50, share_price: 90.0, cash: 1_200_000.0 },
    CompanySeed { name: "ConstruyeMás", sector: Sector::Construction, quality: 0.6, price: 0.5, reputation: 0.48, share_price: 75.0, cash: 1_800_000.0 },
    CompanySeed { name: "SaludTotal", sector: Sector::Healthcare, quality: 0.85, price: 0.7, reputation: 0.65, share_price: 150.0, cash: 3_000_000.0 },
    CompanySeed { name: "BancoSeguro", sector: Sector::Finance, quality: 0.75, price: 0.6, reputation: 0.55, share_price: 180.0, cash: 10_000_000.0 },
];

/// Build the default world. Day 0, no policies, no history.
pub fn default_world() -> WorldState {
    let mut world = WorldState::new();

    for seed in COMPANIES {
        world.add_company(
            Company::new(seed.name, seed.sector, seed.quality, seed.price)
                .with_reputation(seed.reputation)
                .with_share_price(seed.share_price)
                .with_cash(seed.cash),
        );
    }

    let left = world.add_party(
        Party::new("Partido Progresista", IdeologicalBias::Left)
            .with_popularity(0.22)
            .with_reputation(0.52),
    );
    let center_left = world.add_party(
        Party::new("Partido Socialdemócrata", IdeologicalBias::CenterLeft)
            .with_popularity(0.28)
            .with_reputation(0.55)
            .in_government(true),
    );
    let center_right = world.add_party(
        Party::new("Partido Liberal", IdeologicalBias::CenterRight)
            .with_popularity(0.25)
            .with_reputation(0.50),
    );
    world.add_party(
        Party::new("Partido Conservador", IdeologicalBias::Right)
            .with_popularity(0.20)
            .with_reputation(0.48),
    );

    let classes = [
        ("Clase Alta", 500_000, 200_000.0, 0.70, IdeologicalBias::CenterRight, center_right, 0.15),
        ("Clase Media", 3_000_000, 50_000.0, 0.55, IdeologicalBias::Center, center_left, 0.10),
        ("Clase Trabajadora", 5_000_000, 20_000.0, 0.45, IdeologicalBias::CenterLeft, center_left, 0.08),
        ("Desempleados y Precarios", 1_500_000, 5_000.0, 0.30, IdeologicalBias::Left, left, 0.05),
    ];
    for (name, size, wealth, satisfaction, bias, party, consumption) in classes {
        let mut segment = CitizenSegment::new(name, size, wealth)
            .with_satisfaction(satisfaction)
            .with_ideology(bias, 1.0);
        for (sector, share) in SECTOR_MIX {
            segment = segment.with_propensity(sector, share * consumption);
        }
        segment.preferred_party = Some(party);
        world.add_segment(segment);
    }

    world
}
