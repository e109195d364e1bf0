mod common;

use common::duopoly;
use society_sim::model::*;
use society_sim::scenario::Scenario;
use society_sim::sim::{NullEventGenerator, ScriptedEventGenerator, simulate_day};
use society_sim::{SimError, run};

#[test]
fn sole_supplier_sells_whole_budget() {
    let mut s = Scenario::new();
    let c = s.company("Solo", Sector::Food, 10.0).reputation(0.5).id();
    s.segment("Everyone", 1_000, 100.0).propensity(Sector::Food, 1.0);
    let mut world = s.build();

    let summary = simulate_day(&mut world, 1, &mut NullEventGenerator).unwrap();
    let company = world.company(c).unwrap();
    assert!((company.last_day_units_sold - 10_000.0).abs() < 1e-6);
    assert!((company.last_day_revenue - 100_000.0).abs() < 1e-6);
    assert!((summary.total_revenue - 100_000.0).abs() < 1e-6);
    // share 1 == fair share 1
    assert_eq!(company.reputation, 0.5);
}

#[test]
fn better_reputation_wins_the_market() {
    let (mut world, x, y) = duopoly(0.8, 0.2);
    simulate_day(&mut world, 1, &mut NullEventGenerator).unwrap();

    let (cx, cy) = (world.company(x).unwrap(), world.company(y).unwrap());
    assert!(cx.last_day_revenue > cy.last_day_revenue);
    assert!((cx.last_day_revenue - 80_000.0).abs() < 1e-6);
    assert!(cx.reputation >= 0.8);
    assert!(cy.reputation <= 0.2);
    assert!((cx.reputation - 0.815).abs() < 1e-9);
}

#[test]
fn proposed_policy_lives_through_its_expiry_day() {
    let mut s = Scenario::new();
    let shop = s.company("Shop", Sector::Housing, 20.0).id();
    s.segment("Renters", 100, 50.0).propensity(Sector::Housing, 0.4);
    let party = s.party("Tenants First", IdeologicalBias::Left).id();
    let mut world = s.build();

    let proposal = Event::new(1, EventKind::PolicyProposal, "Rent cap announced").with_proposal(
        PolicyProposal {
            name: "Rent cap".to_string(),
            sponsor: party,
            target: PolicyTarget::Sector(Sector::Housing),
            kind: PolicyKind::PriceCap,
            magnitude: 0.25,
            duration_days: Some(5),
        },
    );
    let mut generator = ScriptedEventGenerator::new().with_event(proposal);

    for day in 1..=5 {
        let summary = simulate_day(&mut world, day, &mut generator).unwrap();
        assert_eq!(summary.active_policies_count, 1, "day {day}");
    }
    assert_eq!(world.active_policies[0].expiry_day, Some(5));
    // capped price 15 for the whole window
    assert!((world.company(shop).unwrap().last_day_units_sold - 2_000.0 / 15.0).abs() < 1e-9);

    let summary = simulate_day(&mut world, 6, &mut generator).unwrap();
    assert_eq!(summary.active_policies_count, 0);
    assert!(world.active_policies.is_empty());
    assert_eq!(world.retired_policies.len(), 1);
    assert!(!world.party(party).unwrap().policies.contains(&world.retired_policies[0].id));
    assert!((world.company(shop).unwrap().last_day_units_sold - 100.0).abs() < 1e-9);
}

#[test]
fn silent_generator_still_produces_every_day() {
    let (mut world, _, _) = duopoly(0.5, 0.5);
    let summaries = run(&mut world, 30, &mut NullEventGenerator).unwrap();
    assert_eq!(summaries.len(), 30);
    assert!(summaries.iter().all(|s| s.events_count == 0));
    assert_eq!(world.history, summaries);
}

#[test]
fn generator_outage_is_not_fatal() {
    let (mut world, x, _) = duopoly(0.5, 0.5);
    let mut generator = ScriptedEventGenerator::new()
        .with_event(
            Event::new(2, EventKind::CompanyImpact, "Lost shipment")
                .with_effect(EventTarget::Company(x), -0.2),
        )
        .failing_on(1)
        .failing_on(2);
    let summaries = run(&mut world, 3, &mut generator).unwrap();
    assert_eq!(summaries.len(), 3);
    assert!(summaries.iter().all(|s| s.events_count == 0));
}

#[test]
fn scandal_hits_party_and_shifts_mood() {
    let mut s = Scenario::new();
    let party = s
        .party("Old Guard", IdeologicalBias::Right)
        .popularity(0.5)
        .reputation(0.5)
        .id();
    let mut world = s.build();
    let mut generator = ScriptedEventGenerator::new().with_event(
        Event::new(1, EventKind::PartyScandal, "Slush fund exposed")
            .with_effect(EventTarget::Party(party), 0.1),
    );
    let summary = simulate_day(&mut world, 1, &mut generator).unwrap();
    assert!((summary.parties[0].reputation - 0.4).abs() < 1e-12);
    assert!((summary.parties[0].popularity - 0.4).abs() < 1e-12);
    assert_eq!(summary.events_count, 1);
}

#[test]
fn empty_sector_event_is_absorbed() {
    let (mut world, x, y) = duopoly(0.5, 0.5);
    let mut generator = ScriptedEventGenerator::new().with_event(
        Event::new(1, EventKind::SectorImpact, "Bank run")
            .with_effect(EventTarget::Sector(Sector::Finance), -0.5),
    );
    simulate_day(&mut world, 1, &mut generator).unwrap();
    assert_eq!(world.company(x).unwrap().reputation, 0.5);
    assert_eq!(world.company(y).unwrap().reputation, 0.5);
}

#[test]
fn revoked_policy_stops_applying() {
    let mut s = Scenario::new();
    let shop = s.company("Shop", Sector::Food, 10.0).id();
    s.segment("Everyone", 10, 100.0).propensity(Sector::Food, 1.0);
    let party = s.party("Greens", IdeologicalBias::CenterLeft).id();
    let policy = s.policy(party, PolicyTarget::Company(shop), PolicyKind::Tax, 0.2, 1, None);
    let mut world = s.build();

    simulate_day(&mut world, 1, &mut NullEventGenerator).unwrap();
    assert!((world.company(shop).unwrap().last_day_revenue - 800.0).abs() < 1e-9);

    let mut generator = ScriptedEventGenerator::new().with_event(
        Event::new(2, EventKind::PolicyRevocation, "Tax repealed")
            .with_target(EventTarget::Policy(policy)),
    );
    simulate_day(&mut world, 2, &mut generator).unwrap();
    assert!((world.company(shop).unwrap().last_day_revenue - 1_000.0).abs() < 1e-9);
    assert_eq!(world.retired_policies[0].revoked_day, Some(2));
}

#[test]
fn replaying_a_day_is_rejected() {
    let (mut world, _, _) = duopoly(0.5, 0.5);
    simulate_day(&mut world, 1, &mut NullEventGenerator).unwrap();
    let err = simulate_day(&mut world, 1, &mut NullEventGenerator).unwrap_err();
    assert!(matches!(err, SimError::DayOutOfOrder { requested: 1, last: 1 }));
    assert!(err.is_fatal());
}
