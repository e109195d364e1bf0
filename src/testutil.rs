//! Shared fixtures for unit tests.

use crate::model::*;
use crate::scenario::Scenario;

/// Three companies over two sectors, two parties, and two segments that buy
/// in both sectors. No policies, day 0.
pub fn small_world() -> WorldState {
    let mut s = Scenario::new();
    s.company("Hearth Homes", Sector::Housing, 50.0).reputation(0.6);
    s.company("Brick & Beam", Sector::Housing, 40.0).reputation(0.4);
    s.company("Daily Bread", Sector::Food, 5.0).reputation(0.7);

    let gov = s
        .party("Civic Union", IdeologicalBias::CenterLeft)
        .popularity(0.35)
        .in_government(true)
        .id();
    let opp = s
        .party("Free Market League", IdeologicalBias::CenterRight)
        .popularity(0.3)
        .id();

    s.segment("Workers", 1_000, 200.0)
        .satisfaction(0.45)
        .propensity(Sector::Housing, 0.3)
        .propensity(Sector::Food, 0.2)
        .preferred_party(gov);
    s.segment("Owners", 100, 2_000.0)
        .satisfaction(0.65)
        .propensity(Sector::Housing, 0.2)
        .propensity(Sector::Food, 0.05)
        .preferred_party(opp);

    s.build()
}
