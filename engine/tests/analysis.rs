mod common;

use teamforge_engine::{Engine, Role, Side};

#[test]
fn test_matchup_from_pastes() {
    let dex = common::dex();
    let engine = Engine::new(&dex);
    let ours = common::roster(&dex, common::OU_PASTE);
    let theirs = common::roster(&dex, common::OPPONENT_PASTE);

    let report = engine.analyze(&ours, &theirs).unwrap();
    assert_eq!(report.pairs.len(), 2 * 6 * 6);
    assert_eq!(report.side(Side::User).count(), 6);
    assert_eq!(report.side(Side::Opponent).count(), 6);
    assert!(report.speed_order.windows(2).all(|w| w[0].speed >= w[1].speed));
    assert_eq!(report.speed_order[0].species, "landorustherian");
    assert!(report.threats.iter().all(|t| t.probability > 0.0));

    // Swapping sides mirrors every pair
    let mirrored = engine.analyze(&theirs, &ours).unwrap();
    for pair in &report.pairs {
        let other = mirrored.pair(pair.side.other(), pair.attacker, pair.defender).unwrap();
        assert_eq!(other.attacker_species, pair.attacker_species);
        assert_eq!(other.best, pair.best);
    }

    let plan = engine.generate_strategy(&report);
    assert_eq!(plan.lead, engine.suggest_lead(&report));
    assert!(plan.lead.as_deref().is_some_and(|lead| ours.contains_species(lead)));
}

#[test]
fn test_synergy_and_recommendations_from_pastes() {
    let dex = common::dex();
    let engine = Engine::new(&dex);
    let ours = common::roster(&dex, common::OU_PASTE);
    let theirs = common::roster(&dex, common::OPPONENT_PASTE);

    let synergy = engine.analyze_synergy(&ours).unwrap();
    assert_eq!(synergy.role_count(Role::HazardSetter), 1);

    let garchomp = ours.get(0).unwrap();
    let moves = engine.recommend_moves(garchomp, &theirs, Some("gen7ou")).unwrap();
    assert!(moves.ranked.iter().all(|m| m.move_id != "fissure"));
    assert!(moves.top(3).count() <= 3);

    let items = engine
        .recommend_items(garchomp, &["Leftovers", "Choice Scarf", "King's Rock"], &theirs, Some("gen7ou"))
        .unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.windows(2).all(|w| w[0].total >= w[1].total));
}
