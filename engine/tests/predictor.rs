mod common;

use teamforge_dex::BuildSource;
use teamforge_engine::{Engine, EngineError, Predictor};

const SPECIES: [&str; 5] = ["Garchomp", "Landorus-Therian", "Toxapex", "Greninja", "Lapras"];

#[test]
fn test_prediction_is_idempotent() {
    let dex = common::dex();
    let engine = Engine::new(&dex);
    let first = engine.predict(&SPECIES, "gen7ou").unwrap();
    let second = engine.predict(&SPECIES, "gen7ou").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), SPECIES.len());
}

#[test]
fn test_sources_and_fallbacks() {
    let dex = common::dex();
    let predicted = Predictor::new(&dex).predict_for_format(&SPECIES, "gen7ou").unwrap();

    assert!(matches!(predicted[0].source, Some(BuildSource::UsageStats { .. })));
    assert!(predicted[0].usage_weight.is_some());
    assert_eq!(predicted[1].source, Some(BuildSource::Analysis));
    assert_eq!(predicted[1].build.item.as_deref(), Some("choicescarf"));

    let greninja = &predicted[3];
    assert!(greninja.low_confidence);
    assert!(greninja.source.is_none());
    assert_eq!(greninja.build.evs.total(), 0);
    assert!(!greninja.build.moves.is_empty());
    assert!(greninja.build.moves.len() <= 4);
}

#[test]
fn test_predicted_in_input_order() {
    let dex = common::dex();
    let reversed: Vec<&str> = SPECIES.iter().rev().copied().collect();
    let predicted = Predictor::new(&dex).predict_for_format(&reversed, "gen7ou").unwrap();
    let ids: Vec<&str> = predicted.iter().map(|p| p.species()).collect();
    assert_eq!(ids, vec!["lapras", "greninja", "toxapex", "landorustherian", "garchomp"]);
}

#[test]
fn test_unknown_inputs() {
    let dex = common::dex();
    let engine = Engine::new(&dex);
    assert!(matches!(
        engine.predict(&["Garchomp"], "gen1ou").unwrap_err(),
        EngineError::MissingReferenceData(_)
    ));
    assert!(matches!(
        engine.predict(&["Missingno"], "gen7ou").unwrap_err(),
        EngineError::MissingReferenceData(_)
    ));
}
