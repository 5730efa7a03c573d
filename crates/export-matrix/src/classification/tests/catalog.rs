use super::common::*;
use crate::classification::catalog::{CatalogError, CriterionCatalog};
use crate::classification::domain::{CriterionId, ScoreOption};

#[test]
fn standard_rubric_passes_validation() {
    let standard = CriterionCatalog::standard();
    let rebuilt = CriterionCatalog::new(standard.version(), standard.list_criteria().to_vec())
        .expect("standard rubric is valid");
    assert_eq!(rebuilt, standard);
}

#[test]
fn standard_rubric_has_documented_maxima() {
    let catalog = CriterionCatalog::standard();
    let maxima: Vec<u8> = catalog
        .list_criteria()
        .iter()
        .map(|criterion| criterion.maximum_score)
        .collect();

    assert_eq!(maxima, vec![3, 3, 2, 1, 2, 2, 1, 2, 2]);
    assert_eq!(catalog.maximum_possible_score(), 18);
}

#[test]
fn listing_order_follows_criterion_ids() {
    let catalog = CriterionCatalog::standard();
    let ids: Vec<CriterionId> = catalog.list_criteria().iter().map(|c| c.id).collect();
    assert_eq!(ids, CriterionId::ALL.to_vec());

    let again: Vec<CriterionId> = catalog.list_criteria().iter().map(|c| c.id).collect();
    assert_eq!(ids, again);
}

#[test]
fn every_standard_criterion_has_one_zero_baseline() {
    let catalog = CriterionCatalog::standard();
    for criterion in catalog.list_criteria() {
        let zeros = criterion.options.iter().filter(|o| o.score == 0).count();
        assert_eq!(zeros, 1, "criterion {} baseline", criterion.id);
        let baseline = catalog.baseline_for(criterion.id).expect("baseline");
        assert_eq!(baseline.score, 0);
    }
}

#[test]
fn get_criterion_returns_definition() {
    let catalog = CriterionCatalog::standard();
    let criterion = catalog
        .get_criterion(CriterionId::MercadosDestino)
        .expect("criterion exists");
    assert_eq!(criterion.name, "Mercados de destino identificados");
    assert!(criterion.has_option("≥2"));
}

#[test]
fn baseline_prefers_configured_default() {
    let mut criteria = criteria_with(
        CriterionId::Certificaciones,
        vec![
            ScoreOption::new("Ninguna", 0),
            ScoreOption::new("Vencida", 0),
            ScoreOption::new("Sí", 2),
        ],
    );
    for criterion in &mut criteria {
        if criterion.id == CriterionId::Certificaciones {
            criterion.default_option = Some("Vencida".to_string());
        }
    }
    let catalog = CriterionCatalog::new("custom", criteria).expect("valid rubric");

    let baseline = catalog
        .baseline_for(CriterionId::Certificaciones)
        .expect("default configured");
    assert_eq!(baseline.label, "Vencida");
}

#[test]
fn baseline_is_ambiguous_with_two_zero_options() {
    let criteria = criteria_with(
        CriterionId::Certificaciones,
        vec![
            ScoreOption::new("Ninguna", 0),
            ScoreOption::new("Vencida", 0),
            ScoreOption::new("Sí", 2),
        ],
    );
    let catalog = CriterionCatalog::new("custom", criteria).expect("loads despite ambiguity");

    let result = catalog.baseline_for(CriterionId::Certificaciones);
    assert!(matches!(
        result,
        Err(CatalogError::AmbiguousBaseline(CriterionId::Certificaciones))
    ));
}

#[test]
fn baseline_falls_back_to_first_option_without_zero() {
    let criteria = criteria_with(
        CriterionId::ParticipacionFerias,
        vec![ScoreOption::new("Regional", 1), ScoreOption::new("Internacional", 2)],
    );
    let catalog = CriterionCatalog::new("custom", criteria).expect("valid rubric");

    let baseline = catalog
        .baseline_for(CriterionId::ParticipacionFerias)
        .expect("first option");
    assert_eq!(baseline.label, "Regional");
}

#[test]
fn rejects_empty_rubric() {
    let result = CriterionCatalog::new("empty", Vec::new());
    assert!(matches!(result, Err(CatalogError::Invalid(_))));
}

#[test]
fn rejects_duplicate_and_missing_criteria() {
    let mut criteria = CriterionCatalog::standard().list_criteria().to_vec();
    let first = criteria[0].clone();
    criteria.push(first);
    match CriterionCatalog::new("dup", criteria) {
        Err(CatalogError::Invalid(message)) => assert!(message.contains("defined twice")),
        other => panic!("expected duplicate rejection, got {other:?}"),
    }

    let mut criteria = CriterionCatalog::standard().list_criteria().to_vec();
    criteria.pop();
    match CriterionCatalog::new("short", criteria) {
        Err(CatalogError::Invalid(message)) => assert!(message.contains("estudio-mercado")),
        other => panic!("expected missing criterion rejection, got {other:?}"),
    }
}

#[test]
fn rejects_maximum_that_disagrees_with_options() {
    let mut criteria = CriterionCatalog::standard().list_criteria().to_vec();
    criteria[3].maximum_score = 2;
    match CriterionCatalog::new("bad-max", criteria) {
        Err(CatalogError::Invalid(message)) => assert!(message.contains("declares maximum")),
        other => panic!("expected maximum mismatch, got {other:?}"),
    }

    let mut criteria = CriterionCatalog::standard().list_criteria().to_vec();
    criteria[3].options.push(ScoreOption::new("Varios", 4));
    match CriterionCatalog::new("over-max", criteria) {
        Err(CatalogError::Invalid(message)) => assert!(message.contains("above the maximum")),
        other => panic!("expected option over maximum, got {other:?}"),
    }
}

#[test]
fn rejects_repeated_labels_and_unknown_default() {
    let criteria = criteria_with(
        CriterionId::SitioWebMultilingue,
        vec![ScoreOption::new("No", 0), ScoreOption::new("No", 1)],
    );
    assert!(matches!(
        CriterionCatalog::new("labels", criteria),
        Err(CatalogError::Invalid(_))
    ));

    let mut criteria = CriterionCatalog::standard().list_criteria().to_vec();
    criteria[0].default_option = Some("Tal vez".to_string());
    assert!(matches!(
        CriterionCatalog::new("default", criteria),
        Err(CatalogError::Invalid(_))
    ));
}

#[test]
fn loads_rubric_documents_from_json() {
    let standard = CriterionCatalog::standard();
    let document = serde_json::json!({
        "version": "matriz-2025.0",
        "criteria": standard.list_criteria(),
    });

    let catalog = CriterionCatalog::from_json_str(&document.to_string()).expect("parses");

    assert_eq!(catalog.version(), "matriz-2025.0");
    assert_eq!(catalog.list_criteria(), standard.list_criteria());
}

#[test]
fn json_with_unknown_criterion_key_is_a_parse_error() {
    let raw = r#"{"version":"x","criteria":[{"id":"volumen-ventas","name":"Ventas","maximum_score":1,"options":[{"label":"No","score":0},{"label":"Sí","score":1}]}]}"#;
    assert!(matches!(
        CriterionCatalog::from_json_str(raw),
        Err(CatalogError::Parse(_))
    ));
}

#[test]
fn loads_rubric_from_file() {
    let standard = CriterionCatalog::standard();
    let document = serde_json::json!({
        "version": "matriz-file",
        "criteria": standard.list_criteria(),
    });
    let path = std::env::temp_dir().join(format!("rubric-{}.json", std::process::id()));
    std::fs::write(&path, document.to_string()).expect("write rubric");

    let catalog = CriterionCatalog::from_path(&path).expect("loads from disk");
    std::fs::remove_file(&path).ok();

    assert_eq!(catalog.version(), "matriz-file");
    assert_eq!(catalog.maximum_possible_score(), 18);
}

#[test]
fn load_without_path_uses_standard_rubric() {
    let catalog =
        CriterionCatalog::load(&crate::config::RubricConfig::default()).expect("standard");
    assert_eq!(catalog, CriterionCatalog::standard());
}
