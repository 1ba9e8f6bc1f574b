//! End-to-end pipeline tests: CSV catalog in, recommendations out.

use std::io::Write;

use tagrec_core::dataset::{build_interactions, Catalog};
use tagrec_core::pipeline::train_from_catalog;
use tagrec_core::recommend::recommend_for_tags;
use tagrec_core::train::{TrainConfig, Trainer};

const CSV: &str = "\
recipe_id,name,tags,calories,img_url
r01,Kimchi Stew,\"spicy,soup\",480,http://img/r01
r02,Tofu Soup,\"soup|mild\",320,http://img/r02
r03,Bulgogi,\"savory,beef\",610,http://img/r03
r04,Bibimbap,\"rice/spicy\",550,http://img/r04
r05,Bingsu,\"sweet,dessert\",410,http://img/r05
r06,Hotteok,\"sweet,snack\",390,http://img/r06
r07,Plain Rice,,130,http://img/r07
r08,Ramyeon,\"spicy,soup,noodle\",520,http://img/r08
";

fn load_fixture() -> Catalog {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CSV.as_bytes()).unwrap();
    file.flush().unwrap();
    Catalog::load_csv(file.path()).unwrap()
}

fn small_trainer(epochs: usize) -> Trainer {
    Trainer::new(TrainConfig {
        epochs,
        batch_size: 4,
        embed_dim: 8,
        val_fraction: 0.1,
        eval_ks: vec![1, 3],
        ..TrainConfig::default()
    })
    .unwrap()
}

#[test]
fn test_catalog_mixed_separators_and_dropped_rows() {
    let catalog = load_fixture();
    assert_eq!(catalog.recipes().len(), 7);
    assert_eq!(catalog.dropped_untagged(), 1);

    let r02 = catalog.find("r02").unwrap();
    assert_eq!(r02.tag_list, vec!["soup", "mild"]);
    let r04 = catalog.find("r04").unwrap();
    assert_eq!(r04.tag_list, vec!["rice", "spicy"]);
}

#[test]
fn test_interaction_expansion_counts() {
    let catalog = load_fixture();
    let interactions = build_interactions(&catalog);

    // 2+2+2+2+2+2+3 tags over the 7 retained recipes.
    assert_eq!(interactions.len(), 15);
    assert!(interactions
        .iter()
        .all(|p| p.user_id.starts_with("tag::")));
}

#[test]
fn test_data_preparation_is_deterministic() {
    let a = load_fixture();
    let b = load_fixture();

    let pairs_a = build_interactions(&a);
    let pairs_b = build_interactions(&b);
    assert_eq!(pairs_a, pairs_b);

    let run_a = train_from_catalog(&a, &small_trainer(1)).unwrap();
    let run_b = train_from_catalog(&b, &small_trainer(1)).unwrap();
    assert_eq!(
        run_a.model.item_tower().vocab().ids(),
        run_b.model.item_tower().vocab().ids()
    );
    assert_eq!(run_a.train_count, run_b.train_count);
}

#[test]
fn test_full_pipeline_recommends() {
    let catalog = load_fixture();
    let run = train_from_catalog(&catalog, &small_trainer(10)).unwrap();

    let tags = vec!["spicy".to_string(), "soup".to_string()];
    let results = recommend_for_tags(&run.model, &catalog, &tags, 5).unwrap();

    assert_eq!(results.len(), 5);
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    // Every result joins back to a real catalog record.
    for rec in &results {
        let source = catalog.find(&rec.recipe_id).unwrap();
        assert_eq!(source.name, rec.name);
        assert_eq!(source.tags, rec.tags);
    }
}

#[test]
fn test_training_separates_tag_groups() {
    let catalog = load_fixture();
    let run = train_from_catalog(&catalog, &small_trainer(40)).unwrap();

    // After enough epochs the sweet recipes should dominate a sweet query.
    let results =
        recommend_for_tags(&run.model, &catalog, &[String::from("sweet")], 2).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.recipe_id.as_str()).collect();
    assert!(
        ids.contains(&"r05") || ids.contains(&"r06"),
        "sweet recipes should rank high, got {ids:?}"
    );
}

#[test]
fn test_top_k_exceeding_catalog_returns_all() {
    let catalog = load_fixture();
    let run = train_from_catalog(&catalog, &small_trainer(1)).unwrap();

    let results =
        recommend_for_tags(&run.model, &catalog, &[String::from("spicy")], 999).unwrap();
    assert_eq!(results.len(), catalog.recipes().len());
}

#[test]
fn test_artifact_roundtrip_preserves_recommendations() {
    let catalog = load_fixture();
    let run = train_from_catalog(&catalog, &small_trainer(3)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.tagrec");
    run.model.save(&path).unwrap();
    let loaded = tagrec_core::TwoTowerModel::load(&path).unwrap();

    let tags = vec!["spicy".to_string()];
    let before = recommend_for_tags(&run.model, &catalog, &tags, 4).unwrap();
    let after = recommend_for_tags(&loaded, &catalog, &tags, 4).unwrap();
    assert_eq!(before, after);
}
