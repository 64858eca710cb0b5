use pathmap::content::{ContentParser, DefaultContentParser};
use pathmap::relations::{change_is_polymorphic_list, collect, CollectContext};
use pathmap::{EngineConfig, MappingConfig, PathPointer};
use pathmap_test_utils::load_fixture_json;

fn events() -> (MappingConfig, serde_json::Value) {
    let config: MappingConfig = load_fixture_json("configs/events.json").expect("fixture config");
    let sample = DefaultContentParser::default()
        .parse_sample(&config)
        .expect("sample");
    (config, sample)
}

#[test]
fn naive_resolution_points_at_first_element() {
    let (mut config, _) = events();
    let relations = collect(&mut config, &CollectContext::default());
    let pointers: Vec<_> = relations.iter().filter_map(|r| r.json_path()).collect();
    assert_eq!(
        pointers,
        vec!["events/0/code", "events/0/kind", "events/0/x", "events/0/y"]
    );
}

#[test]
fn enabling_groups_fields_of_the_same_element() {
    let (mut config, sample) = events();
    change_is_polymorphic_list(&mut config, 0, true, &sample, &EngineConfig::default());

    let entity = &config.entity_mappings[0];
    assert!(entity.is_polymorphic_list);
    assert_eq!(
        entity.cobi_paths_relations,
        vec![
            PathPointer::new("events/1/code", "events/*/code", "errors.[*].code"),
            PathPointer::new("events/1/kind", "events/*/kind", "errors.[*].kind"),
            PathPointer::new("events/0/x", "events/*/x", "points.[*].x"),
            PathPointer::new("events/0/y", "events/*/y", "points.[*].y"),
        ]
    );

    let relations = collect(&mut config, &CollectContext::default());
    assert_eq!(relations[0].json_path(), Some("events/1/code"));
}

#[test]
fn disabling_keeps_distinct_patterns() {
    let (mut config, sample) = events();
    let engine = EngineConfig::default();
    change_is_polymorphic_list(&mut config, 0, true, &sample, &engine);
    let enabled = config.entity_mappings[0].cobi_paths_relations.clone();

    change_is_polymorphic_list(&mut config, 0, false, &sample, &engine);
    let entity = &config.entity_mappings[0];
    assert!(!entity.is_polymorphic_list);
    assert_eq!(entity.cobi_paths_relations, enabled);
}

#[test]
fn search_limit_falls_back_to_first_elements() {
    let (config, _) = events();
    let sample: serde_json::Value =
        load_fixture_json("samples/events-repeated.json").expect("fixture sample");
    let pointers = |engine: &EngineConfig| -> Vec<String> {
        let mut config = config.clone();
        change_is_polymorphic_list(&mut config, 0, true, &sample, engine);
        config.entity_mappings[0]
            .cobi_paths_relations
            .iter()
            .map(|entry| entry.json_path.clone())
            .collect()
    };

    assert_eq!(
        pointers(&EngineConfig::default()),
        vec!["events/1/code", "events/1/kind", "events/0/x", "events/0/y"]
    );

    let limited = EngineConfig {
        max_search_matches: 1,
        ..EngineConfig::default()
    };
    assert_eq!(
        pointers(&limited),
        vec!["events/0/code", "events/0/kind", "events/0/x", "events/0/y"]
    );
}
