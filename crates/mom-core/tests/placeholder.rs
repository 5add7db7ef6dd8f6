use mom_core::models::placeholder::{
    ABSENT, DEPT, END_TIME, NOTES, PlaceholderKind, REQUIRED_KEYS, ReplacementValue, Replacements,
    START_TIME,
};

fn kind_of(replacements: &Replacements, key: &str) -> PlaceholderKind {
    replacements
        .iter()
        .find(|(p, _)| p.key() == key)
        .map(|(p, _)| p.kind())
        .expect("key should be present")
}

#[test]
fn kinds_resolve_from_key_and_value_shape() {
    let replacements = Replacements::new()
        .with(DEPT, "Design Team")
        .with(START_TIME, "2:00 PM")
        .with(END_TIME, "4:00 PM")
        .with(ABSENT, ["Anurag", "Tarun"])
        .with(NOTES, ["Submit your report by 5 PM."]);

    assert_eq!(kind_of(&replacements, DEPT), PlaceholderKind::Scalar);
    assert_eq!(kind_of(&replacements, START_TIME), PlaceholderKind::TimeRange);
    assert_eq!(kind_of(&replacements, END_TIME), PlaceholderKind::TimeRange);
    assert_eq!(kind_of(&replacements, ABSENT), PlaceholderKind::BoldList);
    assert_eq!(kind_of(&replacements, NOTES), PlaceholderKind::BulletList);
}

#[test]
fn bullet_key_with_single_string_is_scalar() {
    let replacements = Replacements::new().with(NOTES, "just one line");
    assert_eq!(kind_of(&replacements, NOTES), PlaceholderKind::Scalar);
}

#[test]
fn insert_overwrites_in_place_and_re_resolves() {
    let mut replacements = Replacements::new().with(DEPT, "a").with(ABSENT, "Tarun");
    assert_eq!(kind_of(&replacements, ABSENT), PlaceholderKind::Scalar);

    replacements.insert(DEPT, "b");
    replacements.insert(ABSENT, ["Tarun", "Akshat"]);

    let keys: Vec<&str> = replacements.iter().map(|(p, _)| p.key()).collect();
    assert_eq!(keys, vec![DEPT, ABSENT]);
    assert_eq!(replacements.get(DEPT), Some(&ReplacementValue::from("b")));
    assert_eq!(kind_of(&replacements, ABSENT), PlaceholderKind::BoldList);
}

#[test]
fn missing_keys_reports_absent_required_keys() {
    assert_eq!(Replacements::new().missing_keys(), REQUIRED_KEYS.to_vec());

    let partial = Replacements::new().with(DEPT, "x").with(NOTES, ["y"]);
    let missing = partial.missing_keys();
    assert_eq!(missing.len(), 5);
    assert!(!missing.contains(&DEPT));
    assert!(!missing.contains(&NOTES));
    assert!(missing.contains(&START_TIME));
}

#[test]
fn time_range_tolerates_missing_values() {
    let both = Replacements::new()
        .with(START_TIME, "2:00 PM")
        .with(END_TIME, "4:00 PM");
    assert_eq!(both.time_range(), "2:00 PM - 4:00 PM");

    let start_only = Replacements::new().with(START_TIME, "09:30");
    assert_eq!(start_only.time_range(), "09:30 - ");
}

#[test]
fn json_map_keeps_document_order() {
    let json = r#"{"{abs}": ["Anurag", "Tarun"], "{dept}": "Design Team", "{_}": ["one"]}"#;
    let replacements: Replacements = serde_json::from_str(json).unwrap();

    let keys: Vec<&str> = replacements.iter().map(|(p, _)| p.key()).collect();
    assert_eq!(keys, vec![ABSENT, DEPT, NOTES]);
    assert_eq!(
        replacements.get(ABSENT),
        Some(&ReplacementValue::List(vec![
            "Anurag".to_string(),
            "Tarun".to_string()
        ]))
    );

    let back = serde_json::to_string(&replacements).unwrap();
    assert!(back.starts_with(r#"{"{abs}":["Anurag","Tarun"]"#));
}

#[test]
fn json_rejects_non_string_values() {
    let json = r#"{"{dept}": 42}"#;
    assert!(serde_json::from_str::<Replacements>(json).is_err());
}
