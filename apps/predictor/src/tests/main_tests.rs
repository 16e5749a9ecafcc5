use super::*;

#[test]
fn field_flags_split_on_first_equals() {
    assert_eq!(
        parse_field("description=a=b").expect("field"),
        ("description".to_string(), "a=b".to_string())
    );
    assert!(parse_field("no-separator").is_err());
    assert!(parse_field(" =value").is_err());
}

#[test]
fn predict_args_parse_into_ordered_entries() {
    let cli = Cli::try_parse_from([
        "predictor",
        "--locale",
        "en",
        "predict",
        "--title",
        "Rust tips",
        "--publish-hour",
        "18",
        "--tag-count",
        "7",
        "--field",
        "category=Education",
    ])
    .expect("cli");
    assert_eq!(cli.locale, Some(Locale::En));

    let Command::Predict(args) = cli.command else {
        panic!("expected predict");
    };
    let entries = args.into_entries("2025-06-01T12:00");
    let names: Vec<_> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        ["title", "publish_date", "publish_hour", "tag_count", "category"]
    );
    assert_eq!(entries[1].1, "2025-06-01T12:00");
    assert_eq!(entries[2].1, "18");
}

#[test]
fn unknown_locale_is_rejected_by_cli() {
    let parsed = Cli::try_parse_from(["predictor", "--locale", "fr", "health"]);
    assert!(parsed.is_err());
}
