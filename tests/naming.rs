use pdf_renamer::naming::{build, sanitize, BuiltName, UsedNames};

fn candidate(built: BuiltName) -> String {
    match built {
        BuiltName::Candidate(name) => name,
        BuiltName::KeepOriginal => panic!("expected a candidate name"),
    }
}

#[test]
fn collision_appends_increasing_disambiguator() {
    let mut used: UsedNames = ["Doe - Report.pdf"].into_iter().collect();

    let second = candidate(build(Some("Doe"), Some("Report"), &used));
    assert_eq!(second, "Doe - Report (2).pdf");
    assert!(used.claim(&second));

    let third = candidate(build(Some("Doe"), Some("Report"), &used));
    assert_eq!(third, "Doe - Report (3).pdf");
}

#[test]
fn collision_check_ignores_case() {
    let used: UsedNames = ["doe - report.PDF"].into_iter().collect();
    assert_eq!(
        candidate(build(Some("Doe"), Some("Report"), &used)),
        "Doe - Report (2).pdf"
    );
}

#[test]
fn separators_and_colons_never_survive() {
    let name = candidate(build(Some("A/B"), Some("C:D"), &UsedNames::new()));
    assert!(!name.contains('/'));
    assert!(!name.contains('\\'));
    assert!(!name.contains(':'));
    assert_eq!(name, "A_B - C_D.pdf");
}

#[test]
fn reserved_punctuation_is_replaced() {
    let cleaned = sanitize(r#"What? <Really> "Yes" | No*\Maybe"#);
    for c in ['?', '<', '>', '"', '|', '*', '\\'] {
        assert!(!cleaned.contains(c), "{c} survived in {cleaned}");
    }
}

#[test]
fn both_fields_absent_means_keep_original() {
    let used = UsedNames::new();
    assert_eq!(build(None, None, &used), BuiltName::KeepOriginal);
    assert_eq!(build(Some(""), Some("   "), &used), BuiltName::KeepOriginal);
}

#[test]
fn build_is_deterministic_and_does_not_claim() {
    let used: UsedNames = ["Report.pdf"].into_iter().collect();
    let first = build(None, Some("Report"), &used);
    let again = build(None, Some("Report"), &used);
    assert_eq!(first, again);
    assert_eq!(used.len(), 1);
}
