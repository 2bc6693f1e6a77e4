//! Property tests for configuration validation.

use calsync_core::config::{ConfigValidator, Rejection, is_placeholder};
use calsync_core::{Configuration, ValidConfig};
use proptest::prelude::*;

/// Identifier-ish values that can never look like a placeholder.
fn real_id() -> impl Strategy<Value = String> {
    "[a-f0-9]{8,32}"
}

fn placeholder() -> impl Strategy<Value = String> {
    "[a-z_]{0,12}".prop_map(|middle| format!("your_{}_here", middle))
}

fn document(token: &str, calendar: &str, databases: &[(String, String)]) -> String {
    let mut doc = format!(
        "[global]\ntoken = {}\ncalendar-name = {}\n\n[databases]\n",
        token, calendar
    );
    for (key, id) in databases {
        doc.push_str(&format!("{} = {}\n", key, id));
    }
    doc
}

fn validate(doc: &str) -> Result<ValidConfig, Rejection> {
    let config = Configuration::from_ini_str(doc).expect("generated document must parse");
    ConfigValidator::new().validate(&config)
}

proptest! {
    #[test]
    fn placeholder_shape_is_always_detected(value in placeholder()) {
        prop_assert!(is_placeholder(&value));
    }

    #[test]
    fn only_placeholder_databases_are_rejected(
        ids in prop::collection::vec(placeholder(), 1..5),
    ) {
        let databases: Vec<_> = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| (format!("db_{}", i + 1), id))
            .collect();

        let result = validate(&document("abc", "Work", &databases));
        let rejected = matches!(result, Err(Rejection::NoRealDatabases));
        prop_assert!(rejected, "expected NoRealDatabases, got {:?}", result);
    }

    #[test]
    fn one_real_database_among_placeholders_is_enough(
        placeholders in prop::collection::vec(placeholder(), 0..4),
        id in real_id(),
    ) {
        let mut databases: Vec<_> = placeholders
            .into_iter()
            .enumerate()
            .map(|(i, p)| (format!("db_{}", i + 2), p))
            .collect();
        databases.push(("db_1".to_string(), id.clone()));

        let valid = validate(&document("abc", "Work", &databases)).unwrap();
        prop_assert_eq!(valid.databases.len(), 1);
        prop_assert_eq!(&valid.databases[0].id, &id);
    }

    #[test]
    fn commented_entries_never_count(
        id in real_id(),
        marker in prop::sample::select(vec!['#', ';']),
    ) {
        let databases = vec![(format!("{}db_1", marker), id)];

        let result = validate(&document("abc", "Work", &databases));
        let rejected = matches!(result, Err(Rejection::NoRealDatabases));
        prop_assert!(rejected, "expected NoRealDatabases, got {:?}", result);
    }

    #[test]
    fn whitespace_only_token_is_empty(spaces in "[ \t]{0,6}", id in real_id()) {
        let databases = vec![("db_1".to_string(), id)];

        let result = validate(&document(&spaces, "Work", &databases));
        let rejected = matches!(result, Err(Rejection::FieldEmpty { field: "token" }));
        prop_assert!(rejected, "expected FieldEmpty(token), got {:?}", result);
    }

    #[test]
    fn whitespace_only_calendar_name_is_empty(spaces in "[ \t]{0,6}", id in real_id()) {
        let databases = vec![("db_1".to_string(), id)];

        let result = validate(&document("abc", &spaces, &databases));
        let rejected = matches!(result, Err(Rejection::FieldEmpty { field: "calendar-name" }));
        prop_assert!(rejected, "expected FieldEmpty(calendar-name), got {:?}", result);
    }

    #[test]
    fn accepted_values_are_trimmed(
        token in "[A-Za-z0-9]{1,20}",
        pad in "[ ]{0,3}",
        id in real_id(),
    ) {
        let databases = vec![("db_1".to_string(), format!("{pad}{id}{pad}"))];
        let padded_token = format!("{pad}{token}{pad}");

        let valid = validate(&document(&padded_token, "Work", &databases)).unwrap();
        prop_assert_eq!(valid.token, token);
        prop_assert_eq!(&valid.databases[0].id, &id);
    }
}
