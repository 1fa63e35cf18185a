use std::collections::BTreeMap;

use super::test_db;
use crate::DbError;

const OPTION: &str = "openid_connect_generic_settings";

#[test]
fn test_open_and_migrate() {
    let db = test_db();
    let values = db.get_option_values(OPTION).unwrap();
    assert!(values.is_empty());
}

#[test]
fn test_option_value_crud() {
    let db = test_db();
    db.set_option_value(OPTION, "client_id", "abc").unwrap();
    assert_eq!(
        db.get_option_value(OPTION, "client_id").unwrap(),
        Some("abc".into())
    );

    db.set_option_value(OPTION, "client_id", "def").unwrap();
    assert_eq!(
        db.get_option_value(OPTION, "client_id").unwrap(),
        Some("def".into())
    );

    db.delete_option(OPTION).unwrap();
    assert_eq!(db.get_option_value(OPTION, "client_id").unwrap(), None);
}

#[test]
fn test_option_names_are_isolated() {
    let db = test_db();
    db.set_option_value(OPTION, "client_id", "ours").unwrap();
    db.set_option_value("other_plugin", "client_id", "theirs")
        .unwrap();

    assert_eq!(
        db.get_option_value(OPTION, "client_id").unwrap(),
        Some("ours".into())
    );
    db.delete_option("other_plugin").unwrap();
    assert_eq!(db.get_option_values(OPTION).unwrap().len(), 1);
}

#[test]
fn test_replace_option_values_drops_missing_keys() {
    let db = test_db();
    db.set_option_value(OPTION, "stale", "x").unwrap();

    let mut values = BTreeMap::new();
    values.insert("client_id".to_string(), "abc".to_string());
    values.insert("log_limit".to_string(), "25".to_string());
    db.replace_option_values(OPTION, &values).unwrap();

    let stored = db.get_option_values(OPTION).unwrap();
    assert_eq!(stored, values);
}

#[test]
fn test_empty_key_is_rejected() {
    let db = test_db();
    let err = db.set_option_value(OPTION, "", "x").unwrap_err();
    assert!(matches!(err, DbError::InvalidData(_)));

    let mut values = BTreeMap::new();
    values.insert(String::new(), "x".to_string());
    assert!(db.replace_option_values(OPTION, &values).is_err());
}
