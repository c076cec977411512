//! # Per-user settings document
//!
//! Each user owns at most one row in `user_settings`, holding a single JSON
//! document of free-form settings. The document is modeled as an ordered
//! mapping from string keys to [`SettingValue`], a closed union of the
//! value shapes the admin panel writes:
//!
//! - `null`
//! - booleans
//! - integers and floats
//! - strings
//! - nested mappings of the same shape
//!
//! Arrays are deliberately not part of the union; a payload containing one
//! fails deserialization before it reaches the store. The whole document is
//! persisted as one `JSONB` column and rewritten on every key-level
//! mutation; see [`crate::services::settings`] for the transaction that
//! keeps concurrent rewrites from losing updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::user::UserSummary;

/// Ordered settings mapping, exactly as stored in the `settings` column.
pub type SettingsDoc = BTreeMap<String, SettingValue>;

/// One value inside a settings document.
///
/// Serialized untagged, so the wire shape is plain JSON (`true`, `3`,
/// `"dark"`, `{"nested": ...}`) rather than an enum wrapper. Integers are
/// tried before floats, so `3` round-trips as [`SettingValue::Int`] while
/// `3.5` becomes [`SettingValue::Float`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Map(SettingsDoc),
}

/// Full settings record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub id: i64,
    pub user_id: i64,
    pub settings: Json<SettingsDoc>,
}

/// Payload for `POST /api/settings`. An omitted document starts empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserSettings {
    pub user_id: i64,
    pub settings: Option<SettingsDoc>,
}

/// Settings row plus the owning user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingsDetail {
    #[serde(flatten)]
    pub record: UserSettings,
    pub user: Option<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_values_round_trip() {
        let doc: SettingsDoc = serde_json::from_value(json!({
            "theme": "dark",
            "volume": 7,
            "brightness": 0.5,
            "notifications": true,
            "nickname": null,
        }))
        .unwrap();

        assert_eq!(doc["theme"], SettingValue::String("dark".into()));
        assert_eq!(doc["volume"], SettingValue::Int(7));
        assert_eq!(doc["brightness"], SettingValue::Float(0.5));
        assert_eq!(doc["notifications"], SettingValue::Bool(true));
        assert_eq!(doc["nickname"], SettingValue::Null);

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            back,
            json!({
                "brightness": 0.5,
                "nickname": null,
                "notifications": true,
                "theme": "dark",
                "volume": 7,
            })
        );
    }

    #[test]
    fn nested_mappings_round_trip() {
        let doc: SettingsDoc = serde_json::from_value(json!({
            "audio": { "music": 3, "effects": { "enabled": false } },
        }))
        .unwrap();

        let SettingValue::Map(audio) = &doc["audio"] else {
            panic!("expected nested mapping");
        };
        assert_eq!(audio["music"], SettingValue::Int(3));

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            back,
            json!({ "audio": { "effects": { "enabled": false }, "music": 3 } })
        );
    }

    #[test]
    fn arrays_are_rejected() {
        let result: Result<SettingValue, _> = serde_json::from_value(json!([1, 2, 3]));
        assert!(result.is_err());

        let result: Result<SettingsDoc, _> =
            serde_json::from_value(json!({ "tags": ["a", "b"] }));
        assert!(result.is_err());

        // Arrays fail even when buried inside a nested mapping.
        let result: Result<SettingsDoc, _> =
            serde_json::from_value(json!({ "outer": { "inner": [] } }));
        assert!(result.is_err());
    }

    #[test]
    fn whole_numbers_stay_integers() {
        let value: SettingValue = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(value, SettingValue::Int(3));

        let value: SettingValue = serde_json::from_value(json!(-40)).unwrap();
        assert_eq!(value, SettingValue::Int(-40));

        let value: SettingValue = serde_json::from_value(json!(3.5)).unwrap();
        assert_eq!(value, SettingValue::Float(3.5));
    }

    #[test]
    fn keys_serialize_in_order() {
        let mut doc = SettingsDoc::new();
        doc.insert("zoom".into(), SettingValue::Int(2));
        doc.insert("theme".into(), SettingValue::String("light".into()));
        doc.insert("alerts".into(), SettingValue::Bool(true));

        let text = serde_json::to_string(&doc).unwrap();
        assert_eq!(text, r#"{"alerts":true,"theme":"light","zoom":2}"#);
    }
}
