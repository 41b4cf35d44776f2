//! Foreign-key identifiers as they arrive from clients
//!
//! Clients send relation ids either as JSON numbers or as numeric strings
//! (`3` or `"3"`). Everything is normalized to `i32` before it reaches the
//! repository; any other shape is rejected during deserialization.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn normalize(self) -> Result<i32, String> {
        let value = match self {
            RawId::Number(n) => n,
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("'{}' is not a numeric identifier", s))?,
        };
        i32::try_from(value)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| format!("{} is not a valid identifier", value))
    }
}

/// Mandatory id field
pub fn required<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?
        .normalize()
        .map_err(de::Error::custom)
}

/// Optional id field where `null` and absence both mean "no relation"
pub fn optional<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer)?
        .map(RawId::normalize)
        .transpose()
        .map_err(de::Error::custom)
}

/// Partial-update id field: absent -> `None` (via `#[serde(default)]`),
/// `null` -> `Some(None)`, value -> `Some(Some(id))`
pub fn patch<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "required")]
        owner: i32,
        #[serde(default, deserialize_with = "optional")]
        helper: Option<i32>,
        #[serde(default, deserialize_with = "patch")]
        link: Option<Option<i32>>,
    }

    fn probe(value: serde_json::Value) -> Result<Probe, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        let p = probe(json!({ "owner": "12", "helper": 4, "link": " 7 " })).unwrap();
        assert_eq!(p.owner, 12);
        assert_eq!(p.helper, Some(4));
        assert_eq!(p.link, Some(Some(7)));
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let absent = probe(json!({ "owner": 1 })).unwrap();
        assert_eq!(absent.link, None);
        assert_eq!(absent.helper, None);

        let cleared = probe(json!({ "owner": 1, "link": null })).unwrap();
        assert_eq!(cleared.link, Some(None));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert!(probe(json!({ "owner": "abc" })).is_err());
        assert!(probe(json!({ "owner": 1, "link": "x1" })).is_err());
        assert!(probe(json!({ "owner": 1, "helper": true })).is_err());
        assert!(probe(json!({ "owner": 0 })).is_err());
        assert!(probe(json!({ "owner": 99999999999i64 })).is_err());
    }
}
