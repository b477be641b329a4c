//! Pixelsport API raw wire types — serde shapes for the live events feed.
//! These map to our clean domain types via the mapping fns in client.rs.
//!
//! The feed is loosely typed: any field may be missing, `null`, or of an
//! unexpected JSON type. Every field decodes leniently to `None` instead of
//! failing the whole event.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Live events  (backend/liveTV/events)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct EventsResponse {
    /// Kept as raw values so one malformed element can be skipped on its own.
    #[serde(default)]
    pub events: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PixelEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub match_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>, // ISO 8601
    #[serde(rename = "competitors1_homeAway", default, deserialize_with = "lenient_string")]
    pub competitors1_home_away: Option<String>, // "home" | "away"
    #[serde(default, deserialize_with = "lenient_string")]
    pub competitors1_logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub competitors1_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub competitors2_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub channel: Option<PixelChannel>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PixelChannel {
    #[serde(rename = "server1URL", default, deserialize_with = "lenient_string")]
    pub server1_url: Option<String>,
    #[serde(rename = "server2URL", default, deserialize_with = "lenient_string")]
    pub server2_url: Option<String>,
    #[serde(rename = "server3URL", default, deserialize_with = "lenient_string")]
    pub server3_url: Option<String>,
    #[serde(rename = "TVCategory", default, deserialize_with = "lenient_object")]
    pub tv_category: Option<PixelCategory>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PixelCategory {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_event_decodes() {
        let raw: PixelEvent = serde_json::from_value(json!({
            "id": 42,
            "match_name": "Team A vs Team B",
            "date": "2025-06-15T18:00:00Z",
            "competitors1_homeAway": "home",
            "competitors1_logo": "http://logo/a.png",
            "channel": {
                "server1URL": "http://x/1.m3u8",
                "server2URL": "http://x/2.m3u8",
                "server3URL": "null",
                "TVCategory": { "name": "NFL Week 1" }
            }
        }))
        .unwrap();

        assert_eq!(raw.id.as_deref(), Some("42"));
        assert_eq!(raw.competitors1_home_away.as_deref(), Some("home"));
        let channel = raw.channel.unwrap();
        assert_eq!(channel.server3_url.as_deref(), Some("null"));
        assert_eq!(channel.tv_category.unwrap().name.as_deref(), Some("NFL Week 1"));
    }

    #[test]
    fn wrong_types_degrade_to_none() {
        let raw: PixelEvent = serde_json::from_value(json!({
            "match_name": ["not", "a", "string"],
            "date": null,
            "competitors1_logo": false,
            "channel": "not an object"
        }))
        .unwrap();

        assert!(raw.match_name.is_none());
        assert!(raw.date.is_none());
        assert!(raw.competitors1_logo.is_none());
        assert!(raw.channel.is_none());
    }

    #[test]
    fn nested_category_of_wrong_type_keeps_links() {
        let raw: PixelEvent = serde_json::from_value(json!({
            "channel": { "server1URL": "http://x/1.m3u8", "TVCategory": 7 }
        }))
        .unwrap();

        let channel = raw.channel.unwrap();
        assert_eq!(channel.server1_url.as_deref(), Some("http://x/1.m3u8"));
        assert!(channel.tv_category.is_none());
    }

    #[test]
    fn missing_events_key_is_none() {
        let raw: EventsResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.events.is_none());
    }
}
