//! Upstream feed boundary
//!
//! Decodes the push-channel price-update frame and normalizes the
//! loosely-shaped news-list payloads into one canonical record type,
//! keeping the defensive unwrapping out of the sampler and tokenizer.
//!
//! Upstream data is dirty by contract: prices arrive as JSON numbers or
//! numeric strings, ids under `newsId` or `id`, and the news list shows
//! up as a bare array or nested under `.data` or `.list` depending on
//! the endpoint. Everything here degrades to "no data" instead of
//! failing; only an unparseable frame surfaces as a typed error for the
//! caller to log.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Errors that can occur at the feed boundary.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("malformed price-update frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),
}

/// One price-update frame from the per-instrument push channel.
///
/// Fields the upstream omits or garbles decode as `None`; only
/// `current_price` feeds the sampler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceUpdate {
    #[serde(deserialize_with = "lenient_decimal")]
    pub current_price: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub price_change: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub change_rate: Option<Decimal>,
}

/// Decode a raw frame body into a [`PriceUpdate`].
pub fn decode_price_update(raw: &str) -> Result<PriceUpdate, FeedError> {
    Ok(serde_json::from_str(raw)?)
}

/// Accept a JSON number, a numeric string, or anything else as `None`.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Canonical news-bookmark record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Stable identifier; absent when the row carries neither `newsId`
    /// nor `id`.
    pub news_id: Option<String>,
    /// Headline text; missing titles normalize to the empty string.
    pub title: String,
    /// Read marker for the bookmark list.
    pub is_read: bool,
}

impl NewsItem {
    fn from_row(row: &Value) -> Self {
        let news_id = row
            .get("newsId")
            .or_else(|| row.get("id"))
            .and_then(id_text);
        let title = row
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let is_read = row.get("isRead").and_then(Value::as_bool).unwrap_or(false);
        Self {
            news_id,
            title,
            is_read,
        }
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalize a news-list response into a canonical sequence.
///
/// Unwrap priority: bare array, then `.data`, then `.list`, then empty.
/// Non-object rows are skipped.
pub fn normalize_news_list(payload: &Value) -> Vec<NewsItem> {
    let rows = if let Some(rows) = payload.as_array() {
        rows
    } else if let Some(rows) = payload.get("data").and_then(Value::as_array) {
        rows
    } else if let Some(rows) = payload.get("list").and_then(Value::as_array) {
        rows
    } else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.is_object())
        .map(NewsItem::from_row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_numeric_frame() {
        let update =
            decode_price_update(r#"{"currentPrice":71200,"priceChange":-300,"changeRate":-0.42}"#)
                .unwrap();
        assert_eq!(update.current_price, Some(Decimal::from(71_200)));
        assert_eq!(update.price_change, Some(Decimal::from(-300)));
    }

    #[test]
    fn test_decode_string_prices() {
        // Some upstream publishers stringify every field.
        let update =
            decode_price_update(r#"{"currentPrice":"71200","priceChange":"-300","changeRate":"-0.42"}"#)
                .unwrap();
        assert_eq!(update.current_price, Some(Decimal::from(71_200)));
        assert_eq!(
            update.change_rate,
            Some(Decimal::from_str("-0.42").unwrap())
        );
    }

    #[test]
    fn test_decode_degrades_to_none() {
        let update = decode_price_update(r#"{"currentPrice":null,"changeRate":"n/a"}"#).unwrap();
        assert_eq!(update.current_price, None);
        assert_eq!(update.price_change, None);
        assert_eq!(update.change_rate, None);
    }

    #[test]
    fn test_decode_rejects_garbage_frame() {
        assert!(matches!(
            decode_price_update("not json"),
            Err(FeedError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_normalize_bare_array() {
        let payload = json!([{ "newsId": 17, "title": "삼성전자 실적 발표", "isRead": true }]);
        let items = normalize_news_list(&payload);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].news_id.as_deref(), Some("17"));
        assert_eq!(items[0].title, "삼성전자 실적 발표");
        assert!(items[0].is_read);
    }

    #[test]
    fn test_normalize_priority_order() {
        // `.data` wins over `.list` when both are present.
        let payload = json!({
            "data": [{ "id": "1", "title": "a" }],
            "list": [{ "id": "2", "title": "b" }]
        });
        let items = normalize_news_list(&payload);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].news_id.as_deref(), Some("1"));

        let payload = json!({ "list": [{ "id": "2", "title": "b" }] });
        assert_eq!(normalize_news_list(&payload)[0].news_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_normalize_unknown_shape_is_empty() {
        assert!(normalize_news_list(&json!({ "rows": [] })).is_empty());
        assert!(normalize_news_list(&json!("oops")).is_empty());
        assert!(normalize_news_list(&Value::Null).is_empty());
    }

    #[test]
    fn test_missing_fields_normalize_to_defaults() {
        let payload = json!([{}, { "title": 42 }]);
        let items = normalize_news_list(&payload);
        assert_eq!(items.len(), 2);
        for item in &items {
            assert_eq!(item.news_id, None);
            assert_eq!(item.title, "");
            assert!(!item.is_read);
        }
    }
}
