//! Lifelog record types and their tolerant JSON decoding.
//!
//! The remote service owns the schema, so decoding never rejects an entry
//! for a missing or odd-looking field: strings fall back to empty, timestamps
//! fall back to the Unix epoch, and content blocks are passed through as-is.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Timestamp type used on every entry. The offset the server sent is kept.
pub type Timestamp = DateTime<FixedOffset>;

/// One structured content block, e.g. `{"type": "heading1", "content": "..."}`.
pub type ContentBlock = Map<String, Value>;

/// A single recorded activity or transcript segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifelogEntry {
    pub id: String,
    pub title: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub is_starred: bool,
    pub updated_at: Timestamp,
    pub markdown: Option<String>,
    pub contents: Vec<ContentBlock>,
}

impl LifelogEntry {
    /// Decode one element of the `lifelogs` array.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name).filter(|v| !v.is_null());

        let contents = match field("contents") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(block) => Some(block.clone()),
                    other => {
                        tracing::debug!(block = %other, "skipping non-object content block");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            id: field("id").map(value_as_text).unwrap_or_default(),
            title: field("title").map(value_as_text).unwrap_or_default(),
            start_time: parse_timestamp(field("startTime").and_then(Value::as_str)),
            end_time: parse_timestamp(field("endTime").and_then(Value::as_str)),
            is_starred: field("isStarred").is_some_and(is_truthy),
            updated_at: parse_timestamp(field("updatedAt").and_then(Value::as_str)),
            markdown: field("markdown").and_then(Value::as_str).map(str::to_owned),
            contents,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LifelogPage {
    pub entries: Vec<LifelogEntry>,
    /// Cursor for the next page. `None` means this was the last page.
    pub next_cursor: Option<String>,
}

impl LifelogPage {
    /// Decode a success body. Accepts the flat `{"lifelogs", "nextCursor"}`
    /// shape as well as the `{"data": {"lifelogs"}, "meta": {"lifelogs":
    /// {"nextCursor"}}}` envelope.
    pub fn from_json(body: &Value) -> Self {
        let items = body
            .get("lifelogs")
            .or_else(|| body.pointer("/data/lifelogs"))
            .and_then(Value::as_array);

        let entries = items
            .map(|items| items.iter().map(LifelogEntry::from_json).collect())
            .unwrap_or_default();

        let next_cursor = body
            .get("nextCursor")
            .or_else(|| body.pointer("/meta/lifelogs/nextCursor"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);

        Self {
            entries,
            next_cursor,
        }
    }

    pub fn into_parts(self) -> (Vec<LifelogEntry>, Option<String>) {
        (self.entries, self.next_cursor)
    }
}

/// The Unix epoch in UTC, substituted for missing timestamps.
pub fn epoch() -> Timestamp {
    DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
}

/// Parse an ISO-8601 timestamp, substituting [`epoch`] when the value is
/// absent or unparseable.
pub fn parse_timestamp(raw: Option<&str>) -> Timestamp {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return epoch();
    };

    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => raw.to_owned(),
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&normalized) {
        return ts;
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc().fixed_offset();
    }
    if let Some(naive) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return naive.and_utc().fixed_offset();
    }

    tracing::warn!(value = raw, "unparseable timestamp, using epoch");
    epoch()
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Sort order for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("unknown direction: {s} (expected asc or desc)")),
        }
    }
}

/// Query filters for `GET /v1/lifelogs`.
///
/// Open-ended: any name can be set through [`ListParams::param`]. Passing
/// `None` as a value leaves the parameter out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or, with `None`, remove) a parameter. Re-setting a name replaces
    /// its value in place.
    pub fn param<V: ToString>(mut self, name: &str, value: Option<V>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set<V: ToString>(&mut self, name: &str, value: Option<V>) {
        let Some(value) = value else {
            self.pairs.retain(|(k, _)| k != name);
            return;
        };
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((name.to_owned(), value)),
        }
    }

    pub fn limit(self, limit: Option<u32>) -> Self {
        self.param("limit", limit)
    }

    /// Restrict to one day, `YYYY-MM-DD`.
    pub fn date(self, date: Option<&str>) -> Self {
        self.param("date", date)
    }

    pub fn start(self, start: Option<&str>) -> Self {
        self.param("start", start)
    }

    pub fn end(self, end: Option<&str>) -> Self {
        self.param("end", end)
    }

    /// IANA zone name, e.g. `Asia/Tokyo`.
    pub fn timezone(self, timezone: Option<&str>) -> Self {
        self.param("timezone", timezone)
    }

    pub fn cursor(self, cursor: Option<&str>) -> Self {
        self.param("cursor", cursor)
    }

    pub fn direction(self, direction: Option<Direction>) -> Self {
        self.param("direction", direction)
    }

    pub fn include_markdown(self, include: Option<bool>) -> Self {
        self.param("includeMarkdown", include)
    }

    pub fn include_headings(self, include: Option<bool>) -> Self {
        self.param("includeHeadings", include)
    }

    pub fn starred(self, starred: Option<bool>) -> Self {
        self.param("isStarred", starred)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        self.pairs.clone()
    }
}

impl<K: AsRef<str>, V: ToString> FromIterator<(K, Option<V>)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.set(name.as_ref(), value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn z_suffix_is_normalized() {
        let ts = parse_timestamp(Some("2024-09-17T00:00:00Z"));
        assert_eq!(ts.to_rfc3339(), "2024-09-17T00:00:00+00:00");
    }

    #[test]
    fn explicit_offset_is_kept() {
        let ts = parse_timestamp(Some("2024-09-17T09:30:00+09:00"));
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(ts.to_rfc3339(), "2024-09-17T09:30:00+09:00");
    }

    #[test]
    fn fractional_seconds_parse() {
        let ts = parse_timestamp(Some("2024-09-17T00:00:00.250Z"));
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn naive_and_date_only_read_as_utc() {
        assert_eq!(
            parse_timestamp(Some("2024-09-17T08:00:00")).to_rfc3339(),
            "2024-09-17T08:00:00+00:00"
        );
        assert_eq!(
            parse_timestamp(Some("2024-09-17")).to_rfc3339(),
            "2024-09-17T00:00:00+00:00"
        );
    }

    #[test]
    fn missing_or_garbage_timestamps_become_epoch() {
        assert_eq!(parse_timestamp(None), epoch());
        assert_eq!(parse_timestamp(Some("")), epoch());
        assert_eq!(parse_timestamp(Some("   ")), epoch());
        assert_eq!(parse_timestamp(Some("yesterday-ish")), epoch());
        assert_eq!(epoch().timestamp(), 0);
        assert_eq!(epoch().offset().local_minus_utc(), 0);
    }

    #[test]
    fn entry_decodes_full_record() {
        let entry = LifelogEntry::from_json(&json!({
            "id": "log_123",
            "title": "Morning standup",
            "startTime": "2024-09-17T00:00:00Z",
            "endTime": "2024-09-17T00:15:00Z",
            "isStarred": true,
            "updatedAt": "2024-09-17T01:00:00Z",
            "markdown": "## Morning standup\n- status",
            "contents": [{"type": "heading1", "content": "Morning standup"}]
        }));
        assert_eq!(entry.id, "log_123");
        assert_eq!(entry.title, "Morning standup");
        assert!(entry.is_starred);
        assert_eq!(entry.end_time.to_rfc3339(), "2024-09-17T00:15:00+00:00");
        assert!(entry.markdown.as_deref().unwrap().starts_with("## Morning"));
        assert_eq!(entry.contents[0]["type"], "heading1");
    }

    #[test]
    fn entry_tolerates_missing_fields() {
        let entry = LifelogEntry::from_json(&json!({"id": "bare"}));
        assert_eq!(entry.id, "bare");
        assert_eq!(entry.title, "");
        assert_eq!(entry.start_time, epoch());
        assert_eq!(entry.end_time, epoch());
        assert_eq!(entry.updated_at, epoch());
        assert!(!entry.is_starred);
        assert_eq!(entry.markdown, None);
        assert!(entry.contents.is_empty());
    }

    #[test]
    fn entry_tolerates_odd_types() {
        let entry = LifelogEntry::from_json(&json!({
            "id": 42,
            "title": null,
            "startTime": 1726531200,
            "isStarred": "yes",
            "markdown": null,
            "contents": [{"type": "paragraph"}, "stray", 7]
        }));
        assert_eq!(entry.id, "42");
        assert_eq!(entry.title, "");
        assert_eq!(entry.start_time, epoch());
        assert!(entry.is_starred);
        assert_eq!(entry.markdown, None);
        assert_eq!(entry.contents.len(), 1);
    }

    #[test]
    fn page_reads_flat_and_enveloped_shapes() {
        let flat = LifelogPage::from_json(&json!({
            "lifelogs": [{"id": "a"}, {"id": "b"}],
            "nextCursor": "c2"
        }));
        assert_eq!(flat.entries.len(), 2);
        assert_eq!(flat.next_cursor.as_deref(), Some("c2"));

        let wrapped = LifelogPage::from_json(&json!({
            "data": {"lifelogs": [{"id": "a"}]},
            "meta": {"lifelogs": {"nextCursor": "c3", "count": 1}}
        }));
        assert_eq!(wrapped.entries[0].id, "a");
        assert_eq!(wrapped.next_cursor.as_deref(), Some("c3"));
    }

    #[test]
    fn page_without_cursor_is_last() {
        let page = LifelogPage::from_json(&json!({"lifelogs": []}));
        assert!(page.entries.is_empty());
        assert_eq!(page.next_cursor, None);

        let page = LifelogPage::from_json(&json!({"lifelogs": "oops", "nextCursor": ""}));
        assert!(page.entries.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn params_drop_absent_values() {
        let params = ListParams::new()
            .limit(Some(10))
            .date(Some("2024-09-17"))
            .start(None)
            .timezone(Some("Asia/Tokyo"))
            .cursor(None);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("limit", "10"),
                ("date", "2024-09-17"),
                ("timezone", "Asia/Tokyo")
            ]
        );
    }

    #[test]
    fn params_replace_and_remove() {
        let mut params = ListParams::new().cursor(Some("first")).limit(Some(3));
        params.set("cursor", Some("second"));
        assert_eq!(params.get("cursor"), Some("second"));
        assert_eq!(params.iter().next(), Some(("cursor", "second")));

        params.set::<&str>("cursor", None);
        assert_eq!(params.get("cursor"), None);
        assert_eq!(params.get("limit"), Some("3"));
    }

    #[test]
    fn params_from_open_ended_iterator() {
        let params: ListParams = [("limit", Some("5")), ("end", None), ("custom", Some("x"))]
            .into_iter()
            .collect();
        assert_eq!(params.get("limit"), Some("5"));
        assert_eq!(params.get("end"), None);
        assert_eq!(params.get("custom"), Some("x"));
    }

    #[test]
    fn typed_flags_render_as_strings() {
        let params = ListParams::new()
            .direction(Some(Direction::Asc))
            .include_markdown(Some(false))
            .starred(Some(true));
        assert_eq!(params.get("direction"), Some("asc"));
        assert_eq!(params.get("includeMarkdown"), Some("false"));
        assert_eq!(params.get("isStarred"), Some("true"));
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("DESC".parse::<Direction>(), Ok(Direction::Desc));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
