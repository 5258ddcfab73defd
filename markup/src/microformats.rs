//! Helpers over parsed microformats2 JSON (`{"items": [...]}`).
//!
//! Structures are taken as `serde_json::Value` in the canonical mf2 shape:
//! every item has a `type` array and a `properties` object of arrays.

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta};
use posse_types::atom_date;
use serde_json::{Map, Value};

fn has_type(item: &Value, name: &str) -> bool {
    item.get("type")
        .and_then(Value::as_array)
        .is_some_and(|types| types.iter().any(|t| t.as_str() == Some(name)))
}

fn as_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text),
        // Embedded microformats carry their plain-text form in `value`.
        Value::Object(object) => object.get("value").and_then(Value::as_str),
        _ => None,
    }
}

/// First non-empty value of property `name`.
fn first_property<'a>(item: &'a Value, name: &str) -> Option<&'a str> {
    let property = item.get("properties")?.get(name)?;
    let first = match property {
        Value::Array(values) => values.first()?,
        other => other,
    };
    as_text(first).filter(|text| !text.is_empty())
}

fn set_property(item: &mut Value, name: &str, value: String) {
    let Some(object) = item.as_object_mut() else {
        return;
    };
    let properties = object
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(properties) = properties.as_object_mut() {
        properties.insert(name.to_string(), Value::Array(vec![Value::String(value)]));
    }
}

fn items(mf: &Value) -> &[Value] {
    mf.get("items")
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render an h-card as an inline link (or span, without a `url`).
///
/// The first `photo` becomes a leading `<img>`. The name falls back to the
/// URL when the card has none.
#[must_use]
pub fn inline_h_card(hcard: &Value) -> String {
    let url = first_property(hcard, "url");
    let name = first_property(hcard, "name").or(url).unwrap_or_default();

    let mut out = match url {
        Some(url) => format!("<a class=\"h-card\" href=\"{}\">", escape_html(url)),
        None => "<span class=\"h-card\">".to_string(),
    };
    if let Some(photo) = first_property(hcard, "photo") {
        out.push_str(&format!("<img src=\"{}\" alt=\"\" />", escape_html(photo)));
    }
    out.push_str(&escape_html(name));
    out.push_str(if url.is_some() { "</a>" } else { "</span>" });
    out
}

/// The h-entries of a page: the children of the first non-empty h-feed, or
/// the top-level items when there is no such feed.
#[must_use]
pub fn find_h_entries(mf: &Value) -> Vec<&Value> {
    let top = items(mf);
    let feed_children = top
        .iter()
        .filter(|item| has_type(item, "h-feed"))
        .find_map(|feed| {
            feed.get("children")
                .and_then(Value::as_array)
                .filter(|children| !children.is_empty())
        })
        .map(Vec::as_slice);

    feed_children
        .unwrap_or(top)
        .iter()
        .filter(|item| has_type(item, "h-entry"))
        .collect()
}

/// Top-level h-cards. Accepts either a parsed document or a bare item array.
///
/// Nested cards (children, embedded properties) are not searched.
#[must_use]
pub fn find_h_cards(mf: &Value) -> Vec<&Value> {
    let candidates = match items(mf) {
        [] => mf.as_array().map_or(&[][..], Vec::as_slice),
        top => top,
    };
    candidates
        .iter()
        .filter(|item| has_type(item, "h-card"))
        .collect()
}

fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let atom = atom_date(raw).ok()?;
    DateTime::parse_from_rfc3339(&atom).ok()
}

/// Fill in missing `published` dates across a run of h-entries.
///
/// An entry with only `updated` is published at that time. An entry with
/// neither is published one second after the latest date seen so far, and
/// each further undated entry another second later. Undated entries before
/// any dated one are left alone.
pub fn normalise_h_entry_dates(entries: &mut [Value]) {
    let mut last_seen: Option<DateTime<FixedOffset>> = None;

    for entry in entries {
        let published = first_property(entry, "published").map(str::to_string);
        let updated = first_property(entry, "updated").map(str::to_string);

        if let Some(date) = updated.as_deref().or(published.as_deref()).and_then(parse_date) {
            last_seen = Some(date);
        }

        match (published, updated) {
            (None, Some(updated)) => set_property(entry, "published", updated),
            (None, None) => {
                let Some(next) = last_seen.and_then(|d| d.checked_add_signed(TimeDelta::seconds(1)))
                else {
                    continue;
                };
                set_property(
                    entry,
                    "published",
                    next.to_rfc3339_opts(SecondsFormat::Secs, false),
                );
                last_seen = Some(next);
            }
            _ => {}
        }
    }
}
