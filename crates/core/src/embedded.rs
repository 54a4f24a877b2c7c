//! Script-injected JSON payloads.
//!
//! Pages on the site carry structured data as object literals assigned in
//! inline scripts, e.g. `window.__DATA__ = {...};`. [`extract_blob`] locates
//! the assignment and scans forward with a bracket-depth counter that knows
//! about string literals and escapes, so braces and semicolons inside string
//! values never cut the payload short.
//!
//! Results are best-effort: a miss or a parse failure yields `None` and a
//! `warn` event, never an error.

use std::collections::HashMap;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Name of the faceted-search definition payload on catalog pages.
pub const FILTER_BLOB: &str = "__XFILTER__";

/// Name of the page-data payload on detail and reader pages.
pub const DATA_BLOB: &str = "__DATA__";

/// Extracts the object literal assigned to `<namespace>.<name>` and parses it as JSON.
///
/// When the name is assigned more than once, the first assignment that
/// parses wins.
///
/// # Example
///
/// ```rust
/// use batcave_core::embedded::extract_blob;
///
/// let html = r#"<script>window.__DATA__ = {"news_id": 7, "note": "a;b}"};</script>"#;
/// let blob = extract_blob(html, "__DATA__").unwrap();
/// assert_eq!(blob["news_id"], 7);
/// assert_eq!(blob["note"], "a;b}");
/// ```
pub fn extract_blob(html: &str, name: &str) -> Option<Value> {
    let pattern = format!(r"[A-Za-z_$][\w$]*\.{}\s*=\s*\{{", regex::escape(name));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(blob = name, error = %e, "invalid blob name");
            return None;
        }
    };

    let mut last_error = None;
    for m in re.find_iter(html) {
        let start = m.end() - 1;
        let Some(literal) = balanced_object(&html[start..]) else {
            last_error = Some("unterminated object literal".to_string());
            continue;
        };

        match serde_json::from_str::<Value>(literal) {
            Ok(value) => return Some(value),
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    match last_error {
        Some(error) => tracing::warn!(blob = name, %error, "failed to parse embedded payload"),
        None => tracing::debug!(blob = name, "embedded payload not found"),
    }
    None
}

/// Extracts a payload and deserializes it into `T`.
pub fn extract_blob_as<T: DeserializeOwned>(html: &str, name: &str) -> Option<T> {
    let value = extract_blob(html, name)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(blob = name, error = %e, "embedded payload has an unexpected shape");
            None
        }
    }
}

/// Returns the prefix of `src` that forms a balanced `{...}` literal.
///
/// `src` must start at the opening brace. Brackets inside single- or
/// double-quoted strings are ignored; backslash escapes are honoured.
fn balanced_object(src: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in src.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&src[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// `window.__XFILTER__`: facet definitions for the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterBlob {
    #[serde(default)]
    pub filter_items: Option<HashMap<String, Value>>,
}

impl FilterBlob {
    /// Typed view of one facet definition, or `None` when the key is missing or malformed.
    pub fn facet(&self, key: &str) -> Option<FilterItem> {
        let raw = self.filter_items.as_ref()?.get(key)?;
        serde_json::from_value(raw.clone()).ok()
    }
}

/// One facet definition inside [`FilterBlob`].
#[derive(Debug, Clone, Deserialize)]
pub struct FilterItem {
    #[serde(default)]
    pub title: Option<String>,
    pub values: Vec<FilterValue>,
}

/// A selectable facet value.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterValue {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub value: String,
}

/// `window.__DATA__`: chapter list on detail pages, image list on reader pages.
///
/// Each field is read on its own, so a malformed field leaves the others
/// intact. Chapter entries without a usable id are skipped.
#[derive(Debug, Clone, Default)]
pub struct PageDataBlob {
    pub news_id: Option<String>,
    pub chapters: Option<Vec<ChapterEntry>>,
    pub images: Option<Vec<String>>,
}

impl PageDataBlob {
    pub fn from_value(value: &Value) -> Self {
        let news_id = value
            .get("news_id")
            .and_then(|id| RawId::deserialize(id).ok())
            .map(String::from);

        let chapters = value.get("chapters").and_then(Value::as_array).map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match ChapterEntry::deserialize(entry) {
                    Ok(chapter) => Some(chapter),
                    Err(e) => {
                        tracing::debug!(error = %e, "skipping chapter entry");
                        None
                    }
                })
                .collect()
        });

        let images = value
            .get("images")
            .and_then(Value::as_array)
            .map(|paths| paths.iter().filter_map(Value::as_str).map(str::to_string).collect());

        Self { news_id, chapters, images }
    }
}

impl<'de> Deserialize<'de> for PageDataBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}

/// A chapter entry in [`PageDataBlob`].
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}
