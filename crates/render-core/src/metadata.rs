use chrono::{DateTime, Utc};
use log::warn;
use polypdf_idf::{DocumentNode, PropMap};
use serde_json::Value;

/// Values filled in when the DOCUMENT node does not provide them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDefaults {
    pub creator: String,
    pub producer: String,
    /// Stamp the current time as creation date when none is given.
    pub stamp_creation_date: bool,
}

impl Default for MetadataDefaults {
    fn default() -> Self {
        Self {
            creator: "polypdf".to_string(),
            producer: "polypdf".to_string(),
            stamp_creation_date: true,
        }
    }
}

/// Document-level information extracted from the DOCUMENT node's props.
///
/// Every field is optional; absent fields are omitted when handed to the
/// engine rather than written as empty values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub language: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
    pub pdf_version: Option<String>,
    pub page_mode: Option<String>,
    pub page_layout: Option<String>,
}

impl DocumentMetadata {
    pub fn from_document(document: &DocumentNode, defaults: &MetadataDefaults) -> Self {
        match document.as_element() {
            Some(el) => Self::from_props(&el.props.values, defaults),
            None => Self::from_props(&PropMap::new(), defaults),
        }
    }

    pub fn from_props(props: &PropMap, defaults: &MetadataDefaults) -> Self {
        let creation_date = date_prop(props, "creationDate")
            .or_else(|| defaults.stamp_creation_date.then(Utc::now));

        Self {
            title: string_prop(props, "title"),
            author: string_prop(props, "author"),
            subject: string_prop(props, "subject"),
            keywords: keywords_prop(props),
            creator: string_prop(props, "creator").or_else(|| Some(defaults.creator.clone())),
            producer: string_prop(props, "producer").or_else(|| Some(defaults.producer.clone())),
            language: string_prop(props, "language"),
            creation_date,
            modification_date: date_prop(props, "modificationDate"),
            pdf_version: string_prop(props, "pdfVersion"),
            page_mode: string_prop(props, "pageMode"),
            page_layout: string_prop(props, "pageLayout"),
        }
    }

    /// Info dictionary entries for the fields that are present, in a stable
    /// order. Dates use the PDF date format.
    pub fn info_entries(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        let dates = [
            ("CreationDate", &self.creation_date),
            ("ModDate", &self.modification_date),
        ];

        text.into_iter()
            .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
            .chain(
                dates
                    .into_iter()
                    .filter_map(|(name, value)| value.as_ref().map(|d| (name, pdf_date(d)))),
            )
            .collect()
    }
}

fn pdf_date(date: &DateTime<Utc>) -> String {
    format!("D:{}Z", date.format("%Y%m%d%H%M%S"))
}

fn string_prop(props: &PropMap, name: &str) -> Option<String> {
    match props.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => {
            warn!("Ignoring non-string document prop '{}': {}", name, other);
            None
        }
    }
}

fn keywords_prop(props: &PropMap) -> Option<String> {
    match props.get("keywords")? {
        Value::Array(items) => {
            let words: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!words.is_empty()).then(|| words.join(", "))
        }
        _ => string_prop(props, "keywords"),
    }
}

/// Accepts RFC 3339 strings or milliseconds since the Unix epoch.
fn date_prop(props: &PropMap, name: &str) -> Option<DateTime<Utc>> {
    match props.get(name)? {
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(date) => Some(date.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring malformed date in '{}' ({}): {}", name, s, e);
                None
            }
        },
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
