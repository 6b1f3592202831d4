use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::xml::XmlTree;

/// Parsed value of a WebDAV property element.
///
/// Serializes as a plain JSON string, `null` or object respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyNode {
    Text(String),
    Empty,
    Map(BTreeMap<String, PropertyNode>),
}

impl Default for PropertyNode {
    fn default() -> Self {
        PropertyNode::Map(BTreeMap::new())
    }
}

impl PropertyNode {
    /// Converts one XML element into a property value.
    ///
    /// No child nodes gives `Empty`; a leading text node gives `Text`;
    /// otherwise every child element is converted recursively and keyed by
    /// its local name (a repeated name keeps the last occurrence).
    pub fn from_element<T: XmlTree>(element: &T) -> Self {
        if !element.has_nodes() {
            return PropertyNode::Empty;
        }
        if let Some(text) = element.leading_text() {
            return PropertyNode::Text(text.to_string());
        }

        let mut map = BTreeMap::new();
        for child in element.elements() {
            map.insert(child.local_name().to_string(), PropertyNode::from_element(child));
        }
        PropertyNode::Map(map)
    }

    pub fn get(&self, key: &str) -> Option<&PropertyNode> {
        match self {
            PropertyNode::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Presence check that also holds for keys whose value is `Empty`
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyNode::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, PropertyNode>> {
        match self {
            PropertyNode::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_empty_value(&self) -> bool {
        matches!(self, PropertyNode::Empty)
    }

    /// Text value of a direct child property
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyNode::as_text)
    }

    /// `true` when `resourcetype` is a map holding a `collection` entry
    pub fn is_collection(&self) -> bool {
        self.get("resourcetype")
            .is_some_and(|resource_type| resource_type.contains_key("collection"))
    }

    pub fn etag(&self) -> Option<&str> {
        self.text("getetag")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.text("getcontenttype")
    }

    pub fn content_length(&self) -> Option<u64> {
        self.text("getcontentlength").and_then(|len| len.trim().parse().ok())
    }

    pub fn display_name(&self) -> Option<String> {
        self.text("displayname").map(|name| {
            urlencoding::decode(name)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| name.to_string())
        })
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.text("getlastmodified").and_then(parse_http_date)
    }
}

pub(crate) fn parse_http_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(date_str)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(date_str, "%a, %d %b %Y %H:%M:%S GMT")
                .ok()
                .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
        })
}

/// Numeric code from a multi-status line such as `HTTP/1.1 200 OK`
pub fn parse_status_line(status: &str) -> Option<u16> {
    status.split_whitespace().nth(1).and_then(|code| code.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::xml::XmlElement;
    use chrono::{Datelike, Timelike};

    fn dav(name: &str) -> XmlElement {
        XmlElement::new(name, Some("DAV:".to_string()))
    }

    #[test]
    fn test_element_without_children_is_empty() {
        assert_eq!(PropertyNode::from_element(&dav("collection")), PropertyNode::Empty);
    }

    #[test]
    fn test_leading_text_wins() {
        let element = dav("getetag").with_text("\"abc123\"");
        assert_eq!(
            PropertyNode::from_element(&element),
            PropertyNode::Text("\"abc123\"".to_string())
        );
    }

    #[test]
    fn test_nested_elements_become_map() {
        let propstat = dav("propstat")
            .with_child(
                dav("prop")
                    .with_child(dav("resourcetype").with_child(dav("collection")))
                    .with_child(dav("getcontentlength").with_text("1024")),
            )
            .with_child(dav("status").with_text("HTTP/1.1 200 OK"));

        let parsed = PropertyNode::from_element(&propstat);
        let prop = parsed.get("prop").unwrap();

        assert_eq!(parsed.text("status"), Some("HTTP/1.1 200 OK"));
        assert!(prop.is_collection());
        assert_eq!(prop.get("resourcetype").unwrap().get("collection"), Some(&PropertyNode::Empty));
        assert_eq!(prop.content_length(), Some(1024));
    }

    #[test]
    fn test_empty_resourcetype_is_not_collection() {
        let prop = PropertyNode::from_element(&dav("prop").with_child(dav("resourcetype")));
        assert!(!prop.is_collection());

        let no_resourcetype = PropertyNode::from_element(&dav("prop").with_child(dav("getetag").with_text("x")));
        assert!(!no_resourcetype.is_collection());
    }

    #[test]
    fn test_typed_accessors() {
        let prop = PropertyNode::from_element(
            &dav("prop")
                .with_child(dav("displayname").with_text("File%20with%20spaces.pdf"))
                .with_child(dav("getcontenttype").with_text("application/pdf"))
                .with_child(dav("getetag").with_text("\"pdf123\""))
                .with_child(dav("getlastmodified").with_text("Mon, 15 Jan 2024 14:30:00 GMT")),
        );

        assert_eq!(prop.display_name().as_deref(), Some("File with spaces.pdf"));
        assert_eq!(prop.content_type(), Some("application/pdf"));
        assert_eq!(prop.etag(), Some("\"pdf123\""));

        let modified = prop.last_modified().unwrap();
        assert_eq!((modified.year(), modified.month(), modified.day()), (2024, 1, 15));
        assert_eq!(modified.hour(), 14);
    }

    #[test]
    fn test_parse_status_line() {
        assert_eq!(parse_status_line("HTTP/1.1 200 OK"), Some(200));
        assert_eq!(parse_status_line("HTTP/1.1 404 Not Found"), Some(404));
        assert_eq!(parse_status_line("garbage"), None);
    }

    #[test]
    fn test_json_shape() {
        let prop = PropertyNode::from_element(
            &dav("prop")
                .with_child(dav("resourcetype").with_child(dav("collection")))
                .with_child(dav("getetag").with_text("e1")),
        );
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"getetag": "e1", "resourcetype": {"collection": null}})
        );
    }
}
