use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::store::Document;

pub const WEBSITES_COLLECTION: &str = "websites";
pub const ORDER_FIELD: &str = "order";
pub const DEFAULT_CATEGORY: &str = "education";
pub const DEFAULT_STYLE: &str = "bg-gradient-to-br from-white/10 to-white/5";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub value: &'static str,
    pub label: &'static str,
}

/// Card styles offered by the admin form. Stored values stay free-form.
pub const STYLE_PRESETS: [StylePreset; 8] = [
    StylePreset {
        value: DEFAULT_STYLE,
        label: "Default (Blue)",
    },
    StylePreset {
        value: "bg-gradient-to-br from-purple-500/20 to-pink-500/20",
        label: "Purple Pink",
    },
    StylePreset {
        value: "bg-gradient-to-br from-green-500/20 to-emerald-500/20",
        label: "Green",
    },
    StylePreset {
        value: "bg-gradient-to-br from-orange-500/20 to-red-500/20",
        label: "Orange Red",
    },
    StylePreset {
        value: "bg-gradient-to-br from-yellow-500/20 to-amber-500/20",
        label: "Yellow",
    },
    StylePreset {
        value: "bg-gradient-to-br from-cyan-500/20 to-blue-500/20",
        label: "Cyan Blue",
    },
    StylePreset {
        value: "bg-gradient-to-br from-rose-500/20 to-pink-500/20",
        label: "Rose Pink",
    },
    StylePreset {
        value: "bg-gradient-to-br from-indigo-500/20 to-purple-500/20",
        label: "Indigo Purple",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be an absolute http or https URL")]
    InvalidUrl(&'static str),
}

fn is_web_url(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

/// Every field of a website record except its id.
///
/// Missing keys in a stored document fall back to the form defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteFields {
    pub title: String,
    pub description: String,
    pub url: String,
    pub icon: String,
    pub category: String,
    pub order: i64,
    pub is_new: bool,
    pub style: String,
}

impl Default for WebsiteFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            url: String::new(),
            icon: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            order: 0,
            is_new: false,
            style: DEFAULT_STYLE.to_string(),
        }
    }
}

impl WebsiteFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("url", &self.url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(name));
            }
        }
        if !is_web_url(&self.url) {
            return Err(ValidationError::InvalidUrl("url"));
        }
        if !self.icon.trim().is_empty() && !is_web_url(&self.icon) {
            return Err(ValidationError::InvalidUrl("icon"));
        }
        Ok(())
    }

    pub fn to_document_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "website fields serialized to non-object: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebsiteEntry {
    pub id: String,
    #[serde(flatten)]
    pub fields: WebsiteFields,
}

impl WebsiteEntry {
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        let fields = serde_json::from_value(Value::Object(document.fields))?;
        Ok(Self {
            id: document.id,
            fields,
        })
    }

    /// Icon to render, falling back to the bundled default.
    pub fn icon_or<'a>(&'a self, default_icon: &'a str) -> &'a str {
        if self.fields.icon.trim().is_empty() {
            default_icon
        } else {
            &self.fields.icon
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled() -> WebsiteFields {
        WebsiteFields {
            title: "Portal".to_string(),
            description: "Member portal".to_string(),
            url: "https://example.com".to_string(),
            ..WebsiteFields::default()
        }
    }

    #[test]
    fn defaults_match_the_admin_form() {
        let fields = WebsiteFields::default();
        assert_eq!(fields.category, "education");
        assert_eq!(fields.order, 0);
        assert!(!fields.is_new);
        assert_eq!(fields.style, STYLE_PRESETS[0].value);
    }

    #[test]
    fn validate_rejects_blank_required_fields_in_order() {
        assert_eq!(filled().validate(), Ok(()));

        let blank_title = WebsiteFields {
            title: "   ".to_string(),
            description: String::new(),
            ..filled()
        };
        assert_eq!(
            blank_title.validate(),
            Err(ValidationError::MissingField("title"))
        );

        let blank_url = WebsiteFields {
            url: String::new(),
            ..filled()
        };
        assert_eq!(blank_url.validate(), Err(ValidationError::MissingField("url")));
    }

    #[test]
    fn validate_allows_empty_optional_fields() {
        let fields = WebsiteFields {
            icon: String::new(),
            category: String::new(),
            style: String::new(),
            ..filled()
        };
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn validate_requires_web_urls() {
        for bad in [
            "javascript:alert(document.cookie)",
            "/relative/path",
            "foo.example.com",
            "not a url at all",
            "ftp://files.example.com",
            "data:text/html,<b>x</b>",
        ] {
            let fields = WebsiteFields {
                url: bad.to_string(),
                ..filled()
            };
            assert_eq!(
                fields.validate(),
                Err(ValidationError::InvalidUrl("url")),
                "url {bad:?} should be rejected"
            );
        }

        let http = WebsiteFields {
            url: "http://intranet.example.com/path?x=1".to_string(),
            ..filled()
        };
        assert_eq!(http.validate(), Ok(()));
    }

    #[test]
    fn validate_checks_icon_only_when_present() {
        let bad_icon = WebsiteFields {
            icon: "javascript:alert(1)".to_string(),
            ..filled()
        };
        assert_eq!(bad_icon.validate(), Err(ValidationError::InvalidUrl("icon")));

        let good_icon = WebsiteFields {
            icon: "https://example.com/icon.png".to_string(),
            ..filled()
        };
        assert_eq!(good_icon.validate(), Ok(()));
    }

    #[test]
    fn document_fields_use_camel_case_and_omit_id() {
        let map = filled().to_document_fields().expect("fields should serialize");
        assert_eq!(map["isNew"], json!(false));
        assert_eq!(map["order"], json!(0));
        assert!(!map.contains_key("id"));
        assert!(!map.contains_key("is_new"));
    }

    #[test]
    fn from_document_fills_missing_keys_with_defaults() {
        let document = Document {
            id: "a".to_string(),
            fields: match json!({"title": "Foo", "description": "d", "url": "https://foo.test", "isNew": true}) {
                Value::Object(map) => map,
                _ => unreachable!(),
            },
        };
        let entry = WebsiteEntry::from_document(document).expect("document should parse");
        assert_eq!(entry.id, "a");
        assert!(entry.fields.is_new);
        assert_eq!(entry.fields.category, DEFAULT_CATEGORY);
        assert_eq!(entry.icon_or("/icon-192.png"), "/icon-192.png");
    }

    #[test]
    fn from_document_rejects_mistyped_fields() {
        let document = Document {
            id: "a".to_string(),
            fields: match json!({"title": 42}) {
                Value::Object(map) => map,
                _ => unreachable!(),
            },
        };
        assert!(WebsiteEntry::from_document(document).is_err());
    }
}
