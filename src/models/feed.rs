//! Feed wire envelopes.
//!
//! The feed endpoint streams one JSON envelope per line:
//!
//! ```text
//! {"type":"meta","d":{"generatedAt":"...","logos":{...}}}
//! {"type":"job","d":{ ...job record... }}
//! {"type":"done"}
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::JobRecord;

/// One line of the NDJSON feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "d", rename_all = "lowercase")]
pub enum Envelope {
    /// Feed-level metadata, announced once per stream
    Meta(FeedMeta),
    /// One job record
    Job(Box<JobRecord>),
    /// Terminal marker; carries no payload
    Done,
    /// Forward compatibility: unknown tags are ignored
    #[serde(other)]
    Unknown,
}

/// Feed-level metadata delivered in the `meta` envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMeta {
    /// Feed generation timestamp (informational)
    #[serde(default)]
    pub generated_at: Option<String>,

    /// Normalized company name -> opaque logo identifier
    #[serde(default)]
    pub logos: HashMap<String, String>,
}

impl FeedMeta {
    /// Look up a logo id for a company display name.
    ///
    /// Absence of an entry is not an error; logos are decoration only.
    pub fn logo_for(&self, company: &str) -> Option<&str> {
        self.logos.get(&normalize_company(company)).map(String::as_str)
    }
}

/// Normalize a company name to the logo-map key form: case-folded, all
/// non-alphanumeric characters stripped.
pub fn normalize_company(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_company("Acme, Inc."), "acmeinc");
        assert_eq!(normalize_company("Ökta GmbH"), "öktagmbh");
        assert_eq!(normalize_company("  "), "");
    }

    #[test]
    fn logo_lookup_uses_normalized_key() {
        let meta = FeedMeta {
            generated_at: None,
            logos: HashMap::from([("acmeinc".to_string(), "logo-17".to_string())]),
        };
        assert_eq!(meta.logo_for("Acme, Inc."), Some("logo-17"));
        assert_eq!(meta.logo_for("Other Co"), None);
    }

    #[test]
    fn envelope_tags_deserialize() {
        let meta: Envelope =
            serde_json::from_str(r#"{"type":"meta","d":{"logos":{"acme":"l1"}}}"#).unwrap();
        assert!(matches!(meta, Envelope::Meta(_)));

        let job: Envelope = serde_json::from_str(
            r#"{"type":"job","d":{"id":"1","title":"Dev","company":"Acme"}}"#,
        )
        .unwrap();
        assert!(matches!(job, Envelope::Job(_)));

        let done: Envelope = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert!(matches!(done, Envelope::Done));

        let unknown: Envelope = serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap();
        assert!(matches!(unknown, Envelope::Unknown));
    }
}
