use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BaselineId, BaselineKind, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub design_item_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSummary {
    pub id: BaselineId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub configuration_item_id: ProductId,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, rename = "type")]
    pub kind: BaselineKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineCreationRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub configuration_item_id: ProductId,
    #[serde(rename = "type")]
    pub kind: BaselineKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineDuplicationRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Flags sent with a part import, read from the import form at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    pub auto_checkout: bool,
    pub auto_checkin: bool,
    pub permissive_update: bool,
    pub revision_note: String,
}

impl ImportOptions {
    /// Query parameters in the order the import endpoint documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("autoCheckout", self.auto_checkout.to_string()),
            ("autoCheckin", self.auto_checkin.to_string()),
            ("permissiveUpdate", self.permissive_update.to_string()),
            ("revisionNote", self.revision_note.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_summary_reads_server_payload() {
        let raw = r#"{
            "id": 7,
            "name": "release-1",
            "configurationItemId": "ENGINE",
            "creationDate": 1700000000000,
            "type": "RELEASED"
        }"#;
        let baseline: BaselineSummary = serde_json::from_str(raw).expect("decode");
        assert_eq!(baseline.id, BaselineId(7));
        assert_eq!(baseline.configuration_item_id.as_str(), "ENGINE");
        assert_eq!(baseline.kind, BaselineKind::Released);
        assert_eq!(
            baseline.creation_date.map(|date| date.timestamp_millis()),
            Some(1_700_000_000_000)
        );
        assert_eq!(baseline.description, None);
    }

    #[test]
    fn product_list_only_needs_ids() {
        let products: Vec<ProductSummary> =
            serde_json::from_str(r#"[{"id":"ENGINE"},{"id":"WING","description":"left"}]"#)
                .expect("decode");
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["ENGINE", "WING"]);
    }

    #[test]
    fn import_options_render_every_flag() {
        let options = ImportOptions {
            auto_checkout: true,
            auto_checkin: false,
            permissive_update: true,
            revision_note: "bulk update".into(),
        };
        let pairs = options.query_pairs();
        assert_eq!(pairs[0], ("autoCheckout", "true".to_string()));
        assert_eq!(pairs[1], ("autoCheckin", "false".to_string()));
        assert_eq!(pairs[2], ("permissiveUpdate", "true".to_string()));
        assert_eq!(pairs[3], ("revisionNote", "bulk update".to_string()));
    }
}
