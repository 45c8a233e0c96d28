use serde::{Deserialize, Serialize};

/// One imported CSV row on its way through the catalog queue.
///
/// `price` and `count` are `None` when the source column was absent or not numeric; they
/// serialise as JSON `null` and are rejected by the consumer. The message carries no id, so a
/// redelivered message is indistinguishable from a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub count: Option<f64>,
}
