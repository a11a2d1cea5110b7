use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One suggested learning resource as returned by the resource agent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceItem {
    pub topic_name: String,
    /// Resource kind, e.g. "video", "article", "leetcode", "notes".
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceResponse {
    pub suggestions: Vec<ResourceItem>,
}

/// A persisted catalog entry, independent of any student.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceRecord {
    pub id: i64,
    pub topic_name: String,
    pub subject: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub description: String,
}
