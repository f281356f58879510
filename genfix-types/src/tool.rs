use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ToolInfo {
    pub fn genfix(version: &str) -> Self {
        Self {
            name: "genfix".to_string(),
            version: Some(version.to_string()),
        }
    }
}
