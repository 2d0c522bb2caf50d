use super::LogicBlock;
use serde::{Deserialize, Serialize};

/// A named snapshot of a whole block list, so an author can keep several
/// alternative stage layouts for the same variables and switch between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageScheme {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub logic_blocks: Vec<LogicBlock>,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
}
