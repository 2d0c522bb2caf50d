use serde::{Deserialize, Deserializer, Serialize};

/// A named set of mutually exclusive stages plus a fallback body.
///
/// Stage order is match priority: the compiled `if`/`else if` chain and the
/// simulator both pick the first stage whose guard holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicBlock {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default, alias = "defaultStageContent")]
    pub default_content: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl LogicBlock {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stages: Vec::new(),
            default_content: String::new(),
            enabled: true,
        }
    }

    pub fn with_default(mut self, content: impl Into<String>) -> Self {
        self.default_content = content.into();
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    pub fn stage_mut(&mut self, stage_id: &str) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.id == stage_id)
    }

    /// Blocks that are disabled or have no stages produce no output at all.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.stages.is_empty()
    }
}

/// One priority-ordered alternative inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub condition_groups: Vec<ConditionGroup>,
    #[serde(default)]
    pub content: String,
}

impl Stage {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            condition_groups: Vec::new(),
            content: content.into(),
        }
    }

    pub fn with_group(mut self, group: ConditionGroup) -> Self {
        self.condition_groups.push(group);
        self
    }

    pub fn group(&self, group_id: &str) -> Option<&ConditionGroup> {
        self.condition_groups.iter().find(|g| g.id == group_id)
    }
}

/// A conjunction of conditions. Groups within a stage are OR'd together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ConditionGroup {
    pub fn new(id: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self {
            id: id.into(),
            conditions,
        }
    }
}

/// A single comparison of a state variable against one or two operands.
///
/// Operands are kept exactly as the author typed them; whether they are
/// numbers or strings is decided later by [`crate::ast::Literal::classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub id: String,
    pub variable_path: String,
    #[serde(rename = "type", alias = "operator")]
    pub operator: ConditionOperator,
    #[serde(default, deserialize_with = "deserialize_operand")]
    pub value: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_operand"
    )]
    pub end_value: Option<String>,
}

impl Condition {
    pub fn new(
        variable_path: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            variable_path: variable_path.into(),
            operator,
            value: Some(value.into()),
            end_value: None,
        }
    }

    /// A `RANGE` condition: `start` is inclusive, `end` is exclusive.
    pub fn range(
        variable_path: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            variable_path: variable_path.into(),
            operator: ConditionOperator::Range,
            value: Some(start.into()),
            end_value: Some(end.into()),
        }
    }
}

/// The comparison an author picked for a condition.
///
/// Names follow the editor's wire format (`less`, `greaterEqual`, `isNot`...).
/// Any operator name this crate does not know deserializes to `Unknown`, which
/// both the compiler and the simulator treat as an always-true condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Less,
    LessEqual,
    Equal,
    Greater,
    GreaterEqual,
    Range,
    Is,
    IsNot,
    #[serde(other)]
    Unknown,
}

/// Operands arrive as strings from the editor but older exports store plain
/// JSON numbers and booleans, so accept any scalar and keep its text form.
fn deserialize_operand<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
