use serde::{Deserialize, Serialize};

/// Code generation and preview settings shared by the compiler and the evaluator.
///
/// Both paths must read variables under the same qualified path, so the
/// accessor and prefix live here rather than on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateConfig {
    /// Name of the variable-access function the template calls.
    pub accessor: String,
    /// Prepended to every condition's variable path.
    pub path_prefix: String,
    /// Emitted instead of an empty stage or default body.
    pub empty_content_placeholder: Option<String>,
    pub fallback_policy: FallbackPolicy,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            accessor: "getvar".to_string(),
            path_prefix: "stat_data.".to_string(),
            empty_content_placeholder: None,
            fallback_policy: FallbackPolicy::default(),
        }
    }
}

impl TemplateConfig {
    /// The key a variable is looked up under at runtime.
    pub fn qualified_path(&self, variable_path: &str) -> String {
        format!("{}{}", self.path_prefix, variable_path)
    }

    /// The accessor call for a variable, exactly as it appears in the template.
    pub fn accessor_call(&self, variable_path: &str) -> String {
        let qualified = self.qualified_path(variable_path);
        format!(
            "{}('{}')",
            self.accessor,
            qualified.replace('\\', "\\\\").replace('\'', "\\'")
        )
    }

    /// The branch body as emitted: trailing whitespace removed, and the
    /// placeholder substituted when nothing is left.
    pub fn body<'a>(&'a self, content: &'a str) -> &'a str {
        let content = content.trim_end();
        match &self.empty_content_placeholder {
            Some(placeholder) if content.is_empty() => placeholder.trim_end(),
            _ => content,
        }
    }
}

/// What the simulator shows for a block in which no stage matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackPolicy {
    /// Use the default content of the first enabled block in the model, even
    /// when a different block is being evaluated.
    #[default]
    FirstEnabledBlock,
    /// Use the evaluated block's own default content, as the compiled template does.
    PerBlock,
}
