//! A small interpreter for the directive subset the block compiler emits.
//!
//! It exists so previews and tests can execute generated templates without an
//! external engine, and so the simulator can be checked against real output.

use super::{TemplateBackend, VariableSource};
use crate::config::TemplateConfig;
use crate::error::BackendError;
use tracing::trace;

mod parser;
mod scanner;
mod semantics;

use parser::Node;

/// Renders compiler output: `if`/`else if`/`else` directives with slurping
/// tags, guarded by comparisons on accessor calls.
#[derive(Debug, Clone)]
pub struct ReferenceRenderer {
    accessor: String,
}

impl ReferenceRenderer {
    pub fn new(accessor: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
        }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(config.accessor.clone())
    }

    fn render_nodes(
        &self,
        nodes: &[Node],
        context: &dyn VariableSource,
        out: &mut String,
    ) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::If {
                    branches,
                    otherwise,
                } => {
                    let taken = branches
                        .iter()
                        .find(|(condition, _)| {
                            semantics::truthy(&semantics::evaluate(condition, context))
                        })
                        .map(|(_, body)| body)
                        .unwrap_or(otherwise);
                    self.render_nodes(taken, context, out);
                }
            }
        }
    }
}

impl Default for ReferenceRenderer {
    fn default() -> Self {
        Self::from_config(&TemplateConfig::default())
    }
}

impl TemplateBackend for ReferenceRenderer {
    fn name(&self) -> &str {
        "reference"
    }

    fn render(&self, template: &str, context: &dyn VariableSource) -> Result<String, BackendError> {
        let segments = scanner::scan(template)?;
        let nodes = parser::parse(segments, &self.accessor)?;
        trace!(nodes = nodes.len(), "parsed template");

        let mut out = String::new();
        self.render_nodes(&nodes, context, &mut out);
        Ok(out)
    }
}
