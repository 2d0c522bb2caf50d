use crate::config::TemplateConfig;
use crate::error::CompileError;
use crate::model::LogicBlock;
use itertools::Itertools;
use tracing::debug;

mod block;
pub mod condition;

pub use condition::{ALWAYS_TRUE, compile_condition, render_guard};

/// The template source generated for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledBlock {
    pub block_id: String,
    pub source: String,
}

/// The output of a compilation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledTemplate {
    /// The full template: active blocks in model order, separated by a blank
    /// line and trimmed.
    pub source: String,
    pub blocks: Vec<CompiledBlock>,
}

/// Turns a block model into directive-based template source.
///
/// Compilation is a pure function of the blocks and the configuration, so the
/// same input always yields byte-identical output.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: TemplateConfig,
}

pub struct CompilerBuilder {
    config: TemplateConfig,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            config: TemplateConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_accessor(mut self, accessor: &str) -> Self {
        self.config.accessor = accessor.to_string();
        self
    }

    pub fn with_path_prefix(mut self, prefix: &str) -> Self {
        self.config.path_prefix = prefix.to_string();
        self
    }

    pub fn with_empty_content_placeholder(mut self, placeholder: &str) -> Self {
        self.config.empty_content_placeholder = Some(placeholder.to_string());
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            config: self.config,
        }
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Compiles every block. Disabled blocks and blocks without stages are skipped.
    pub fn compile(&self, blocks: &[LogicBlock]) -> Result<CompiledTemplate, CompileError> {
        let mut compiled = Vec::new();
        for logic_block in blocks {
            match block::compile_block(logic_block, &self.config)? {
                Some(source) => {
                    debug!(
                        block = %logic_block.id,
                        stages = logic_block.stages.len(),
                        "compiled block"
                    );
                    compiled.push(CompiledBlock {
                        block_id: logic_block.id.clone(),
                        source,
                    });
                }
                None => debug!(block = %logic_block.id, "skipped inactive block"),
            }
        }

        let source = compiled
            .iter()
            .map(|b| b.source.as_str())
            .join("\n")
            .trim()
            .to_string();
        Ok(CompiledTemplate {
            source,
            blocks: compiled,
        })
    }

    /// Compiles a single block, `None` when it contributes nothing.
    pub fn compile_block(&self, block: &LogicBlock) -> Result<Option<String>, CompileError> {
        block::compile_block(block, &self.config)
    }
}
