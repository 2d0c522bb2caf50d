use crate::ast::StageGuard;
use crate::backend::{TemplateBackend, VariableSource};
use crate::config::{FallbackPolicy, TemplateConfig};
use crate::error::{BackendError, EvaluationError};
use crate::model::LogicBlock;
use crate::trace::TraceFormatter;
use itertools::Itertools;
use tracing::{debug, warn};

mod engine;

use engine::GuardEngine;

/// Which branch of a block the simulator picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Stage {
        index: usize,
        id: String,
        name: String,
    },
    Default,
}

/// The simulated result for one active block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    pub block_id: String,
    pub block_name: String,
    pub selection: Selection,
    /// The branch body as the template would emit it (trailing whitespace removed).
    pub content: String,
    /// A human-readable explanation of why this branch was selected.
    pub reason: String,
}

/// The result of an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationResult {
    /// One entry per enabled block with stages, in model order.
    pub outcomes: Vec<BlockOutcome>,
    /// The combined preview text, laid out the way the rendered template would be.
    pub content: String,
}

impl EvaluationResult {
    pub fn outcome(&self, block_id: &str) -> Option<&BlockOutcome> {
        self.outcomes.iter().find(|o| o.block_id == block_id)
    }
}

struct LoweredStage {
    id: String,
    name: String,
    content: String,
    guard: StageGuard,
}

struct LoweredBlock {
    id: String,
    name: String,
    default_content: String,
    stages: Vec<LoweredStage>,
}

/// Simulates which stage each block selects, straight from the block model.
///
/// An `Evaluator` is built from a snapshot of the blocks: later edits to the
/// model do not affect it, and it can be reused for any number of value maps.
pub struct Evaluator {
    blocks: Vec<LoweredBlock>,
    /// Default content of the first enabled block, used by [`FallbackPolicy::FirstEnabledBlock`].
    first_enabled_default: Option<String>,
    config: TemplateConfig,
}

impl Evaluator {
    /// Creates an evaluator over the active blocks of `blocks`.
    pub fn new(blocks: &[LogicBlock], config: TemplateConfig) -> Self {
        let first_enabled_default = blocks
            .iter()
            .find(|b| b.enabled)
            .map(|b| config.body(&b.default_content).to_string());

        let lowered = blocks
            .iter()
            .filter(|b| b.is_active())
            .map(|b| LoweredBlock {
                id: b.id.clone(),
                name: b.name.clone(),
                default_content: config.body(&b.default_content).to_string(),
                stages: b
                    .stages
                    .iter()
                    .map(|s| LoweredStage {
                        id: s.id.clone(),
                        name: s.name.clone(),
                        content: config.body(&s.content).to_string(),
                        guard: StageGuard::lower(s),
                    })
                    .collect(),
            })
            .collect();

        Self {
            blocks: lowered,
            first_enabled_default,
            config,
        }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Evaluates every active block against the sampled values.
    ///
    /// Within a block the first stage whose guard holds wins, exactly like the
    /// compiled `if`/`else if` chain. A block where nothing matches falls back
    /// according to the configured [`FallbackPolicy`].
    pub fn eval<V: VariableSource + ?Sized>(&self, values: &V) -> EvaluationResult {
        let outcomes: Vec<BlockOutcome> = self
            .blocks
            .iter()
            .map(|block| self.eval_block(block, values))
            .collect();

        let content = outcomes
            .iter()
            .map(|o| {
                if o.content.is_empty() {
                    String::new()
                } else {
                    format!("{}\n", o.content)
                }
            })
            .join("\n")
            .trim()
            .to_string();

        EvaluationResult { outcomes, content }
    }

    /// Evaluates a single block, `None` if it is not an active block of this snapshot.
    pub fn select<V: VariableSource + ?Sized>(
        &self,
        block_id: &str,
        values: &V,
    ) -> Option<BlockOutcome> {
        self.blocks
            .iter()
            .find(|b| b.id == block_id)
            .map(|block| self.eval_block(block, values))
    }

    fn eval_block<V: VariableSource + ?Sized>(&self, block: &LoweredBlock, values: &V) -> BlockOutcome {
        let engine = GuardEngine::new(values, &self.config);

        for (index, stage) in block.stages.iter().enumerate() {
            let trace = engine.evaluate(&stage.guard);
            if trace.is_true() {
                debug!(block = %block.id, stage = %stage.id, index, "stage selected");
                return BlockOutcome {
                    block_id: block.id.clone(),
                    block_name: block.name.clone(),
                    selection: Selection::Stage {
                        index,
                        id: stage.id.clone(),
                        name: stage.name.clone(),
                    },
                    content: stage.content.clone(),
                    reason: TraceFormatter::format_trace(&trace),
                };
            }
        }

        let content = match self.config.fallback_policy {
            FallbackPolicy::FirstEnabledBlock => self
                .first_enabled_default
                .clone()
                .unwrap_or_else(|| block.default_content.clone()),
            FallbackPolicy::PerBlock => block.default_content.clone(),
        };
        debug!(block = %block.id, policy = ?self.config.fallback_policy, "no stage matched");

        BlockOutcome {
            block_id: block.id.clone(),
            block_name: block.name.clone(),
            selection: Selection::Default,
            content,
            reason: "No stage matched".to_string(),
        }
    }

    /// Produces the preview an author sees.
    ///
    /// With a backend, the compiled `template` is rendered and its trimmed
    /// output wins when non-empty; an empty render (or no backend) falls back
    /// to the simulated content. Failures never escape: they are returned as a
    /// diagnostic string in place of the content.
    pub fn preview<V: VariableSource>(
        &self,
        backend: Option<&dyn TemplateBackend>,
        template: &str,
        values: &V,
    ) -> String {
        match self.try_preview(backend, template, values) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "preview failed");
                format!("Preview error: {}", e)
            }
        }
    }

    /// Like [`Evaluator::preview`], but hands the failure back to the caller.
    pub fn try_preview<V: VariableSource>(
        &self,
        backend: Option<&dyn TemplateBackend>,
        template: &str,
        values: &V,
    ) -> Result<String, EvaluationError> {
        if let Some(backend) = backend {
            if !template.is_empty() {
                let rendered = backend.render(template, values).map_err(|e| match e {
                    BackendError::Unavailable(_) => {
                        EvaluationError::BackendUnavailable(backend.name().to_string())
                    }
                    other => EvaluationError::Render(other),
                })?;
                let rendered = rendered.trim();
                if !rendered.is_empty() {
                    return Ok(rendered.to_string());
                }
            }
        }
        Ok(self.eval(values).content)
    }
}
