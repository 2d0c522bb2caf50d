//! Structural editing of a block model.
//!
//! Every mutation that can change the generated template recompiles before it
//! returns, so [`Editor::template`] always reflects the current blocks (or, if
//! the last compilation failed, the last good output plus a `template`
//! diagnostic).

use crate::backend::{TemplateBackend, VariableSource};
use crate::compiler::Compiler;
use crate::config::TemplateConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::EditorError;
use crate::evaluator::Evaluator;
use crate::model::{ConditionGroup, LogicBlock, Stage, StageScheme};
use crate::validation;
use crate::variables::VariableCatalog;
use ahash::AHashSet;
use tracing::{debug, info, warn};

mod scheme;

/// Content given to a freshly added block's fallback branch.
pub const DEFAULT_BLOCK_CONTENT: &str = "// default";

/// The stage currently open for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSelection {
    pub block_id: String,
    pub stage_id: String,
}

/// A partial update of a block's own fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BlockUpdate {
    pub name: Option<String>,
    pub default_content: Option<String>,
    pub enabled: Option<bool>,
}

/// A partial update of a stage. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct StageUpdate {
    pub name: Option<String>,
    pub content: Option<String>,
    pub condition_groups: Option<Vec<ConditionGroup>>,
}

pub struct Editor {
    blocks: Vec<LogicBlock>,
    compiler: Compiler,
    template: String,
    diagnostics: Diagnostics,
    selection: Option<StageSelection>,
    schemes: Vec<StageScheme>,
    current_scheme: Option<String>,
    catalog: VariableCatalog,
    next_id: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(TemplateConfig::default())
    }
}

impl Editor {
    pub fn new(config: TemplateConfig) -> Self {
        Self::with_blocks(Vec::new(), config)
    }

    pub fn with_blocks(blocks: Vec<LogicBlock>, config: TemplateConfig) -> Self {
        let mut editor = Self {
            blocks,
            compiler: Compiler::new(config),
            template: String::new(),
            diagnostics: Diagnostics::new(),
            selection: None,
            schemes: Vec::new(),
            current_scheme: None,
            catalog: VariableCatalog::default(),
            next_id: 1,
        };
        editor.select_first_stage();
        editor.recompile();
        editor
    }

    pub fn blocks(&self) -> &[LogicBlock] {
        &self.blocks
    }

    pub fn block(&self, block_id: &str) -> Option<&LogicBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// The generated template source for the current model.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn config(&self) -> &TemplateConfig {
        self.compiler.config()
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> Option<&StageSelection> {
        self.selection.as_ref()
    }

    pub fn selected_stage(&self) -> Option<&Stage> {
        let selection = self.selection.as_ref()?;
        self.block(&selection.block_id)?.stage(&selection.stage_id)
    }

    /// Replaces the whole model, e.g. after an import.
    pub fn set_blocks(&mut self, blocks: Vec<LogicBlock>) {
        info!(blocks = blocks.len(), "replacing block model");
        self.blocks = blocks;
        self.select_first_stage();
        self.recompile();
    }

    /// Appends an empty block and returns its id.
    pub fn add_block(&mut self) -> String {
        let id = self.fresh_id("block");
        let block = LogicBlock::new(id.clone(), format!("Block {}", self.blocks.len() + 1))
            .with_default(DEFAULT_BLOCK_CONTENT);
        self.blocks.push(block);
        info!(block = %id, "added block");
        self.recompile();
        id
    }

    pub fn remove_block(&mut self, block_id: &str) -> Result<LogicBlock, EditorError> {
        let index = self.block_index(block_id)?;
        let removed = self.blocks.remove(index);
        if self
            .selection
            .as_ref()
            .is_some_and(|s| s.block_id == block_id)
        {
            self.selection = None;
        }
        info!(block = %block_id, "removed block");
        self.recompile();
        Ok(removed)
    }

    pub fn update_block(&mut self, block_id: &str, update: BlockUpdate) -> Result<(), EditorError> {
        let index = self.block_index(block_id)?;
        let block = &mut self.blocks[index];
        if let Some(name) = update.name {
            block.name = name;
        }
        if let Some(content) = update.default_content {
            block.default_content = content;
        }
        if let Some(enabled) = update.enabled {
            block.enabled = enabled;
        }
        info!(block = %block_id, "updated block");
        self.recompile();
        Ok(())
    }

    /// Appends a stage with one empty condition group, selects it and returns its id.
    pub fn add_stage(&mut self, block_id: &str) -> Result<String, EditorError> {
        let index = self.block_index(block_id)?;
        let stage_id = self.fresh_id("stage");
        let group_id = self.fresh_id("group");

        let block = &mut self.blocks[index];
        let stage = Stage::new(
            stage_id.clone(),
            format!("Stage {}", block.stages.len() + 1),
            "",
        )
        .with_group(ConditionGroup::new(group_id, Vec::new()));
        block.stages.push(stage);

        self.selection = Some(StageSelection {
            block_id: block_id.to_string(),
            stage_id: stage_id.clone(),
        });
        info!(block = %block_id, stage = %stage_id, "added stage");
        self.recompile();
        Ok(stage_id)
    }

    pub fn remove_stage(&mut self, block_id: &str, stage_id: &str) -> Result<Stage, EditorError> {
        let (block_index, stage_index) = self.stage_index(block_id, stage_id)?;
        let block = &mut self.blocks[block_index];
        let removed = block.stages.remove(stage_index);

        let was_selected = self
            .selection
            .as_ref()
            .is_some_and(|s| s.block_id == block_id && s.stage_id == stage_id);
        if was_selected {
            self.selection = block.stages.first().map(|s| StageSelection {
                block_id: block_id.to_string(),
                stage_id: s.id.clone(),
            });
        }
        info!(block = %block_id, stage = %stage_id, "removed stage");
        self.recompile();
        Ok(removed)
    }

    pub fn update_stage(
        &mut self,
        block_id: &str,
        stage_id: &str,
        update: StageUpdate,
    ) -> Result<(), EditorError> {
        let (block_index, stage_index) = self.stage_index(block_id, stage_id)?;

        if let Some(groups) = &update.condition_groups {
            let mut seen = AHashSet::new();
            if let Some(duplicate) = groups.iter().find(|g| !seen.insert(g.id.as_str())) {
                return Err(EditorError::DuplicateGroupId {
                    stage_id: stage_id.to_string(),
                    group_id: duplicate.id.clone(),
                });
            }
        }

        let stage = &mut self.blocks[block_index].stages[stage_index];
        if let Some(name) = update.name {
            stage.name = name;
        }
        if let Some(content) = update.content {
            stage.content = content;
        }
        if let Some(groups) = update.condition_groups {
            stage.condition_groups = groups;
        }
        info!(block = %block_id, stage = %stage_id, "updated stage");
        self.recompile();
        Ok(())
    }

    /// Reorders a block's stages to match `order`, which must list every stage id exactly once.
    pub fn reorder_stages(&mut self, block_id: &str, order: &[&str]) -> Result<(), EditorError> {
        let index = self.block_index(block_id)?;
        let block = &mut self.blocks[index];

        let invalid = |message: String| EditorError::InvalidStageOrder {
            block_id: block_id.to_string(),
            message,
        };
        if order.len() != block.stages.len() {
            return Err(invalid(format!(
                "expected {} stage ids, got {}",
                block.stages.len(),
                order.len()
            )));
        }

        let mut seen = AHashSet::new();
        if let Some(bad) = order
            .iter()
            .find(|id| !seen.insert(**id) || block.stage(id).is_none())
        {
            return Err(invalid(format!("unknown or repeated stage id '{}'", bad)));
        }

        let mut stages = std::mem::take(&mut block.stages);
        block.stages = order
            .iter()
            .filter_map(|id| {
                let position = stages.iter().position(|s| s.id == *id)?;
                Some(stages.swap_remove(position))
            })
            .collect();

        info!(block = %block_id, "reordered stages");
        self.recompile();
        Ok(())
    }

    /// Moves the stage at `from` to position `to`, shifting the stages in between.
    pub fn move_stage(&mut self, block_id: &str, from: usize, to: usize) -> Result<(), EditorError> {
        let index = self.block_index(block_id)?;
        let block = &mut self.blocks[index];
        let len = block.stages.len();
        if from >= len || to >= len {
            return Err(EditorError::InvalidStageOrder {
                block_id: block_id.to_string(),
                message: format!("cannot move stage {} to {} in a block of {}", from, to, len),
            });
        }
        let stage = block.stages.remove(from);
        block.stages.insert(to, stage);
        info!(block = %block_id, from, to, "moved stage");
        self.recompile();
        Ok(())
    }

    pub fn select_stage(&mut self, block_id: &str, stage_id: &str) -> Result<(), EditorError> {
        self.stage_index(block_id, stage_id)?;
        self.selection = Some(StageSelection {
            block_id: block_id.to_string(),
            stage_id: stage_id.to_string(),
        });
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Parses a YAML variable description into the catalog.
    ///
    /// On failure the catalog is emptied and a `yaml` diagnostic is recorded.
    pub fn load_variables(&mut self, yaml: &str) -> bool {
        match VariableCatalog::from_yaml(yaml) {
            Ok(catalog) => {
                debug!(variables = catalog.flat_variables().len(), "loaded variable catalog");
                self.catalog = catalog;
                self.diagnostics.clear_kind(DiagnosticKind::Yaml);
                true
            }
            Err(e) => {
                warn!(error = %e, "variable YAML rejected");
                self.catalog = VariableCatalog::default();
                self.diagnostics.replace_kind(
                    DiagnosticKind::Yaml,
                    [Diagnostic::new(DiagnosticKind::Yaml, e.to_string())],
                );
                false
            }
        }
    }

    /// Runs model validation and stores the findings as `stage` diagnostics.
    pub fn validate(&mut self) -> Vec<Diagnostic> {
        let catalog = (!self.catalog.roots.is_empty()).then_some(&self.catalog);
        let found = validation::validate(&self.blocks, catalog);
        self.diagnostics
            .replace_kind(DiagnosticKind::Stage, found.iter().cloned());
        found
    }

    /// A simulator over a snapshot of the current blocks.
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(&self.blocks, self.config().clone())
    }

    pub fn preview<V: VariableSource>(
        &self,
        backend: Option<&dyn TemplateBackend>,
        values: &V,
    ) -> String {
        self.evaluator().preview(backend, &self.template, values)
    }

    fn recompile(&mut self) {
        match self.compiler.compile(&self.blocks) {
            Ok(compiled) => {
                self.template = compiled.source;
                self.diagnostics.clear_kind(DiagnosticKind::Template);
            }
            Err(e) => {
                warn!(error = %e, "template generation failed, keeping previous output");
                self.diagnostics.replace_kind(
                    DiagnosticKind::Template,
                    [Diagnostic::new(DiagnosticKind::Template, e.to_string())],
                );
            }
        }
    }

    fn select_first_stage(&mut self) {
        self.selection = self.blocks.first().and_then(|block| {
            block.stages.first().map(|stage| StageSelection {
                block_id: block.id.clone(),
                stage_id: stage.id.clone(),
            })
        });
    }

    fn block_index(&self, block_id: &str) -> Result<usize, EditorError> {
        self.blocks
            .iter()
            .position(|b| b.id == block_id)
            .ok_or_else(|| EditorError::BlockNotFound(block_id.to_string()))
    }

    fn stage_index(&self, block_id: &str, stage_id: &str) -> Result<(usize, usize), EditorError> {
        let block_index = self.block_index(block_id)?;
        let stage_index = self.blocks[block_index]
            .stages
            .iter()
            .position(|s| s.id == stage_id)
            .ok_or_else(|| EditorError::StageNotFound {
                block_id: block_id.to_string(),
                stage_id: stage_id.to_string(),
            })?;
        Ok((block_index, stage_index))
    }

    /// An id of the form `prefix_N` not used by any block, stage, group or scheme.
    fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            let id = format!("{}_{}", prefix, self.next_id);
            self.next_id += 1;
            if !self.id_in_use(&id) {
                return id;
            }
        }
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.schemes.iter().any(|s| s.id == id)
            || self.blocks.iter().any(|b| {
                b.id == id
                    || b.stages.iter().any(|s| {
                        s.id == id || s.condition_groups.iter().any(|g| g.id == id)
                    })
            })
    }
}
