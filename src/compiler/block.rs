use super::condition::render_guard;
use crate::ast::StageGuard;
use crate::config::TemplateConfig;
use crate::error::CompileError;
use crate::model::LogicBlock;
use ahash::AHashSet;
use std::fmt::Write;

/// Emits the `if`/`else if`/`else` chain for one block.
///
/// Returns `None` for blocks that contribute nothing (disabled, or no stages).
pub(super) fn compile_block(
    block: &LogicBlock,
    config: &TemplateConfig,
) -> Result<Option<String>, CompileError> {
    if !block.is_active() {
        return Ok(None);
    }

    let mut seen = AHashSet::new();
    let mut out = String::new();
    for (index, stage) in block.stages.iter().enumerate() {
        if !seen.insert(stage.id.as_str()) {
            return Err(CompileError::DuplicateStageId {
                block_id: block.id.clone(),
                stage_id: stage.id.clone(),
            });
        }

        let condition = render_guard(&StageGuard::lower(stage), config);
        if index == 0 {
            writeln!(out, "<%_ if ({}) {{ _%>", condition)?;
        } else {
            writeln!(out, "<%_ }} else if ({}) {{ _%>", condition)?;
        }
        write_body(&mut out, config.body(&stage.content))?;
    }

    writeln!(out, "<%_ }} else {{ _%>")?;
    write_body(&mut out, config.body(&block.default_content))?;
    writeln!(out, "<%_ }} _%>")?;

    Ok(Some(out))
}

/// Writes a branch body followed by exactly one newline; empty bodies are skipped.
fn write_body(out: &mut String, body: &str) -> Result<(), CompileError> {
    if !body.is_empty() {
        writeln!(out, "{}", body)?;
    }
    Ok(())
}
