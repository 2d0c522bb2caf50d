use crate::ast::{Predicate, PredicateGroup, StageGuard};
use crate::config::TemplateConfig;
use crate::model::Condition;
use itertools::Itertools;

/// The condition text used when nothing constrains a stage.
pub const ALWAYS_TRUE: &str = "true";

/// Renders one condition as a boolean template expression.
///
/// Conditions whose operator has no comparison render as [`ALWAYS_TRUE`].
pub fn compile_condition(condition: &Condition, config: &TemplateConfig) -> String {
    let predicates = StageGuard::lower_condition(condition);
    if predicates.is_empty() {
        return ALWAYS_TRUE.to_string();
    }
    predicates
        .iter()
        .map(|p| render_predicate(p, config))
        .join(" && ")
}

pub(super) fn render_predicate(predicate: &Predicate, config: &TemplateConfig) -> String {
    format!(
        "{} {} {}",
        config.accessor_call(&predicate.path),
        predicate.comparison.symbol(),
        predicate.operand.to_source()
    )
}

fn render_group(group: &PredicateGroup, config: &TemplateConfig) -> String {
    group
        .predicates
        .iter()
        .map(|p| render_predicate(p, config))
        .join(" && ")
}

/// Renders a stage guard: groups are OR'd, and parenthesized only when there
/// is more than one of them.
pub fn render_guard(guard: &StageGuard, config: &TemplateConfig) -> String {
    match guard.groups.as_slice() {
        [] => ALWAYS_TRUE.to_string(),
        [single] => render_group(single, config),
        groups => groups
            .iter()
            .map(|g| format!("({})", render_group(g, config)))
            .join(" || "),
    }
}
