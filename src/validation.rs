use crate::ast::StageGuard;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{ConditionOperator, LogicBlock};
use crate::variables::VariableCatalog;
use ahash::AHashSet;

/// Checks a block model for authoring mistakes that compile but are almost
/// certainly unintended. Every finding is a `stage` diagnostic; nothing here
/// stops compilation except duplicate stage ids, which the compiler rejects too.
pub fn validate(blocks: &[LogicBlock], catalog: Option<&VariableCatalog>) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    let mut report = |message: String| found.push(Diagnostic::new(DiagnosticKind::Stage, message));

    for block in blocks {
        let mut stage_ids = AHashSet::new();
        let mut shadowed_by: Option<&str> = None;

        for stage in &block.stages {
            if !stage_ids.insert(stage.id.as_str()) {
                report(format!(
                    "Block '{}' has more than one stage with id '{}'",
                    block.name, stage.id
                ));
            }

            if let Some(winner) = shadowed_by {
                report(format!(
                    "Stage '{}' in block '{}' can never match: stage '{}' before it has no conditions",
                    stage.name, block.name, winner
                ));
            } else if StageGuard::lower(stage).is_always() {
                shadowed_by = Some(stage.name.as_str());
            }

            let mut group_ids = AHashSet::new();
            for group in &stage.condition_groups {
                if !group_ids.insert(group.id.as_str()) {
                    report(format!(
                        "Stage '{}' has more than one condition group with id '{}'",
                        stage.name, group.id
                    ));
                }

                for condition in &group.conditions {
                    let missing_end = condition
                        .end_value
                        .as_deref()
                        .is_none_or(|v| v.trim().is_empty());
                    if condition.operator == ConditionOperator::Range && missing_end {
                        report(format!(
                            "Range condition on '{}' in stage '{}' has no end value",
                            condition.variable_path, stage.name
                        ));
                    }
                    if condition.operator == ConditionOperator::Unknown {
                        report(format!(
                            "Condition on '{}' in stage '{}' has an unknown operator and always holds",
                            condition.variable_path, stage.name
                        ));
                    }
                    if let Some(catalog) = catalog {
                        if !catalog.contains_path(&condition.variable_path) {
                            report(format!(
                                "Stage '{}' reads unknown variable '{}'",
                                stage.name, condition.variable_path
                            ));
                        }
                    }
                }
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, ConditionGroup, Stage};

    fn stage(id: &str, conditions: Vec<Condition>) -> Stage {
        Stage::new(id, id, "body").with_group(ConditionGroup::new("g", conditions))
    }

    #[test]
    fn unconditional_stage_shadows_the_rest() {
        let block = LogicBlock::new("b", "Block")
            .with_stage(stage("open", vec![]))
            .with_stage(stage(
                "late",
                vec![Condition::new("x", ConditionOperator::Less, "5")],
            ));
        let found = validate(&[block], None);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("'late'"));
    }

    #[test]
    fn range_without_end_is_reported() {
        let mut condition = Condition::range("x", "1", "");
        condition.end_value = None;
        let block = LogicBlock::new("b", "Block").with_stage(stage("s", vec![condition]));
        let found = validate(&[block], None);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("no end value"));
    }

    #[test]
    fn unknown_paths_need_a_catalog() {
        let block = LogicBlock::new("b", "Block").with_stage(stage(
            "s",
            vec![Condition::new("hp", ConditionOperator::Greater, "1")],
        ));
        assert!(validate(std::slice::from_ref(&block), None).is_empty());

        let catalog = VariableCatalog::from_yaml("mp: [10, mana]").unwrap();
        let found = validate(&[block], Some(&catalog));
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("'hp'"));
    }
}
