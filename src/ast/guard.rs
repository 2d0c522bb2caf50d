use super::{Bound, Comparison, Literal};
use crate::model::{Condition, Stage};

/// One primitive comparison after lowering a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// The variable path as authored, without any accessor prefix.
    pub path: String,
    pub comparison: Comparison,
    pub operand: Literal,
}

/// The conjunction of every predicate lowered from one condition group.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateGroup {
    pub group_id: String,
    pub predicates: Vec<Predicate>,
}

/// The effective condition of a stage: the OR of its non-empty groups.
///
/// Lowering drops conditions with no comparison (unknown operators) and then
/// groups left with no predicates, so a guard with no groups is always true.
/// The compiler and the simulator both start from this value, which keeps the
/// group filtering rules identical on the two paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageGuard {
    pub groups: Vec<PredicateGroup>,
}

impl StageGuard {
    pub fn lower(stage: &Stage) -> Self {
        let groups = stage
            .condition_groups
            .iter()
            .map(|group| PredicateGroup {
                group_id: group.id.clone(),
                predicates: group
                    .conditions
                    .iter()
                    .flat_map(Self::lower_condition)
                    .collect(),
            })
            .filter(|group| !group.predicates.is_empty())
            .collect();
        Self { groups }
    }

    pub fn is_always(&self) -> bool {
        self.groups.is_empty()
    }

    /// Expands a single condition into its predicates; empty for unknown operators.
    pub fn lower_condition(condition: &Condition) -> Vec<Predicate> {
        let Some(comparisons) = condition.operator.comparisons() else {
            return Vec::new();
        };
        comparisons
            .iter()
            .map(|(comparison, bound)| Predicate {
                path: condition.variable_path.clone(),
                comparison: *comparison,
                operand: match bound {
                    Bound::Value => Literal::classify(condition.value.as_deref()),
                    Bound::EndValue => Literal::classify(condition.end_value.as_deref()),
                },
            })
            .collect()
    }
}
