use crate::ast::{EvaluationTrace, Literal, Predicate, PredicateGroup, StageGuard, Value};
use crate::backend::VariableSource;
use crate::config::TemplateConfig;

/// Evaluates lowered stage guards against sampled values.
///
/// This never looks at generated template text: it walks the same
/// [`StageGuard`] the compiler prints, with the same short-circuit order.
pub(super) struct GuardEngine<'a, V: VariableSource + ?Sized> {
    values: &'a V,
    config: &'a TemplateConfig,
}

impl<'a, V: VariableSource + ?Sized> GuardEngine<'a, V> {
    pub(super) fn new(values: &'a V, config: &'a TemplateConfig) -> Self {
        Self { values, config }
    }

    /// Evaluates the guard and returns a trace of the execution.
    pub(super) fn evaluate(&self, guard: &StageGuard) -> EvaluationTrace {
        self.chain("||", &guard.groups, |group| self.evaluate_group(group))
    }

    fn evaluate_group(&self, group: &PredicateGroup) -> EvaluationTrace {
        self.chain("&&", &group.predicates, |p| self.evaluate_predicate(p))
    }

    fn evaluate_predicate(&self, predicate: &Predicate) -> EvaluationTrace {
        let qualified = self.config.qualified_path(&predicate.path);
        let live = self
            .values
            .get(&qualified)
            .cloned()
            .unwrap_or(Value::Undefined);
        let outcome = predicate.comparison.holds(&live, &predicate.operand);

        EvaluationTrace::BinaryOp {
            op_symbol: predicate.comparison.symbol(),
            left: Box::new(EvaluationTrace::Input {
                source: self.config.accessor_call(&predicate.path),
                value: live,
            }),
            right: Box::new(EvaluationTrace::Leaf {
                source: predicate.operand.to_source(),
                value: literal_value(&predicate.operand),
            }),
            outcome: Value::Bool(outcome),
        }
    }

    /// Left-folds `items` with a short-circuiting logical operator. An empty
    /// slice is the identity of the whole guard: always true.
    fn chain<T>(
        &self,
        op_symbol: &'static str,
        items: &[T],
        eval: impl Fn(&T) -> EvaluationTrace,
    ) -> EvaluationTrace {
        let short_circuit_on = op_symbol == "||";
        let Some((first, rest)) = items.split_first() else {
            return EvaluationTrace::Always;
        };

        let mut acc = eval(first);
        for item in rest {
            if acc.is_true() == short_circuit_on {
                return EvaluationTrace::BinaryOp {
                    op_symbol,
                    left: Box::new(acc),
                    right: Box::new(EvaluationTrace::NotEvaluated),
                    outcome: Value::Bool(short_circuit_on),
                };
            }
            let right = eval(item);
            let outcome = Value::Bool(right.is_true());
            acc = EvaluationTrace::BinaryOp {
                op_symbol,
                left: Box::new(acc),
                right: Box::new(right),
                outcome,
            };
        }
        acc
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number { value, .. } => Value::Number(*value),
        Literal::Text(s) => Value::Text(s.clone()),
    }
}
