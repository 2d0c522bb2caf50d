use super::Value;

/// A record of how a stage guard was evaluated, including the sampled values.
#[derive(Debug, Clone)]
pub enum EvaluationTrace {
    BinaryOp {
        op_symbol: &'static str,
        left: Box<EvaluationTrace>,
        right: Box<EvaluationTrace>,
        outcome: Value,
    },
    /// A variable read; `source` is the accessor call as it appears in the template.
    Input {
        source: String,
        value: Value,
    },
    Leaf {
        source: String,
        value: Value,
    },
    /// A stage with no effective condition.
    Always,
    NotEvaluated,
}

impl EvaluationTrace {
    pub fn get_outcome(&self) -> Value {
        match self {
            EvaluationTrace::BinaryOp { outcome, .. } => outcome.clone(),
            EvaluationTrace::Input { value, .. } | EvaluationTrace::Leaf { value, .. } => {
                value.clone()
            }
            EvaluationTrace::Always => Value::Bool(true),
            EvaluationTrace::NotEvaluated => Value::Undefined,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self.get_outcome(), Value::Bool(true))
    }

    pub fn precedence(&self) -> u8 {
        match self {
            EvaluationTrace::BinaryOp { op_symbol, .. } => match *op_symbol {
                "||" => 1,
                "&&" => 2,
                "==" | "===" | "!==" => 4,
                ">" | ">=" | "<" | "<=" => 5,
                _ => 0,
            },
            EvaluationTrace::Input { .. }
            | EvaluationTrace::Leaf { .. }
            | EvaluationTrace::Always
            | EvaluationTrace::NotEvaluated => 9,
        }
    }
}
