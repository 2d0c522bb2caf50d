use super::{Literal, Value};
use crate::model::ConditionOperator;

/// Which operand of a condition a comparison reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Value,
    EndValue,
}

/// A primitive comparison between a state variable and a literal.
///
/// Every [`ConditionOperator`] lowers to one or more of these through
/// [`ConditionOperator::comparisons`]. The compiler prints [`Comparison::symbol`],
/// the simulator calls [`Comparison::holds`]; neither keeps its own operator switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// Coercing equality: `"7"` equals `7`.
    LooseEqual,
    /// Non-coercing equality: a number never equals a string.
    StrictEqual,
    /// Non-coercing inequality.
    StrictNotEqual,
}

/// Comparison mode used when both sides are not plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityMode {
    Coercing,
    Strict,
}

impl ConditionOperator {
    /// The comparisons this operator expands to, AND'd in order.
    ///
    /// `None` marks an operator with no comparison at all, which reduces to the
    /// always-true marker and is dropped from its group.
    pub fn comparisons(self) -> Option<&'static [(Comparison, Bound)]> {
        match self {
            ConditionOperator::Less => Some(&[(Comparison::Less, Bound::Value)]),
            ConditionOperator::LessEqual => Some(&[(Comparison::LessEqual, Bound::Value)]),
            ConditionOperator::Equal => Some(&[(Comparison::LooseEqual, Bound::Value)]),
            ConditionOperator::Greater => Some(&[(Comparison::Greater, Bound::Value)]),
            ConditionOperator::GreaterEqual => Some(&[(Comparison::GreaterEqual, Bound::Value)]),
            ConditionOperator::Range => Some(&[
                (Comparison::GreaterEqual, Bound::Value),
                (Comparison::Less, Bound::EndValue),
            ]),
            ConditionOperator::Is => Some(&[(Comparison::StrictEqual, Bound::Value)]),
            ConditionOperator::IsNot => Some(&[(Comparison::StrictNotEqual, Bound::Value)]),
            ConditionOperator::Unknown => None,
        }
    }
}

impl Comparison {
    /// Operator text in the generated template.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
            Comparison::LooseEqual => "==",
            Comparison::StrictEqual => "===",
            Comparison::StrictNotEqual => "!==",
        }
    }

    pub fn mode(self) -> Option<EqualityMode> {
        match self {
            Comparison::LooseEqual => Some(EqualityMode::Coercing),
            Comparison::StrictEqual | Comparison::StrictNotEqual => Some(EqualityMode::Strict),
            _ => None,
        }
    }

    /// Evaluates the comparison for a sampled value.
    ///
    /// A missing value fails every comparison except `StrictNotEqual`, which
    /// holds (nothing is strictly equal to a missing value). Otherwise, when both
    /// sides are numbers the comparison is numeric; relational comparisons and
    /// coercing equality accept numeric-looking strings and booleans (as 1 and
    /// 0), strict comparisons only real numbers. Everything else falls back to
    /// text, where only the three equality forms can hold and coercing equality
    /// needs a text sample: a number or boolean against non-numeric text is NaN.
    pub fn holds(self, live: &Value, operand: &Literal) -> bool {
        if live.is_undefined() {
            return self == Comparison::StrictNotEqual;
        }

        if let Some((a, b)) = self.numeric_operands(live, operand) {
            return match self {
                Comparison::Less => a < b,
                Comparison::LessEqual => a <= b,
                Comparison::Greater => a > b,
                Comparison::GreaterEqual => a >= b,
                Comparison::LooseEqual | Comparison::StrictEqual => a == b,
                Comparison::StrictNotEqual => a != b,
            };
        }

        match self {
            Comparison::LooseEqual => {
                matches!(live, Value::Text(_)) && live.to_text() == operand.as_text()
            }
            Comparison::StrictEqual => same_text(live, operand),
            Comparison::StrictNotEqual => !same_text(live, operand),
            _ => false,
        }
    }

    fn numeric_operands(self, live: &Value, operand: &Literal) -> Option<(f64, f64)> {
        match self.mode() {
            Some(EqualityMode::Strict) => match (live, operand) {
                (Value::Number(a), Literal::Number { value, .. }) => Some((*a, *value)),
                _ => None,
            },
            // Two strings compare as strings under coercing equality.
            Some(EqualityMode::Coercing)
                if matches!(live, Value::Text(_)) && !operand.is_number() =>
            {
                None
            }
            _ => Some((live.coerce_number()?, operand.coerce_number()?)),
        }
    }
}

/// Strict string equality: only text against a quoted literal can match.
fn same_text(live: &Value, operand: &Literal) -> bool {
    matches!((live, operand), (Value::Text(a), Literal::Text(b)) if a == b)
}
