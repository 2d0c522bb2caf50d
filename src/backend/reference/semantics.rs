use super::parser::{BinaryOp, Expr};
use crate::ast::{Value, to_number};
use crate::backend::VariableSource;
use std::cmp::Ordering;

/// Evaluates a condition expression with the template language's operator rules.
pub(super) fn evaluate(expr: &Expr, context: &dyn VariableSource) -> Value {
    match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Read(path) => context.get(path).cloned().unwrap_or(Value::Undefined),
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, context);
            match op {
                // Logical operators yield one of their operands.
                BinaryOp::And if !truthy(&left) => left,
                BinaryOp::Or if truthy(&left) => left,
                BinaryOp::And | BinaryOp::Or => evaluate(right, context),
                _ => Value::Bool(compare(*op, &left, &evaluate(right, context))),
            }
        }
    }
}

pub(super) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Text(s) => !s.is_empty(),
        Value::Undefined => false,
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> bool {
    match op {
        BinaryOp::LooseEq => loose_equal(left, right),
        BinaryOp::LooseNe => !loose_equal(left, right),
        BinaryOp::StrictEq => strict_equal(left, right),
        BinaryOp::StrictNe => !strict_equal(left, right),
        BinaryOp::Lt => relational(left, right).is_some_and(Ordering::is_lt),
        BinaryOp::Le => relational(left, right).is_some_and(Ordering::is_le),
        BinaryOp::Gt => relational(left, right).is_some_and(Ordering::is_gt),
        BinaryOp::Ge => relational(left, right).is_some_and(Ordering::is_ge),
        BinaryOp::And | BinaryOp::Or => false,
    }
}

fn number_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Text(s) => to_number(s).unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Undefined => f64::NAN,
    }
}

fn strict_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Undefined, Value::Undefined) => true,
        _ => false,
    }
}

fn loose_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Undefined, _) | (_, Value::Undefined) => false,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => {
            if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
                return a == b;
            }
            number_of(left) == number_of(right)
        }
        (Value::Text(a), Value::Text(b)) => a == b,
        _ => number_of(left) == number_of(right),
    }
}

/// `None` when the operands are unordered (either side is NaN after coercion).
fn relational(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Value::Text(a), Value::Text(b)) = (left, right) {
        return Some(a.encode_utf16().cmp(b.encode_utf16()));
    }
    number_of(left).partial_cmp(&number_of(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn coercing_equality_crosses_types() {
        assert!(loose_equal(&Value::Number(7.0), &text("7")));
        assert!(loose_equal(&text(" 7 "), &Value::Number(7.0)));
        assert!(!loose_equal(&text("07"), &text("7")));
        assert!(!loose_equal(&Value::Undefined, &text("")));
    }

    #[test]
    fn strict_equality_never_coerces() {
        assert!(!strict_equal(&Value::Number(7.0), &text("7")));
        assert!(strict_equal(&text("a"), &text("a")));
    }

    #[test]
    fn relational_rules() {
        assert_eq!(relational(&text("b"), &text("a")), Some(Ordering::Greater));
        assert_eq!(relational(&text("10"), &Value::Number(9.0)), Some(Ordering::Greater));
        assert_eq!(relational(&text("abc"), &Value::Number(1.0)), None);
        assert_eq!(relational(&Value::Undefined, &Value::Number(1.0)), None);
    }
}
