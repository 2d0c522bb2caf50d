use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Runtime value of a state variable during evaluation.
///
/// Typed input and YAML strings become `Number` or `Text`. `Bool` comes from
/// JSON or YAML booleans and from comparisons; `Undefined` marks a path with
/// no sample value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Undefined,
}

impl Value {
    /// Interprets typed sample input the way the template's variable accessor
    /// hands it to the generated code: anything that reads as a number
    /// (`Infinity` included) becomes a number, everything else (including the
    /// empty string) stays text.
    pub fn from_input(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Text(String::new());
        }
        match to_number(raw) {
            Some(n) => Value::Number(n),
            None => Value::Text(raw.to_string()),
        }
    }

    /// Numeric coercion. `None` stands for NaN; infinities are kept.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_nan() => Some(*n),
            Value::Number(_) | Value::Undefined => None,
            Value::Text(s) => to_number(s),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
    }

    /// String conversion as the template language performs it.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Number(n) => Cow::Owned(format_number(*n)),
            Value::Text(s) => Cow::Borrowed(s),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Undefined => Cow::Borrowed("undefined"),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Undefined => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw {
            serde_json::Value::Null => Value::Undefined,
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .unwrap_or_else(|| Value::from_input(&n.to_string())),
            serde_json::Value::String(s) => Value::from_input(&s),
            serde_json::Value::Bool(b) => Value::from_input(&b.to_string()),
            other => Value::Text(other.to_string()),
        })
    }
}

/// A condition operand, classified once at the formatter boundary.
///
/// The same classification feeds the generated template source and the
/// simulator, so both agree on whether `"50"` is the number fifty or a string.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A numeral whose canonical form is exactly `source`.
    Number { value: f64, source: String },
    Text(String),
}

impl Literal {
    /// Decides whether a raw operand is a numeric or a string literal.
    ///
    /// Empty, whitespace-only and missing operands become the empty string. A
    /// string is numeric only if it parses to a finite number whose canonical
    /// rendering is the very same text, so `"007"`, `"5.0"` and `"1e3"` stay strings.
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Literal::Text(String::new());
        };
        if raw.trim().is_empty() {
            return Literal::Text(String::new());
        }
        match to_number(raw) {
            Some(value) if value.is_finite() && format_number(value) == raw => Literal::Number {
                value,
                source: raw.to_string(),
            },
            _ => Literal::Text(raw.to_string()),
        }
    }

    /// Renders the literal as template source text.
    pub fn to_source(&self) -> String {
        match self {
            Literal::Number { source, .. } => source.clone(),
            Literal::Text(s) => quote(s),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Literal::Number { .. })
    }

    /// Numeric coercion of the operand, `None` when it does not read as a number.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Literal::Number { value, .. } => Some(*value),
            Literal::Text(s) => to_number(s),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Literal::Number { source, .. } => source,
            Literal::Text(s) => s,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

/// The value formatter: raw operand in, template literal out.
pub fn format_operand(raw: Option<&str>) -> String {
    Literal::classify(raw).to_source()
}

/// Single-quotes a string for the template source.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// String-to-number conversion with the template language's rules.
///
/// Surrounding whitespace is ignored, an empty string is zero, `Infinity` and
/// `0x`/`0o`/`0b` prefixes are understood. Returns `None` for NaN.
pub fn to_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let (sign, unsigned) = match s.as_bytes()[0] {
        b'-' => (-1.0, &s[1..]),
        b'+' => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    // Radix prefixes are only valid without a sign.
    if unsigned.len() == s.len() {
        let radix = match s.get(..2) {
            Some("0x" | "0X") => Some(16),
            Some("0o" | "0O") => Some(8),
            Some("0b" | "0B") => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix(&s[2..], radix);
        }
    }

    let well_formed = unsigned.chars().any(|c| c.is_ascii_digit())
        && unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !well_formed {
        return None;
    }
    s.parse::<f64>().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Canonical number-to-string conversion (shortest round-trip digits,
/// exponent form outside `1e-6..1e21`, no negative zero).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    if (1e-6..1e21).contains(&n.abs()) {
        return format!("{}", n);
    }
    let exp_form = format!("{:e}", n);
    match exp_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp_form,
    }
}
