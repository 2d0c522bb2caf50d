use super::scanner::Segment;
use crate::ast::{Value, to_number};
use crate::error::BackendError;

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Node {
    Text(String),
    If {
        branches: Vec<(Expr, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
}

/// A condition expression inside an `if` directive.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Literal(Value),
    /// `accessor('path')`
    Read(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BinaryOp {
    Or,
    And,
    LooseEq,
    LooseNe,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "==" => BinaryOp::LooseEq,
            "!=" => BinaryOp::LooseNe,
            "===" => BinaryOp::StrictEq,
            "!==" => BinaryOp::StrictNe,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            _ => return None,
        })
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::LooseEq | BinaryOp::LooseNe | BinaryOp::StrictEq | BinaryOp::StrictNe => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
        }
    }
}

enum Directive<'a> {
    If(&'a str),
    ElseIf(&'a str),
    Else,
    End,
}

/// Classifies a directive body. Only the control flow the block compiler emits
/// is recognised.
fn classify(body: &str, offset: usize) -> Result<Directive<'_>, BackendError> {
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact == "}" {
        return Ok(Directive::End);
    }
    if compact == "}else{" {
        return Ok(Directive::Else);
    }

    let (rest, is_else) = if let Some(rest) = body.strip_prefix('}') {
        let rest = rest.trim_start();
        match rest.strip_prefix("else") {
            Some(rest) => (rest.trim_start(), true),
            None => return Err(unsupported(body, offset)),
        }
    } else {
        (body, false)
    };

    let condition = rest
        .strip_prefix("if")
        .map(str::trim)
        .and_then(|r| r.strip_suffix('{'))
        .map(str::trim_end)
        .and_then(|r| r.strip_prefix('('))
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| unsupported(body, offset))?;

    Ok(if is_else {
        Directive::ElseIf(condition)
    } else {
        Directive::If(condition)
    })
}

fn unsupported(body: &str, offset: usize) -> BackendError {
    BackendError::Syntax {
        offset,
        message: format!("unsupported directive '{}'", body),
    }
}

/// An `if` whose closing directive has not been seen yet.
struct OpenIf {
    branches: Vec<(Expr, Vec<Node>)>,
    /// Condition of the branch being collected, `None` once inside `else`.
    condition: Option<Expr>,
    body: Vec<Node>,
}

impl OpenIf {
    fn new(condition: Expr) -> Self {
        Self {
            branches: Vec::new(),
            condition: Some(condition),
            body: Vec::new(),
        }
    }

    /// Closes the current branch; returns false inside `else`.
    fn close_branch(&mut self) -> bool {
        match self.condition.take() {
            Some(condition) => {
                self.branches.push((condition, std::mem::take(&mut self.body)));
                true
            }
            None => false,
        }
    }

    fn finish(mut self) -> Node {
        let otherwise = if self.close_branch() {
            Vec::new()
        } else {
            self.body
        };
        Node::If {
            branches: self.branches,
            otherwise,
        }
    }
}

/// Builds the node tree from scanned segments, checking that every `if` is
/// closed and that `else` branches appear only inside one.
pub(super) fn parse(segments: Vec<Segment<'_>>, accessor: &str) -> Result<Vec<Node>, BackendError> {
    let mut root = Vec::new();
    let mut stack: Vec<OpenIf> = Vec::new();

    for segment in segments {
        match segment {
            Segment::Text(text) => match stack.last_mut() {
                Some(open) => open.body.push(Node::Text(text)),
                None => root.push(Node::Text(text)),
            },
            Segment::Directive { body, offset } => match classify(body, offset)? {
                Directive::If(condition) => {
                    let expr = parse_expression(condition, offset, accessor)?;
                    stack.push(OpenIf::new(expr));
                }
                Directive::ElseIf(condition) => {
                    let expr = parse_expression(condition, offset, accessor)?;
                    let open = close_branch(&mut stack, body)?;
                    open.condition = Some(expr);
                }
                Directive::Else => {
                    close_branch(&mut stack, body)?;
                }
                Directive::End => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| BackendError::UnbalancedDirective(body.to_string()))?
                        .finish();
                    match stack.last_mut() {
                        Some(parent) => parent.body.push(node),
                        None => root.push(node),
                    }
                }
            },
        }
    }

    if !stack.is_empty() {
        return Err(BackendError::UnbalancedDirective(format!(
            "{} unclosed if directive(s)",
            stack.len()
        )));
    }
    Ok(root)
}

/// Ends the branch being collected by the innermost open `if`.
fn close_branch<'s>(stack: &'s mut [OpenIf], body: &str) -> Result<&'s mut OpenIf, BackendError> {
    match stack.last_mut() {
        Some(open) if open.condition.is_some() => {
            open.close_branch();
            Ok(open)
        }
        _ => Err(BackendError::UnbalancedDirective(body.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Num(f64),
    Op(&'static str),
    LParen,
    RParen,
}

const OPERATORS: [&str; 10] = ["===", "!==", "==", "!=", "<=", ">=", "&&", "||", "<", ">"];

fn tokenize(input: &str, offset: usize) -> Result<Vec<Token>, BackendError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let error = |message: String| BackendError::Syntax { offset, message };

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '(' {
            tokens.push(Token::LParen);
            i += 1;
            continue;
        }
        if c == ')' {
            tokens.push(Token::RParen);
            i += 1;
            continue;
        }
        if c == '\'' || c == '"' {
            let quote = c;
            let mut text = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(error("unterminated string literal".to_string())),
                    Some(&ch) if ch == quote => {
                        i += 1;
                        break;
                    }
                    Some(&'\\') => {
                        let escaped = chars
                            .get(i + 1)
                            .ok_or_else(|| error("unterminated escape".to_string()))?;
                        text.push(match escaped {
                            'n' => '\n',
                            'r' => '\r',
                            't' => '\t',
                            '0' => '\0',
                            other => *other,
                        });
                        i += 2;
                    }
                    Some(&ch) => {
                        text.push(ch);
                        i += 1;
                    }
                }
            }
            tokens.push(Token::Str(text));
            continue;
        }

        let negative_number = c == '-'
            && chars
                .get(i + 1)
                .is_some_and(|n| n.is_ascii_digit() || *n == '.' || *n == 'I');
        if c.is_ascii_digit() || c == '.' || negative_number {
            let start = i;
            i += 1;
            while i < chars.len() {
                let ch = chars[i];
                let exponent_sign =
                    matches!(ch, '+' | '-') && matches!(chars[i - 1], 'e' | 'E');
                if ch.is_ascii_alphanumeric() || ch == '.' || exponent_sign {
                    i += 1;
                } else {
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = to_number(&text)
                .ok_or_else(|| error(format!("invalid number literal '{}'", text)))?;
            tokens.push(Token::Num(value));
            continue;
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$')
            {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }

        let rest: String = chars[i..chars.len().min(i + 3)].iter().collect();
        match OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            Some(op) => {
                tokens.push(Token::Op(op));
                i += op.chars().count();
            }
            None => return Err(error(format!("unexpected character '{}'", c))),
        }
    }
    Ok(tokens)
}

/// Parses a condition expression with precedence climbing.
pub(super) fn parse_expression(
    input: &str,
    offset: usize,
    accessor: &str,
) -> Result<Expr, BackendError> {
    let tokens = tokenize(input, offset)?;
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        accessor,
        source: input,
    };
    let expr = parser.binary(0)?;
    if parser.pos != parser.tokens.len() {
        return Err(BackendError::UnsupportedExpression(input.to_string()));
    }
    Ok(expr)
}

struct ExprParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    accessor: &'a str,
    source: &'a str,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn unsupported(&self) -> BackendError {
        BackendError::UnsupportedExpression(self.source.to_string())
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr, BackendError> {
        let mut left = self.primary()?;
        while let Some(Token::Op(symbol)) = self.peek() {
            let op = BinaryOp::from_symbol(symbol).ok_or_else(|| self.unsupported())?;
            if op.precedence() < min_precedence {
                break;
            }
            self.pos += 1;
            let right = self.binary(op.precedence() + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn primary(&mut self) -> Result<Expr, BackendError> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.binary(0)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(self.unsupported()),
                }
            }
            Some(Token::Num(n)) => Ok(Expr::Literal(Value::Number(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Text(s))),
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "undefined" => Ok(Expr::Literal(Value::Undefined)),
                "Infinity" => Ok(Expr::Literal(Value::Number(f64::INFINITY))),
                _ if name == self.accessor => self.accessor_call(),
                _ => Err(self.unsupported()),
            },
            _ => Err(self.unsupported()),
        }
    }

    fn accessor_call(&mut self) -> Result<Expr, BackendError> {
        let (Some(Token::LParen), Some(Token::Str(path)), Some(Token::RParen)) =
            (self.next(), self.next(), self.next())
        else {
            return Err(self.unsupported());
        };
        Ok(Expr::Read(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relational_binds_tighter_than_logical() {
        let expr = parse_expression(
            "getvar('a') >= 10 && getvar('a') < 20 || getvar('b') === 'x'",
            0,
            "getvar",
        )
        .unwrap();
        let Expr::Binary { op: BinaryOp::Or, left, .. } = expr else {
            panic!("expected || at the root");
        };
        assert!(matches!(*left, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn literals_are_decoded() {
        let expr = parse_expression(r"getvar('p') == 'it\'s'", 0, "getvar").unwrap();
        let Expr::Binary { right, .. } = expr else {
            panic!("expected a comparison");
        };
        assert_eq!(*right, Expr::Literal(Value::Text("it's".to_string())));

        let expr = parse_expression("getvar('p') > -1e-7", 0, "getvar").unwrap();
        let Expr::Binary { right, .. } = expr else {
            panic!("expected a comparison");
        };
        assert_eq!(*right, Expr::Literal(Value::Number(-1e-7)));
    }

    #[test]
    fn foreign_calls_are_rejected() {
        let err = parse_expression("other('p') > 1", 0, "getvar").unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedExpression(_)));
    }
}
