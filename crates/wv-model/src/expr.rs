//! Parser for loop/branch condition expressions.
//!
//! Built on `winnow` 0.7. The grammar is the boolean subset a loop head
//! accepts: identifiers, integer and boolean literals, comparisons
//! (`== != < <= > >=`), `!`, `&&`, `||`, and parentheses. Precedence, loosest
//! to tightest: `||`, `&&`, comparison, `!`.

use std::fmt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// A parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CondExpr {
    Ident(String),
    Int(i64),
    Bool(bool),
    Not(Box<CondExpr>),
    Compare {
        op: CompareOp,
        lhs: Box<CondExpr>,
        rhs: Box<CondExpr>,
    },
    And(Box<CondExpr>, Box<CondExpr>),
    Or(Box<CondExpr>, Box<CondExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Parse a condition string into a `CondExpr`.
#[must_use = "parsing result should be used"]
pub fn parse_condition(input: &str) -> Result<CondExpr, String> {
    let mut rest = input.trim();
    if rest.is_empty() {
        return Err("empty condition".to_string());
    }
    let expr = parse_or
        .parse_next(&mut rest)
        .map_err(|e| format!("condition parse error: {e}"))?;
    skip_space(&mut rest);
    if !rest.is_empty() {
        return Err(format!("unexpected trailing input: `{rest}`"));
    }
    Ok(expr)
}

// ─── Grammar ─────────────────────────────────────────────────────────────

fn skip_space(input: &mut &str) {
    *input = input.trim_start();
}

fn parse_or(input: &mut &str) -> ModalResult<CondExpr> {
    let mut lhs = parse_and(input)?;
    loop {
        skip_space(input);
        if let Some(rest) = input.strip_prefix("||") {
            *input = rest;
            let rhs = parse_and(input)?;
            lhs = CondExpr::Or(Box::new(lhs), Box::new(rhs));
        } else {
            break;
        }
    }
    Ok(lhs)
}

fn parse_and(input: &mut &str) -> ModalResult<CondExpr> {
    let mut lhs = parse_cmp(input)?;
    loop {
        skip_space(input);
        if let Some(rest) = input.strip_prefix("&&") {
            *input = rest;
            let rhs = parse_cmp(input)?;
            lhs = CondExpr::And(Box::new(lhs), Box::new(rhs));
        } else {
            break;
        }
    }
    Ok(lhs)
}

fn parse_cmp(input: &mut &str) -> ModalResult<CondExpr> {
    let lhs = parse_unary(input)?;
    if let Some(op) = compare_op(input) {
        let rhs = parse_unary(input)?;
        Ok(CondExpr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    } else {
        Ok(lhs)
    }
}

fn compare_op(input: &mut &str) -> Option<CompareOp> {
    skip_space(input);
    // Two-character operators first so `<` does not shadow `<=`.
    const OPS: [(&str, CompareOp); 6] = [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        ("<=", CompareOp::Le),
        (">=", CompareOp::Ge),
        ("<", CompareOp::Lt),
        (">", CompareOp::Gt),
    ];
    for (token, op) in OPS {
        if let Some(rest) = input.strip_prefix(token) {
            *input = rest;
            return Some(op);
        }
    }
    None
}

fn parse_unary(input: &mut &str) -> ModalResult<CondExpr> {
    skip_space(input);
    // `!` is negation only when it is not the start of `!=`.
    if input.starts_with('!') && !input.starts_with("!=") {
        *input = &input[1..];
        let operand = parse_unary(input)?;
        Ok(CondExpr::Not(Box::new(operand)))
    } else {
        parse_primary(input)
    }
}

fn parse_primary(input: &mut &str) -> ModalResult<CondExpr> {
    skip_space(input);
    if let Some(rest) = input.strip_prefix('(') {
        *input = rest;
        let expr = parse_or(input)?;
        skip_space(input);
        match input.strip_prefix(')') {
            Some(rest) => {
                *input = rest;
                Ok(expr)
            }
            None => Err(ErrMode::Backtrack(ContextError::new())),
        }
    } else if input.starts_with(|c: char| c.is_ascii_digit()) || input.starts_with('-') {
        parse_int(input)
    } else {
        let ident: &str =
            take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)?;
        match ident {
            "true" => Ok(CondExpr::Bool(true)),
            "false" => Ok(CondExpr::Bool(false)),
            _ => Ok(CondExpr::Ident(ident.to_string())),
        }
    }
}

fn parse_int(input: &mut &str) -> ModalResult<CondExpr> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<i64>()
        .map(CondExpr::Int)
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

// ─── Canonical text ──────────────────────────────────────────────────────

impl CondExpr {
    fn is_atom(&self) -> bool {
        matches!(
            self,
            CondExpr::Ident(_) | CondExpr::Int(_) | CondExpr::Bool(_)
        )
    }
}

impl fmt::Display for CondExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CondExpr::Ident(name) => write!(f, "{name}"),
            CondExpr::Int(n) => write!(f, "{n}"),
            CondExpr::Bool(b) => write!(f, "{b}"),
            CondExpr::Not(operand) => {
                if operand.is_atom() {
                    write!(f, "!{operand}")
                } else {
                    write!(f, "!({operand})")
                }
            }
            CondExpr::Compare { op, lhs, rhs } => {
                write!(f, "{lhs} {} {rhs}", op.as_str())
            }
            CondExpr::And(lhs, rhs) => {
                // Parenthesize looser-binding `||` operands.
                match (
                    matches!(**lhs, CondExpr::Or(..)),
                    matches!(**rhs, CondExpr::Or(..)),
                ) {
                    (true, true) => write!(f, "({lhs}) && ({rhs})"),
                    (true, false) => write!(f, "({lhs}) && {rhs}"),
                    (false, true) => write!(f, "{lhs} && ({rhs})"),
                    (false, false) => write!(f, "{lhs} && {rhs}"),
                }
            }
            CondExpr::Or(lhs, rhs) => write!(f, "{lhs} || {rhs}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_comparison() {
        let expr = parse_condition("x > 1").unwrap();
        assert_eq!(
            expr,
            CondExpr::Compare {
                op: CompareOp::Gt,
                lhs: Box::new(CondExpr::Ident("x".into())),
                rhs: Box::new(CondExpr::Int(1)),
            }
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse_condition("a || b && c").unwrap();
        match expr {
            CondExpr::Or(lhs, rhs) => {
                assert_eq!(*lhs, CondExpr::Ident("a".into()));
                assert!(matches!(*rhs, CondExpr::And(..)));
            }
            other => panic!("expected Or at the top, got {other:?}"),
        }
    }

    #[test]
    fn parens_override_precedence() {
        let expr = parse_condition("(a || b) && c").unwrap();
        assert!(matches!(expr, CondExpr::And(..)));
    }

    #[test]
    fn negation_and_literals() {
        let expr = parse_condition("!done && count >= 10").unwrap();
        match expr {
            CondExpr::And(lhs, rhs) => {
                assert_eq!(*lhs, CondExpr::Not(Box::new(CondExpr::Ident("done".into()))));
                assert!(matches!(
                    *rhs,
                    CondExpr::Compare {
                        op: CompareOp::Ge,
                        ..
                    }
                ));
            }
            other => panic!("expected And, got {other:?}"),
        }

        assert_eq!(parse_condition("true").unwrap(), CondExpr::Bool(true));
        assert_eq!(parse_condition("-3").unwrap(), CondExpr::Int(-3));
    }

    #[test]
    fn rejects_empty_and_trailing_input() {
        assert!(parse_condition("").is_err());
        assert!(parse_condition("   ").is_err());
        assert!(parse_condition("x >").is_err());
        assert!(parse_condition("x ? y").is_err());
    }

    #[test]
    fn display_is_canonical() {
        let expr = parse_condition("(a||b)&&!c").unwrap();
        assert_eq!(expr.to_string(), "(a || b) && !c");

        let roundtrip = parse_condition(&expr.to_string()).unwrap();
        assert_eq!(roundtrip, expr);
    }
}
