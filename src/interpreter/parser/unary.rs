use std::iter::Peekable;

use crate::{
    ast::{Expr, KeyValue, LiteralValue, UnaryOperator, UpdateOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_logical_or,
            block::parse_block_literal,
            core::{ParseResult, parse_assignment, parse_expression},
            utils::{NestingGuard, expect, parse_comma_separated, parse_identifier, unexpected},
        },
    },
};

/// Parses prefix unary operators.
///
/// Supported prefixes: `++`, `--`, `!` and `-`. Prefixes nest, so `!!x` and
/// `- -x` are valid. A `-` directly before an Integer literal with no postfix
/// operation is read as a negative literal, which is how `i64::MIN` is
/// written.
///
/// The rule is: `unary := ("++" | "--" | "!" | "-") unary | postfix`
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let _nesting = NestingGuard::enter(tokens)?;
    let Some((token, line)) = tokens.peek() else {
        return parse_postfix(tokens);
    };
    let line = *line;

    let update = match token {
        Token::PlusPlus => Some(UpdateOperator::Increment),
        Token::MinusMinus => Some(UpdateOperator::Decrement),
        _ => None,
    };
    if let Some(op) = update {
        tokens.next();
        let target = parse_unary(tokens)?;
        return Ok(Expr::Update { op,
                                 prefix: true,
                                 target: Box::new(target),
                                 line });
    }

    let op = match token {
        Token::Bang => UnaryOperator::Not,
        Token::Minus => UnaryOperator::Negate,
        _ => return parse_postfix(tokens),
    };
    tokens.next();

    if op == UnaryOperator::Negate
       && let Some(magnitude) = bare_integer(tokens)
    {
        tokens.next();
        let value = 0_i64.checked_sub_unsigned(magnitude)
                         .ok_or_else(|| ParseError::LiteralTooLarge { literal: format!("-{magnitude}"),
                                                                      line })?;
        return Ok(Expr::Literal { value: LiteralValue::Integer(value),
                                  line });
    }

    let expr = parse_unary(tokens)?;

    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Parses a primary expression followed by any chain of postfix operations.
///
/// The rule is:
/// ```text
/// postfix := primary ( "++" | "--" | "[" expression "]"
///                    | "(" arguments? ")" | "." identifier )*
/// ```
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut expr = parse_primary(tokens)?;

    while let Some((token, line)) = tokens.peek() {
        let line = *line;
        expr = match token {
            Token::PlusPlus | Token::MinusMinus => {
                let op = if *token == Token::PlusPlus {
                    UpdateOperator::Increment
                } else {
                    UpdateOperator::Decrement
                };
                tokens.next();
                Expr::Update { op,
                               prefix: false,
                               target: Box::new(expr),
                               line }
            },
            Token::LBracket => {
                tokens.next();
                let index = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket)?;
                Expr::Subscript { target: Box::new(expr),
                                  index: Box::new(index),
                                  line }
            },
            Token::LParen => {
                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_assignment, &Token::RParen)?;
                Expr::Call { callee: Box::new(expr),
                             arguments,
                             line }
            },
            Token::Dot => {
                tokens.next();
                let name = parse_identifier(tokens)?;
                Expr::Member { target: Box::new(expr),
                               name,
                               line }
            },
            _ => break,
        };
    }
    Ok(expr)
}

/// Parses a primary expression.
///
/// Handles:
/// - Parenthesised expressions.
/// - Array literals `[a, b]` and dictionary literals `@[k : v]`.
/// - Block literals `^(Integer x) { ... }`.
/// - Identifiers and literal constants.
///
/// # Errors
/// Returns a `ParseError` naming "an expression" for any other token.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Caret, _)) = tokens.peek() {
        return parse_block_literal(tokens);
    }

    let Some((token, line)) = tokens.next() else {
        return Err(unexpected("an expression", None));
    };
    let line = *line;

    let literal = |value: LiteralValue| Ok(Expr::Literal { value, line });

    match token {
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen)?;
            Ok(expr)
        },
        Token::LBracket => {
            let elements = parse_comma_separated(tokens, parse_assignment, &Token::RBracket)?;
            Ok(Expr::ArrayLiteral { elements, line })
        },
        Token::DictOpen => {
            let entries = parse_comma_separated(tokens, parse_key_value, &Token::RBracket)?;
            Ok(Expr::DictLiteral { entries, line })
        },
        Token::Identifier(name) => Ok(Expr::Lookup { name: name.clone(),
                                                     line }),
        Token::Integer(value) => {
            let value = i64::try_from(*value).map_err(|_| ParseError::LiteralTooLarge { literal: value.to_string(),
                                                                                       line })?;
            literal(LiteralValue::Integer(value))
        },
        Token::Float(value) => literal(LiteralValue::Float(*value)),
        Token::String(value) => literal(LiteralValue::String(value.clone())),
        Token::True => literal(LiteralValue::Bool(true)),
        Token::False => literal(LiteralValue::Bool(false)),
        Token::Nil => literal(LiteralValue::Nil),
        _ => Err(unexpected("an expression", Some(&(token.clone(), line)))),
    }
}

/// Returns the next token's value if it is an Integer literal that no
/// postfix operation applies to.
fn bare_integer<'a, I>(tokens: &Peekable<I>) -> Option<u64>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut ahead = tokens.clone();
    let Some((Token::Integer(magnitude), _)) = ahead.next() else {
        return None;
    };
    match ahead.peek() {
        Some((Token::PlusPlus | Token::MinusMinus | Token::LBracket | Token::LParen | Token::Dot, _)) => None,
        _ => Some(*magnitude),
    }
}

/// Parses one `key : value` entry of a dictionary literal.
///
/// Keys stop below the conditional level so their `:` is not mistaken for
/// part of a `?:` expression.
fn parse_key_value<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<KeyValue>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let key = parse_logical_or(tokens)?;
    expect(tokens, &Token::Colon)?;
    let value = parse_assignment(tokens)?;
    Ok(KeyValue { key, value })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn expression(source: &str) -> ParseResult<Expr> {
        let tokens = tokenize(source)?;
        parse_expression(&mut tokens.iter().peekable())
    }

    #[test]
    fn postfix_chain_applies_left_to_right() {
        let parsed = expression("items[0].length()").unwrap();
        let Expr::Call { callee, arguments, .. } = parsed else {
            panic!("expected a call");
        };
        assert!(arguments.is_empty());
        let Expr::Member { target, name, .. } = *callee else {
            panic!("expected a member access");
        };
        assert_eq!(name, "length");
        assert!(matches!(*target, Expr::Subscript { .. }));
    }

    #[test]
    fn prefix_and_postfix_updates_differ() {
        assert!(matches!(expression("++x").unwrap(), Expr::Update { prefix: true, .. }));
        assert!(matches!(expression("x--").unwrap(),
                         Expr::Update { prefix: false,
                                        op: UpdateOperator::Decrement,
                                        .. }));
    }

    #[test]
    fn dictionary_entries_keep_source_order() {
        let Expr::DictLiteral { entries, .. } = expression("@[1 : \"one\", 2 : \"two\"]").unwrap()
        else {
            panic!("expected a dictionary literal");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].key,
                   Expr::Literal { value: LiteralValue::Integer(2),
                                   line:  1, });
    }

    #[test]
    fn missing_operand_names_what_was_expected() {
        assert_eq!(expression("1 +"),
                   Err(ParseError::UnexpectedEndOfInput { expected: "an expression".to_string(),
                                                          line:     1, }));
        assert_eq!(expression("1 + )"),
                   Err(ParseError::UnexpectedToken { expected: "an expression".to_string(),
                                                     found:    ")".to_string(),
                                                     line:     1, }));
    }

    #[test]
    fn minus_before_digits_is_a_negative_literal() {
        let integer = |value: i64| Expr::Literal { value: LiteralValue::Integer(value),
                                                   line:  1, };
        assert_eq!(expression("-9223372036854775808"), Ok(integer(i64::MIN)));
        assert_eq!(expression("- 5"), Ok(integer(-5)));
        assert!(matches!(expression("-5.description()").unwrap(),
                         Expr::UnaryOp { op: UnaryOperator::Negate, .. }));
        assert!(matches!(expression("-x").unwrap(), Expr::UnaryOp { .. }));

        assert_eq!(expression("9223372036854775808"),
                   Err(ParseError::LiteralTooLarge { literal: "9223372036854775808".to_string(),
                                                     line:    1, }));
        assert_eq!(expression("-9223372036854775809"),
                   Err(ParseError::LiteralTooLarge { literal: "-9223372036854775809".to_string(),
                                                     line:    1, }));
    }
}
