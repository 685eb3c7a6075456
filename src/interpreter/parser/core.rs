use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::{BinaryOperator, Expr, Place, Program},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_logical_or,
            statement::parse_statement,
            utils::{NestingGuard, expect, peek_is},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole program: statements until the end-of-input marker.
///
/// Grammar: `program := statement*`
///
/// # Errors
/// Returns the first syntax error; there is no recovery.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut statements = Vec::new();
    while !peek_is(tokens, &Token::EndOfInput) && tokens.peek().is_some() {
        statements.push(parse_statement(tokens)?);
    }
    debug!(statements = statements.len(), "parsed program");
    Ok(Program { statements })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the lowest
/// precedence level, the comma expression, and recursively descends through
/// the precedence hierarchy.
///
/// Grammar: `expression := assignment ("," assignment)*`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node; an `Expr::Comma` if a comma was present.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let first = parse_assignment(tokens)?;
    if !peek_is(tokens, &Token::Comma) {
        return Ok(first);
    }

    let line = first.line_number();
    let mut expressions = vec![first];
    while peek_is(tokens, &Token::Comma) {
        tokens.next();
        expressions.push(parse_assignment(tokens)?);
    }
    Ok(Expr::Comma { expressions,
                     line })
}

/// Parses an assignment, which is right-associative.
///
/// Grammar: `assignment := conditional (assign_op assignment)?`, where
/// `assign_op` is one of `= += -= *= /= %=`.
///
/// # Errors
/// Returns `ParseError::InvalidAssignmentTarget` if the left-hand side is
/// neither a variable nor a subscript rooted at one.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let _nesting = NestingGuard::enter(tokens)?;
    let target = parse_conditional(tokens)?;

    let op = match tokens.peek() {
        Some((Token::Equals, _)) => None,
        Some((token, _)) => match token_to_compound_operator(token) {
            Some(op) => Some(op),
            None => return Ok(target),
        },
        None => return Ok(target),
    };
    let line = expect_any(tokens);

    let target = Place::from_expr(target).map_err(|expr| ParseError::InvalidAssignmentTarget {
                                              line: expr.line_number(),
                                          })?;
    let value = parse_assignment(tokens)?;

    Ok(Expr::Assign { target,
                      op,
                      value: Box::new(value),
                      line })
}

/// Parses `condition ? then : else` and `condition ?: else`.
///
/// Grammar:
/// ```text
/// conditional := logical_or ("?" expression ":" conditional
///                           | "?:" conditional)?
/// ```
pub fn parse_conditional<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let _nesting = NestingGuard::enter(tokens)?;
    let condition = parse_logical_or(tokens)?;

    let then_branch = match tokens.peek() {
        Some((Token::Question, _)) => {
            tokens.next();
            let then_branch = parse_expression(tokens)?;
            expect(tokens, &Token::Colon)?;
            Some(Box::new(then_branch))
        },
        Some((Token::Elvis, _)) => {
            tokens.next();
            None
        },
        _ => return Ok(condition),
    };
    let else_branch = parse_conditional(tokens)?;

    let line = condition.line_number();
    Ok(Expr::Conditional { condition: Box::new(condition),
                           then_branch,
                           else_branch: Box::new(else_branch),
                           line })
}

/// Consumes the next token and returns its line.
fn expect_any<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a (Token, usize)>
{
    tokens.next().map_or(0, |(_, line)| *line)
}

const fn token_to_compound_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::PlusAssign => Some(BinaryOperator::Add),
        Token::MinusAssign => Some(BinaryOperator::Sub),
        Token::MulAssign => Some(BinaryOperator::Mul),
        Token::DivAssign => Some(BinaryOperator::Div),
        Token::ModAssign => Some(BinaryOperator::Mod),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::{LiteralValue, Statement},
        interpreter::{lexer::tokenize, parser::utils::MAX_NESTING_DEPTH},
    };

    fn expression(source: &str) -> ParseResult<Expr> {
        let tokens = tokenize(source)?;
        parse_expression(&mut tokens.iter().peekable())
    }

    fn lookup(name: &str) -> Expr {
        Expr::Lookup { name: name.to_string(),
                       line: 1, }
    }

    fn integer(value: i64) -> Expr {
        Expr::Literal { value: LiteralValue::Integer(value),
                        line:  1, }
    }

    #[test]
    fn assignment_is_right_associative() {
        let parsed = expression("a = b += 1").unwrap();
        let inner = Expr::Assign { target: Place { name:    "b".to_string(),
                                                   indices: Vec::new(),
                                                   line:    1, },
                                   op:     Some(BinaryOperator::Add),
                                   value:  Box::new(integer(1)),
                                   line:   1, };
        let expected = Expr::Assign { target: Place { name:    "a".to_string(),
                                                      indices: Vec::new(),
                                                      line:    1, },
                                      op:     None,
                                      value:  Box::new(inner),
                                      line:   1, };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let parsed = expression("1 + 2 * 3").unwrap();
        let product = Expr::BinaryOp { left:  Box::new(integer(2)),
                                       op:    BinaryOperator::Mul,
                                       right: Box::new(integer(3)),
                                       line:  1, };
        let expected = Expr::BinaryOp { left:  Box::new(integer(1)),
                                        op:    BinaryOperator::Add,
                                        right: Box::new(product),
                                        line:  1, };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn elvis_has_no_then_branch() {
        let parsed = expression("a ?: b").unwrap();
        let expected = Expr::Conditional { condition:   Box::new(lookup("a")),
                                           then_branch: None,
                                           else_branch: Box::new(lookup("b")),
                                           line:        1, };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn comma_collects_every_part() {
        let Expr::Comma { expressions, .. } = expression("a, b, c").unwrap() else {
            panic!("expected a comma expression");
        };
        assert_eq!(expressions, vec![lookup("a"), lookup("b"), lookup("c")]);
    }

    #[test]
    fn literals_cannot_be_assigned() {
        assert_eq!(expression("1 = 2"), Err(ParseError::InvalidAssignmentTarget { line: 1 }));
        assert!(expression("f() = 2").is_err());
        assert!(expression("grid[0][1] = 2").is_ok());
    }

    #[test]
    fn program_reads_to_the_end() {
        let tokens = tokenize("Integer x = 1;\nprint x;").unwrap();
        let program = parse_program(&mut tokens.iter().peekable()).unwrap();
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[1], Statement::Print { line: 2, .. }));
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let parse = |source: &str| {
            let tokens = tokenize(source)?;
            parse_program(&mut tokens.iter().peekable())
        };
        let too_deep = |source: &str| {
            matches!(parse(source),
                     Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH, line: 1 }))
        };

        assert!(too_deep(&format!("{}1{};", "(".repeat(20_000), ")".repeat(20_000))));
        assert!(too_deep(&format!("{}1;", "!".repeat(20_000))));
        assert!(too_deep(&format!("a = {}1;", "a = ".repeat(20_000))));
        assert!(too_deep(&format!("{}print 1;", "if (true) ".repeat(20_000))));

        let nested = format!("{}1{};", "[".repeat(40), "]".repeat(40));
        assert!(parse(&nested).is_ok());
    }
}
