use std::{iter::Peekable, rc::Rc};

use tracing::trace;

use crate::{
    ast::{Expr, ForContext, FunctionDef, Statement},
    interpreter::{
        lexer::Token,
        parser::{
            block::{parse_compound, parse_parameters},
            core::{ParseResult, parse_expression},
            utils::{
                NestingGuard, expect, parse_identifier, peek_is, peek_line, resolve_return_type,
                resolve_type, unexpected,
            },
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - an empty statement `;`.
/// - a compound statement `{ ... }`.
/// - `if`, `while` or `for`.
/// - `return` or `print`.
/// - a variable declaration or a function definition, both introduced by a
///   type name.
/// - an expression followed by `;`.
///
/// # Errors
/// Returns the first syntax error encountered.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let _nesting = NestingGuard::enter(tokens)?;
    let line = peek_line(tokens);

    match tokens.peek() {
        Some((Token::Semicolon, _)) => {
            tokens.next();
            Ok(Statement::Compound { statements: Vec::new(),
                                     line })
        },
        Some((Token::LBrace, _)) => {
            let (statements, line) = parse_compound(tokens)?;
            Ok(Statement::Compound { statements, line })
        },
        Some((Token::If, _)) => parse_if(tokens),
        Some((Token::While, _)) => parse_while(tokens),
        Some((Token::For, _)) => parse_for(tokens),
        Some((Token::Return, _)) => {
            tokens.next();
            let value = if peek_is(tokens, &Token::Semicolon) {
                None
            } else {
                Some(parse_expression(tokens)?)
            };
            expect(tokens, &Token::Semicolon)?;
            Ok(Statement::Return { value, line })
        },
        Some((Token::Print, _)) => {
            tokens.next();
            let value = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon)?;
            Ok(Statement::Print { value, line })
        },
        Some((Token::TypeName(_), _)) => parse_declaration(tokens),
        _ => parse_expression_statement(tokens),
    }
}

fn parse_expression_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let expr = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;
    let line = expr.line_number();
    Ok(Statement::Expression { expr, line })
}

/// Parses a statement that starts with a type name.
///
/// `Type name (` begins a function definition, anything else a variable
/// declaration. `Void` is only accepted as a function return type.
///
/// Grammar:
/// ```text
/// declaration := Type identifier ("=" expression)? ";"
///              | Type identifier parameters compound
/// ```
///
/// The trailing `;` may be left out when the initializer is a bare block
/// literal, as in `Block twice = ^(Integer x) { return x * 2; }`.
fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (type_name, line) = match tokens.next() {
        Some((Token::TypeName(name), line)) => (name.as_str(), *line),
        other => return Err(unexpected("a type name", other)),
    };
    let name = parse_identifier(tokens)?;

    if peek_is(tokens, &Token::LParen) {
        let return_type = resolve_return_type(type_name, line)?;
        let params = parse_parameters(tokens)?;
        let (body, _) = parse_compound(tokens)?;
        trace!(name = %name, params = params.len(), "parsed function definition");

        return Ok(Statement::Function(Rc::new(FunctionDef { name,
                                                            return_type,
                                                            params,
                                                            body,
                                                            line })));
    }

    let type_tag = resolve_type(type_name, line)?;
    let value = match tokens.next() {
        Some((Token::Semicolon, _)) => None,
        Some((Token::Equals, _)) => {
            let value = parse_expression(tokens)?;
            if matches!(value, Expr::BlockLiteral { .. }) {
                if peek_is(tokens, &Token::Semicolon) {
                    tokens.next();
                }
            } else {
                expect(tokens, &Token::Semicolon)?;
            }
            Some(value)
        },
        other => return Err(unexpected("'=' or ';'", other)),
    };

    Ok(Statement::VariableDeclaration { type_tag,
                                        name,
                                        value,
                                        line })
}

/// Parses a parenthesised condition.
fn parse_condition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen)?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen)?;
    Ok(condition)
}

/// Grammar: `if := "if" "(" expression ")" statement ("else" statement)?`
///
/// A dangling `else` binds to the nearest `if`.
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::If)?;
    let condition = parse_condition(tokens)?;
    let then_branch = Box::new(parse_statement(tokens)?);

    let else_branch = if peek_is(tokens, &Token::Else) {
        tokens.next();
        Some(Box::new(parse_statement(tokens)?))
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       line })
}

/// Grammar: `while := "while" "(" expression ")" statement`
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::While)?;
    let condition = parse_condition(tokens)?;
    let body = Box::new(parse_statement(tokens)?);

    Ok(Statement::While { condition,
                          body,
                          line })
}

/// Parses a C-style `for` loop. Each of the three header parts may be empty.
///
/// Grammar:
/// ```text
/// for := "for" "(" (declaration | expression? ";") expression? ";" expression? ")" statement
/// ```
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::For)?;
    expect(tokens, &Token::LParen)?;

    let init = match tokens.peek() {
        Some((Token::Semicolon, _)) => {
            tokens.next();
            None
        },
        Some((Token::TypeName(_), _)) => Some(Box::new(parse_declaration(tokens)?)),
        _ => Some(Box::new(parse_expression_statement(tokens)?)),
    };

    let condition = if peek_is(tokens, &Token::Semicolon) {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    expect(tokens, &Token::Semicolon)?;

    let step = if peek_is(tokens, &Token::RParen) {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    expect(tokens, &Token::RParen)?;

    let body = Box::new(parse_statement(tokens)?);

    Ok(Statement::For { context: ForContext { init,
                                              condition,
                                              step,
                                              body },
                        line })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::ReturnType,
        error::ParseError,
        interpreter::{lexer::tokenize, runtime::TypeTag},
    };

    fn statement(source: &str) -> ParseResult<Statement> {
        let tokens = tokenize(source)?;
        parse_statement(&mut tokens.iter().peekable())
    }

    #[test]
    fn declaration_without_initializer() {
        assert_eq!(statement("Integer count;").unwrap(),
                   Statement::VariableDeclaration { type_tag: TypeTag::Integer,
                                                    name:     "count".to_string(),
                                                    value:    None,
                                                    line:     1, });
    }

    #[test]
    fn void_function_definition() {
        let Statement::Function(def) = statement("Void greet(String who) { print who; }").unwrap()
        else {
            panic!("expected a function definition");
        };
        assert_eq!(def.name, "greet");
        assert_eq!(def.return_type, ReturnType::Void);
        assert_eq!(def.params.len(), 1);
    }

    #[test]
    fn void_variables_are_rejected() {
        assert_eq!(statement("Void x;"),
                   Err(ParseError::UnknownType { name: "Void".to_string(),
                                                 line: 1, }));
    }

    #[test]
    fn block_initializer_needs_no_semicolon() {
        let tokens = tokenize("Block b = ^{ print 1; }\nprint 2;").unwrap();
        let mut iter = tokens.iter().peekable();
        assert!(matches!(parse_statement(&mut iter).unwrap(),
                         Statement::VariableDeclaration { type_tag: TypeTag::Block, .. }));
        assert!(matches!(parse_statement(&mut iter).unwrap(), Statement::Print { line: 2, .. }));
    }

    #[test]
    fn for_header_parts_are_optional() {
        let Statement::For { context, .. } = statement("for (;;) ;").unwrap() else {
            panic!("expected a for loop");
        };
        assert!(context.init.is_none());
        assert!(context.condition.is_none());
        assert!(context.step.is_none());

        let Statement::For { context, .. } =
            statement("for (Integer i = 0; i < 3; i++) print i;").unwrap()
        else {
            panic!("expected a for loop");
        };
        assert!(matches!(context.init.as_deref(), Some(Statement::VariableDeclaration { .. })));
        assert!(context.step.is_some());
    }

    #[test]
    fn else_binds_to_nearest_if() {
        let Statement::If { else_branch, then_branch, .. } =
            statement("if (a) if (b) x; else y;").unwrap()
        else {
            panic!("expected an if statement");
        };
        assert!(else_branch.is_none());
        assert!(matches!(*then_branch, Statement::If { else_branch: Some(_), .. }));
    }

    #[test]
    fn missing_semicolon_is_reported() {
        assert_eq!(statement("x = 1"),
                   Err(ParseError::UnexpectedEndOfInput { expected: "';'".to_string(),
                                                          line:     1, }));
    }
}
