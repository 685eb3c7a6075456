use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{BlockDef, Expr, Parameter, Statement},
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{
                expect, parse_comma_separated, parse_identifier, parse_type, peek_line,
                resolve_return_type, unexpected,
            },
        },
    },
};

/// Parses a brace-delimited list of statements.
///
/// Grammar: `compound := "{" statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The statements together with the line of the opening brace.
///
/// # Errors
/// Returns a `ParseError` if the opening brace is missing, a statement fails
/// to parse, or the input ends before the closing brace.
pub fn parse_compound<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<(Vec<Statement>, usize)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::LBrace)?;
    let mut statements = Vec::new();

    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::EndOfInput, _)) | None => {
                return Err(unexpected("'}'", tokens.next()));
            },
            Some(_) => statements.push(parse_statement(tokens)?),
        }
    }

    Ok((statements, line))
}

/// Parses a parenthesised list of typed parameters.
///
/// Grammar: `parameters := "(" (Type identifier ("," Type identifier)*)? ")"`
pub fn parse_parameters<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Parameter>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen)?;
    parse_comma_separated(tokens, parse_parameter, &Token::RParen)
}

fn parse_parameter<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Parameter>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = peek_line(tokens);
    let type_tag = parse_type(tokens)?;
    let name = parse_identifier(tokens)?;

    Ok(Parameter { type_tag,
                   name,
                   line })
}

/// Parses a block literal.
///
/// The return type is optional, and so is the parameter list: `^{ ... }`
/// takes no arguments.
///
/// Grammar: `block_literal := "^" Type? parameters? compound`
///
/// # Example
/// ```text
/// ^Integer (Integer x) { return x * 2; }
/// ```
pub fn parse_block_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::Caret)?;

    let return_type = match tokens.peek() {
        Some((Token::TypeName(name), type_line)) => {
            let return_type = resolve_return_type(name, *type_line)?;
            tokens.next();
            Some(return_type)
        },
        _ => None,
    };

    let params = match tokens.peek() {
        Some((Token::LParen, _)) => parse_parameters(tokens)?,
        _ => Vec::new(),
    };
    let (body, _) = parse_compound(tokens)?;

    let block = BlockDef { return_type,
                           params,
                           body,
                           line };
    Ok(Expr::BlockLiteral { block: Rc::new(block),
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

    fn block(source: &str) -> ParseResult<Rc<BlockDef>> {
        let tokens = tokenize(source)?;
        match parse_block_literal(&mut tokens.iter().peekable())? {
            Expr::BlockLiteral { block, .. } => Ok(block),
            other => panic!("expected a block literal, got {other:?}"),
        }
    }

    #[test]
    fn typed_block_keeps_its_signature() {
        let block = block("^Integer (Integer x, String s) { return x; }").unwrap();
        assert_eq!(block.return_type, Some(ReturnType::Value(TypeTag::Integer)));
        let names: Vec<_> = block.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "s"]);
        assert_eq!(block.params[1].type_tag, TypeTag::String);
        assert_eq!(block.body.len(), 1);
    }

    #[test]
    fn parameters_are_optional() {
        let block = block("^{ print 1; }").unwrap();
        assert_eq!(block.return_type, None);
        assert!(block.params.is_empty());
    }

    #[test]
    fn void_is_not_a_parameter_type() {
        assert_eq!(block("^(Void x) {}").unwrap_err(),
                   ParseError::UnknownType { name: "Void".to_string(),
                                             line: 1, });
    }

    #[test]
    fn unterminated_body_reports_end_of_input() {
        assert!(matches!(block("^(Integer x) { x;"),
                         Err(ParseError::UnexpectedEndOfInput { .. })));
    }
}
