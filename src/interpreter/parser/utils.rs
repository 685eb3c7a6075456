use std::{cell::Cell, iter::Peekable};

use crate::{
    ast::ReturnType,
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult, runtime::TypeTag},
};

/// Deepest nesting of expressions and statements the parser accepts.
///
/// Every level is a recursive call, so input nested deeper would exhaust the
/// stack instead of producing an error.
pub const MAX_NESTING_DEPTH: usize = 256;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// One open level of recursive descent; the level closes when the guard is
/// dropped, including when parsing fails.
pub(in crate::interpreter::parser) struct NestingGuard(());

impl NestingGuard {
    /// Opens a level at the next token.
    ///
    /// # Errors
    /// Returns `ParseError::NestingTooDeep` if `MAX_NESTING_DEPTH` levels are
    /// already open.
    pub(in crate::interpreter::parser) fn enter<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Self>
        where I: Iterator<Item = &'a (Token, usize)>
    {
        let line = peek_line(tokens);
        NESTING.with(|depth| {
                   if depth.get() >= MAX_NESTING_DEPTH {
                       return Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH,
                                                               line });
                   }
                   depth.set(depth.get() + 1);
                   Ok(Self(()))
               })
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Builds the error for a token the grammar did not expect.
///
/// `found` being the end-of-input marker (or nothing at all) produces
/// `UnexpectedEndOfInput`.
pub(in crate::interpreter::parser) fn unexpected(expected: &str,
                                                 found: Option<&(Token, usize)>)
                                                 -> ParseError {
    match found {
        Some((Token::EndOfInput, line)) => {
            ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                               line:     *line, }
        },
        Some((token, line)) => ParseError::UnexpectedToken { expected: expected.to_string(),
                                                             found:    token.to_string(),
                                                             line:     *line, },
        None => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                   line:     0, },
    }
}

/// Consumes the next token if it equals `expected`.
///
/// # Returns
/// The line of the consumed token.
///
/// # Errors
/// Returns `UnexpectedToken` or `UnexpectedEndOfInput` otherwise.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((token, line)) if token == expected => Ok(*line),
        other => Err(unexpected(&format!("'{expected}'"), other)),
    }
}

/// Returns `true` if the next token equals `token`.
pub(in crate::interpreter::parser) fn peek_is<'a, I>(tokens: &mut Peekable<I>, token: &Token) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    tokens.peek().is_some_and(|(next, _)| next == token)
}

/// Returns the line of the next token, or `0` past the end.
pub(in crate::interpreter::parser) fn peek_line<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a (Token, usize)>
{
    tokens.peek().map_or(0, |(_, line)| *line)
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by array literals, dictionary literals, argument
/// lists and parameter lists. It repeatedly calls `parse_item` to parse one
/// element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, or if something other
/// than a comma or the closing token follows an item.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if peek_is(tokens, closing) {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((token, _)) if token == closing => break,
            other => return Err(unexpected(&format!("',' or '{closing}'"), other)),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) => Ok(name.clone()),
        other => Err(unexpected("an identifier", other)),
    }
}

/// Resolves a type name used for a variable or parameter.
///
/// # Errors
/// Returns `ParseError::UnknownType` for `Void` and any name that is not a
/// class.
pub(in crate::interpreter::parser) fn resolve_type(name: &str, line: usize) -> ParseResult<TypeTag> {
    TypeTag::from_name(name).ok_or_else(|| ParseError::UnknownType { name: name.to_string(),
                                                                     line })
}

/// Resolves a type name used as a return type, where `Void` is allowed.
pub(in crate::interpreter::parser) fn resolve_return_type(name: &str,
                                                          line: usize)
                                                          -> ParseResult<ReturnType> {
    if name == "Void" {
        return Ok(ReturnType::Void);
    }
    resolve_type(name, line).map(ReturnType::Value)
}

/// Parses a type name token into a class.
pub(in crate::interpreter::parser) fn parse_type<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<TypeTag>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::TypeName(name), line)) => resolve_type(name, *line),
        other => Err(unexpected("a type name", other)),
    }
}
