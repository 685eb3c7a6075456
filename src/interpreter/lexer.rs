use std::fmt;

use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexicalError)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Float literal tokens, such as `3.14` or `.5`.
    #[regex(r"[0-9]*\.[0-9]+", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    ///
    /// The digits are read unsigned; the parser checks the range once it
    /// knows whether a minus sign applies.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(u64),
    /// String literal tokens with their escapes resolved.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, parse_string)]
    String(String),
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `return`
    #[token("return")]
    Return,
    /// `print`
    #[token("print")]
    Print,
    /// Capitalised names in type position, such as `Integer`.
    #[regex(r"[A-Z][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    TypeName(String),
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// ```text
    /// /* Multi line comments. */
    /// ```
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| {
        let comment = lex.slice();
        lex.extras.line += comment.matches('\n').count();
        if let Some(offset) = comment.rfind('\n') {
            lex.extras.line_start = lex.span().start + offset + 1;
        }
        logos::Skip
    })]
    MultiLineComment,
    /// Line breaks; skipped after advancing the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `%=`
    #[token("%=")]
    ModAssign,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `?:`
    #[token("?:")]
    Elvis,
    /// `@[`, the opening of a dictionary literal.
    #[token("@[")]
    DictOpen,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Equals,
    /// `!`
    #[token("!")]
    Bang,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// Appended by [`tokenize`] after the last real token.
    EndOfInput,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Float(value) => return write!(f, "{value}"),
            Self::Integer(value) => return write!(f, "{value}"),
            Self::String(value) => return write!(f, "\"{value}\""),
            Self::TypeName(name) | Self::Identifier(name) => return write!(f, "{name}"),
            Self::True => "true",
            Self::False => "false",
            Self::Nil => "nil",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Return => "return",
            Self::Print => "print",
            Self::Comment | Self::MultiLineComment => "comment",
            Self::NewLine => "newline",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Elvis => "?:",
            Self::DictOpen => "@[",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equals => "=",
            Self::Bang => "!",
            Self::Question => "?",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::EndOfInput => "end of input",
        };
        write!(f, "{text}")
    }
}

/// Failure reported by a token callback.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum LexicalError {
    /// No rule matched the input.
    #[default]
    Unrecognized,
    /// An integer literal does not fit in a `u64`.
    IntegerTooLarge,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset where it starts, so errors can
/// report a line and a column.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
///
/// # Errors
/// Returns `LexicalError::IntegerTooLarge` if the digits do not fit in a
/// `u64`.
fn parse_integer(lex: &logos::Lexer<Token>) -> Result<u64, LexicalError> {
    lex.slice().parse().map_err(|_| LexicalError::IntegerTooLarge)
}

/// Strips the quotes of a string literal and resolves its escapes.
///
/// `\n`, `\t`, `\"` and `\\` are recognised; any other escaped character
/// stands for itself.
fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

/// Splits source text into `(token, line)` pairs.
///
/// The returned list always ends with [`Token::EndOfInput`], carrying the last
/// line of the source.
///
/// # Errors
/// - `ParseError::Lexical` if some input matches no token rule.
/// - `ParseError::LiteralTooLarge` for integer literals beyond `u64`.
///
/// # Example
/// ```
/// use prometheus::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("Integer x = 4;\nx++;").unwrap();
/// assert_eq!(tokens[0], (Token::TypeName("Integer".to_string()), 1));
/// assert_eq!(tokens[3], (Token::Integer(4), 1));
/// assert_eq!(tokens[5], (Token::Identifier("x".to_string()), 2));
/// assert_eq!(tokens.last(), Some(&(Token::EndOfInput, 2)));
///
/// assert!(tokenize("Integer x = 4 # 2;").is_err());
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut lexer = Token::lexer_with_extras(source, LexerExtras::default());
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        let line = lexer.extras.line;
        match token {
            Ok(token) => tokens.push((token, line)),
            Err(LexicalError::IntegerTooLarge) => {
                return Err(ParseError::LiteralTooLarge { literal: lexer.slice().to_string(),
                                                         line });
            },
            Err(LexicalError::Unrecognized) => {
                let column = lexer.span().start - lexer.extras.line_start + 1;
                return Err(ParseError::Lexical { text: lexer.slice().to_string(),
                                                 line,
                                                 column });
            },
        }
    }

    tokens.push((Token::EndOfInput, lexer.extras.line));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(token, _)| token).collect()
    }

    #[test]
    fn numbers_prefer_the_longest_match() {
        assert_eq!(kinds("12 .5 3.25"),
                   vec![Token::Integer(12), Token::Float(0.5), Token::Float(3.25), Token::EndOfInput]);
    }

    #[test]
    fn keywords_do_not_swallow_longer_identifiers() {
        assert_eq!(kinds("if iffy"),
                   vec![Token::If, Token::Identifier("iffy".to_string()), Token::EndOfInput]);
    }

    #[test]
    fn two_character_operators_win() {
        assert_eq!(kinds("a ?: b @[ ++"),
                   vec![Token::Identifier("a".to_string()),
                        Token::Elvis,
                        Token::Identifier("b".to_string()),
                        Token::DictOpen,
                        Token::PlusPlus,
                        Token::EndOfInput]);
    }

    #[test]
    fn strings_resolve_escapes() {
        assert_eq!(kinds(r#""a\tb\"c\\""#),
                   vec![Token::String("a\tb\"c\\".to_string()), Token::EndOfInput]);
    }

    #[test]
    fn comments_advance_lines() {
        let tokens = tokenize("/* one\ntwo */ x // tail\ny").unwrap();
        assert_eq!(tokens[0], (Token::Identifier("x".to_string()), 2));
        assert_eq!(tokens[1], (Token::Identifier("y".to_string()), 3));
    }

    #[test]
    fn unknown_characters_report_line_and_column() {
        let error = tokenize("x = 1;\n  y $ 2;").unwrap_err();
        assert_eq!(error,
                   ParseError::Lexical { text:   "$".to_string(),
                                         line:   2,
                                         column: 5, });
    }

    #[test]
    fn oversized_integers_are_rejected() {
        let error = tokenize("99999999999999999999").unwrap_err();
        assert!(matches!(error, ParseError::LiteralTooLarge { line: 1, .. }));
    }
}
