use lazy_static::lazy_static;
use regex::Regex;

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{lookup_identifier, Token, TokenKind};

/// Consumes the matched text and returns the token it forms, or `None` when
/// the text carries no token (whitespace).
pub type RegexHandler = fn(&mut Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("lexer patterns are valid regular expressions"),
        handler,
    }
}

lazy_static! {
    // Order matters: two character operators must be tried before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^[ \t\n\r]+", skip_handler),
        pattern("^[a-zA-Z]+", symbol_handler),
        pattern("^[0-9]+", number_handler),
        pattern("^\"[^\"]*\"?", string_handler),
        pattern("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals)),
        pattern("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals)),
        pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Assign)),
        pattern("^!", MK_DEFAULT_HANDLER!(TokenKind::Bang)),
        pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus)),
        pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Minus)),
        pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Asterisk)),
        pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash)),
        pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less)),
        pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater)),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma)),
        pattern("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon)),
        pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon)),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen)),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen)),
        pattern("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly)),
        pattern("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly)),
        pattern("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket)),
        pattern("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket)),
    ];
}

/// Pull-based scanner: every call to [`Lexer::next_token`] yields one token.
///
/// Scanning never fails. Characters no pattern accepts come back as
/// `Illegal` tokens and the end of input yields `EOF` on every later call.
#[derive(Debug, Clone)]
pub struct Lexer {
    source: String,
    pos: usize,
}

impl Lexer {
    pub fn new(source: impl Into<String>) -> Lexer {
        Lexer {
            source: source.into(),
            pos: 0,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn span_from(&self, start: usize) -> Span {
        Span {
            start: Position(start as u32),
            end: Position(self.pos as u32),
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            if self.at_eof() {
                return MK_TOKEN!(TokenKind::EOF, String::new(), self.span_from(self.pos));
            }

            let matched = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(self.remainder())
                    .map(|m| (pattern.handler, m.as_str().to_string()))
            });

            match matched {
                Some((handler, text)) => {
                    if let Some(token) = handler(self, &text) {
                        return token;
                    }
                }
                None => return self.illegal_token(),
            }
        }
    }

    fn illegal_token(&mut self) -> Token {
        let start = self.pos;
        let ch = self.remainder().chars().next().unwrap_or_default();
        self.advance_n(ch.len_utf8());

        MK_TOKEN!(TokenKind::Illegal, ch.to_string(), self.span_from(start))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to, but not including, `EOF`.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::EOF {
            None
        } else {
            Some(token)
        }
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.advance_n(matched.len());
    None
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let start = lexer.pos();
    lexer.advance_n(matched.len());

    Some(MK_TOKEN!(
        lookup_identifier(matched),
        String::from(matched),
        lexer.span_from(start)
    ))
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let start = lexer.pos();
    lexer.advance_n(matched.len());

    Some(MK_TOKEN!(TokenKind::Int, String::from(matched), lexer.span_from(start)))
}

// No escape processing; an unterminated string runs to the end of input.
fn string_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let start = lexer.pos();
    lexer.advance_n(matched.len());

    let body = &matched[1..];
    let literal = body.strip_suffix('"').unwrap_or(body);

    Some(MK_TOKEN!(TokenKind::String, String::from(literal), lexer.span_from(start)))
}

/// Scans the whole source, returning every token followed by a single `EOF`.
pub fn tokenize(source: impl Into<String>) -> Vec<Token> {
    let mut lex = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();
        let at_end = token.kind == TokenKind::EOF;
        tokens.push(token);

        if at_end {
            return tokens;
        }
    }
}
