//! Recursive-descent parser for the style-mapping language.

use std::collections::BTreeMap;

use crate::docx::BreakKind;
use crate::html::paths::{HtmlPath, HtmlPathElement};

use super::matchers::{
    DocumentMatcher, ElementMatcher, ListMatcher, RunFlag, StringMatcher,
};
use super::tokenizer::{tokenize, Token, TokenType};
use super::StyleMapping;

/// A parse failure: what was expected, what was found and where.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ParseError {
    pub(super) expected: String,
    pub(super) actual: &'static str,
    /// 0-based character offset of the offending token.
    pub(super) char_index: usize,
}

struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenStream {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> &Token {
        // tokenize always appends an End token, so the index never runs past
        // the last element.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.token_type != TokenType::End {
            self.index += 1;
        }
        token
    }

    fn try_consume(&mut self, token_type: TokenType) -> Option<Token> {
        (self.peek().token_type == token_type).then(|| self.advance())
    }

    fn expect(&mut self, token_type: TokenType) -> Result<Token, ParseError> {
        self.try_consume(token_type)
            .ok_or_else(|| self.error(token_type.as_str()))
    }

    fn skip_whitespace(&mut self) {
        while self.try_consume(TokenType::Whitespace).is_some() {}
    }

    fn error(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError {
            expected: expected.into(),
            actual: token.token_type.as_str(),
            char_index: token.position,
        }
    }
}

pub(super) fn parse_style(line: &str) -> Result<StyleMapping, ParseError> {
    let mut tokens = TokenStream::new(tokenize(line));
    let matcher = parse_document_matcher(&mut tokens)?;
    tokens.skip_whitespace();
    tokens.expect(TokenType::Arrow)?;
    // The output path is only present after a separating space; `r =>` maps
    // to the empty path.
    let path = if tokens.try_consume(TokenType::Whitespace).is_some() {
        parse_html_path(&mut tokens)?
    } else {
        HtmlPath::empty()
    };
    tokens.expect(TokenType::End)?;
    Ok(StyleMapping { matcher, path })
}

pub(super) fn parse_document_matcher_line(line: &str) -> Result<DocumentMatcher, ParseError> {
    let mut tokens = TokenStream::new(tokenize(line));
    let matcher = parse_document_matcher(&mut tokens)?;
    tokens.expect(TokenType::End)?;
    Ok(matcher)
}

pub(super) fn parse_html_path_line(line: &str) -> Result<HtmlPath, ParseError> {
    let mut tokens = TokenStream::new(tokenize(line));
    let path = parse_html_path(&mut tokens)?;
    tokens.expect(TokenType::End)?;
    Ok(path)
}

fn parse_document_matcher(tokens: &mut TokenStream) -> Result<DocumentMatcher, ParseError> {
    const EXPECTED: &str =
        "p, r, table, b, i, u, strike, all-caps, small-caps, comment-reference or br";
    if tokens.peek().token_type != TokenType::Identifier {
        return Err(tokens.error(EXPECTED));
    }
    let token = tokens.advance();
    match token.value.as_str() {
        "p" => Ok(DocumentMatcher::Paragraph(parse_element_options(
            tokens, true,
        )?)),
        "r" => Ok(DocumentMatcher::Run(parse_element_options(tokens, false)?)),
        "table" => Ok(DocumentMatcher::Table(parse_element_options(
            tokens, false,
        )?)),
        "b" => Ok(DocumentMatcher::Flag(RunFlag::Bold)),
        "i" => Ok(DocumentMatcher::Flag(RunFlag::Italic)),
        "u" => Ok(DocumentMatcher::Flag(RunFlag::Underline)),
        "strike" => Ok(DocumentMatcher::Flag(RunFlag::Strikethrough)),
        "all-caps" => Ok(DocumentMatcher::Flag(RunFlag::AllCaps)),
        "small-caps" => Ok(DocumentMatcher::Flag(RunFlag::SmallCaps)),
        "comment-reference" => Ok(DocumentMatcher::CommentReference),
        "br" => parse_break(tokens),
        _ => Err(ParseError {
            expected: EXPECTED.to_string(),
            actual: TokenType::Identifier.as_str(),
            char_index: token.position,
        }),
    }
}

fn parse_element_options(
    tokens: &mut TokenStream,
    allow_list: bool,
) -> Result<ElementMatcher, ParseError> {
    let mut matcher = ElementMatcher::default();
    loop {
        if tokens.try_consume(TokenType::Dot).is_some() {
            matcher.style_id = Some(tokens.expect(TokenType::Identifier)?.value);
        } else if tokens.try_consume(TokenType::OpenSquareBracket).is_some() {
            let name = tokens.expect(TokenType::Identifier)?;
            if name.value != "style-name" {
                return Err(ParseError {
                    expected: "style-name".to_string(),
                    actual: TokenType::Identifier.as_str(),
                    char_index: name.position,
                });
            }
            let value_matcher = if tokens.try_consume(TokenType::Equals).is_some() {
                StringMatcher::EqualTo(tokens.expect(TokenType::String)?.value)
            } else if tokens.try_consume(TokenType::StartsWith).is_some() {
                StringMatcher::StartsWith(tokens.expect(TokenType::String)?.value)
            } else {
                return Err(tokens.error("= or ^="));
            };
            tokens.expect(TokenType::CloseSquareBracket)?;
            matcher.style_name = Some(value_matcher);
        } else if allow_list && tokens.peek().token_type == TokenType::Colon {
            tokens.advance();
            let kind = tokens.expect(TokenType::Identifier)?;
            let is_ordered = match kind.value.as_str() {
                "ordered-list" => true,
                "unordered-list" => false,
                _ => {
                    return Err(ParseError {
                        expected: "ordered-list or unordered-list".to_string(),
                        actual: TokenType::Identifier.as_str(),
                        char_index: kind.position,
                    })
                }
            };
            tokens.expect(TokenType::OpenParen)?;
            let level = tokens.expect(TokenType::Integer)?;
            // Levels are 1-based in the mapping language.
            let level_index = level
                .value
                .parse::<u64>()
                .ok()
                .and_then(|value| value.checked_sub(1))
                .ok_or_else(|| ParseError {
                    expected: "positive integer".to_string(),
                    actual: TokenType::Integer.as_str(),
                    char_index: level.position,
                })?;
            tokens.expect(TokenType::CloseParen)?;
            matcher.list = Some(ListMatcher {
                is_ordered,
                level_index,
            });
        } else {
            return Ok(matcher);
        }
    }
}

fn parse_break(tokens: &mut TokenStream) -> Result<DocumentMatcher, ParseError> {
    tokens.expect(TokenType::OpenSquareBracket)?;
    let name = tokens.expect(TokenType::Identifier)?;
    if name.value != "type" {
        return Err(ParseError {
            expected: "type".to_string(),
            actual: TokenType::Identifier.as_str(),
            char_index: name.position,
        });
    }
    tokens.expect(TokenType::Equals)?;
    let value = tokens.expect(TokenType::String)?;
    tokens.expect(TokenType::CloseSquareBracket)?;
    match value.value.as_str() {
        "line" => Ok(DocumentMatcher::Break(BreakKind::Line)),
        "page" => Ok(DocumentMatcher::Break(BreakKind::Page)),
        "column" => Ok(DocumentMatcher::Break(BreakKind::Column)),
        _ => Err(ParseError {
            expected: "'line', 'page' or 'column'".to_string(),
            actual: TokenType::String.as_str(),
            char_index: value.position,
        }),
    }
}

fn parse_html_path(tokens: &mut TokenStream) -> Result<HtmlPath, ParseError> {
    if tokens.try_consume(TokenType::Bang).is_some() {
        return Ok(HtmlPath::Ignore);
    }
    let mut elements = Vec::new();
    if tokens.peek().token_type == TokenType::Identifier {
        elements.push(parse_path_element(tokens)?);
        loop {
            // Trailing whitespace only belongs to the path when a `>`
            // follows; otherwise leave it for the caller.
            let checkpoint = tokens.index;
            tokens.skip_whitespace();
            if tokens.try_consume(TokenType::Gt).is_some() {
                tokens.skip_whitespace();
                elements.push(parse_path_element(tokens)?);
            } else {
                tokens.index = checkpoint;
                break;
            }
        }
    }
    Ok(HtmlPath::Elements(elements))
}

fn parse_path_element(tokens: &mut TokenStream) -> Result<HtmlPathElement, ParseError> {
    let mut tag_names = vec![tokens.expect(TokenType::Identifier)?.value];
    while tokens.try_consume(TokenType::Choice).is_some() {
        tag_names.push(tokens.expect(TokenType::Identifier)?.value);
    }
    let mut classes: Vec<String> = Vec::new();
    while tokens.try_consume(TokenType::Dot).is_some() {
        classes.push(tokens.expect(TokenType::Identifier)?.value);
    }
    let mut fresh = false;
    let mut separator = None;
    while tokens.try_consume(TokenType::Colon).is_some() {
        let option = tokens.expect(TokenType::Identifier)?;
        match option.value.as_str() {
            "fresh" => fresh = true,
            "separator" => {
                tokens.expect(TokenType::OpenParen)?;
                separator = Some(tokens.expect(TokenType::String)?.value);
                tokens.expect(TokenType::CloseParen)?;
            }
            _ => {
                return Err(ParseError {
                    expected: "fresh or separator".to_string(),
                    actual: TokenType::Identifier.as_str(),
                    char_index: option.position,
                })
            }
        }
    }
    let mut attributes = BTreeMap::new();
    if !classes.is_empty() {
        attributes.insert("class".to_string(), classes.join(" "));
    }
    Ok(HtmlPathElement {
        tag_names,
        attributes,
        fresh,
        separator,
    })
}
