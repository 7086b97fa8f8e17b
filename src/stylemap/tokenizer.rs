//! Tokenizer for the style-mapping language.
//!
//! Positions are character offsets into the line, used for the 1-based
//! character numbers in parse warnings.

/// The kinds of token the mapping language distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TokenType {
    Identifier,
    Integer,
    String,
    UnterminatedString,
    Whitespace,
    Arrow,
    Equals,
    StartsWith,
    Dot,
    Colon,
    Gt,
    OpenParen,
    CloseParen,
    OpenSquareBracket,
    CloseSquareBracket,
    Choice,
    Bang,
    UnrecognisedCharacter,
    End,
}

impl TokenType {
    /// The name used in parse warnings.
    pub(super) fn as_str(self) -> &'static str {
        match self {
            TokenType::Identifier => "identifier",
            TokenType::Integer => "integer",
            TokenType::String => "string",
            TokenType::UnterminatedString => "unterminated string",
            TokenType::Whitespace => "whitespace",
            TokenType::Arrow => "arrow",
            TokenType::Equals => "equals",
            TokenType::StartsWith => "starts-with",
            TokenType::Dot => "dot",
            TokenType::Colon => "colon",
            TokenType::Gt => "greater-than",
            TokenType::OpenParen => "open-paren",
            TokenType::CloseParen => "close-paren",
            TokenType::OpenSquareBracket => "open-square-bracket",
            TokenType::CloseSquareBracket => "close-square-bracket",
            TokenType::Choice => "choice",
            TokenType::Bang => "bang",
            TokenType::UnrecognisedCharacter => "unrecognised character",
            TokenType::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub(super) token_type: TokenType,
    /// Token text with escape sequences already decoded.
    pub(super) value: String,
    /// Character offset of the token start.
    pub(super) position: usize,
}

fn is_identifier_start(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

fn is_identifier_part(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_' || character == '-'
}

/// Tokenize a mapping line. The result always ends with an [`TokenType::End`]
/// token positioned one past the last character.
pub(super) fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        let position = index;
        let character = chars[index];
        let token = if character.is_whitespace() {
            let mut value = String::new();
            while index < chars.len() && chars[index].is_whitespace() {
                value.push(chars[index]);
                index += 1;
            }
            Token {
                token_type: TokenType::Whitespace,
                value,
                position,
            }
        } else if is_identifier_start(character) || character == '\\' {
            let mut value = String::new();
            while index < chars.len() {
                if chars[index] == '\\' && index + 1 < chars.len() {
                    value.push(chars[index + 1]);
                    index += 2;
                } else if is_identifier_part(chars[index]) {
                    value.push(chars[index]);
                    index += 1;
                } else {
                    break;
                }
            }
            Token {
                token_type: TokenType::Identifier,
                value,
                position,
            }
        } else if character.is_ascii_digit() {
            let mut value = String::new();
            while index < chars.len() && chars[index].is_ascii_digit() {
                value.push(chars[index]);
                index += 1;
            }
            Token {
                token_type: TokenType::Integer,
                value,
                position,
            }
        } else if character == '\'' {
            index += 1;
            let mut value = String::new();
            let mut terminated = false;
            while index < chars.len() {
                match chars[index] {
                    '\'' => {
                        index += 1;
                        terminated = true;
                        break;
                    }
                    '\\' if index + 1 < chars.len() => {
                        value.push(match chars[index + 1] {
                            'n' => '\n',
                            'r' => '\r',
                            't' => '\t',
                            other => other,
                        });
                        index += 2;
                    }
                    other => {
                        value.push(other);
                        index += 1;
                    }
                }
            }
            Token {
                token_type: if terminated {
                    TokenType::String
                } else {
                    TokenType::UnterminatedString
                },
                value,
                position,
            }
        } else if character == '=' && chars.get(index + 1) == Some(&'>') {
            index += 2;
            Token {
                token_type: TokenType::Arrow,
                value: "=>".to_string(),
                position,
            }
        } else if character == '^' && chars.get(index + 1) == Some(&'=') {
            index += 2;
            Token {
                token_type: TokenType::StartsWith,
                value: "^=".to_string(),
                position,
            }
        } else {
            index += 1;
            let token_type = match character {
                '=' => TokenType::Equals,
                '.' => TokenType::Dot,
                ':' => TokenType::Colon,
                '>' => TokenType::Gt,
                '(' => TokenType::OpenParen,
                ')' => TokenType::CloseParen,
                '[' => TokenType::OpenSquareBracket,
                ']' => TokenType::CloseSquareBracket,
                '|' => TokenType::Choice,
                '!' => TokenType::Bang,
                _ => TokenType::UnrecognisedCharacter,
            };
            Token {
                token_type,
                value: character.to_string(),
                position,
            }
        };
        tokens.push(token);
    }
    tokens.push(Token {
        token_type: TokenType::End,
        value: String::new(),
        position: chars.len(),
    });
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(input: &str) -> Vec<TokenType> {
        tokenize(input)
            .into_iter()
            .map(|token| token.token_type)
            .collect()
    }

    #[test]
    fn test_empty_input_yields_only_end() {
        assert_eq!(token_types(""), vec![TokenType::End]);
    }

    #[test]
    fn test_identifiers_integers_and_strings() {
        assert_eq!(
            token_types("Overture 123 'Tristan'"),
            vec![
                TokenType::Identifier,
                TokenType::Whitespace,
                TokenType::Integer,
                TokenType::Whitespace,
                TokenType::String,
                TokenType::End,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = tokenize("'Tristan");
        assert_eq!(tokens[0].token_type, TokenType::UnterminatedString);
        assert_eq!(tokens[0].value, "Tristan");
    }

    #[test]
    fn test_string_escape_sequences_are_decoded() {
        let tokens = tokenize("'\\r\\n\\t\\'\\\\'");
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].value, "\r\n\t'\\");
    }

    #[test]
    fn test_identifier_escapes_are_decoded() {
        let tokens = tokenize("a\\:b");
        assert_eq!(tokens[0].token_type, TokenType::Identifier);
        assert_eq!(tokens[0].value, "a:b");
    }

    #[test]
    fn test_two_character_symbols() {
        assert_eq!(
            token_types("=>^=="),
            vec![
                TokenType::Arrow,
                TokenType::StartsWith,
                TokenType::Equals,
                TokenType::End,
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_tokenized() {
        let tokens = tokenize("~");
        assert_eq!(tokens[0].token_type, TokenType::UnrecognisedCharacter);
        assert_eq!(tokens[0].value, "~");
    }

    #[test]
    fn test_positions_are_character_offsets() {
        let tokens = tokenize("r => span a");
        let whitespace_positions: Vec<usize> = tokens
            .iter()
            .filter(|token| token.token_type == TokenType::Whitespace)
            .map(|token| token.position)
            .collect();
        assert_eq!(whitespace_positions, vec![1, 4, 9]);
        assert_eq!(tokens.last().map(|token| token.position), Some(11));
    }
}
