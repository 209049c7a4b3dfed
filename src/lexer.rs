// ABOUTME: Lexer turning Monkey source text into a stream of tokens

use crate::token::{lookup_ident, Token, TokenKind};

/// Stateful cursor over the source bytes. `ch` is the byte under the cursor,
/// 0 once the input is exhausted.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    read_position: usize,
    ch: u8,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input,
            position: 0,
            read_position: 0,
            ch: 0,
        };
        lexer.read_char();
        lexer
    }

    /// Returns the next token in the stream. Yields `{EOF, ""}` forever once
    /// the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let token = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.two_char_token(TokenKind::Eq)
                } else {
                    Token::new(TokenKind::Assign, "=")
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.two_char_token(TokenKind::NotEq)
                } else {
                    Token::new(TokenKind::Bang, "!")
                }
            }
            b'<' => {
                if self.peek_char() == b'=' {
                    self.two_char_token(TokenKind::Le)
                } else {
                    Token::new(TokenKind::Lt, "<")
                }
            }
            b'>' => {
                if self.peek_char() == b'=' {
                    self.two_char_token(TokenKind::Ge)
                } else {
                    Token::new(TokenKind::Gt, ">")
                }
            }
            b'+' => Token::new(TokenKind::Plus, "+"),
            b'-' => Token::new(TokenKind::Minus, "-"),
            b'*' => Token::new(TokenKind::Asterisk, "*"),
            b'/' => Token::new(TokenKind::Slash, "/"),
            b',' => Token::new(TokenKind::Comma, ","),
            b':' => Token::new(TokenKind::Colon, ":"),
            b';' => Token::new(TokenKind::Semicolon, ";"),
            b'(' => Token::new(TokenKind::LParen, "("),
            b')' => Token::new(TokenKind::RParen, ")"),
            b'{' => Token::new(TokenKind::LBrace, "{"),
            b'}' => Token::new(TokenKind::RBrace, "}"),
            b'[' => Token::new(TokenKind::LBracket, "["),
            b']' => Token::new(TokenKind::RBracket, "]"),
            b'"' => Token::new(TokenKind::String, self.read_string()),
            0 => Token::new(TokenKind::Eof, ""),
            ch => {
                if is_letter(ch) {
                    let ident = self.read_identifier();
                    // read_identifier leaves the cursor past the run already
                    return Token::new(lookup_ident(ident), ident);
                } else if ch.is_ascii_digit() {
                    return self.number_token();
                } else {
                    Token::new(TokenKind::Illegal, (ch as char).to_string())
                }
            }
        };

        self.read_char();
        token
    }

    fn read_char(&mut self) {
        self.ch = *self.input.as_bytes().get(self.read_position).unwrap_or(&0);
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> u8 {
        *self.input.as_bytes().get(self.read_position).unwrap_or(&0)
    }

    fn skip_whitespace_and_comments(&mut self) {
        let mut comment = false;
        loop {
            if comment {
                if self.ch == 0 {
                    return;
                }
                if is_newline(self.ch) {
                    comment = false;
                }
                self.read_char();
            } else if self.ch == b'#' {
                comment = true;
                self.read_char();
            } else if is_whitespace(self.ch) {
                self.read_char();
            } else {
                return;
            }
        }
    }

    fn read_identifier(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while is_letter(self.ch) {
            self.read_char();
        }
        &input[start..self.position]
    }

    fn read_number(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while self.ch.is_ascii_digit() || self.ch == b'.' {
            self.read_char();
        }
        &input[start..self.position]
    }

    /// Consumes a digit/dot run and classifies it by the number of dots:
    /// zero is an integer, one is a float, anything more is illegal.
    fn number_token(&mut self) -> Token {
        let literal = self.read_number();
        let kind = match literal.bytes().filter(|b| *b == b'.').count() {
            0 => TokenKind::Int,
            1 => TokenKind::Float,
            _ => TokenKind::Illegal,
        };
        Token::new(kind, literal)
    }

    /// The literal excludes the delimiting quotes; an unterminated string is
    /// closed by end of input. No escape processing.
    fn read_string(&mut self) -> String {
        let start = self.position + 1;
        loop {
            self.read_char();
            if self.ch == b'"' || self.ch == 0 {
                break;
            }
        }
        self.input[start..self.position].to_string()
    }

    fn two_char_token(&mut self, kind: TokenKind) -> Token {
        let first = self.ch;
        self.read_char();
        Token::new(kind, format!("{}{}", first as char, self.ch as char))
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_newline(ch: u8) -> bool {
    ch == b'\n' || ch == b'\r'
}

fn is_whitespace(ch: u8) -> bool {
    ch == b' ' || ch == b'\t' || is_newline(ch)
}
