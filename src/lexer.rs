//! The lexer represents the first step in the compilation pipeline.
//!
//! Its input is raw schema source and its output is an ordered, finite
//! sequence of tokens. Comments (`#` to end of line) and whitespace are
//! discarded here and never reach the parser. The parser consumes the
//! sequence through the cursor API: [`peek`](Lexer::peek) and
//! [`next`](Lexer::next).

use std::cell::Cell;

use thiserror::Error as ThisError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    fn update_char(mut self, c: char) -> Pos {
        match c {
            '\u{FEFF}' | '\r' => (),
            '\t' => self.col += 8,
            '\n' => {
                // go to the next line and cr back to column 1
                self.col = 1;
                self.line += 1;
            }
            _ => self.col += 1,
        }
        self
    }
}

impl Default for Pos {
    fn default() -> Self {
        Pos { line: 1, col: 1 }
    }
}

/// TokenValue only holds tag-like variants and one borrowed-str variant -
/// therefore it is, conveniently, Copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue<'a> {
    /// An identifier, keyword, or type reference. Wrapper markers are not
    /// splitters, so `[HotItem!]!`, `@query` and `+@mutation` are each one
    /// Word.
    Word(&'a str),
    Comma,
    OpenParen,
    CloseParen,
    Colon,
    Pipe,
    EqualSign,
    OpenCurly,
    CloseCurly,
}

impl<'a> TokenValue<'a> {
    /// The token exactly as it appeared in the source.
    pub fn as_str(&self) -> &'a str {
        use TokenValue::*;
        match *self {
            Word(w) => w,
            Comma => ",",
            OpenParen => "(",
            CloseParen => ")",
            Colon => ":",
            Pipe => "|",
            EqualSign => "=",
            OpenCurly => "{",
            CloseCurly => "}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub val: TokenValue<'a>,
    pub pos: Pos,
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("eof - no more tokens")]
    EOF,
}

/// Tokenizes the entire source up front and hands the tokens out through a
/// shared cursor, so the parser can drive it through `&self`.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token<'a>>,
    cursor: Cell<usize>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Lexer<'a> {
        Lexer {
            tokens: tokenize(text),
            cursor: Cell::new(0),
        }
    }

    pub fn has_next(&self) -> bool {
        self.cursor.get() < self.tokens.len()
    }

    /// The next token without consuming it.
    pub fn peek(&self) -> Result<Token<'a>, LexerError> {
        self.tokens
            .get(self.cursor.get())
            .copied()
            .ok_or(LexerError::EOF)
    }

    /// Consumes and returns the next token.
    pub fn next(&self) -> Result<Token<'a>, LexerError> {
        let token = self.peek()?;
        self.cursor.set(self.cursor.get() + 1);
        Ok(token)
    }
}

fn splitter(c: char) -> Option<TokenValue<'static>> {
    use TokenValue::*;
    let val = match c {
        ',' => Comma,
        '(' => OpenParen,
        ')' => CloseParen,
        ':' => Colon,
        '|' => Pipe,
        '=' => EqualSign,
        '{' => OpenCurly,
        '}' => CloseCurly,
        _ => return None,
    };
    Some(val)
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    // start offset and pos of the word currently being accumulated
    let mut word: Option<(usize, Pos)> = None;
    let mut pos = Pos::default();
    let mut in_comment = false;

    for (offset, c) in text.char_indices() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            pos = pos.update_char(c);
            continue;
        }
        if c == '#' {
            flush(text, &mut word, offset, &mut tokens);
            in_comment = true;
        } else if c.is_whitespace() {
            flush(text, &mut word, offset, &mut tokens);
        } else if let Some(val) = splitter(c) {
            flush(text, &mut word, offset, &mut tokens);
            tokens.push(Token { val, pos });
        } else if word.is_none() {
            word = Some((offset, pos));
        }
        pos = pos.update_char(c);
    }
    flush(text, &mut word, text.len(), &mut tokens);
    tokens
}

fn flush<'a>(
    text: &'a str,
    word: &mut Option<(usize, Pos)>,
    end: usize,
    tokens: &mut Vec<Token<'a>>,
) {
    if let Some((start, pos)) = word.take() {
        tokens.push(Token {
            val: TokenValue::Word(&text[start..end]),
            pos,
        });
    }
}
