/// Lexer for SQL template text with named placeholders
use crate::token::Token;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("generator ':{name}' declares no companion parameters (byte {offset})")]
    GeneratorWithoutParams { name: String, offset: usize },

    #[error("generator ':{name}' is missing its closing '*' (byte {offset})")]
    UnterminatedGenerator { name: String, offset: usize },
}

/// Tokenize template text into a stream of tokens.
///
/// Comments are stripped, `-- name:` markers become `Name` tokens, and text
/// runs adjacent across a stripped comment are merged. Text preceding a
/// marker or the end of input is right-trimmed so removed markers leave no
/// dangling blank lines.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    text: String,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            text: String::new(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while self.pos < self.input.len() {
            let c = self.current_char();
            match c {
                '-' if self.peek_char() == Some('-') => self.consume_comment_or_marker(),
                ':' => self.consume_colon()?,
                '\'' | '"' => self.consume_string(c),
                _ => {
                    self.text.push(c);
                    self.advance();
                }
            }
        }
        self.trim_text_end();
        self.flush_text();
        Ok(self.tokens)
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += self.current_char().len_utf8();
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    fn trim_text_end(&mut self) {
        while self.text.ends_with(char::is_whitespace) {
            self.text.pop();
        }
    }

    /// Consume the rest of the current line (newline included) and return
    /// its content trimmed.
    fn consume_line(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.input.len() && self.current_char() != '\n' {
            self.advance();
        }
        let line = self.input[start..self.pos].trim().to_string();
        if self.pos < self.input.len() {
            self.advance();
        }
        line
    }

    /// `-- name: label` (any number of dashes, arbitrary spacing) becomes a
    /// `Name` token; any other `--` comment is dropped through its newline.
    fn consume_comment_or_marker(&mut self) {
        while self.current_char() == '-' {
            self.advance();
        }
        while self.current_char() == ' ' || self.current_char() == '\t' {
            self.advance();
        }
        if self.input[self.pos..].starts_with("name") {
            let after = &self.input[self.pos + 4..];
            let trimmed = after.trim_start_matches([' ', '\t']);
            if let Some(rest) = trimmed.strip_prefix(':') {
                self.pos = self.input.len() - rest.len();
                let label = self.consume_line();
                self.trim_text_end();
                self.flush_text();
                self.tokens.push(Token::Name(label));
                return;
            }
        }
        self.consume_line();
    }

    /// Quoted SQL strings are opaque: no placeholder or marker recognition
    /// inside them.
    fn consume_string(&mut self, quote: char) {
        self.text.push(quote);
        self.advance();
        while self.current_char() != quote && self.pos < self.input.len() {
            if self.current_char() == '\\' {
                self.text.push('\\');
                self.advance();
                if self.pos < self.input.len() {
                    self.text.push(self.current_char());
                    self.advance();
                }
            } else {
                self.text.push(self.current_char());
                self.advance();
            }
        }
        if self.current_char() == quote {
            self.text.push(quote);
            self.advance();
        }
    }

    fn consume_colon(&mut self) -> Result<(), LexError> {
        match self.peek_char() {
            // `::` casts are plain SQL
            Some(':') => {
                self.text.push_str("::");
                self.advance();
                self.advance();
            }
            Some('*') => self.consume_generator()?,
            Some('!') => {
                let start = self.pos;
                self.advance();
                self.advance();
                let name = self.consume_ident();
                if name.is_empty() {
                    self.text.push_str(&self.input[start..self.pos]);
                } else {
                    self.flush_text();
                    self.tokens.push(Token::Param(format!("!{name}")));
                }
            }
            Some(c) if is_ident_start(c) => {
                self.advance();
                let mut name = self.consume_ident();
                let mut stars = 0;
                while stars < 2 && self.current_char() == '*' {
                    name.push('*');
                    self.advance();
                    stars += 1;
                }
                self.flush_text();
                self.tokens.push(Token::Param(name));
            }
            _ => {
                self.text.push(':');
                self.advance();
            }
        }
        Ok(())
    }

    /// `:*name :p1 :p2*`: companions are read on one line; the closing `*`
    /// may stand alone or lean on the last companion's star run (`:c***`
    /// reads as companion `c**` plus the terminator).
    fn consume_generator(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        self.advance();
        self.advance();
        let ident = self.consume_ident();
        if ident.is_empty() {
            self.text.push_str(&self.input[start..self.pos]);
            return Ok(());
        }
        let name = format!("*{ident}");
        let mut params: Vec<String> = Vec::new();
        loop {
            let ws_start = self.pos;
            while self.current_char() == ' ' || self.current_char() == '\t' {
                self.advance();
            }
            match self.current_char() {
                ':' if self.peek_char().is_some_and(is_ident_start) => {
                    self.advance();
                    let mut param = self.consume_ident();
                    while self.current_char() == '*' {
                        param.push('*');
                        self.advance();
                    }
                    params.push(param);
                }
                '*' => {
                    self.advance();
                    break;
                }
                _ => {
                    match params.last_mut() {
                        Some(last) if last.ends_with('*') => {
                            last.pop();
                        }
                        _ => {
                            return Err(LexError::UnterminatedGenerator {
                                name,
                                offset: start,
                            })
                        }
                    }
                    self.pos = ws_start;
                    break;
                }
            }
        }
        if params.is_empty() {
            return Err(LexError::GeneratorWithoutParams {
                name,
                offset: start,
            });
        }
        self.flush_text();
        self.tokens.push(Token::Generator { name, params });
        Ok(())
    }

    fn consume_ident(&mut self) -> String {
        let start = self.pos;
        if is_ident_start(self.current_char()) {
            self.advance();
            while self.current_char().is_alphanumeric() || self.current_char() == '_' {
                self.advance();
            }
        }
        self.input[start..self.pos].to_string()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
