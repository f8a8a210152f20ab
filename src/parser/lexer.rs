//! Character scanner for the model language.
//!
//! Produces one spanned token at a time; the parser pulls tokens on demand.
//! Regex literals (`/.../`) are not ordinary tokens: they are scanned only
//! when the parser explicitly asks for one (after `regex=`), so they never
//! collide with comment handling.

use super::error::SyntaxError;

/// A lexical token of the model language.
///
/// Keywords are not distinguished here; the parser matches on `Ident`
/// contents, which keeps words like `optional` usable as field names.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Eq,
    Dot,
    Star,
    /// The relationship arrow `-->`.
    Arrow,
    Eof,
}

impl Token {
    /// Short description used in expectation messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("'{s}'"),
            Token::Str(_) => "a string literal".to_string(),
            Token::Int(n) => format!("'{n}'"),
            Token::Float(f) => format!("'{f}'"),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Arrow => "'-->'".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token plus the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub column: u32,
}

pub struct Lexer<'a> {
    label: &'a str,
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &str, label: &'a str) -> Self {
        Self {
            label,
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans the next ordinary token, skipping whitespace and comments.
    pub fn next_token(&mut self) -> Result<Spanned, SyntaxError> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);
        let spanned = |token| Spanned { token, line, column };

        let Some(c) = self.peek_char() else {
            return Ok(spanned(Token::Eof));
        };

        if is_ident_start(c) {
            return Ok(spanned(Token::Ident(self.scan_ident())));
        }
        if c.is_ascii_digit() {
            return Ok(spanned(self.scan_number(false, line, column)?));
        }

        match c {
            '"' => Ok(spanned(Token::Str(self.scan_string(line, column)?))),
            '{' => {
                self.bump();
                Ok(spanned(Token::LBrace))
            }
            '}' => {
                self.bump();
                Ok(spanned(Token::RBrace))
            }
            '[' => {
                self.bump();
                Ok(spanned(Token::LBracket))
            }
            ']' => {
                self.bump();
                Ok(spanned(Token::RBracket))
            }
            ',' => {
                self.bump();
                Ok(spanned(Token::Comma))
            }
            '=' => {
                self.bump();
                Ok(spanned(Token::Eq))
            }
            '.' => {
                self.bump();
                Ok(spanned(Token::Dot))
            }
            '*' => {
                self.bump();
                Ok(spanned(Token::Star))
            }
            '-' => {
                self.bump();
                if self.peek_char() == Some('-') && self.peek_at(1) == Some('>') {
                    self.bump();
                    self.bump();
                    return Ok(spanned(Token::Arrow));
                }
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    return Ok(spanned(self.scan_number(true, line, column)?));
                }
                Err(self.err(line, column, "expected '-->' or a negative number after '-'"))
            }
            other => Err(self.err(line, column, format!("unexpected character '{other}'"))),
        }
    }

    /// Scans a `/.../` regex literal, terminated by an unescaped `/`.
    ///
    /// Only callable when the parser knows one must follow (after `regex=`);
    /// the pattern body is passed through verbatim except that `\/` unescapes
    /// to `/`.
    pub fn scan_regex_literal(&mut self) -> Result<(String, u32, u32), SyntaxError> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);
        if self.peek_char() != Some('/') {
            return Err(self.err(line, column, "expected a '/.../' regex literal"));
        }
        self.bump();

        let mut pattern = String::new();
        loop {
            match self.peek_char() {
                None => return Err(self.err(line, column, "unterminated regex literal")),
                Some('/') => {
                    self.bump();
                    return Ok((pattern, line, column));
                }
                Some('\\') => {
                    self.bump();
                    match self.peek_char() {
                        Some('/') => {
                            pattern.push('/');
                            self.bump();
                        }
                        Some(c) => {
                            pattern.push('\\');
                            pattern.push(c);
                            self.bump();
                        }
                        None => return Err(self.err(line, column, "unterminated regex literal")),
                    }
                }
                Some(c) => {
                    pattern.push(c);
                    self.bump();
                }
            }
        }
    }

    // --- Scanners ---

    fn scan_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    fn scan_number(&mut self, negative: bool, line: u32, column: u32) -> Result<Token, SyntaxError> {
        let mut raw = String::new();
        if negative {
            raw.push('-');
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                raw.push(c);
                self.bump();
            } else {
                break;
            }
        }
        // A '.' makes this a float, but only when digits follow; a trailing
        // '.' belongs to dotted-name syntax and must stay un-consumed.
        if self.peek_char() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            raw.push('.');
            self.bump();
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    raw.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            let value = raw
                .parse::<f64>()
                .map_err(|_| self.err(line, column, format!("invalid numeric literal '{raw}'")))?;
            return Ok(Token::Float(value));
        }
        let value = raw
            .parse::<i64>()
            .map_err(|_| self.err(line, column, format!("numeric literal '{raw}' out of range")))?;
        Ok(Token::Int(value))
    }

    fn scan_string(&mut self, line: u32, column: u32) -> Result<String, SyntaxError> {
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            match self.peek_char() {
                None => return Err(self.err(line, column, "unterminated string literal")),
                Some('"') => {
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => {
                    self.bump();
                    match self.peek_char() {
                        Some('"') => out.push('"'),
                        Some('\\') => out.push('\\'),
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some(c) => {
                            out.push('\\');
                            out.push(c);
                        }
                        None => return Err(self.err(line, column, "unterminated string literal")),
                    }
                    self.bump();
                }
                Some(c) => {
                    out.push(c);
                    self.bump();
                }
            }
        }
    }

    /// Skips whitespace plus `//` line and `/* */` block comments.
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek_char() {
                            None => {
                                return Err(self.err(line, column, "unterminated block comment"))
                            }
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    // --- Cursor ---

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        if let Some(c) = self.chars.get(self.pos) {
            if *c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn err(&self, line: u32, column: u32, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.label, line, column, message)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(text, "test.msl");
        let mut out = Vec::new();
        loop {
            let spanned = lexer.next_token().expect("lex failure");
            let done = spanned.token == Token::Eof;
            out.push(spanned.token);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_declaration_surface() {
        let tokens = collect("namespace org.acme\nasset Vehicle identified by vin { }");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("namespace".into()),
                Token::Ident("org".into()),
                Token::Dot,
                Token::Ident("acme".into()),
                Token::Ident("asset".into()),
                Token::Ident("Vehicle".into()),
                Token::Ident("identified".into()),
                Token::Ident("by".into()),
                Token::Ident("vin".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_arrow_and_negative_numbers() {
        let tokens = collect("--> Vehicle[] fleet range=[-40,1.5]");
        assert_eq!(
            tokens,
            vec![
                Token::Arrow,
                Token::Ident("Vehicle".into()),
                Token::LBracket,
                Token::RBracket,
                Token::Ident("fleet".into()),
                Token::Ident("range".into()),
                Token::Eq,
                Token::LBracket,
                Token::Int(-40),
                Token::Comma,
                Token::Float(1.5),
                Token::RBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let tokens = collect("// header\n/* multi\nline */ enum State { }");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("enum".into()),
                Token::Ident("State".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let mut lexer = Lexer::new("namespace\n  org", "test.msl");
        let first = lexer.next_token().unwrap();
        assert_eq!((first.line, first.column), (1, 1));
        let second = lexer.next_token().unwrap();
        assert_eq!((second.line, second.column), (2, 3));
    }

    #[test]
    fn scans_regex_literal_with_escaped_slash() {
        let mut lexer = Lexer::new(r"/^a\/b\d+$/", "test.msl");
        let (pattern, _, _) = lexer.scan_regex_literal().unwrap();
        assert_eq!(pattern, r"^a/b\d+$");
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let mut lexer = Lexer::new("/* never closed", "test.msl");
        let err = lexer.next_token().unwrap_err();
        assert!(err.message.contains("unterminated block comment"));
        assert_eq!((err.line, err.column), (1, 1));
    }

    #[test]
    fn string_escapes() {
        let mut lexer = Lexer::new(r#""a\"b\\c""#, "test.msl");
        let spanned = lexer.next_token().unwrap();
        assert_eq!(spanned.token, Token::Str(r#"a"b\c"#.into()));
    }
}
