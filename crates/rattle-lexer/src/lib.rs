//! Lexical scanner: classifies character runs into tokens, dispatching to
//! the number/string/identifier/comment sub-scanners.

mod cursor;
mod number;
mod string;

pub use cursor::{Bookmark, Cursor};

use rattle_common::error::LexErrorKind;
use rattle_common::keywords;
use rattle_common::location::Location;
use rattle_common::reactor::LexReactor;
use rattle_common::token::{flags, Token, TokenKind};

fn is_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r'
}

fn is_identifier_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_identifier_body(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// The lexer: pulls tokens one at a time from a `Cursor`. Implements the
/// pipeline surface (`next_token`/`empty`/`drain`) as well as `Iterator` for
/// ergonomic consumption by the parser.
pub struct Lexer<'src, 'r, R> {
    cursor: Cursor<'src, 'r, R>,
    terminal_loc: Option<Location>,
}

impl<'src, 'r, R> Lexer<'src, 'r, R>
where
    R: LexReactor<'src>,
{
    pub fn new(source: &'src str, reactor: &'r mut R) -> Self {
        Self {
            cursor: Cursor::new(source, reactor),
            terminal_loc: None,
        }
    }

    /// True once the source is exhausted. Monotone: never flips back to
    /// false.
    pub fn empty(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Pulls the next token. Once `empty()` is true, always returns the same
    /// `Eot` token at the terminal location.
    pub fn next_token(&mut self) -> Token<'src> {
        if self.cursor.is_eof() {
            if self.terminal_loc.is_none() {
                self.cursor.flush_remaining_line();
                self.terminal_loc = Some(self.cursor.pos_location());
            }
            let loc = self.terminal_loc.unwrap();
            return Token::new(TokenKind::Eot, 0, loc, loc, &[]);
        }
        self.scan_token()
    }

    /// Idempotent: drains every remaining token and leaves the lexer
    /// permanently empty.
    pub fn drain(&mut self) {
        while !self.empty() {
            self.next_token();
        }
    }

    fn scan_token(&mut self) -> Token<'src> {
        let c = self.cursor.peek().expect("caller checked !empty()");
        match c {
            b'\\' => self.lex_toplevel_escape(),
            b'"' | b'\'' => self.lex_string(false),
            b'r' | b'R'
                if matches!(self.cursor.peek_next(), Some(b'"') | Some(b'\'')) =>
            {
                self.cursor.eat(); // r/R
                self.lex_string(true)
            }
            b'#' => self.lex_pound_comment(),
            b'\r' => self.lex_cr(),
            b'\n' => self.single_marker(flags::marker::NEWLINE),
            b';' => self.single_marker(flags::marker::SEMICOLON),
            b'(' => self.single_marker(flags::marker::OPEN_PAREN),
            b')' => self.single_marker(flags::marker::CLOSE_PAREN),
            b'{' => self.single_marker(flags::marker::OPEN_BRACE),
            b'}' => self.single_marker(flags::marker::CLOSE_BRACE),
            b'[' => self.single_marker(flags::marker::OPEN_BRACKET),
            b']' => self.single_marker(flags::marker::CLOSE_BRACKET),
            b'.' => self.single_operator(flags::operator::DOT),
            b',' => self.single_operator(flags::operator::COMMA),
            b'<' => self.lex_relational(flags::operator::LESS_THAN, flags::operator::LESS_EQUAL),
            b'>' => {
                self.lex_relational(flags::operator::GREATER_THAN, flags::operator::GREATER_EQUAL)
            }
            b'!' => self.lex_bang(),
            b'=' => self.lex_equals(),
            b'-' => self.lex_op_or_assign(flags::operator::MINUS, flags::assignment::MINUS_EQUAL),
            b'+' => self.lex_op_or_assign(flags::operator::PLUS, flags::assignment::PLUS_EQUAL),
            b'*' => self.lex_op_or_assign(flags::operator::STAR, flags::assignment::STAR_EQUAL),
            b'/' => self.lex_op_or_assign(flags::operator::SLASH, flags::assignment::SLASH_EQUAL),
            b if is_whitespace(b) => self.lex_whitespace(),
            b if is_identifier_start(b) => self.lex_identifier(),
            b'0'..=b'9' => self.lex_number(),
            _ => self.lex_unrecognized(),
        }
    }

    fn single_marker(&mut self, flag: i32) -> Token<'src> {
        self.cursor.eat();
        self.cursor.make_token(TokenKind::Marker, flag)
    }

    fn single_operator(&mut self, flag: i32) -> Token<'src> {
        self.cursor.eat();
        self.cursor.make_token(TokenKind::Operator, flag)
    }

    fn lex_relational(&mut self, bare: i32, with_eq: i32) -> Token<'src> {
        self.cursor.eat();
        if self.cursor.eat_if(b'=') {
            self.cursor.make_token(TokenKind::Operator, with_eq)
        } else {
            self.cursor.make_token(TokenKind::Operator, bare)
        }
    }

    fn lex_bang(&mut self) -> Token<'src> {
        self.cursor.eat();
        if self.cursor.eat_if(b'=') {
            self.cursor.make_token(TokenKind::Operator, flags::operator::NOT_EQUAL)
        } else {
            self.cursor.make_error_token(LexErrorKind::PartialNotEqual)
        }
    }

    fn lex_equals(&mut self) -> Token<'src> {
        self.cursor.eat();
        if self.cursor.eat_if(b'=') {
            self.cursor.make_token(TokenKind::Operator, flags::operator::EQUAL_EQUAL)
        } else {
            self.cursor.make_token(TokenKind::Assignment, flags::assignment::EQUAL)
        }
    }

    fn lex_op_or_assign(&mut self, operator_flag: i32, assign_flag: i32) -> Token<'src> {
        self.cursor.eat();
        if self.cursor.eat_if(b'=') {
            self.cursor.make_token(TokenKind::Assignment, assign_flag)
        } else {
            self.cursor.make_token(TokenKind::Operator, operator_flag)
        }
    }

    fn lex_cr(&mut self) -> Token<'src> {
        self.cursor.eat();
        if self.cursor.eat_if(b'\n') {
            self.cursor.make_token(TokenKind::Marker, flags::marker::NEWLINE)
        } else {
            self.cursor.make_error_token(LexErrorKind::PartiallyFormedCrlf)
        }
    }

    fn lex_toplevel_escape(&mut self) -> Token<'src> {
        self.cursor.eat(); // backslash
        match self.cursor.peek() {
            Some(b'\n') => {
                self.cursor.eat();
                self.cursor.make_token(TokenKind::Marker, flags::marker::ESCAPE)
            }
            Some(b'\r') => {
                self.cursor.eat();
                if self.cursor.eat_if(b'\n') {
                    self.cursor.make_token(TokenKind::Marker, flags::marker::ESCAPE)
                } else {
                    self.cursor.make_error_token(LexErrorKind::PartiallyFormedCrlf)
                }
            }
            Some(_) => self.cursor.make_error_token(LexErrorKind::InvalidToplvlEscapeSequence),
            None => self.cursor.make_error_token(LexErrorKind::PartialToplvlEscape),
        }
    }

    fn lex_pound_comment(&mut self) -> Token<'src> {
        self.cursor.eat(); // '#'
        self.cursor.eat_while(|b| b != b'\n');
        self.cursor.make_token(TokenKind::Marker, flags::marker::POUND)
    }

    fn lex_whitespace(&mut self) -> Token<'src> {
        self.cursor.eat_while(is_whitespace);
        self.cursor.make_token(TokenKind::Marker, flags::marker::WHITESPACE)
    }

    fn lex_unrecognized(&mut self) -> Token<'src> {
        self.cursor.eat();
        self.cursor.make_error_token(LexErrorKind::UnrecognizedToplvlCharacter)
    }

    fn lex_identifier(&mut self) -> Token<'src> {
        self.cursor.eat_while(is_identifier_body);
        // `make_token` would flush the buffer before we can inspect the
        // lexeme, so peek at the pending span first.
        let lexeme = self.cursor.pending_lexeme();
        let flag = keywords::lookup(std::str::from_utf8(lexeme).unwrap_or(""))
            .unwrap_or(flags::identifier::VARIABLE);
        self.cursor.make_token(TokenKind::Identifier, flag)
    }
}

impl<'src, 'r, R> Iterator for Lexer<'src, 'r, R>
where
    R: LexReactor<'src>,
{
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.empty() {
            return None;
        }
        Some(self.next_token())
    }
}

impl<'src, 'r, R> rattle_common::pipeline::TokenSource<'src> for Lexer<'src, 'r, R>
where
    R: LexReactor<'src>,
{
    fn next_token(&mut self) -> Token<'src> {
        Lexer::next_token(self)
    }

    fn empty(&self) -> bool {
        Lexer::empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rattle_common::error::{LexError, OnError};

    struct TestReactor<'src> {
        errors: Vec<LexErrorKind>,
        lines: Vec<Vec<u8>>,
        traced: usize,
        _m: std::marker::PhantomData<&'src ()>,
    }

    impl<'src> TestReactor<'src> {
        fn new() -> Self {
            Self {
                errors: Vec::new(),
                lines: Vec::new(),
                traced: 0,
                _m: std::marker::PhantomData,
            }
        }
    }

    impl<'src> LexReactor<'src> for TestReactor<'src> {
        fn report(&mut self, error: LexError<'src>) -> OnError {
            self.errors.push(error.kind);
            OnError::Resume
        }
        fn cache(&mut self, _line_no: u32, line_text: &'src [u8]) {
            self.lines.push(line_text.to_vec());
        }
        fn trace(&mut self, _token: &Token<'src>) {
            self.traced += 1;
        }
    }

    fn lex_all(src: &str) -> (Vec<Token<'_>>, Vec<LexErrorKind>) {
        let mut r = TestReactor::new();
        let mut lexer = Lexer::new(src, &mut r);
        let mut tokens = Vec::new();
        loop {
            let t = lexer.next_token();
            let is_eot = t.kind == TokenKind::Eot;
            tokens.push(t);
            if is_eot {
                break;
            }
        }
        (tokens, r.errors)
    }

    #[test]
    fn empty_source_is_a_single_eot_at_start() {
        let (tokens, errors) = lex_all("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eot);
        assert_eq!(tokens[0].start, Location::start());
        assert!(errors.is_empty());
    }

    #[test]
    fn eot_is_terminal_and_stable() {
        let mut r = TestReactor::new();
        let mut lexer = Lexer::new("x", &mut r);
        let _ = lexer.next_token();
        let first_eot = lexer.next_token();
        let second_eot = lexer.next_token();
        assert_eq!(first_eot.start, second_eot.start);
        assert!(lexer.empty());
    }

    #[test]
    fn not_equal_vs_partial() {
        let (tokens, errors) = lex_all("a != b");
        // a, ws, !=, ws, b, eot
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 6);

        let (_tokens, errors) = lex_all("a ! b");
        assert_eq!(errors, vec![LexErrorKind::PartialNotEqual]);
    }

    #[test]
    fn equals_vs_equal_equal() {
        let (tokens, _) = lex_all("x = y == z");
        let assign = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Assignment)
            .unwrap();
        assert_eq!(assign.flags, flags::assignment::EQUAL);
        let op = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Operator)
            .unwrap();
        assert_eq!(op.flags, flags::operator::EQUAL_EQUAL);
    }

    #[test]
    fn keyword_vs_variable() {
        let (tokens, _) = lex_all("if x");
        assert_eq!(tokens[0].flags, flags::identifier::IF);
        let var = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Identifier && t.flags == flags::identifier::VARIABLE)
            .unwrap();
        assert_eq!(var.lexeme, b"x");
    }

    #[test]
    fn number_bases_and_separators() {
        let (tokens, errors) = lex_all("0b1_01_1");
        let num = tokens.iter().find(|t| t.kind == TokenKind::Number).unwrap();
        assert_eq!(num.flags & flags::number::BASE_MASK, flags::number::BINARY);
        assert_eq!(num.flags & flags::number::ERROR, 0);
        assert!(errors.is_empty());

        let (tokens, errors) = lex_all("0b1__0");
        let num = tokens.iter().find(|t| t.kind == TokenKind::Number).unwrap();
        assert_ne!(num.flags & flags::number::ERROR, 0);
        assert_eq!(errors, vec![LexErrorKind::RepeatedNumericSeparator]);
    }

    #[test]
    fn number_boundary_cases() {
        let (_, errors) = lex_all("0x_");
        assert_eq!(errors, vec![LexErrorKind::EmptyHexLiteral]);

        let (_, errors) = lex_all("0x12__34");
        assert_eq!(errors, vec![LexErrorKind::RepeatedNumericSeparator]);

        let (_, errors) = lex_all("12_");
        assert_eq!(errors, vec![LexErrorKind::TrailingNumericSeparator]);
    }

    #[test]
    fn unterminated_string_covers_to_end() {
        let (tokens, errors) = lex_all("\"abc");
        let tok = tokens.iter().find(|t| t.kind == TokenKind::String).unwrap();
        assert_eq!(tok.lexeme, b"\"abc");
        assert_eq!(errors, vec![LexErrorKind::UnterminatedSingleLineString]);
    }

    #[test]
    fn raw_string_consumes_escape_verbatim() {
        let (tokens, errors) = lex_all(r#"r"a\"b""#);
        let tok = tokens.iter().find(|t| t.kind == TokenKind::String).unwrap();
        assert!(errors.is_empty());
        assert_ne!(tok.flags & flags::string::RAW, 0);
    }

    #[test]
    fn nested_brackets_with_newlines_lex_to_five_tokens() {
        let (tokens, errors) = lex_all("[\n1,\n2\n]");
        assert!(errors.is_empty());
        let significant: Vec<_> = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Eot))
            .filter(|t| t.flags != flags::marker::WHITESPACE)
            .collect();
        // [ \n 1 , \n 2 \n ]  -> bracket, newline, number, comma, newline, number, newline, bracket
        assert_eq!(significant.len(), 8);
    }

    #[test]
    fn line_cache_gets_every_line_once_in_order() {
        let mut r = TestReactor::new();
        let mut lexer = Lexer::new("aa\nbb\ncc", &mut r);
        lexer.drain();
        assert_eq!(r.lines, vec![b"aa".to_vec(), b"bb".to_vec(), b"cc".to_vec()]);
    }

    #[test]
    fn drain_is_idempotent() {
        let mut r = TestReactor::new();
        let mut lexer = Lexer::new("x + y", &mut r);
        lexer.drain();
        assert!(lexer.empty());
        lexer.drain();
        assert!(lexer.empty());
    }
}
