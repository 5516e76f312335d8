//! String scanning as an explicit state machine over the four
//! `(multiline, raw)` variants, following the same filter-by-variant shape
//! as the original scanner: raw strings treat `\` as "consume whatever
//! follows, unconditionally"; non-raw strings route every `\` through
//! `escape_sequence`.

use rattle_common::error::LexErrorKind;
use rattle_common::reactor::LexReactor;
use rattle_common::token::{flags, Token, TokenKind};

use crate::Lexer;

impl<'src, 'r, R> Lexer<'src, 'r, R>
where
    R: LexReactor<'src>,
{
    fn escape_sequence(&mut self) {
        let mark = self.cursor.bookmark();
        self.cursor.eat(); // the backslash
        match self.cursor.peek() {
            None => {
                self.cursor.report_at(LexErrorKind::PartialStringEscape, mark);
            }
            Some(b'0' | b'n' | b'r' | b'v' | b'f' | b't' | b'b' | b'a' | b'\'' | b'"' | b'\\') => {
                self.cursor.eat();
            }
            Some(b'x' | b'X') => {
                self.cursor.eat();
                if self.cursor.safe(1) {
                    let h1 = self.cursor.peek().unwrap();
                    let h2 = self.cursor.peek_at(1).unwrap();
                    if h1.is_ascii_hexdigit() && h2.is_ascii_hexdigit() {
                        self.cursor.eat();
                        self.cursor.eat();
                    } else {
                        self.cursor
                            .report_at(LexErrorKind::InvalidEscapeHexSequence, mark);
                    }
                } else {
                    self.cursor
                        .report_at(LexErrorKind::PartialStringHexEscape, mark);
                }
            }
            Some(_) => {
                self.cursor.eat();
                self.cursor.report_at(LexErrorKind::InvalidEscapeSequence, mark);
            }
        }
    }

    fn consume_string_variant(&mut self, quote: u8, multiline: bool, raw: bool) -> bool {
        let mut error = false;
        loop {
            self.cursor.eat_while(|b| {
                if raw {
                    b != quote && b != b'\\'
                } else if multiline {
                    b != quote && b != b'\\'
                } else {
                    b != quote && b != b'\\' && b != b'\n'
                }
            });
            if self.cursor.is_eof() {
                self.cursor.report(if multiline {
                    LexErrorKind::UnterminatedMultiLineString
                } else {
                    LexErrorKind::UnterminatedSingleLineString
                });
                return true;
            }
            match self.cursor.peek() {
                Some(b'\\') => {
                    if raw {
                        let mark = self.cursor.bookmark();
                        self.cursor.eat(); // the backslash
                        if self.cursor.peek().is_some() {
                            self.cursor.eat();
                        } else {
                            self.cursor
                                .report_at(LexErrorKind::PartialStringEscape, mark);
                            error = true;
                        }
                    } else {
                        self.escape_sequence();
                    }
                }
                Some(b'\n') if !multiline => {
                    self.cursor.report(LexErrorKind::UnterminatedSingleLineString);
                    return true;
                }
                _ => {
                    if multiline {
                        let closes = self.cursor.safe(2)
                            && self.cursor.peek() == Some(quote)
                            && self.cursor.peek_at(1) == Some(quote)
                            && self.cursor.peek_at(2) == Some(quote);
                        if closes {
                            self.cursor.eat();
                            self.cursor.eat();
                            self.cursor.eat();
                            return error;
                        }
                        // a lone/double quote inside a multiline string is content
                        self.cursor.eat();
                    } else if self.cursor.eat_if(quote) {
                        return error;
                    }
                }
            }
        }
    }

    pub(crate) fn lex_string(&mut self, raw: bool) -> Token<'src> {
        let quote = self.cursor.peek().expect("caller checked a quote is present");
        let multiline = self.cursor.safe(2)
            && self.cursor.peek_at(1) == Some(quote)
            && self.cursor.peek_at(2) == Some(quote);

        self.cursor.eat(); // opening quote
        if multiline {
            self.cursor.eat();
            self.cursor.eat();
        }

        let had_error = self.consume_string_variant(quote, multiline, raw);

        let mut flag = 0;
        if had_error {
            flag |= flags::string::ERROR;
        }
        if raw {
            flag |= flags::string::RAW;
        }
        if multiline {
            flag |= flags::string::MULTILINE;
        }
        self.cursor.make_token(TokenKind::String, flag)
    }
}
