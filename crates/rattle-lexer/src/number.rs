//! Number scanning as an explicit state machine, following the original
//! numeric-separator rules literally: adjacent separators are reported once
//! per run, a separator not followed by a digit of the active base is
//! `trailing_numeric_separator`, and an error never erases the best-known
//! base/kind -- only the sticky error bit is set.

use rattle_common::error::LexErrorKind;
use rattle_common::reactor::LexReactor;
use rattle_common::token::{flags, Token, TokenKind};

use crate::Lexer;

fn is_bin_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

fn is_oct_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

fn is_dec_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

impl<'src, 'r, R> Lexer<'src, 'r, R>
where
    R: LexReactor<'src>,
{
    /// Consumes a run of `is_digit` bytes interleaved with `_` separators.
    /// Returns `(digit_count, separator_error_seen)`.
    fn eat_digit_run(&mut self, is_digit: impl Fn(u8) -> bool + Copy) -> (usize, bool) {
        let mut count = 0;
        let mut saw_error = false;
        loop {
            if self.cursor.peek().is_some_and(is_digit) {
                self.cursor.eat();
                count += 1;
                continue;
            }
            if self.cursor.peek() == Some(b'_') {
                let mark = self.cursor.bookmark();
                let mut sep_count = 0;
                while self.cursor.peek() == Some(b'_') {
                    self.cursor.eat();
                    sep_count += 1;
                }
                if sep_count > 1 {
                    self.cursor.report_at(LexErrorKind::RepeatedNumericSeparator, mark);
                    saw_error = true;
                }
                if !self.cursor.peek().is_some_and(is_digit) {
                    // A separator with no digits before it at all is an
                    // empty literal (e.g. `0x_`), reported by the caller --
                    // not a second, redundant trailing-separator diagnostic.
                    if count > 0 {
                        self.cursor.report_at(LexErrorKind::TrailingNumericSeparator, mark);
                        saw_error = true;
                    }
                    break;
                }
                continue;
            }
            break;
        }
        (count, saw_error)
    }

    /// Trailing alphanumeric run that doesn't belong to the active base.
    fn eat_invalid_trailing(&mut self, kind: LexErrorKind) -> bool {
        let mark = self.cursor.bookmark();
        let n = self
            .cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        if n > 0 {
            self.cursor.report_at(kind, mark);
            true
        } else {
            false
        }
    }

    fn lex_based_digits(
        &mut self,
        is_digit: impl Fn(u8) -> bool + Copy,
        empty_kind: LexErrorKind,
        invalid_kind: LexErrorKind,
    ) -> bool {
        let (count, sep_error) = self.eat_digit_run(is_digit);
        let mut error = sep_error;
        if count == 0 {
            self.cursor.report(empty_kind);
            error = true;
        }
        if self.eat_invalid_trailing(invalid_kind) {
            error = true;
        }
        error
    }

    pub(crate) fn lex_number(&mut self) -> Token<'src> {
        let mut error = false;
        let mut base = flags::number::DECIMAL;

        if self.cursor.peek() == Some(b'0') {
            match self.cursor.peek_next() {
                Some(b'b') | Some(b'B') => {
                    self.cursor.eat();
                    self.cursor.eat();
                    base = flags::number::BINARY;
                    error |= self.lex_based_digits(
                        is_bin_digit,
                        LexErrorKind::EmptyBinLiteral,
                        LexErrorKind::InvalidBinCharacter,
                    );
                    return self.finish_number(base, error);
                }
                Some(b'o') | Some(b'O') => {
                    self.cursor.eat();
                    self.cursor.eat();
                    base = flags::number::OCTAL;
                    error |= self.lex_based_digits(
                        is_oct_digit,
                        LexErrorKind::EmptyOctLiteral,
                        LexErrorKind::InvalidOctCharacter,
                    );
                    return self.finish_number(base, error);
                }
                Some(b'x') | Some(b'X') => {
                    self.cursor.eat();
                    self.cursor.eat();
                    base = flags::number::HEX;
                    error |= self.lex_based_digits(
                        is_hex_digit,
                        LexErrorKind::EmptyHexLiteral,
                        LexErrorKind::InvalidHexCharacter,
                    );
                    return self.finish_number(base, error);
                }
                Some(c) if is_dec_digit(c) => {
                    self.cursor.eat(); // the leading 0
                    self.cursor.report(LexErrorKind::LeadingZeroInDecimal);
                    error = true;
                    let (_, sep_error) = self.eat_digit_run(is_dec_digit);
                    error |= sep_error;
                }
                _ => {
                    self.cursor.eat(); // lone '0'
                }
            }
        } else {
            let (_, sep_error) = self.eat_digit_run(is_dec_digit);
            error |= sep_error;
        }

        if self.cursor.peek() == Some(b'.') {
            self.cursor.eat();
            base = flags::number::FLOAT;
            let (n, sep_error) = self.eat_digit_run(is_dec_digit);
            error |= sep_error;
            if n == 0 {
                self.cursor.report(LexErrorKind::DanglingDecimalPoint);
                error = true;
            }
        }

        if matches!(self.cursor.peek(), Some(b'e') | Some(b'E')) {
            let mark = self.cursor.bookmark();
            self.cursor.eat();
            base = flags::number::FLOAT;
            if matches!(self.cursor.peek(), Some(b'+') | Some(b'-')) {
                self.cursor.eat();
            }
            let (n, sep_error) = self.eat_digit_run(is_dec_digit);
            error |= sep_error;
            if n == 0 {
                self.cursor.report_at(LexErrorKind::MissingExponent, mark);
                error = true;
            }
        }

        if self.eat_invalid_trailing(LexErrorKind::InvalidDecCharacter) {
            error = true;
        }

        self.finish_number(base, error)
    }

    fn finish_number(&mut self, base: i32, error: bool) -> Token<'src> {
        let mut flag = base;
        if error {
            flag |= flags::number::ERROR;
        }
        self.cursor.make_token(TokenKind::Number, flag)
    }
}
