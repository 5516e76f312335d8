use std::fmt;

use crate::location::Location;

/// Wire-level stable identifiers for every lexical diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LexErrorKind {
    UnterminatedSingleLineString,
    UnterminatedMultiLineString,
    PartialStringEscape,
    PartialStringHexEscape,
    InvalidEscapeSequence,
    InvalidEscapeHexSequence,
    RepeatedNumericSeparator,
    TrailingNumericSeparator,
    DanglingDecimalPoint,
    MissingExponent,
    LeadingZeroInDecimal,
    InvalidHexCharacter,
    InvalidOctCharacter,
    InvalidDecCharacter,
    InvalidBinCharacter,
    EmptyHexLiteral,
    EmptyOctLiteral,
    EmptyBinLiteral,
    PartiallyFormedCrlf,
    PartialToplvlEscape,
    InvalidToplvlEscapeSequence,
    UnrecognizedToplvlCharacter,
    PartialNotEqual,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnterminatedSingleLineString => "unterminated_single_line_string",
            Self::UnterminatedMultiLineString => "unterminated_multi_line_string",
            Self::PartialStringEscape => "partial_string_escape",
            Self::PartialStringHexEscape => "partial_string_hex_escape",
            Self::InvalidEscapeSequence => "invalid_escape_sequence",
            Self::InvalidEscapeHexSequence => "invalid_escape_hex_sequence",
            Self::RepeatedNumericSeparator => "repeated_numeric_separator",
            Self::TrailingNumericSeparator => "trailing_numeric_separator",
            Self::DanglingDecimalPoint => "dangling_decimal_point",
            Self::MissingExponent => "missing_exponent",
            Self::LeadingZeroInDecimal => "leading_zero_in_decimal",
            Self::InvalidHexCharacter => "invalid_hex_character",
            Self::InvalidOctCharacter => "invalid_oct_character",
            Self::InvalidDecCharacter => "invalid_dec_character",
            Self::InvalidBinCharacter => "invalid_bin_character",
            Self::EmptyHexLiteral => "empty_hex_literal",
            Self::EmptyOctLiteral => "empty_oct_literal",
            Self::EmptyBinLiteral => "empty_bin_literal",
            Self::PartiallyFormedCrlf => "partially_formed_crlf",
            Self::PartialToplvlEscape => "partial_toplvl_escape",
            Self::InvalidToplvlEscapeSequence => "invalid_toplvl_escape_sequence",
            Self::UnrecognizedToplvlCharacter => "unrecognized_toplvl_character",
            Self::PartialNotEqual => "partial_not_equal",
        };
        f.write_str(s)
    }
}

/// A lexical diagnostic: kind plus the span and lexeme of the offending run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LexError<'src> {
    pub kind: LexErrorKind,
    pub start: Location,
    pub end: Location,
    pub lexeme: &'src [u8],
}

impl fmt::Display for LexError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.kind, self.start, self.end)
    }
}

impl std::error::Error for LexError<'_> {}

/// Wire-level stable identifiers for every parser diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParseErrorKind {
    DanglingBrace,
    DanglingParen,
    DanglingBracket,
    UnterminatedBrace,
    UnterminatedParen,
    UnterminatedBracket,
    UnexpectedToken,
    UnterminatedStatement,
    PatialNotinOperator,
    PatialIfelseOperator,
    ExpectedEosMarker,
    ReactorOutOfMemory,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DanglingBrace => "dangling_brace",
            Self::DanglingParen => "dangling_paren",
            Self::DanglingBracket => "dangling_bracket",
            Self::UnterminatedBrace => "unterminated_brace",
            Self::UnterminatedParen => "unterminated_paren",
            Self::UnterminatedBracket => "unterminated_bracket",
            Self::UnexpectedToken => "unexpected_token",
            Self::UnterminatedStatement => "unterminated_statement",
            Self::PatialNotinOperator => "patial_notin_operator",
            Self::PatialIfelseOperator => "patial_ifelse_operator",
            Self::ExpectedEosMarker => "expected_eos_marker",
            Self::ReactorOutOfMemory => "reactor_out_of_memory",
        };
        f.write_str(s)
    }
}

/// A parser diagnostic: kind plus the token it was raised against.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseError<'src> {
    pub kind: ParseErrorKind,
    pub offending_token: crate::token::Token<'src>,
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}",
            self.kind, self.offending_token.start
        )
    }
}

impl std::error::Error for ParseError<'_> {}

/// A syntactic-analysis diagnostic. Unlike lexer/parser errors, the analyzer
/// has no closed wire-level kind table in the source specification -- it
/// reports free-form descriptions tied to a span, matching the contextual
/// nature of "assignability"/"bindability" violations.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnalyzerError {
    pub description: String,
    pub start: Location,
    pub end: Location,
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.description, self.start, self.end)
    }
}

impl std::error::Error for AnalyzerError {}

/// The two-way answer a reactor gives in response to a reported error: keep
/// going and collect more diagnostics, or stop the pipeline at this point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError {
    Abort,
    Resume,
}
