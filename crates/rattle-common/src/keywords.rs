//! The reserved-word table, following the same flat match-on-&str shape as
//! the keyword lookup in comparable tokenizer crates, kept as one place so
//! every keyword has exactly one spelling and one flag.

use crate::token::flags::identifier as id;

/// Looks up a scanned identifier lexeme against the reserved words. Returns
/// the identifier flag for a keyword match, or `None` for a plain variable
/// name.
pub fn lookup(lexeme: &str) -> Option<i32> {
    Some(match lexeme {
        "def" => id::DEF,
        "class" => id::CLASS,
        "return" => id::RETURN,
        "if" => id::IF,
        "else" => id::ELSE,
        "for" => id::FOR,
        "while" => id::WHILE,
        "break" => id::BREAK,
        "continue" => id::CONTINUE,
        "in" => id::IN,
        "is" => id::IS,
        "not" => id::NOT,
        "and" => id::AND,
        "or" => id::OR,
        "True" => id::TRUE,
        "False" => id::FALSE,
        "None" => id::NONE,
        "nonlocal" => id::NONLOCAL,
        "global" => id::GLOBAL,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_round_trips() {
        let words = [
            "def", "class", "return", "if", "else", "for", "while", "break", "continue", "in",
            "is", "not", "and", "or", "True", "False", "None", "nonlocal", "global",
        ];
        for w in words {
            assert!(lookup(w).is_some(), "{w} should be a keyword");
        }
    }

    #[test]
    fn plain_identifier_is_not_a_keyword() {
        assert_eq!(lookup("x"), None);
        assert_eq!(lookup("True_ish"), None);
    }
}
