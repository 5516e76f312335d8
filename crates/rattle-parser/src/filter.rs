//! The parser's filtering view over the raw token stream, and the
//! scope-exit restoration guard for temporarily widening what gets hidden.

use rattle_common::token::{flags, Token, TokenKind};

/// Bits a token can be hidden behind. `Whitespace`/`Error`/`Escape` are
/// hidden unconditionally; `Newline`/`Comment` are hidden only inside
/// bracketed expressions, via a scoped widening of the mask.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Filter(u8);

impl Filter {
    pub const WHITESPACE: Filter = Filter(0b0001);
    pub const ERROR: Filter = Filter(0b0010);
    pub const ESCAPE: Filter = Filter(0b0100);
    pub const NEWLINE: Filter = Filter(0b1000);
    pub const COMMENT: Filter = Filter(0b1_0000);

    pub const fn contains(self, other: Filter) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Filter {
    type Output = Filter;
    fn bitor(self, rhs: Filter) -> Filter {
        Filter(self.0 | rhs.0)
    }
}

/// The default mask every statement-level pull uses. Comments are hidden
/// unconditionally -- they're insignificant everywhere, not just inside
/// brackets.
pub const BASE_MASK: Filter =
    Filter(Filter::WHITESPACE.0 | Filter::ERROR.0 | Filter::ESCAPE.0 | Filter::COMMENT.0);

/// The widened mask used inside `(...)`/`[...]`, where newlines also become
/// insignificant.
pub const ALL_MASK: Filter = Filter(BASE_MASK.0 | Filter::NEWLINE.0);

pub fn is_hidden(token: &Token<'_>, mask: Filter) -> bool {
    match token.kind {
        TokenKind::Marker => match token.flags {
            f if f == flags::marker::WHITESPACE => mask.contains(Filter::WHITESPACE),
            f if f == flags::marker::ERROR => mask.contains(Filter::ERROR),
            f if f == flags::marker::ESCAPE => mask.contains(Filter::ESCAPE),
            f if f == flags::marker::NEWLINE => mask.contains(Filter::NEWLINE),
            f if f == flags::marker::POUND => mask.contains(Filter::COMMENT),
            _ => false,
        },
        _ => false,
    }
}

/// Restores the parser's previous filter mask when dropped, regardless of
/// how the scope is exited.
pub struct FilterGuard<'p> {
    mask_slot: &'p mut Filter,
    previous: Filter,
}

impl<'p> FilterGuard<'p> {
    pub fn widen(mask_slot: &'p mut Filter, widened: Filter) -> Self {
        let previous = *mask_slot;
        *mask_slot = widened;
        Self { mask_slot, previous }
    }
}

impl Drop for FilterGuard<'_> {
    fn drop(&mut self) {
        *self.mask_slot = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_previous_mask_on_drop() {
        let mut mask = BASE_MASK;
        {
            let _guard = FilterGuard::widen(&mut mask, ALL_MASK);
            assert!(mask.contains(Filter::NEWLINE));
        }
        assert!(!mask.contains(Filter::NEWLINE));
    }
}
