//! The bitset passed between `ExpressionAnalyzer` calls: ascending
//! properties (what a sub-expression turned out to be) live in the low
//! byte, descending constraints (what the caller needs it to be) in the
//! high byte, so a constraint can never be mistaken for a property by a
//! careless `contains` check.

use std::ops::{BitOr, BitOrAssign};

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u16);

impl Flags {
    pub const NONE: Flags = Flags(0);

    // Ascending properties -- low byte.
    pub const ASSIGNABLE: Flags = Flags(1 << 0);
    pub const LITERAL_ID: Flags = Flags(1 << 1);
    pub const BINDING: Flags = Flags(1 << 2);
    pub const ONLY_IDS: Flags = Flags(1 << 3);
    pub const COMMA: Flags = Flags(1 << 4);
    pub const IF: Flags = Flags(1 << 5);
    pub const IN: Flags = Flags(1 << 6);
    pub const SIGNATURE: Flags = Flags(1 << 7);

    // Descending constraints -- high byte.
    pub const LIST_COMPONENTS_ASSIGNABLE: Flags = Flags(1 << 8);
    pub const PREFER_BINDING: Flags = Flags(1 << 9);
    pub const LEFT_BINDABLE_1ST_IN: Flags = Flags(1 << 10);
    pub const LIST_OF_IDS_ONLY: Flags = Flags(1 << 11);

    const PROPERTY_MASK: u16 = 0x00FF;
    const CONSTRAINT_MASK: u16 = 0xFF00;

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersection(self, other: Flags) -> Flags {
        Flags(self.0 & other.0)
    }

    /// Just the ascending-property bits, with any constraint bits stripped.
    /// Used when forwarding a callee's result upward: constraints a callee
    /// consumed must never leak into the caller's own property bits.
    pub const fn properties(self) -> Flags {
        Flags(self.0 & Self::PROPERTY_MASK)
    }

    /// Just the descending-constraint bits.
    pub const fn constraints(self) -> Flags {
        Flags(self.0 & Self::CONSTRAINT_MASK)
    }
}

impl BitOr for Flags {
    type Output = Flags;
    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Debug for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        let mut write_bit = |f: &mut std::fmt::Formatter<'_>, name: &str, bit: Flags| -> std::fmt::Result {
            if self.contains(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
            Ok(())
        };
        write!(f, "Flags(")?;
        write_bit(f, "ASSIGNABLE", Self::ASSIGNABLE)?;
        write_bit(f, "LITERAL_ID", Self::LITERAL_ID)?;
        write_bit(f, "BINDING", Self::BINDING)?;
        write_bit(f, "ONLY_IDS", Self::ONLY_IDS)?;
        write_bit(f, "COMMA", Self::COMMA)?;
        write_bit(f, "IF", Self::IF)?;
        write_bit(f, "IN", Self::IN)?;
        write_bit(f, "SIGNATURE", Self::SIGNATURE)?;
        write_bit(f, "LIST_COMPONENTS_ASSIGNABLE", Self::LIST_COMPONENTS_ASSIGNABLE)?;
        write_bit(f, "PREFER_BINDING", Self::PREFER_BINDING)?;
        write_bit(f, "LEFT_BINDABLE_1ST_IN", Self::LEFT_BINDABLE_1ST_IN)?;
        write_bit(f, "LIST_OF_IDS_ONLY", Self::LIST_OF_IDS_ONLY)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_and_constraints_partition_the_bit_space() {
        let f = Flags::ASSIGNABLE | Flags::PREFER_BINDING;
        assert!(f.properties().contains(Flags::ASSIGNABLE));
        assert!(!f.properties().contains(Flags::PREFER_BINDING));
        assert!(f.constraints().contains(Flags::PREFER_BINDING));
        assert!(!f.constraints().contains(Flags::ASSIGNABLE));
    }

    #[test]
    fn intersection_keeps_only_shared_bits() {
        let a = Flags::ASSIGNABLE | Flags::ONLY_IDS;
        let b = Flags::ASSIGNABLE | Flags::BINDING;
        let both = a.intersection(b);
        assert!(both.contains(Flags::ASSIGNABLE));
        assert!(!both.contains(Flags::ONLY_IDS));
        assert!(!both.contains(Flags::BINDING));
    }
}
