//! Operator precedence, ordered low to high exactly as the grammar defines
//! it. `CompareEq` is shared by `==`/`!=` (non-chaining: parsed left-assoc,
//! chains are rejected during analysis rather than by the grammar). `AddSub`,
//! `MulDiv`, and `UnaryHigh` (`+x`, `-x`, `*x` spread, prefix `not`) are each
//! one precedence level shared by more than one operator.
///
/// `BitwiseOr`/`BitwiseAnd` hold the ordinal positions the original grammar
/// reserves for bitwise operators, kept here for relative-ordering fidelity
/// even though no lexer token currently produces them (see DESIGN.md).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Prec {
    None,
    Lowest,
    Comma,
    IfElse,
    LogicOr,
    LogicAnd,
    LogicNot,
    CompareEq,
    Compare,
    BitwiseOr,
    BitwiseAnd,
    IdentityIs,
    MemberIn,
    AddSub,
    MulDiv,
    UnaryHigh,
    DotCallSubscript,
    Lambda,
    Group,
    Primary,
}

impl Prec {
    /// The precedence one level higher, used when recursing into a binary
    /// operator's right operand to force left-associativity.
    pub fn next(self) -> Prec {
        use Prec::*;
        match self {
            None => Lowest,
            Lowest => Comma,
            Comma => IfElse,
            IfElse => LogicOr,
            LogicOr => LogicAnd,
            LogicAnd => LogicNot,
            LogicNot => CompareEq,
            CompareEq => Compare,
            Compare => BitwiseOr,
            BitwiseOr => BitwiseAnd,
            BitwiseAnd => IdentityIs,
            IdentityIs => MemberIn,
            MemberIn => AddSub,
            AddSub => MulDiv,
            MulDiv => UnaryHigh,
            UnaryHigh => DotCallSubscript,
            DotCallSubscript => Lambda,
            Lambda => Group,
            Group => Primary,
            Primary => Primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_the_grammar() {
        assert!(Prec::Lowest < Prec::Comma);
        assert!(Prec::Comma < Prec::IfElse);
        assert!(Prec::MemberIn < Prec::AddSub);
        assert!(Prec::AddSub < Prec::MulDiv);
        assert!(Prec::MulDiv < Prec::UnaryHigh);
        assert!(Prec::UnaryHigh < Prec::DotCallSubscript);
        assert!(Prec::DotCallSubscript < Prec::Lambda);
        assert!(Prec::Lambda < Prec::Group);
        assert!(Prec::Group < Prec::Primary);
    }
}
