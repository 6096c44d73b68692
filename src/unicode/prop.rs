//! Unicode property definitions and combinators.
//!
//! Properties are backed by the compiled Unicode data of `icu_properties`.
//! They can be combined with `!`, `&` and `|`, or with the [`all!`] and
//! [`any!`] macros.

use super::Property;
use icu_properties::props::{self as icup, GeneralCategory, GeneralCategoryGroup};
use icu_properties::{CodePointMapData, CodePointSetData};

#[doc(inline)]
pub use crate::{unicode_prop_all as all, unicode_prop_any as any};

/// Combines properties so that a character must have every one of them.
#[doc(hidden)]
#[macro_export]
macro_rules! unicode_prop_all {
    ($prop:expr $(,)?) => {{
        $prop
    }};
    ($prop0:expr, $($propn:expr),+ $(,)?) => {{
        $crate::unicode::prop::and($prop0, $crate::unicode::prop::all!($($propn),+))
    }};
}

/// Combines properties so that a character must have at least one of them.
#[doc(hidden)]
#[macro_export]
macro_rules! unicode_prop_any {
    ($prop:expr $(,)?) => {{
        $prop
    }};
    ($prop0:expr, $($propn:expr),+ $(,)?) => {{
        $crate::unicode::prop::or($prop0, $crate::unicode::prop::any!($($propn),+))
    }};
}

#[derive(Debug, Clone, Copy)]
pub struct Not<P: Property>(P);

#[derive(Debug, Clone, Copy)]
pub struct And<L: Property, R: Property>(L, R);

#[derive(Debug, Clone, Copy)]
pub struct Or<L: Property, R: Property>(L, R);

pub const fn not<P: Property>(property: P) -> Not<P> {
    Not(property)
}

pub const fn and<L: Property, R: Property>(lhs: L, rhs: R) -> And<L, R> {
    And(lhs, rhs)
}

pub const fn or<L: Property, R: Property>(lhs: L, rhs: R) -> Or<L, R> {
    Or(lhs, rhs)
}

impl<P: Property> Property for Not<P> {
    fn contains(self, ch: char) -> bool {
        !self.0.contains(ch)
    }
}

impl<L: Property, R: Property> Property for And<L, R> {
    fn contains(self, ch: char) -> bool {
        self.0.contains(ch) && self.1.contains(ch)
    }
}

impl<L: Property, R: Property> Property for Or<L, R> {
    fn contains(self, ch: char) -> bool {
        self.0.contains(ch) || self.1.contains(ch)
    }
}

macro_rules! impl_prop_ops {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> core::ops::Not for $ty {
            type Output = Not<Self>;

            fn not(self) -> Not<Self> {
                Not(self)
            }
        }

        impl<$($gen)* Rhs: Property> core::ops::BitAnd<Rhs> for $ty {
            type Output = And<Self, Rhs>;

            fn bitand(self, rhs: Rhs) -> And<Self, Rhs> {
                And(self, rhs)
            }
        }

        impl<$($gen)* Rhs: Property> core::ops::BitOr<Rhs> for $ty {
            type Output = Or<Self, Rhs>;

            fn bitor(self, rhs: Rhs) -> Or<Self, Rhs> {
                Or(self, rhs)
            }
        }
    };
}

impl_prop_ops!([P: Property,] Not<P>);
impl_prop_ops!([L: Property, R: Property,] And<L, R>);
impl_prop_ops!([L: Property, R: Property,] Or<L, R>);

macro_rules! def_bool_prop {
    ($(#[$($attr:tt)*])* $ty:ident => $prop:ty) => {
        $(#[$($attr)*])*
        #[derive(Debug, Clone, Copy)]
        pub struct $ty;

        impl Property for $ty {
            fn contains(self, ch: char) -> bool {
                CodePointSetData::new::<$prop>().contains(ch)
            }
        }

        impl_prop_ops!([] $ty);
    };
}

def_bool_prop!(Alphabetic => icup::Alphabetic);
def_bool_prop!(AsciiHexDigit => icup::AsciiHexDigit);
def_bool_prop!(Cased => icup::Cased);
def_bool_prop!(Dash => icup::Dash);
def_bool_prop!(Diacritic => icup::Diacritic);
def_bool_prop!(Emoji => icup::Emoji);
def_bool_prop!(ExtendedPictographic => icup::ExtendedPictographic);
def_bool_prop!(HexDigit => icup::HexDigit);
def_bool_prop!(Hyphen => icup::Hyphen);
def_bool_prop!(IdContinue => icup::IdContinue);
def_bool_prop!(IdStart => icup::IdStart);
def_bool_prop!(Ideographic => icup::Ideographic);
def_bool_prop!(Lowercase => icup::Lowercase);
def_bool_prop!(Math => icup::Math);
def_bool_prop!(NoncharacterCodePoint => icup::NoncharacterCodePoint);
def_bool_prop!(
    /// Characters reserved for pattern syntax by UAX #31.
    PatternSyntax => icup::PatternSyntax
);
def_bool_prop!(
    /// Whitespace suitable for programming language grammars (UAX #31).
    PatternWhiteSpace => icup::PatternWhiteSpace
);
def_bool_prop!(QuotationMark => icup::QuotationMark);
def_bool_prop!(TerminalPunctuation => icup::TerminalPunctuation);
def_bool_prop!(Uppercase => icup::Uppercase);
def_bool_prop!(WhiteSpace => icup::WhiteSpace);
def_bool_prop!(
    /// Characters that may continue an identifier, closed under NFKC.
    XidContinue => icup::XidContinue
);
def_bool_prop!(
    /// Characters that may start an identifier, closed under NFKC.
    XidStart => icup::XidStart
);

/// A group of general categories, such as all letters or all numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Letter,
    CasedLetter,
    Mark,
    Number,
    Punctuation,
    Symbol,
    Separator,
    Other,
}

impl Category {
    const fn group(self) -> GeneralCategoryGroup {
        match self {
            Self::Letter => GeneralCategoryGroup::Letter,
            Self::CasedLetter => GeneralCategoryGroup::CasedLetter,
            Self::Mark => GeneralCategoryGroup::Mark,
            Self::Number => GeneralCategoryGroup::Number,
            Self::Punctuation => GeneralCategoryGroup::Punctuation,
            Self::Symbol => GeneralCategoryGroup::Symbol,
            Self::Separator => GeneralCategoryGroup::Separator,
            Self::Other => GeneralCategoryGroup::Other,
        }
    }
}

impl Property for Category {
    fn contains(self, ch: char) -> bool {
        let category = CodePointMapData::<GeneralCategory>::new().get(ch);
        self.group().contains(category)
    }
}

impl_prop_ops!([] Category);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn binary_properties() {
        assert!(Alphabetic.contains('ж'));
        assert!(!Alphabetic.contains('7'));
        assert!(WhiteSpace.contains('\u{3000}'));
        assert!(XidStart.contains('π'));
        assert!(!XidStart.contains('1'));
        assert!(XidContinue.contains('1'));
        assert!(Uppercase.contains('Ä'));
    }

    #[test]
    fn categories() {
        assert!(Category::Number.contains('٣'));
        assert!(Category::Letter.contains('語'));
        assert!(Category::Punctuation.contains('¿'));
        assert!(!Category::Symbol.contains('a'));
    }

    #[test]
    fn combinations() {
        let letter_or_digit = Alphabetic | Category::Number;
        assert!(letter_or_digit.contains('x'));
        assert!(letter_or_digit.contains('٣'));
        assert!(!letter_or_digit.contains('-'));

        let lower_only = Cased & !Uppercase;
        assert!(lower_only.contains('q'));
        assert!(!lower_only.contains('Q'));

        assert!(all!(Alphabetic, Lowercase, not(AsciiHexDigit)).contains('z'));
        assert!(!all!(Alphabetic, Lowercase, not(AsciiHexDigit)).contains('a'));
        assert!(any!(Dash, Math, WhiteSpace).contains('+'));
    }
}
