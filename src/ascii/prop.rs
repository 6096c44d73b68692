//! ASCII character classes and combinators.

use super::{AsciiChar, Property};

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
    fn contains(self, ch: AsciiChar) -> bool {
        !self.0.contains(ch)
    }
}

impl<L: Property, R: Property> Property for And<L, R> {
    fn contains(self, ch: AsciiChar) -> bool {
        self.0.contains(ch) && self.1.contains(ch)
    }
}

impl<L: Property, R: Property> Property for Or<L, R> {
    fn contains(self, ch: AsciiChar) -> bool {
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

macro_rules! def_ascii_prop {
    ($(#[$($attr:tt)*])* $ty:ident => $method:ident) => {
        $(#[$($attr)*])*
        #[derive(Debug, Clone, Copy)]
        pub struct $ty;

        impl Property for $ty {
            fn contains(self, ch: AsciiChar) -> bool {
                ch.as_char().$method()
            }
        }

        impl_prop_ops!([] $ty);
    };
}

def_ascii_prop!(
    /// `A-Z` and `a-z`.
    Alphabetic => is_ascii_alphabetic
);
def_ascii_prop!(
    /// `A-Z`, `a-z` and `0-9`.
    Alphanumeric => is_ascii_alphanumeric
);
def_ascii_prop!(Control => is_ascii_control);
def_ascii_prop!(Digit => is_ascii_digit);
def_ascii_prop!(
    /// Printable characters other than space.
    Graphic => is_ascii_graphic
);
def_ascii_prop!(HexDigit => is_ascii_hexdigit);
def_ascii_prop!(Lowercase => is_ascii_lowercase);
def_ascii_prop!(Punctuation => is_ascii_punctuation);
def_ascii_prop!(Uppercase => is_ascii_uppercase);
def_ascii_prop!(
    /// Space, tab, line feed, form feed and carriage return.
    Whitespace => is_ascii_whitespace
);

#[cfg(test)]
mod test {
    use super::*;

    fn ascii(ch: char) -> AsciiChar {
        AsciiChar::from_ascii(ch).unwrap()
    }

    #[test]
    fn classes() {
        assert!(Digit.contains(ascii('7')));
        assert!(!Digit.contains(ascii('x')));
        assert!(HexDigit.contains(ascii('F')));
        assert!(Whitespace.contains(ascii('\t')));
        assert!(Punctuation.contains(ascii(';')));
        assert!(!Graphic.contains(ascii(' ')));
    }

    #[test]
    fn combinations() {
        let ident = Alphanumeric | Underscore;
        assert!(ident.contains(ascii('_')));
        assert!(ident.contains(ascii('q')));
        assert!(!ident.contains(ascii('-')));

        let upper_hex = HexDigit & !Lowercase;
        assert!(upper_hex.contains(ascii('A')));
        assert!(upper_hex.contains(ascii('3')));
        assert!(!upper_hex.contains(ascii('a')));
        assert!(or(Digit, not(Graphic)).contains(ascii(' ')));
        assert!(!and(Digit, Alphabetic).contains(ascii('1')));
    }

    #[derive(Debug, Clone, Copy)]
    struct Underscore;

    impl Property for Underscore {
        fn contains(self, ch: AsciiChar) -> bool {
            ch == AsciiChar::UnderScore
        }
    }
}
