use calculator_sdk::models::Operator;
use std::fmt;
use thiserror::Error;

/// A single decimal digit, `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("not a decimal digit")]
pub struct InvalidDigit;

impl Digit {
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = InvalidDigit;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 9 {
            Ok(Self(value))
        } else {
            Err(InvalidDigit)
        }
    }
}

impl TryFrom<char> for Digit {
    type Error = InvalidDigit;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        value
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .map(Self)
            .ok_or(InvalidDigit)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One keypad press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Digit(Digit),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
}

impl InputEvent {
    /// Map a raw key to an event; unmapped keys yield `None`.
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '0'..='9' => Digit::try_from(key).ok().map(Self::Digit),
            '.' | ',' => Some(Self::Decimal),
            '=' => Some(Self::Equals),
            'c' | 'C' => Some(Self::Clear),
            _ => Operator::from_symbol(key.encode_utf8(&mut [0; 4])).map(Self::Operator),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn digit_bounds() {
        assert_eq!(Digit::try_from(9u8).unwrap().value(), 9);
        assert_eq!(Digit::try_from(10u8), Err(InvalidDigit));
        assert_eq!(Digit::try_from('7').unwrap().as_char(), '7');
        assert_eq!(Digit::try_from('x'), Err(InvalidDigit));
    }

    #[test]
    fn keys_map_to_events() {
        assert_eq!(
            InputEvent::from_key('4'),
            Some(InputEvent::Digit(Digit::try_from(4u8).unwrap()))
        );
        assert_eq!(InputEvent::from_key(','), Some(InputEvent::Decimal));
        assert_eq!(InputEvent::from_key('.'), Some(InputEvent::Decimal));
        assert_eq!(InputEvent::from_key('='), Some(InputEvent::Equals));
        assert_eq!(InputEvent::from_key('C'), Some(InputEvent::Clear));
        assert_eq!(
            InputEvent::from_key('^'),
            Some(InputEvent::Operator(Operator::Pow))
        );
        assert_eq!(
            InputEvent::from_key('%'),
            Some(InputEvent::Operator(Operator::Mod))
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(InputEvent::from_key(' '), None);
        assert_eq!(InputEvent::from_key('x'), None);
        assert_eq!(InputEvent::from_key('\u{0663}'), None);
    }
}
