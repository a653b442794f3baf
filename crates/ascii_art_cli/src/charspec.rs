//! Character arguments accepted by `add`, `remove` and `--chars`.
use std::str::FromStr;

use ascii_art::PRINTABLE_CHARS;

const ALL_KEYWORD: &str = "all";
const SPACE_KEYWORD: &str = "space";
const RANGE_SEPARATOR: char = '-';

#[derive(Debug, thiserror::Error)]
#[error("invalid character set {0:?}, expected `all`, `space`, a single character or a range like `a-z`")]
pub struct InvalidCharSpec(String);

/// Characters selected by one argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharSpec(Vec<char>);

impl CharSpec {
    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn into_chars(self) -> Vec<char> {
        self.0
    }
}

impl FromStr for CharSpec {
    type Err = InvalidCharSpec;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        if arg == ALL_KEYWORD {
            return Ok(Self(PRINTABLE_CHARS.collect()));
        }
        if arg == SPACE_KEYWORD {
            return Ok(Self(vec![' ']));
        }

        match arg.chars().collect::<Vec<_>>()[..] {
            [symbol] => Ok(Self(vec![symbol])),
            [start, RANGE_SEPARATOR, end] => {
                // Ranges may be given in either direction.
                let (low, high) = if start <= end { (start, end) } else { (end, start) };
                Ok(Self((low..=high).collect()))
            },
            _ => Err(InvalidCharSpec(arg.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(arg: &str) -> Option<Vec<char>> {
        arg.parse::<CharSpec>().ok().map(CharSpec::into_chars)
    }

    #[test]
    fn keywords() {
        let all = parse("all").unwrap();
        assert_eq!(all.len(), 95);
        assert_eq!((all[0], all[94]), (' ', '~'));
        assert_eq!(parse("space").unwrap(), vec![' ']);
    }

    #[test]
    fn single_characters() {
        assert_eq!(parse("x").unwrap(), vec!['x']);
        assert_eq!(parse("-").unwrap(), vec!['-']);
    }

    #[test]
    fn ranges_are_inclusive_in_either_direction() {
        assert_eq!(parse("a-e").unwrap(), vec!['a', 'b', 'c', 'd', 'e']);
        assert_eq!(parse("e-a").unwrap(), parse("a-e").unwrap());
        assert_eq!(parse("7-7").unwrap(), vec!['7']);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        for arg in ["", "ab", "a-", "a_b", "a-bc", "spaces"] {
            assert!(parse(arg).is_none(), "{arg:?} should not parse");
        }
        let err = "ab".parse::<CharSpec>().unwrap_err();
        assert!(err.to_string().contains("\"ab\""));
    }
}
