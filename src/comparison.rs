//! Comparison operators and single-clause evaluation.

use std::cmp::Ordering;
use std::fmt;

/// A filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl Operator {
    /// Operators in matching priority: two-character symbols come first so
    /// `=` never shadows `>=`, `<=` or `!=`.
    pub const BY_PRIORITY: [Operator; 6] = [
        Operator::LessOrEqual,
        Operator::GreaterOrEqual,
        Operator::NotEqual,
        Operator::Equal,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
        }
    }

    /// Operator whose symbol is exactly `symbol`.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Self::BY_PRIORITY
            .into_iter()
            .find(|op| op.symbol() == symbol)
    }

    /// Longest operator that `text` starts with.
    pub fn match_prefix(text: &str) -> Option<Operator> {
        Self::BY_PRIORITY
            .into_iter()
            .find(|op| text.starts_with(op.symbol()))
    }

    /// Does `ordering` (candidate compared to reference) satisfy this operator?
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::LessOrEqual => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `header operator value` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub header: String,
    pub operator: Operator,
    pub reference: String,
}

impl Comparison {
    pub fn new(header: impl Into<String>, operator: Operator, reference: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            operator,
            reference: reference.into(),
        }
    }

    /// Does `candidate` satisfy this clause?
    pub fn is_satisfied_by(&self, candidate: &str) -> bool {
        satisfies(self.operator, candidate, &self.reference)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.header, self.operator, self.reference)
    }
}

/// Compare `candidate` against `reference` with `operator`.
///
/// When both sides parse as integers the comparison is numeric. Otherwise
/// both raw strings are compared lexicographically, including the case
/// where only one side is an integer. This never fails.
pub fn satisfies(operator: Operator, candidate: &str, reference: &str) -> bool {
    let ordering = match (Integer::parse(candidate), Integer::parse(reference)) {
        (Some(c), Some(r)) => c.cmp(&r),
        _ => candidate.cmp(reference),
    };
    operator.accepts(ordering)
}

/// A decimal integer of any size, borrowed from the text it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Integer<'a> {
    negative: bool,
    /// Digits without leading zeros; empty for zero.
    magnitude: &'a str,
}

impl<'a> Integer<'a> {
    /// Optional sign followed by ASCII digits, ignoring surrounding whitespace.
    fn parse(value: &'a str) -> Option<Self> {
        let value = value.trim();
        let (negative, digits) = match value.as_bytes().first() {
            Some(b'-') => (true, &value[1..]),
            Some(b'+') => (false, &value[1..]),
            _ => (false, value),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let magnitude = digits.trim_start_matches('0');
        Some(Self {
            negative: negative && !magnitude.is_empty(),
            magnitude,
        })
    }
}

impl Ord for Integer<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_magnitude = self
            .magnitude
            .len()
            .cmp(&other.magnitude.len())
            .then_with(|| self.magnitude.cmp(other.magnitude));
        match (self.negative, other.negative) {
            (false, false) => by_magnitude,
            (true, true) => by_magnitude.reverse(),
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
        }
    }
}

impl PartialOrd for Integer<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(op: Operator, reference: &str) -> Comparison {
        Comparison::new("header1", op, reference)
    }

    #[test]
    fn test_equal() {
        let c = clause(Operator::Equal, "10");
        assert!(c.is_satisfied_by("10"));
        assert!(!c.is_satisfied_by("5"));
    }

    #[test]
    fn test_not_equal() {
        let c = clause(Operator::NotEqual, "10");
        assert!(c.is_satisfied_by("5"));
        assert!(!c.is_satisfied_by("10"));
    }

    #[test]
    fn test_greater_than() {
        let c = clause(Operator::GreaterThan, "10");
        assert!(c.is_satisfied_by("15"));
        assert!(!c.is_satisfied_by("10"));
    }

    #[test]
    fn test_less_than() {
        let c = clause(Operator::LessThan, "10");
        assert!(c.is_satisfied_by("5"));
        assert!(!c.is_satisfied_by("10"));
    }

    #[test]
    fn test_greater_or_equal() {
        let c = clause(Operator::GreaterOrEqual, "10");
        assert!(c.is_satisfied_by("10"));
        assert!(c.is_satisfied_by("15"));
        assert!(!c.is_satisfied_by("5"));
    }

    #[test]
    fn test_less_or_equal() {
        let c = clause(Operator::LessOrEqual, "10");
        assert!(c.is_satisfied_by("10"));
        assert!(c.is_satisfied_by("5"));
        assert!(!c.is_satisfied_by("15"));
    }

    #[test]
    fn test_numeric_when_both_parse() {
        // Lexicographically "10" < "9", numerically it is greater.
        assert!(satisfies(Operator::GreaterThan, "10", "9"));
        assert!(satisfies(Operator::Equal, "007", "7"));
        assert!(satisfies(Operator::LessThan, "-3", "2"));
    }

    #[test]
    fn test_integer_parse_ignores_surrounding_whitespace() {
        assert!(satisfies(Operator::Equal, " 10", "10"));
    }

    #[test]
    fn test_string_when_either_side_is_not_an_integer() {
        assert!(satisfies(Operator::Equal, "string", "string"));
        assert!(!satisfies(Operator::Equal, "another_string", "string"));
        // Only one side numeric: the raw strings are compared.
        assert!(satisfies(Operator::LessThan, "10", "abc"));
        assert!(!satisfies(Operator::Equal, "10", "10.0"));
        assert!(satisfies(Operator::GreaterThan, "9", "10.0"));
    }

    #[test]
    fn test_integers_beyond_64_bits_compare_numerically() {
        // Each pair orders the other way as strings.
        let below = "99999999999999999999";
        let above = "100000000000000000000";
        assert!(!satisfies(Operator::GreaterThan, below, above));
        assert!(satisfies(Operator::LessThan, below, above));
        assert!(satisfies(Operator::LessThan, "5", above));
        assert!(satisfies(
            Operator::LessThan,
            "-200000000000000000000",
            "-100000000000000000000"
        ));
        assert!(satisfies(Operator::GreaterThan, "-5", "-100000000000000000000"));
    }

    #[test]
    fn test_integer_sign_and_leading_zeros() {
        assert!(satisfies(Operator::Equal, "-000100000000000000000000", "-100000000000000000000"));
        assert!(satisfies(Operator::Equal, "-0", "+0"));
        assert!(satisfies(Operator::Equal, "+42", "42"));
        assert!(satisfies(Operator::LessThan, "-1", "0"));
        // A bare sign is not a number.
        assert!(satisfies(Operator::LessThan, "-", "0"));
        assert!(!satisfies(Operator::Equal, "1_000", "1000"));
    }

    #[test]
    fn test_symbol_round_trip() {
        for op in Operator::BY_PRIORITY {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol("=="), None);
    }

    #[test]
    fn test_match_prefix_prefers_longest() {
        assert_eq!(Operator::match_prefix(">=5"), Some(Operator::GreaterOrEqual));
        assert_eq!(Operator::match_prefix("<=5"), Some(Operator::LessOrEqual));
        assert_eq!(Operator::match_prefix("!=5"), Some(Operator::NotEqual));
        assert_eq!(Operator::match_prefix("=5"), Some(Operator::Equal));
        assert_eq!(Operator::match_prefix(">5"), Some(Operator::GreaterThan));
        assert_eq!(Operator::match_prefix("#5"), None);
    }

    #[test]
    fn test_display() {
        let c = Comparison::new("age", Operator::GreaterOrEqual, "30");
        assert_eq!(c.to_string(), "age>=30");
    }
}
