use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// A single field value as seen by the table pipeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Number(f64),
}

impl Value<'_> {
    /// Stringified form used for searching and non-numeric comparison.
    /// Whole numbers print without a fractional part (10.0 -> "10") and
    /// negative zero prints as "0".
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(*s),
            Value::Number(n) => Cow::Owned((n + 0.0).to_string()),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// A row of uniform shape. `Field` names the columns, `Status` is the
/// enum the status filter matches on.
pub trait Record {
    type Field: Copy + Eq + fmt::Debug + 'static;
    type Status: Copy + Eq + fmt::Debug;

    /// Every field in display order. Search visits all of them.
    const FIELDS: &'static [Self::Field];

    /// Value of `field`, or `None` when the record carries nothing for it.
    fn value(&self, field: Self::Field) -> Option<Value<'_>>;

    fn status(&self) -> Self::Status;
}

/// Anything the pipeline can carry through its stages while still reaching
/// the underlying record: plain references, or references tagged with their
/// position in the source collection.
pub trait RowRef {
    type Record: Record;

    fn record(&self) -> &Self::Record;
}

impl<R: Record> RowRef for &R {
    type Record = R;

    fn record(&self) -> &R {
        self
    }
}

impl<'a, R: Record> RowRef for (usize, &'a R) {
    type Record = R;

    fn record(&self) -> &R {
        self.1
    }
}

/// Compare two field values.
///
/// Numbers compare numerically. Anything else is stringified and collated.
/// A missing value on either side compares equal, so sorting by a field a
/// record does not carry leaves those rows where they were.
pub fn compare_values(a: Option<Value<'_>>, b: Option<Value<'_>>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(a), Some(b)) => collate(&a.to_text(), &b.to_text()),
        _ => Ordering::Equal,
    }
}

/// Locale-style string ordering: letters compare case-insensitively first,
/// and only an otherwise equal pair is split by case (lower before upper).
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find_map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Some(Ordering::Less),
                (false, true) => Some(Ordering::Greater),
                _ => None,
            })
            .unwrap_or(Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_text_drops_trailing_zero() {
        assert_eq!(Value::Number(10.0).to_text(), "10");
        assert_eq!(Value::Number(24.3).to_text(), "24.3");
        assert_eq!(Value::Number(-0.532).to_text(), "-0.532");
    }

    #[test]
    fn test_negative_zero_prints_as_zero() {
        assert_eq!(Value::Number(-0.0).to_text(), "0");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
    }

    #[test]
    fn test_compare_numbers_numerically() {
        // "9" > "10" as text, but not as numbers
        let ord = compare_values(Some(Value::Number(9.0)), Some(Value::Number(10.0)));
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_compare_mixed_falls_back_to_text() {
        let ord = compare_values(Some(Value::Text("abc")), Some(Value::Number(5.0)));
        assert_eq!(ord, Ordering::Greater);
    }

    #[test]
    fn test_missing_value_compares_equal() {
        assert_eq!(
            compare_values(None, Some(Value::Number(1.0))),
            Ordering::Equal
        );
        assert_eq!(compare_values(Some(Value::Text("x")), None), Ordering::Equal);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }

    #[test]
    fn test_collate_ignores_case_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Zebra", "apple"), Ordering::Greater);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_nan_compares_equal() {
        let ord = compare_values(Some(Value::Number(f64::NAN)), Some(Value::Number(1.0)));
        assert_eq!(ord, Ordering::Equal);
    }
}
