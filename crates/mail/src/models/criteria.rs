//! Search criteria for selecting messages

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error returned when a date range is inverted
#[derive(Debug, thiserror::Error)]
#[error("start date {from} is after end date {to}")]
pub struct InvalidDateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Filter selecting which messages to scan
///
/// Both dates are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Required sender address
    pub sender: String,
    /// Subject terms, any of which may match
    pub subject_terms: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl SearchCriteria {
    /// Build criteria, rejecting `date_from > date_to`
    ///
    /// Subject terms are trimmed, blanks dropped, and duplicates removed
    /// while keeping the first occurrence's position.
    pub fn new<I, S>(
        sender: impl Into<String>,
        subject_terms: I,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Self, InvalidDateRange>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if date_from > date_to {
            return Err(InvalidDateRange {
                from: date_from,
                to: date_to,
            });
        }

        let mut terms: Vec<String> = Vec::new();
        for term in subject_terms {
            let term = term.as_ref().trim();
            if !term.is_empty() && !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }

        Ok(Self {
            sender: sender.into(),
            subject_terms: terms,
            date_from,
            date_to,
        })
    }

    /// Number of calendar days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.date_to - self.date_from).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = SearchCriteria::new("a@b.c", ["x"], date(2024, 3, 2), date(2024, 3, 1));
        assert!(err.is_err());
    }

    #[test]
    fn test_single_day_range() {
        let c = SearchCriteria::new("a@b.c", ["x"], date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(c.days(), 1);
    }

    #[test]
    fn test_terms_deduplicated_in_order() {
        let c = SearchCriteria::new(
            "a@b.c",
            ["Final", " LEO ", "", "Final", "FINAL"],
            date(2024, 1, 1),
            date(2024, 1, 31),
        )
        .unwrap();
        assert_eq!(c.subject_terms, vec!["Final", "LEO", "FINAL"]);
    }
}
