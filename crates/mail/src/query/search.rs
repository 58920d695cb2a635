//! Gmail search-expression builder

use chrono::{Days, NaiveDate};

use crate::models::SearchCriteria;

/// Format a date the way Gmail's `after:`/`before:` operators expect
pub fn gmail_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Build the search expression for the given criteria
///
/// The date window is half-open: `after:` is the first day and `before:` is
/// the day following `date_to`, so the last day is included in full.
pub fn build_query(criteria: &SearchCriteria) -> String {
    let mut clauses = vec![format!("from:{}", criteria.sender.trim())];

    if !criteria.subject_terms.is_empty() {
        let terms: Vec<String> = criteria
            .subject_terms
            .iter()
            .map(|t| format!("subject:{}", quote_term(t)))
            .collect();
        clauses.push(format!("({})", terms.join(" OR ")));
    }

    clauses.push("has:attachment".to_string());
    clauses.push(format!("after:{}", gmail_date(criteria.date_from)));

    let end = criteria
        .date_to
        .checked_add_days(Days::new(1))
        .unwrap_or(criteria.date_to);
    clauses.push(format!("before:{}", gmail_date(end)));

    clauses.join(" ")
}

/// Quote a term containing whitespace or grouping characters
fn quote_term(term: &str) -> String {
    let term = term.replace('"', "");
    if term.chars().any(|c| c.is_whitespace() || "(){}".contains(c)) {
        format!("\"{}\"", term)
    } else {
        term
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn criteria(terms: &[&str], from: NaiveDate, to: NaiveDate) -> SearchCriteria {
        SearchCriteria::new("noreply@icegate.gov.in", terms.iter().copied(), from, to).unwrap()
    }

    #[test]
    fn test_full_query() {
        let c = criteria(
            &["Final", "Final Copy", "LEO", "FINAL"],
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        assert_eq!(
            build_query(&c),
            "from:noreply@icegate.gov.in \
             (subject:Final OR subject:\"Final Copy\" OR subject:LEO OR subject:FINAL) \
             has:attachment after:2024/01/01 before:2024/02/01"
        );
    }

    #[test]
    fn test_single_day_includes_whole_day() {
        let c = criteria(&["LEO"], date(2024, 2, 29), date(2024, 2, 29));
        let q = build_query(&c);
        assert!(q.contains("after:2024/02/29"));
        assert!(q.contains("before:2024/03/01"));
    }

    #[test]
    fn test_year_rollover() {
        let c = criteria(&["LEO"], date(2023, 12, 31), date(2023, 12, 31));
        assert!(build_query(&c).ends_with("after:2023/12/31 before:2024/01/01"));
    }

    #[test]
    fn test_no_subject_terms_omits_clause() {
        let c = criteria(&[], date(2024, 1, 1), date(2024, 1, 2));
        assert_eq!(
            build_query(&c),
            "from:noreply@icegate.gov.in has:attachment after:2024/01/01 before:2024/01/03"
        );
    }

    #[test]
    fn test_quote_term() {
        assert_eq!(quote_term("LEO"), "LEO");
        assert_eq!(quote_term("Final Copy"), "\"Final Copy\"");
        assert_eq!(quote_term("say \"hi\" now"), "\"say hi now\"");
    }
}
