//! Labeled date extraction (`Date: 03/15/2024`).

use chrono::NaiveDate;
use regex::Captures;
use serde::{Deserialize, Serialize};

use super::patterns::LABELED_DATE;
use super::{ExtractionMatch, FieldExtractor};

/// Order of the two leading numeric components of a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `MM/DD/YYYY`, the US reading.
    #[default]
    MonthFirst,
    /// `DD/MM/YYYY`.
    DayFirst,
}

/// Date field extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateExtractor {
    order: DateOrder,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the component order.
    pub fn with_order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }

    fn to_date(&self, caps: &Captures<'_>) -> Option<ExtractionMatch<NaiveDate>> {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;

        let (month, day) = match self.order {
            DateOrder::MonthFirst => (first, second),
            DateOrder::DayFirst => (second, first),
        };

        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let full_match = caps.get(0)?;
        Some(
            ExtractionMatch::new(date, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    /// Only the first labeled date is considered; if it is not a valid
    /// calendar date the field is unresolved.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        LABELED_DATE
            .captures(text)
            .and_then(|caps| self.to_date(&caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        LABELED_DATE
            .captures_iter(text)
            .filter_map(|caps| self.to_date(&caps))
            .collect()
    }
}

/// Extract the invoice date using the given component order.
pub fn extract_date(text: &str, order: DateOrder) -> Option<NaiveDate> {
    DateExtractor::new()
        .with_order(order)
        .extract(text)
        .map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_first() {
        assert_eq!(
            extract_date("Date: 03/15/2024", DateOrder::MonthFirst),
            Some(ymd(2024, 3, 15))
        );
        assert_eq!(
            extract_date("dated 3-5-2024", DateOrder::MonthFirst),
            Some(ymd(2024, 3, 5))
        );
    }

    #[test]
    fn test_dated_label() {
        assert_eq!(
            extract_date("Dated: 12/01/2023", DateOrder::MonthFirst),
            Some(ymd(2023, 12, 1))
        );
    }

    #[test]
    fn test_day_first() {
        assert_eq!(
            extract_date("Date: 15/03/2024", DateOrder::DayFirst),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn test_invalid_calendar_date_is_unresolved() {
        assert_eq!(extract_date("Date: 15/03/2024", DateOrder::MonthFirst), None);
        assert_eq!(extract_date("Date: 02/30/2024", DateOrder::MonthFirst), None);
    }

    #[test]
    fn test_first_labeled_date_wins() {
        let text = "Date: 13/13/2024\nDue date: 04/01/2024";
        let extractor = DateExtractor::new();

        assert!(extractor.extract(text).is_none());
        assert_eq!(extractor.extract_all(text).len(), 1);
    }

    #[test]
    fn test_unlabeled_date_ignored() {
        assert_eq!(extract_date("Issued 03/15/2024", DateOrder::MonthFirst), None);
    }

    #[test]
    fn test_dot_separator_not_recognized() {
        assert_eq!(extract_date("Date: 15.03.2024", DateOrder::DayFirst), None);
    }
}
