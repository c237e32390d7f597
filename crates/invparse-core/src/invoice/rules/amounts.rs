//! Amount extraction: labeled totals and per-line item amounts.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{LINE_AMOUNT, TOTAL_AMOUNT};
use super::{ExtractionMatch, FieldExtractor};

/// Default minimum line length; a line must be longer than this to qualify.
pub const DEFAULT_MIN_LINE_LENGTH: usize = 10;

/// Lines containing this word (any case) never become line items.
const TOTAL_MARKER: &str = "total";

/// Labeled total extractor (`Total:`, `Amount`, `Sum`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TotalExtractor;

impl TotalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// The first labeled total decides; an unparsable value leaves the total
    /// unresolved rather than falling through to a later label.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = TOTAL_AMOUNT.captures(text)?;
        let full_match = caps.get(0)?;
        let amount = parse_amount(&caps[1])?;
        Some(
            ExtractionMatch::new(amount, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        TOTAL_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let amount = parse_amount(&caps[1])?;
                Some(
                    ExtractionMatch::new(amount, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// A qualifying line found by [`LineItemExtractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedLine {
    /// 0-based index of the line in the source text.
    pub line_index: usize,
    /// Line with the first amount removed, trimmed.
    pub description: String,
    /// Parsed amount.
    pub amount: Decimal,
    /// Byte range of the amount match. Relative to the line for
    /// [`LineItemExtractor::parse_line`], to the whole text for
    /// [`LineItemExtractor::extract_lines`].
    pub amount_span: (usize, usize),
}

/// Splits text into lines and keeps those that look like priced items.
#[derive(Debug, Clone, Copy)]
pub struct LineItemExtractor {
    min_line_length: usize,
}

impl LineItemExtractor {
    pub fn new() -> Self {
        Self {
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
        }
    }

    /// Lines of `length` characters or fewer are skipped.
    pub fn with_min_line_length(mut self, length: usize) -> Self {
        self.min_line_length = length;
        self
    }

    /// Try to read one line as an item.
    pub fn parse_line(&self, line_index: usize, line: &str) -> Option<ExtractedLine> {
        if line.chars().count() <= self.min_line_length {
            return None;
        }
        if line.to_lowercase().contains(TOTAL_MARKER) {
            return None;
        }

        let caps = LINE_AMOUNT.captures(line)?;
        let full_match = caps.get(0)?;
        let amount = parse_amount(&caps[1])?;

        let description = format!("{}{}", &line[..full_match.start()], &line[full_match.end()..]);

        Some(ExtractedLine {
            line_index,
            description: description.trim().to_string(),
            amount,
            amount_span: (full_match.start(), full_match.end()),
        })
    }

    /// All qualifying lines, in input order.
    pub fn extract_lines(&self, text: &str) -> Vec<ExtractedLine> {
        let mut line_start = 0;
        let mut lines = Vec::new();
        for (index, line) in text.split('\n').enumerate() {
            if let Some(mut item) = self.parse_line(index, line) {
                item.amount_span = (
                    line_start + item.amount_span.0,
                    line_start + item.amount_span.1,
                );
                lines.push(item);
            }
            line_start += line.len() + 1;
        }
        lines
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract priced lines using the default minimum line length.
pub fn extract_line_items(text: &str) -> Vec<ExtractedLine> {
    LineItemExtractor::new().extract_lines(text)
}

/// Parse an amount such as `1,234.56` or `1200.`.
///
/// Every `,` is treated as a thousands separator. Returns `None` for values
/// with no digits or too large to represent.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim().trim_start_matches('$').trim_end_matches('.');

    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    Decimal::from_str(cleaned)
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}

/// Format amount with `,` grouping and two decimals (1,234.56).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return format!("{}{}", sign, s);
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,200.00"), Some(dec("1200.00")));
        assert_eq!(parse_amount("1,234,567.89"), Some(dec("1234567.89")));
        assert_eq!(parse_amount("$45.5"), Some(dec("45.5")));
        assert_eq!(parse_amount("1200."), Some(dec("1200")));
        assert_eq!(parse_amount(",5"), Some(dec("5")));
        assert_eq!(parse_amount(","), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_amount_overflow() {
        assert_eq!(parse_amount("99999999999999999999999999999999999"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234.56")), "1,234.56");
        assert_eq!(format_amount(dec("12345678.9")), "12,345,678.90");
        assert_eq!(format_amount(dec("0")), "0.00");
        assert_eq!(format_amount(dec("999")), "999.00");
    }

    #[test]
    fn test_labeled_total() {
        let extractor = TotalExtractor::new();

        let m = extractor.extract("Total: $1,200.00").unwrap();
        assert_eq!(m.value, dec("1200.00"));

        let m = extractor.extract("Amount 350 due").unwrap();
        assert_eq!(m.value, dec("350"));

        let m = extractor.extract("SUM:99.95").unwrap();
        assert_eq!(m.value, dec("99.95"));
    }

    #[test]
    fn test_unparsable_first_total_is_unresolved() {
        let extractor = TotalExtractor::new();
        let text = "Total: ,\nAmount: 10.00";

        assert!(extractor.extract(text).is_none());
        assert_eq!(extractor.extract_all(text).len(), 1);
    }

    #[test]
    fn test_line_item() {
        let extractor = LineItemExtractor::new();
        let line = extractor
            .parse_line(3, "Consulting services $1,200.00")
            .unwrap();

        assert_eq!(line.line_index, 3);
        assert_eq!(line.description, "Consulting services");
        assert_eq!(line.amount, dec("1200.00"));
    }

    #[test]
    fn test_short_lines_skipped() {
        let extractor = LineItemExtractor::new();
        // exactly 10 characters
        assert!(extractor.parse_line(0, "Tea $12.50").is_none());
        assert!(extractor.parse_line(0, "Teas $12.50").is_some());
    }

    #[test]
    fn test_total_lines_skipped() {
        let extractor = LineItemExtractor::new();
        assert!(extractor.parse_line(0, "Subtotal for services $100.00").is_none());
        assert!(extractor.parse_line(0, "GRAND TOTAL         $100.00").is_none());
    }

    #[test]
    fn test_lines_without_amount_skipped() {
        let extractor = LineItemExtractor::new();
        assert!(extractor.parse_line(0, "Thank you for your business").is_none());
        // a single digit is not an amount
        assert!(extractor.parse_line(0, "Chapter 7 of the handbook").is_none());
    }

    #[test]
    fn test_description_removes_first_amount_only() {
        let line = LineItemExtractor::new()
            .parse_line(0, "  Widgets 12 x $3.50 each  ")
            .unwrap();

        assert_eq!(line.amount, dec("12"));
        assert_eq!(line.description, "Widgets  x $3.50 each");
    }

    #[test]
    fn test_extract_lines_keeps_order_and_indices() {
        let text = "Header line\nDesign work      $500.00\nshort 12\nHosting plan     $25.00\r\n";
        let lines = extract_line_items(text);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_index, 1);
        assert_eq!(lines[0].description, "Design work");
        assert_eq!(lines[1].line_index, 3);
        assert_eq!(lines[1].description, "Hosting plan");
        assert_eq!(lines[1].amount, dec("25.00"));

        let (start, end) = lines[1].amount_span;
        assert_eq!(&text[start..end], "$25.00");
    }

    #[test]
    fn test_custom_min_line_length() {
        let extractor = LineItemExtractor::new().with_min_line_length(3);
        assert!(extractor.parse_line(0, "Tea $12.50").is_some());
    }
}
