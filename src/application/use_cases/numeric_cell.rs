// ============================================================
// NUMERIC CELL PARSER
// ============================================================
// Locale-tolerant coercion of spreadsheet cells to f64.
// Never fails and never yields NaN/Infinity: anything unusable is 0.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::boq::{BoqConfig, CellValue, NumberLocale};

/// Trailing ",-" / ".-" as in "Rp 15.000,-"
static NO_CENTS_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,]-+$").expect("valid regex"));

/// Outcome of coercing one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedCell {
    Number(f64),
    Blank,
    /// Non-blank content that is not a number
    Unparseable,
}

impl ParsedCell {
    pub fn value(self) -> f64 {
        match self {
            ParsedCell::Number(n) => n,
            ParsedCell::Blank | ParsedCell::Unparseable => 0.0,
        }
    }
}

pub struct NumericCellParser {
    locale: NumberLocale,
    currency: Option<Regex>,
}

impl NumericCellParser {
    pub fn new(locale: NumberLocale, currency_symbols: &[String]) -> Self {
        let alternatives: Vec<String> = currency_symbols
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(s))
            .collect();
        let currency = if alternatives.is_empty() {
            None
        } else {
            Regex::new(&format!("(?i){}", alternatives.join("|"))).ok()
        };

        Self { locale, currency }
    }

    pub fn from_config(config: &BoqConfig) -> Self {
        Self::new(config.number_locale, &config.currency_symbols)
    }

    pub fn parse(&self, cell: &CellValue) -> f64 {
        self.parse_cell(cell).value()
    }

    pub fn parse_cell(&self, cell: &CellValue) -> ParsedCell {
        match cell {
            CellValue::Number(n) if n.is_finite() => ParsedCell::Number(*n),
            CellValue::Number(_) => ParsedCell::Unparseable,
            CellValue::Text(text) => self.parse_text(text),
            CellValue::Bool(_) => ParsedCell::Unparseable,
            CellValue::Empty => ParsedCell::Blank,
        }
    }

    pub fn parse_text(&self, text: &str) -> ParsedCell {
        let cleaned = self.clean(text);
        if cleaned.is_empty() || cleaned == "-" {
            return ParsedCell::Blank;
        }

        match self.normalize_separators(&cleaned).parse::<f64>() {
            Ok(n) if n.is_finite() => ParsedCell::Number(n),
            _ => ParsedCell::Unparseable,
        }
    }

    /// Drop currency symbols, whitespace and a "no cents" suffix
    fn clean(&self, text: &str) -> String {
        let without_currency = match &self.currency {
            Some(re) => re.replace_all(text, "").into_owned(),
            None => text.to_string(),
        };
        let compact: String = without_currency
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        NO_CENTS_SUFFIX.replace(&compact, "").into_owned()
    }

    fn normalize_separators(&self, s: &str) -> String {
        match self.locale {
            NumberLocale::Indonesian => s.replace('.', "").replace(',', "."),
            NumberLocale::International => s.replace(',', ""),
            NumberLocale::Auto => auto_normalize(s),
        }
    }
}

impl Default for NumericCellParser {
    fn default() -> Self {
        Self::from_config(&BoqConfig::default())
    }
}

fn auto_normalize(s: &str) -> String {
    match (s.rfind('.'), s.rfind(',')) {
        // Both present: whichever comes last is the decimal mark
        (Some(dot), Some(comma)) if dot > comma => s.replace(',', ""),
        (Some(_), Some(_)) => s.replace('.', "").replace(',', "."),
        (Some(_), None) if is_grouping(s, '.') => s.replace('.', ""),
        (Some(_), None) => s.to_string(),
        (None, Some(_)) if is_grouping(s, ',') => s.replace(',', ""),
        (None, Some(_)) => s.replace(',', "."),
        (None, None) => s.to_string(),
    }
}

/// Repeated separator, or a single one followed by exactly three digits
/// after a non-zero integer part ("1.250" but not "0.125").
fn is_grouping(s: &str, separator: char) -> bool {
    let parts: Vec<&str> = s.split(separator).collect();
    if parts.len() > 2 {
        return true;
    }
    let integer = parts[0].trim_start_matches(['-', '+']);
    let fraction = parts.get(1).copied().unwrap_or_default();

    fraction.len() == 3
        && fraction.chars().all(|c| c.is_ascii_digit())
        && integer.chars().any(|c| c.is_ascii_digit() && c != '0')
}
