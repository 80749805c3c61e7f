use std::str::Lines;

use super::error::AsciiError;
use super::layout;

/// Line cursor over an xlook text export, tracking 1-based line numbers.
pub struct LineReader<'a> {
    lines: Lines<'a>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line_no: 0,
        }
    }

    /// Number of the most recently returned line.
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    pub fn next_header_line(&mut self, field: &'static str) -> Result<&'a str, AsciiError> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(line)
            }
            None => Err(AsciiError::MissingLine {
                line: self.line_no + 1,
                field,
            }),
        }
    }

    /// Next non-blank line, with its line number.
    pub fn next_data_line(&mut self) -> Option<(usize, &'a str)> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            if !line.trim().is_empty() {
                return Some((self.line_no, line));
            }
        }
        None
    }
}

/// Split a headings/units line into trimmed fixed-width fields.
///
/// The leading label is skipped and trailing blank fields are dropped. A
/// final field shorter than the width is kept.
///
/// # Examples
/// ```
/// use xlook_core::formats::ascii::reader::fixed_width_fields;
///
/// let fields = fixed_width_fields("name LP_Disp     Time");
/// assert_eq!(fields, ["LP_Disp", "Time"]);
/// ```
pub fn fixed_width_fields(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().skip(layout::LABEL_WIDTH).collect();
    let mut fields: Vec<String> = chars
        .chunks(layout::FIELD_WIDTH)
        .map(|chunk| chunk.iter().collect::<String>().trim().to_string())
        .collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Parse the integer after `number of records =`.
pub fn parse_record_count(line: &str) -> Option<i64> {
    let value = match line.rsplit_once(layout::RECORD_COUNT_SEPARATOR) {
        Some((_, value)) => value,
        None => line.trim().strip_prefix(layout::RECORD_COUNT_LABEL)?,
    };
    value.trim().parse().ok()
}
