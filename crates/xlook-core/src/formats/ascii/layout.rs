pub const RECORD_COUNT_LABEL: &str = "number of records";
pub const RECORD_COUNT_SEPARATOR: char = '=';

pub const COLUMN_TOKEN: &str = "col";
pub const RECORDS_TOKEN: &str = "recs";

/// Leading label characters skipped on the headings and units lines.
pub const LABEL_WIDTH: usize = 5;
/// Width of one heading or units field.
pub const FIELD_WIDTH: usize = 12;

/// Implicit first column holding the row number.
pub const ROW_NUM_NAME: &str = "row_num";
pub const ROW_NUM_UNITS: &str = ".";
