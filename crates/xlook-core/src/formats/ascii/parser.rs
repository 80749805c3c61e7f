use log::debug;

use super::error::AsciiError;
use super::layout;
use super::reader::{LineReader, fixed_width_fields, parse_record_count};
use crate::ChannelDescriptor;
use crate::table::NumericBuffer;

/// Counts and channel schema from the five header lines. The first channel
/// is always the implicit `row_num` column.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiHeader {
    pub record_count: usize,
    pub channels: Vec<ChannelDescriptor>,
}

pub fn parse_header(reader: &mut LineReader<'_>) -> Result<AsciiHeader, AsciiError> {
    let line = reader.next_header_line("record count")?;
    let record_count = parse_record_count(line)
        .filter(|count| *count >= 0)
        .ok_or_else(|| AsciiError::MalformedHeader {
            line: reader.line_number(),
            field: "record count",
            value: line.to_string(),
        })? as usize;

    let line = reader.next_header_line("column numbers")?;
    let column_count = line.split(layout::COLUMN_TOKEN).count();

    let line = reader.next_header_line("column headings")?;
    let mut names = vec![layout::ROW_NUM_NAME.to_string()];
    names.extend(fixed_width_fields(line));
    if names.len() != column_count {
        return Err(AsciiError::SchemaMismatch {
            field: "headings",
            declared: column_count,
            found: names.len(),
        });
    }

    let line = reader.next_header_line("column units")?;
    let mut units = vec![layout::ROW_NUM_UNITS.to_string()];
    units.extend(fixed_width_fields(line));
    if units.len() > column_count {
        return Err(AsciiError::SchemaMismatch {
            field: "units",
            declared: column_count,
            found: units.len(),
        });
    }
    units.resize(column_count, String::new());

    let line = reader.next_header_line("records per column")?;
    let line_no = reader.line_number();
    let mut counts = vec![record_count];
    for token in line.split(layout::RECORDS_TOKEN) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let count = token
            .parse::<usize>()
            .ok()
            .filter(|count| *count <= record_count)
            .ok_or_else(|| AsciiError::MalformedHeader {
                line: line_no,
                field: "records per column",
                value: token.to_string(),
            })?;
        counts.push(count);
    }
    if counts.len() != column_count {
        return Err(AsciiError::SchemaMismatch {
            field: "record counts",
            declared: column_count,
            found: counts.len(),
        });
    }

    let channels = names
        .into_iter()
        .zip(units)
        .zip(counts)
        .map(|((name, units), sample_count)| ChannelDescriptor {
            name,
            units,
            sample_count,
        })
        .collect();

    debug!("xlook text header: records={record_count} columns={column_count}");
    Ok(AsciiHeader {
        record_count,
        channels,
    })
}

/// Decode the whitespace-separated data rows that follow the header.
///
/// Every value the file carries is stored, including cells past a column's
/// declared sample count; `sample_count` still marks the valid prefix.
/// Rows are parsed before the buffer is allocated, so a malformed body is
/// reported without first reserving `record_count` rows.
pub fn decode_rows(
    reader: &mut LineReader<'_>,
    header: &AsciiHeader,
) -> Result<NumericBuffer, AsciiError> {
    let cols = header.channels.len();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    while let Some((line_no, line)) = reader.next_data_line() {
        if rows.len() >= header.record_count {
            return Err(AsciiError::TooManyRows {
                line: line_no,
                record_count: header.record_count,
            });
        }
        let tokens: Vec<&str> = line.split_whitespace().take(cols).collect();
        if tokens.len() < cols {
            return Err(AsciiError::ShortRow {
                line: line_no,
                needed: cols,
                actual: tokens.len(),
            });
        }
        let values = tokens
            .into_iter()
            .enumerate()
            .map(|(col, token)| {
                token.parse::<f64>().map_err(|_| AsciiError::InvalidNumber {
                    line: line_no,
                    column: col + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }

    let mut buffer = NumericBuffer::zeroed(header.record_count, cols).ok_or_else(|| {
        AsciiError::MalformedHeader {
            line: 1,
            field: "record count",
            value: header.record_count.to_string(),
        }
    })?;
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            buffer.set(row, col, *value);
        }
    }

    debug!("xlook text payload: {} of {} rows present", rows.len(), header.record_count);
    Ok(buffer)
}
