//! Converts the 5x7 font table to the display firmware's character markup.
//!
//! The source table has one glyph per row, 5 hex columns of 7 pixel bits
//! each. The firmware wants a flat pixel color list per character, column
//! major, least significant bit on top.

use std::io::{BufRead, Write};

/// Columns per glyph in the source table
pub const GLYPH_COLUMNS: usize = 5;
/// Pixel rows per glyph column
pub const GLYPH_ROWS: usize = 7;
/// Character code assigned to the first table row
pub const FIRST_CODE: u32 = 32;

/// Color value of a lit pixel
const LIT: u32 = 0;
/// Color value of an unlit pixel (0xffffff)
const UNLIT: u32 = 16_777_215;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("row {row}: expected {GLYPH_COLUMNS} columns, found {found}")]
    ColumnCount { row: usize, found: usize },
    #[error("row {row}: bad hex value {value:?}")]
    BadHex { row: usize, value: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand one glyph row into its 35 pixel values, column major, bit 0 to 6.
pub fn glyph_pixels(columns: [u8; GLYPH_COLUMNS]) -> [u32; GLYPH_COLUMNS * GLYPH_ROWS] {
    let mut pixels = [UNLIT; GLYPH_COLUMNS * GLYPH_ROWS];
    for (c, column) in columns.iter().enumerate() {
        for bit in 0..GLYPH_ROWS {
            if column & (1 << bit) != 0 {
                pixels[c * GLYPH_ROWS + bit] = LIT;
            }
        }
    }
    pixels
}

fn parse_row(row: usize, line: &str) -> Result<[u8; GLYPH_COLUMNS], FontError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != GLYPH_COLUMNS {
        return Err(FontError::ColumnCount {
            row,
            found: fields.len(),
        });
    }
    let mut columns = [0u8; GLYPH_COLUMNS];
    for (column, field) in columns.iter_mut().zip(fields) {
        let digits = field.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        *column = u8::from_str_radix(digits, 16).map_err(|_| FontError::BadHex {
            row,
            value: field.trim().to_string(),
        })?;
    }
    Ok(columns)
}

/// Convert the whole table, one `<CHAR .../>` line per glyph row.
pub fn convert(input: impl BufRead, mut output: impl Write) -> Result<(), FontError> {
    for (row, line) in input.lines().enumerate() {
        let line = line?;
        let columns = parse_row(row, &line)?;
        let pixels = glyph_pixels(columns).map(|p| p.to_string()).join(",");
        let code = FIRST_CODE + row as u32;
        writeln!(output, " <CHAR CODE=\"{code}\" PIXELS=\"{pixels}\"/>")?;
    }
    Ok(())
}
