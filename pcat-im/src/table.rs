//! Delimited text parsing
//!
//! Handles what a spreadsheet puts on the clipboard (tab separated) and plain
//! CSV. Quoted cells may contain the delimiter and `""` escapes, but not line
//! breaks.

use clap::ValueEnum;

use crate::error::ImportError;

/// Cell separator
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Comma => ',',
        }
    }

    /// Tab when the header contains one, comma otherwise
    pub fn detect(header_line: &str) -> Self {
        if header_line.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }
}

/// A data row and the line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Split the input into a header and data rows, skipping blank lines
pub fn parse_table(text: &str, delimiter: Option<Delimiter>) -> Result<Table, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header_text) = lines.next().ok_or(ImportError::EmptyInput)?;
    let delimiter = delimiter.unwrap_or_else(|| Delimiter::detect(header_text));

    let header = split_line(header_text, delimiter, header_line)?;
    for (i, name) in header.iter().enumerate() {
        if name.is_empty() {
            return Err(ImportError::BlankColumn { position: i + 1 });
        }
        if header[..i].contains(name) {
            return Err(ImportError::DuplicateColumn {
                column: name.clone(),
            });
        }
    }

    let mut rows = Vec::new();
    for (line, text) in lines {
        let mut cells = split_line(text, delimiter, line)?;

        // Spreadsheets pad short rows with trailing separators
        while cells.len() > header.len() && cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        if cells.len() > header.len() {
            return Err(ImportError::TooManyCells {
                line,
                found: cells.len(),
                expected: header.len(),
            });
        }
        cells.resize(header.len(), String::new());
        rows.push(Row { line, cells });
    }

    Ok(Table { header, rows })
}

/// Split one line into trimmed cells
pub fn split_line(line: &str, delimiter: Delimiter, line_no: usize) -> Result<Vec<String>, ImportError> {
    let separator = delimiter.as_char();
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
        } else if c == '"' && cell.trim().is_empty() {
            cell.clear();
            in_quotes = true;
        } else if c == separator {
            cells.push(cell.trim().to_string());
            cell.clear();
        } else {
            cell.push(c);
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote { line: line_no });
    }
    cells.push(cell.trim().to_string());
    Ok(cells)
}
