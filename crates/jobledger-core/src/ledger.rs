//! Ledger codec (comma-delimited text with a fixed header).
//!
//! Parsing rules:
//! - The first record must be exactly `LEDGER_HEADER` (a leading BOM is tolerated).
//! - Every data record has exactly four fields. Blank lines are skipped.
//! - Quoted fields may contain delimiters, doubled quotes and line breaks.
//! - `\n` and `\r\n` both terminate a record; rendering always uses `\n`.
//!
//! Historical rows keep their field text as read, so a ledger that is parsed
//! and rendered again only differs by the rows appended in between.

use bytes::Bytes;

use crate::error::{LedgerError, Result};
use crate::record::MetricRecord;

/// Header row every ledger starts with.
pub const LEDGER_HEADER: [&str; 4] = ["TrainingJobName", "MetricName", "Value", "Timestamp"];

/// Field delimiter.
pub const DELIMITER: char = ',';

const QUOTE: char = '"';
const BOM: char = '\u{feff}';

/// One data row of the ledger, in its textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub job_name: String,
    pub metric_name: String,
    pub value: String,
    pub timestamp: String,
}

impl LedgerRow {
    /// Numeric value, if the field holds a finite float.
    pub fn value_f64(&self) -> Option<f64> {
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    fn fields(&self) -> [&str; 4] {
        [
            &self.job_name,
            &self.metric_name,
            &self.value,
            &self.timestamp,
        ]
    }
}

impl From<&MetricRecord> for LedgerRow {
    fn from(r: &MetricRecord) -> Self {
        Self {
            job_name: r.job_name.clone(),
            metric_name: r.metric_name.clone(),
            value: r.value.to_string(),
            timestamp: r.timestamp.to_string(),
        }
    }
}

/// Append-only sequence of ledger rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rows: Vec<LedgerRow>,
}

impl Ledger {
    /// A fresh ledger: header only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored ledger object. Zero bytes decode to a fresh ledger.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| LedgerError::malformed(1, format!("not valid UTF-8: {e}")))?;
        Self::parse(text)
    }

    /// Parse ledger text.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut records = split_records(text)?.into_iter();

        let Some((line, header)) = records.next() else {
            return Ok(Self::new());
        };
        if !header.iter().map(String::as_str).eq(LEDGER_HEADER) {
            return Err(LedgerError::malformed(
                line,
                format!("expected header {}", LEDGER_HEADER.join(",")),
            ));
        }

        let mut rows = Vec::with_capacity(records.len());
        for (line, fields) in records {
            let [job_name, metric_name, value, timestamp]: [String; 4] =
                fields.try_into().map_err(|f: Vec<String>| {
                    LedgerError::malformed(line, format!("expected 4 fields, found {}", f.len()))
                })?;
            rows.push(LedgerRow {
                job_name,
                metric_name,
                value,
                timestamp,
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one observation at the end of the ledger.
    pub fn append(&mut self, record: &MetricRecord) {
        self.rows.push(LedgerRow::from(record));
    }

    /// Render header plus all rows.
    pub fn render(&self) -> String {
        let mut out = String::new();
        write_record(&mut out, LEDGER_HEADER);
        for row in &self.rows {
            write_record(&mut out, row.fields());
        }
        out
    }

    /// Rendered ledger, ready for upload.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.render())
    }
}

fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\r', '\n'])
}

fn write_record(out: &mut String, fields: [&str; 4]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        if needs_quoting(field) {
            out.push(QUOTE);
            for c in field.chars() {
                if c == QUOTE {
                    out.push(QUOTE);
                }
                out.push(c);
            }
            out.push(QUOTE);
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Split text into records, each tagged with the line it starts on.
fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut out = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut line = 1usize;
    let mut start_line = 1usize;
    let mut in_quotes = false;
    let mut quoted = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            QUOTE => {
                return Err(LedgerError::malformed(line, "unexpected quote in field"));
            }
            DELIMITER => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut out, start_line, std::mem::take(&mut fields));
                quoted = false;
                line += 1;
                start_line = line;
            }
            _ if quoted => {
                return Err(LedgerError::malformed(line, "text after closing quote"));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(LedgerError::malformed(start_line, "unterminated quoted field"));
    }
    if quoted || !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut out, start_line, fields);
    }
    Ok(out)
}

fn push_record(out: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].is_empty();
    if !blank {
        out.push((line, fields));
    }
}
