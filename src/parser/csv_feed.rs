// Product feed CSV parsing
use csv::{ByteRecord, ReaderBuilder};
use tracing::{info, warn};

/// Header line plus the raw data rows, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub trait Parser {
    fn parse(&self, text: &str) -> ParsedCsv;
}

pub struct CsvFeedParser;

impl CsvFeedParser {
    pub fn new() -> Self {
        Self
    }
}

/// `;` only when it strictly outnumbers `,` on the given line.
pub fn detect_delimiter(line: &str) -> u8 {
    let commas = line.matches(',').count();
    let semis = line.matches(';').count();
    if semis > commas { b';' } else { b',' }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Drops whitespace-only lines and the padding in front of an opening quote, both
/// only outside quoted fields, so `a, "b,c"` reads as two fields.
fn prepare(text: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;

    for line in text.split('\n') {
        if !in_quotes && line.trim().is_empty() {
            continue;
        }
        let mut field_start = !in_quotes;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' && chars.peek() == Some(&'"') {
                    out.push_str("\"\"");
                    chars.next();
                    continue;
                }
                if c == '"' {
                    in_quotes = false;
                }
                out.push(c);
                continue;
            }

            if field_start && (c == ' ' || c == '\t') {
                let mut padding = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next != ' ' && next != '\t' {
                        break;
                    }
                    padding.push(next);
                    chars.next();
                }
                if chars.peek() != Some(&'"') {
                    out.push_str(&padding);
                    field_start = false;
                }
                continue;
            }

            if c == delimiter {
                field_start = true;
            } else {
                in_quotes = c == '"' && field_start;
                field_start = false;
            }
            out.push(c);
        }
        out.push('\n');
    }
    out
}

impl Parser for CsvFeedParser {
    fn parse(&self, text: &str) -> ParsedCsv {
        let text = normalize_line_endings(text);

        let Some(first_line) = text.lines().find(|l| !l.trim().is_empty()) else {
            return ParsedCsv::default();
        };
        let delimiter = detect_delimiter(first_line);
        let text = prepare(&text, delimiter as char);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut records: Vec<Vec<String>> = Vec::new();
        let mut record = ByteRecord::new();
        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {
                    records.push(
                        record
                            .iter()
                            .map(|f| String::from_utf8_lossy(f).into_owned())
                            .collect(),
                    );
                }
                Ok(false) => break,
                Err(e) => {
                    warn!("CSV read stopped early: {}", e);
                    break;
                }
            }
        }

        let mut records = records.into_iter();
        let headers: Vec<String> = match records.next() {
            Some(h) => h.into_iter().map(|h| h.trim().to_string()).collect(),
            None => return ParsedCsv::default(),
        };
        let rows: Vec<Vec<String>> = records.collect();

        info!(
            "Parsed CSV: delimiter '{}', {} headers, {} rows",
            delimiter as char,
            headers.len(),
            rows.len()
        );
        ParsedCsv { headers, rows }
    }
}
