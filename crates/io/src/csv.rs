// Delimited-text upload scanning

use std::iter::Peekable;
use std::str::Chars;

/// Scanner position relative to quoting.
///
/// `QuoteInQuoted` is the state right after a `"` inside a quoted field:
/// another `"` makes it an escaped quote, anything else closed the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

struct Scanner {
    delimiter: char,
    state: ScanState,
    field: String,
    record: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Anything seen on this record beyond a bare line terminator.
    started: bool,
}

impl Scanner {
    fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            state: ScanState::Unquoted,
            field: String::new(),
            record: Vec::new(),
            rows: Vec::new(),
            started: false,
        }
    }

    fn end_field(&mut self) {
        self.record.push(std::mem::take(&mut self.field));
    }

    /// Blank lines produce no record.
    fn end_record(&mut self) {
        if self.started {
            self.end_field();
            self.rows.push(std::mem::take(&mut self.record));
        }
        self.started = false;
        self.state = ScanState::Unquoted;
    }

    fn terminator(&mut self, c: char, chars: &mut Peekable<Chars<'_>>) {
        if c == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
        }
        self.end_record();
    }

    /// Rows, and whether the input ended inside a quoted field.
    fn scan(mut self, content: &str) -> (Vec<Vec<String>>, bool) {
        let mut chars = content.chars().peekable();
        while let Some(c) = chars.next() {
            match self.state {
                ScanState::Unquoted => match c {
                    '"' if self.field.is_empty() => {
                        self.state = ScanState::Quoted;
                        self.started = true;
                    }
                    '\r' | '\n' => self.terminator(c, &mut chars),
                    _ if c == self.delimiter => {
                        self.end_field();
                        self.started = true;
                    }
                    _ => {
                        self.field.push(c);
                        self.started = true;
                    }
                },
                ScanState::Quoted => match c {
                    '"' => self.state = ScanState::QuoteInQuoted,
                    _ => self.field.push(c),
                },
                ScanState::QuoteInQuoted => match c {
                    '"' => {
                        self.field.push('"');
                        self.state = ScanState::Quoted;
                    }
                    '\r' | '\n' => self.terminator(c, &mut chars),
                    _ if c == self.delimiter => {
                        self.end_field();
                        self.state = ScanState::Unquoted;
                    }
                    // Text after a closing quote is kept: `"ab"c` reads as `abc`.
                    _ => {
                        self.field.push(c);
                        self.state = ScanState::Unquoted;
                    }
                },
            }
        }

        let unterminated = self.state == ScanState::Quoted;
        self.end_record();
        (self.rows, unterminated)
    }
}

/// Split delimited text into rows of raw cells.
///
/// Single pass over the input. Quoted fields may hold delimiters, line
/// breaks and doubled quotes. CRLF, LF and bare CR all end a record
/// outside quotes. A leading byte-order mark is dropped.
pub fn parse_delimited(content: &str, delimiter: char) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let (rows, unterminated) = Scanner::new(delimiter).scan(content);
    if unterminated {
        log::warn!("unterminated quoted field at end of input");
    }
    rows
}

/// Leading slice of `content` holding its first `lines` physical lines.
fn sample(content: &str, lines: usize) -> &str {
    match content.match_indices('\n').nth(lines.saturating_sub(1)) {
        Some((i, _)) => &content[..=i],
        None => content,
    }
}

/// Detect the most likely field delimiter by checking consistency across the first few records.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per record. The delimiter
/// that produces the most consistent field count (>1 field) wins. The sample is scanned as a
/// whole so quoted fields spanning lines count as one record; a record cut off by the end of
/// the sample is not reported.
pub fn sniff_delimiter(content: &str) -> char {
    let candidates = ['\t', ';', ',', '|'];
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let sample = sample(content, 10);

    let mut best = ',';
    let mut best_score = 0u64;

    for delim in candidates {
        let (rows, _) = Scanner::new(delim).scan(sample);
        let counts: Vec<usize> = rows.iter().map(|r| r.len()).collect();

        // Must produce >1 field on the first record to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Higher field count breaks ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Decode upload bytes to text.
///
/// Honors a UTF-16 byte-order mark, otherwise tries UTF-8 and falls back to
/// Windows-1252 (common for Excel-exported CSVs).
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        if encoding != encoding_rs::UTF_8 {
            let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            return decoded.into_owned();
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            log::debug!("upload is not UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
