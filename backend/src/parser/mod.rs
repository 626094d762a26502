//! Roster CSV reader with encoding and delimiter auto-detection.
//!
//! Decodes the raw bytes, guesses the separator from the header line and
//! deserializes each data row into an [`InputRecord`].

use std::path::Path;

use crate::models::InputRecord;

/// Columns every roster must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "email", "cohort"];

/// CSV parsing error with context
#[derive(Debug, Clone)]
pub struct CsvError {
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(f, "Line {}, column '{}' (value '{}'): {}", self.line, col, val, self.message)
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            _ => {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A parsed roster with detection metadata
#[derive(Debug, Clone)]
pub struct Roster {
    /// Data rows in file order
    pub records: Vec<InputRecord>,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    /// Column headers as found in the file
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "windows-1251" | "cp1251" => "windows-1251".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        "windows-1251" | "cp1251" => encoding_rs::WINDOWS_1251.decode(bytes).0.to_string(),
        // Cyrillic rosters are almost always UTF-8 when chardet is unsure
        _ => String::from_utf8_lossy(bytes).to_string(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read a roster file with auto-detection of encoding and delimiter.
pub fn read_roster<P: AsRef<Path>>(path: P) -> Result<Roster, CsvError> {
    let bytes = std::fs::read(path.as_ref())
        .map_err(|e| CsvError::new(0, format!("Cannot read file: {}", e)))?;

    parse_roster_bytes(&bytes)
}

/// Parse roster bytes with auto-detection of encoding and delimiter.
pub fn parse_roster_bytes(bytes: &[u8]) -> Result<Roster, CsvError> {
    // valid UTF-8 wins; chardet can mistake short Cyrillic text for a legacy code page
    let encoding = match std::str::from_utf8(bytes) {
        Ok(_) => "utf-8".to_string(),
        Err(_) => detect_encoding(bytes),
    };
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    parse_roster_str(&content, delimiter, encoding)
}

/// Parse roster text with an explicit delimiter.
pub fn parse_roster_str(content: &str, delimiter: char, encoding: String) -> Result<Roster, CsvError> {
    if content.trim().is_empty() {
        return Err(CsvError::new(1, "Empty CSV file"));
    }

    let delimiter_byte = u8::try_from(delimiter)
        .map_err(|_| CsvError::new(1, format!("Unsupported delimiter '{}'", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::new(1, format!("Cannot read header: {}", e)))?
        .iter()
        .map(|h| h.trim_matches('"').to_string())
        .collect();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CsvError::new(1, "Missing required column").with_column(column));
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<InputRecord>().enumerate() {
        let line = idx + 2; // header is line 1
        let record = result.map_err(|e| CsvError::new(line, e.to_string()))?;

        if record.name.is_empty() && record.email.is_empty() && record.cohort.is_empty() {
            continue;
        }
        if record.email.is_empty() {
            return Err(CsvError::new(line, "Empty email")
                .with_column("email")
                .with_value(record.name));
        }

        records.push(record);
    }

    Ok(Roster {
        records,
        encoding,
        delimiter,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Result<Roster, CsvError> {
        parse_roster_bytes(csv.as_bytes())
    }

    #[test]
    fn test_simple_roster() {
        let roster = parse("name,email,cohort\nШевченко Тарас Григорович,t.shevchenko@example.com,A1\n").unwrap();

        assert_eq!(roster.delimiter, ',');
        assert_eq!(roster.records.len(), 1);
        assert_eq!(roster.records[0].name, "Шевченко Тарас Григорович");
        assert_eq!(roster.records[0].email, "t.shevchenko@example.com");
        assert_eq!(roster.records[0].cohort, "A1");
    }

    #[test]
    fn test_semicolon_and_extra_columns() {
        let roster = parse("id;name;email;cohort\n1;Франко Іван;ivan@example.com;B2\n").unwrap();

        assert_eq!(roster.delimiter, ';');
        assert_eq!(roster.headers, vec!["id", "name", "email", "cohort"]);
        assert_eq!(roster.records[0].name, "Франко Іван");
        assert_eq!(roster.records[0].cohort, "B2");
    }

    #[test]
    fn test_quoted_values_and_whitespace() {
        let roster = parse("name,email,cohort\n\"Косач Лариса Петрівна\" , lesya@example.com ,\"A, B\"\n").unwrap();

        assert_eq!(roster.records[0].name, "Косач Лариса Петрівна");
        assert_eq!(roster.records[0].email, "lesya@example.com");
        assert_eq!(roster.records[0].cohort, "A, B");
    }

    #[test]
    fn test_bom_is_stripped() {
        let bytes = "\u{feff}name,email,cohort\nФранко Іван,ivan@example.com,B2\n".as_bytes();
        let roster = parse_roster_bytes(bytes).unwrap();
        assert_eq!(roster.headers[0], "name");
    }

    #[test]
    fn test_blank_rows_skipped() {
        let roster = parse("name,email,cohort\nФранко Іван,ivan@example.com,B2\n,,\nКостенко Ліна,lina@example.com,B2\n").unwrap();
        assert_eq!(roster.records.len(), 2);
    }

    #[test]
    fn test_missing_column_error() {
        let err = parse("name,mail,cohort\nФранко Іван,ivan@example.com,B2\n").unwrap_err();
        assert_eq!(err.column.as_deref(), Some("email"));
        assert!(err.to_string().contains("Missing required column"));
    }

    #[test]
    fn test_empty_email_error() {
        let err = parse("name,email,cohort\nФранко Іван,,B2\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.to_string().contains("Франко Іван"));
    }

    #[test]
    fn test_empty_csv_error() {
        let err = parse("").unwrap_err();
        assert!(err.message.contains("Empty"));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_windows_1251_decoding() {
        // "Іван" in windows-1251
        let bytes: &[u8] = &[0xB2, 0xE2, 0xE0, 0xED];
        assert_eq!(decode_content(bytes, "windows-1251"), "Іван");
    }
}
