/// Column separator
pub const DELIMITER: char = ',';

/// Quote character for fields containing separators, quotes or line breaks
pub const QUOTE: char = '"';

/// Written after every row. Both `\r\n` and `\n` are accepted on read.
pub const ROW_TERMINATOR: &str = "\r\n";

/// One delimited record as read from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    /// Line (1-indexed) on which the record starts
    pub line: usize,
    pub fields: Vec<String>,
    /// Source text of the record, without its terminator
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartRecord,
    StartField,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Split source text into records.
///
/// Quoted fields may contain separators, doubled quotes and line breaks
/// (line breaks inside a field are normalized to `\n`). A quote inside an
/// unquoted field is literal. Text after a closing quote is appended to the
/// field. A blank line yields a record with no fields. An unterminated quoted
/// field runs to the end of input.
pub fn read_records(source: &str) -> Vec<CsvRecord> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::StartRecord;

    let mut line = 1;
    let mut record_line = 1;
    let mut record_start = 0;

    let mut chars = source.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        let newline = c == '\n' || c == '\r';
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
        }
        let next_pos = chars.peek().map_or(source.len(), |(p, _)| *p);
        if newline {
            line += 1;
        }

        let ends_record = match state {
            State::StartRecord if newline => true,
            State::StartRecord | State::StartField if c == QUOTE => {
                state = State::Quoted;
                false
            }
            State::StartRecord | State::StartField | State::Unquoted => {
                if c == DELIMITER {
                    fields.push(std::mem::take(&mut field));
                    state = State::StartField;
                    false
                } else if newline {
                    fields.push(std::mem::take(&mut field));
                    true
                } else {
                    field.push(c);
                    state = State::Unquoted;
                    false
                }
            }
            State::Quoted => {
                if c == QUOTE {
                    state = State::QuoteInQuoted;
                } else if newline {
                    field.push('\n');
                } else {
                    field.push(c);
                }
                false
            }
            State::QuoteInQuoted => {
                if c == QUOTE {
                    field.push(QUOTE);
                    state = State::Quoted;
                    false
                } else if c == DELIMITER {
                    fields.push(std::mem::take(&mut field));
                    state = State::StartField;
                    false
                } else if newline {
                    fields.push(std::mem::take(&mut field));
                    true
                } else {
                    field.push(c);
                    state = State::Unquoted;
                    false
                }
            }
        };

        if ends_record {
            records.push(CsvRecord {
                line: record_line,
                fields: std::mem::take(&mut fields),
                raw: source[record_start..pos].to_string(),
            });
            state = State::StartRecord;
            record_start = next_pos;
            record_line = line;
        }
    }

    if state != State::StartRecord {
        fields.push(field);
        records.push(CsvRecord {
            line: record_line,
            fields,
            raw: source[record_start..].to_string(),
        });
    }

    records
}

/// Whether a field must be wrapped in quotes to survive a round trip
pub fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\r', '\n'])
}

/// Append one row, including its terminator, to `out`
pub fn write_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        let field = field.as_ref();
        if needs_quoting(field) {
            out.push(QUOTE);
            out.push_str(&field.replace(QUOTE, "\"\""));
            out.push(QUOTE);
        } else {
            out.push_str(field);
        }
    }
    out.push_str(ROW_TERMINATOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(source: &str) -> Vec<Vec<String>> {
        read_records(source).into_iter().map(|r| r.fields).collect()
    }

    #[test]
    fn plain_rows_with_either_terminator() {
        assert_eq!(
            fields("id,title,completed\r\n1,Buy milk,False\n2,Walk,True"),
            vec![
                vec!["id", "title", "completed"],
                vec!["1", "Buy milk", "False"],
                vec!["2", "Walk", "True"],
            ]
        );
    }

    #[test]
    fn quoted_fields() {
        let source = "1,\"Eggs, bacon\",False\r\n2,\"Say \"\"hi\"\"\",True\r\n";
        assert_eq!(
            fields(source),
            vec![
                vec!["1", "Eggs, bacon", "False"],
                vec!["2", "Say \"hi\"", "True"],
            ]
        );
    }

    #[test]
    fn quoted_field_spans_lines() {
        let records = read_records("1,\"two\r\nlines\",False\r\n2,next,True\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields[1], "two\nlines");
        assert_eq!(records[0].line, 1);
        assert_eq!(records[0].raw, "1,\"two\r\nlines\",False");
        assert_eq!(records[1].line, 3);
        assert_eq!(records[1].raw, "2,next,True");
    }

    #[test]
    fn blank_line_is_empty_record() {
        let records = read_records("a,b\r\n\r\nc,d\r\n");
        assert_eq!(records.len(), 3);
        assert!(records[1].fields.is_empty());
        assert_eq!(records[1].line, 2);
        assert_eq!(records[2].line, 3);
    }

    #[test]
    fn trailing_delimiter_adds_empty_field() {
        assert_eq!(fields("a,\n"), vec![vec!["a", ""]]);
        assert_eq!(fields("a,"), vec![vec!["a", ""]]);
    }

    #[test]
    fn stray_quotes() {
        assert_eq!(fields("ab\"c,d\n"), vec![vec!["ab\"c", "d"]]);
        assert_eq!(fields("\"ab\"c,d\n"), vec![vec!["abc", "d"]]);
        assert_eq!(fields("\"open,end"), vec![vec!["open,end"]]);
    }

    #[test]
    fn empty_source_has_no_records() {
        assert!(read_records("").is_empty());
    }

    #[test]
    fn write_quotes_only_when_needed() {
        let mut out = String::new();
        write_record(&mut out, &["1", "plain", "False"]);
        write_record(&mut out, &["2", "a,b", "True"]);
        write_record(&mut out, &["3", "say \"x\"", "False"]);
        write_record(&mut out, &["4", "multi\nline", "False"]);
        assert_eq!(
            out,
            "1,plain,False\r\n2,\"a,b\",True\r\n3,\"say \"\"x\"\"\",False\r\n4,\"multi\nline\",False\r\n"
        );
    }

    #[test]
    fn written_rows_read_back() {
        let titles = ["", " padded ", "a,b", "\"", "x\ny", "ünïcödé"];
        let mut out = String::new();
        for t in titles {
            write_record(&mut out, &["1", t, "True"]);
        }
        let read: Vec<String> = read_records(&out)
            .into_iter()
            .map(|r| r.fields[1].clone())
            .collect();
        assert_eq!(read, titles);
    }
}
