//! Buffered record source with single-record lookahead.

use ::std::io::BufRead;

use super::error::EndfError;
use super::record::Record;

///
/// Lexes an ISO-8859-1 tape stream into [`Record`]s.
///
/// Lines are read as raw bytes (Latin-1 maps one byte per column), so
/// a tape never fails to decode for encoding reasons. Blank lines are
/// skipped; one record of lookahead backs the peek-based tape driver.
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use endfdb::RecordReader;
/// use std::fs::File;
/// use std::io::BufReader;
///
/// # fn foo() -> Result<(), endfdb::EndfError> {
/// let file = File::open("input.dat")?;
/// let mut reader = RecordReader::new(BufReader::new(file));
/// while let Some(rec) = reader.next_record()? {
///     println!("MAT={} MF={} MT={}", rec.MAT, rec.MF, rec.MT);
/// }
/// # Ok(()) }
/// ```
///
pub struct RecordReader<R> {
    source: R,
    peeked: Option<Record>,
    line: Vec<u8>,
    line_no: u64,
}

impl<R: BufRead> RecordReader<R> {
    /// Wrap a byte source.
    pub fn new(source: R) -> RecordReader<R> {
        RecordReader {
            source,
            peeked: None,
            line: Vec::new(),
            line_no: 0,
        }
    }

    /// 1-based number of the most recently read line, for diagnostics.
    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    /// Look at the next record without consuming it.
    pub fn peek(&mut self) -> Result<Option<&Record>, EndfError> {
        if self.peeked.is_none() {
            self.peeked = self.read_record()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Consume and return the next record; `None` at end of stream.
    pub fn next_record(&mut self) -> Result<Option<Record>, EndfError> {
        if let Some(rec) = self.peeked.take() {
            return Ok(Some(rec));
        }
        self.read_record()
    }

    fn read_record(&mut self) -> Result<Option<Record>, EndfError> {
        loop {
            self.line.truncate(0);
            if self.source.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            while matches!(self.line.last(), Some(b'\n') | Some(b'\r')) {
                self.line.pop();
            }
            if self.line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return match Record::from_bytes(&self.line) {
                Ok(rec) => Ok(Some(rec)),
                Err(EndfError::BadFraming(msg)) => Err(EndfError::BadFraming(format!(
                    "line {}: {}",
                    self.line_no, msg
                ))),
                Err(err) => Err(err),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(content: &str, mat: i32, mf: i32, mt: i32, ns: i32) -> String {
        format!("{content:<66}{mat:>4}{mf:>2}{mt:>3}{ns:>5}\n")
    }

    #[test]
    fn skips_blank_lines() {
        let tape = format!("\n{}   \n{}", line("a", 1, 1, 451, 1), line("b", 1, 1, 451, 2));
        let mut reader = RecordReader::new(tape.as_bytes());
        assert_eq!(Some(1), reader.next_record().unwrap().unwrap().NS);
        assert_eq!(Some(2), reader.next_record().unwrap().unwrap().NS);
        assert!(reader.next_record().unwrap().is_none());
        assert_eq!(4, reader.line_no());
    }

    #[test]
    fn peek_does_not_consume() {
        let tape = line("x", 9437, 3, 18, 1);
        let mut reader = RecordReader::new(tape.as_bytes());
        assert_eq!(9437, reader.peek().unwrap().unwrap().MAT);
        assert_eq!(9437, reader.next_record().unwrap().unwrap().MAT);
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn latin1_survives() {
        let content = format!(" caf{} au lait", 0xe9 as char);
        let mut bytes: Vec<u8> = content.chars().map(|c| c as u8).collect();
        bytes.resize(66, b' ');
        bytes.extend_from_slice(b"9437 1451    7\n");
        let mut reader = RecordReader::new(&bytes[..]);
        let rec = reader.next_record().unwrap().unwrap();
        assert!(rec.content.starts_with(" caf\u{e9} au lait"));
    }

    #[test]
    fn framing_errors_carry_line_numbers() {
        let tape = format!("{}short\n", line("ok", 1, 1, 451, 1));
        let mut reader = RecordReader::new(tape.as_bytes());
        reader.next_record().unwrap();
        match reader.next_record() {
            Err(EndfError::BadFraming(msg)) => assert!(msg.starts_with("line 2:")),
            other => panic!("expected framing error, got {other:?}"),
        }
    }
}
