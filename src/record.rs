//! Record lexing: fixed-column slicing of one 80-column tape line and
//! terminator classification.

use super::error::EndfError;
use super::util::{fields, parse_int, parse_real_buf};

/// Structural role of a record within a tape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Tape identification, the first record of every tape
    Tpid,
    /// First record of a section
    Head,
    /// Section terminator (`MT=0` with `MF,MAT > 0`, or `NS=99999`)
    Send,
    /// File terminator (`MT=0, MF=0, MAT>0, NS!=99999`)
    Fend,
    /// Material terminator (`MAT=0, MF=0, MT=0`)
    Mend,
    /// Tape terminator (`MAT=-1, MF=0, MT=0`)
    Tend,
    /// Any other record
    Body,
}

///
/// One decoded tape line: 66 columns of content plus the MAT/MF/MT
/// identity and an optional sequence number.
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use endfdb::Record;
///
/// const CONT_RECORD: &str = concat!(
///     " 9.423900+4 2.369986+2          1",
///     "          1          0          5",
///     "9437 1451    1");
///
/// let rec = Record::from_bytes(CONT_RECORD.as_bytes())
///         .expect("could not parse cont record");
/// assert_eq!((9437, 1, 451), (rec.MAT, rec.MF, rec.MT));
/// assert_eq!(
///     (9.423900e+4, 2.369986e+2, 1, 1, 0, 5),
///     rec.cont().expect("could not decode cont fields"));
/// ```
///
#[derive(Debug, Clone)]
pub struct Record {
    /// Verbatim 66-column content payload
    pub content: String,
    /// MAT: material identifier
    pub MAT: i32,
    /// MF: file number
    pub MF: i32,
    /// MT: section number
    pub MT: i32,
    /// NS: optional sequence number
    pub NS: Option<i32>,
    kind: RecordKind,
}

impl Record {
    /// Decode a raw tape line. Columns are fixed: content `[0,66)`,
    /// MAT `[66,70)`, MF `[70,72)`, MT `[72,75)`, NS `[75,80)`; bytes
    /// beyond column 80 are ignored.
    pub fn from_bytes(line: &[u8]) -> Result<Record, EndfError> {
        if line.len() < 75 {
            return Err(EndfError::BadFraming(format!(
                "record is {} columns, at least 75 required",
                line.len()
            )));
        }
        let content = latin1(&line[..66]);
        let MAT = ident_field(&line[66..70], "MAT")?;
        let MF = ident_field(&line[70..72], "MF")?;
        let MT = ident_field(&line[72..75], "MT")?;
        let NS = ::std::str::from_utf8(&line[75..line.len().min(80)])
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let mut rec = Record {
            content,
            MAT,
            MF,
            MT,
            NS,
            kind: RecordKind::Body,
        };
        rec.kind = rec.classify();
        Ok(rec)
    }

    /// Structural role derived from the identity fields
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub(crate) fn mark(&mut self, kind: RecordKind) {
        self.kind = kind;
    }

    /// Decode the content payload as a CONT image
    /// `(C1, C2, L1, L2, N1, N2)`; empty fields decode to zero.
    pub fn cont(&self) -> Result<(f64, f64, i32, i32, i32, i32), EndfError> {
        let f = fields(&self.content);
        let mut tmp = String::new();
        Ok((
            parse_real_buf(f[0], &mut tmp)?,
            parse_real_buf(f[1], &mut tmp)?,
            parse_int(f[2])?,
            parse_int(f[3])?,
            parse_int(f[4])?,
            parse_int(f[5])?,
        ))
    }

    /// True for a section terminator
    pub fn is_send(&self) -> bool {
        self.kind == RecordKind::Send
    }
    /// True for a file terminator
    pub fn is_fend(&self) -> bool {
        self.kind == RecordKind::Fend
    }
    /// True for a material terminator
    pub fn is_mend(&self) -> bool {
        self.kind == RecordKind::Mend
    }
    /// True for the tape terminator
    pub fn is_tend(&self) -> bool {
        self.kind == RecordKind::Tend
    }
    /// True for any of SEND, FEND, MEND, TEND
    pub fn is_terminator(&self) -> bool {
        matches!(
            self.kind,
            RecordKind::Send | RecordKind::Fend | RecordKind::Mend | RecordKind::Tend
        )
    }

    // A terminator must carry an all-zero CONT image; anything else in
    // the content keeps the record a body record.
    fn classify(&self) -> RecordKind {
        let all_zero = match self.cont() {
            Ok((c1, c2, l1, l2, n1, n2)) => {
                c1 == 0.0 && c2 == 0.0 && l1 == 0 && l2 == 0 && n1 == 0 && n2 == 0
            }
            Err(_) => false,
        };
        if !all_zero {
            return RecordKind::Body;
        }
        if self.MT == 0 && self.MF == 0 && self.MAT == -1 {
            RecordKind::Tend
        } else if self.MT == 0 && self.MF == 0 && self.MAT == 0 {
            RecordKind::Mend
        } else if self.MT == 0 && self.MF == 0 && self.MAT > 0 && self.NS != Some(99_999) {
            RecordKind::Fend
        } else if (self.MT == 0 && self.MF > 0 && self.MAT > 0) || self.NS == Some(99_999) {
            RecordKind::Send
        } else {
            RecordKind::Body
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn ident_field(bytes: &[u8], name: &str) -> Result<i32, EndfError> {
    let s = ::std::str::from_utf8(bytes)
        .map_err(|_| EndfError::BadFraming(format!("{name} field is not numeric")))?
        .trim();
    if s.is_empty() {
        return Err(EndfError::BadFraming(format!("{name} field is blank")));
    }
    s.parse()
        .map_err(|_| EndfError::BadFraming(format!("bad {name} field {s:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(content: &str, mat: i32, mf: i32, mt: i32, ns: i32) -> String {
        format!("{content:<66}{mat:>4}{mf:>2}{mt:>3}{ns:>5}")
    }

    #[test]
    fn identity_slices() {
        let rec = Record::from_bytes(line("", 9437, 3, 18, 42).as_bytes()).unwrap();
        assert_eq!((9437, 3, 18, Some(42)), (rec.MAT, rec.MF, rec.MT, rec.NS));
    }

    #[test]
    fn sequence_number_is_optional() {
        let text = format!("{:<66}{:>4}{:>2}{:>3}", "", 9437, 3, 18);
        let rec = Record::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(None, rec.NS);
    }

    #[test]
    fn short_record_is_bad_framing() {
        let err = Record::from_bytes(b"too short").unwrap_err();
        assert!(matches!(err, EndfError::BadFraming(_)));
    }

    #[test]
    fn blank_identity_is_bad_framing() {
        let text = format!("{:<66}{:>4}{:>2}{:>3}{:>5}", "", "", 3, 18, 1);
        let err = Record::from_bytes(text.as_bytes()).unwrap_err();
        assert!(matches!(err, EndfError::BadFraming(_)));
    }

    #[test]
    fn terminator_classification() {
        let tend = Record::from_bytes(line("", -1, 0, 0, 0).as_bytes()).unwrap();
        assert_eq!(RecordKind::Tend, tend.kind());

        let mend = Record::from_bytes(line("", 0, 0, 0, 0).as_bytes()).unwrap();
        assert_eq!(RecordKind::Mend, mend.kind());

        let fend = Record::from_bytes(line("", 9437, 0, 0, 0).as_bytes()).unwrap();
        assert_eq!(RecordKind::Fend, fend.kind());

        let send = Record::from_bytes(line("", 9437, 3, 0, 99999).as_bytes()).unwrap();
        assert_eq!(RecordKind::Send, send.kind());
    }

    #[test]
    fn nonzero_cont_stays_body() {
        // MT=0 but a live CONT image: not a terminator
        let content = format!("{:>11}{:>55}", "1.0+0", "");
        let rec = Record::from_bytes(line(&content, 9437, 0, 0, 7).as_bytes()).unwrap();
        assert_eq!(RecordKind::Body, rec.kind());
    }

    #[test]
    fn text_content_stays_body() {
        let rec =
            Record::from_bytes(line(" 94-Pu-239 LANL", 9437, 1, 451, 5).as_bytes()).unwrap();
        assert_eq!(RecordKind::Body, rec.kind());
    }
}
