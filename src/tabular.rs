//! LIST, TAB1 and TAB2 payload decoders.

use ndarray::{Array, Array2, ArrayView1};

use super::error::EndfError;
use super::util::{parse_int_row, parse_real_row_buf};

/// Source of 66-column content payloads within one section.
///
/// The section parser implements this with record-identity checking;
/// tests drive the decoders from plain payload lists.
pub trait PayloadSource {
    /// Produce the next content payload.
    fn next_payload(&mut self) -> Result<String, EndfError>;
}

///
/// Read a LIST body: `ceil(nc/6)` payloads of six reals each,
/// truncated to `nc` values. Empty trailing fields read as zero.
///
pub fn read_list<S>(source: &mut S, nc: i32) -> Result<Vec<f64>, EndfError>
where
    S: PayloadSource,
{
    let nc = element_count(nc)?;
    let mut raw: Vec<f64> = Vec::with_capacity(lines_for(nc, 6) * 6);
    let mut tmp = String::new();
    for _ in 0..lines_for(nc, 6) {
        let payload = source.next_payload()?;
        parse_real_row_buf(&payload, &mut raw, &mut tmp)?;
    }
    raw.truncate(nc);
    Ok(raw)
}

/// TAB1 record body - one-dimensional interpolated table
///
/// As defined in Section 0.6.3.7 of the ENDF-6 Formats Manual. The
/// leading CONT image belongs to the enclosing section schema; this
/// holds the `NR` interpolation ranges and `NP` tabulated points that
/// follow it.
#[derive(Debug, Clone)]
pub struct Tab1 {
    /// NBT: upper point index of each interpolation range
    pub NBT: Vec<i32>,
    /// INT: interpolation scheme number of each range
    pub INT: Vec<i32>,
    /// Tabulated data, one `(x, y)` row per point
    pub data: Array2<f64>,
}

impl Tab1 {
    /// Read a TAB1 body of `nr` interpolation ranges and `np` points:
    /// `ceil(nr/3)` integer-pair payloads followed by `ceil(np/3)`
    /// real-pair payloads, each truncated to its declared count.
    pub fn read_from<S>(source: &mut S, nr: i32, np: i32) -> Result<Tab1, EndfError>
    where
        S: PayloadSource,
    {
        let (NBT, INT) = read_interpolation(source, nr)?;

        let np = element_count(np)?;
        let mut raw: Vec<f64> = Vec::with_capacity(lines_for(np * 2, 6) * 6);
        let mut tmp = String::new();
        for _ in 0..lines_for(np * 2, 6) {
            let payload = source.next_payload()?;
            parse_real_row_buf(&payload, &mut raw, &mut tmp)?;
        }
        raw.truncate(np * 2);
        let data = Array::from_shape_vec((np, 2), raw)
            .map_err(|_| EndfError::BadFraming("short TAB1 point table".to_owned()))?;

        Ok(Tab1 { NBT, INT, data })
    }

    /// Number of interpolation ranges.
    pub fn nr(&self) -> usize {
        self.NBT.len()
    }

    /// Number of tabulated points.
    pub fn np(&self) -> usize {
        self.data.nrows()
    }

    /// View of the X column.
    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.data.column(0)
    }

    /// View of the Y column.
    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.data.column(1)
    }
}

/// TAB2 record body - the interpolation prelude of a two-dimensional
/// table
///
/// As defined in Section 0.6.3.8 of the ENDF-6 Formats Manual. The
/// sub-tables that follow the prelude are owned by the enclosing
/// section schema.
#[derive(Debug, Clone)]
pub struct Tab2 {
    /// NBT: upper slice index of each interpolation range
    pub NBT: Vec<i32>,
    /// INT: interpolation scheme number of each range
    pub INT: Vec<i32>,
}

impl Tab2 {
    /// Read a TAB2 interpolation prelude of `nr` ranges.
    pub fn read_from<S>(source: &mut S, nr: i32) -> Result<Tab2, EndfError>
    where
        S: PayloadSource,
    {
        let (NBT, INT) = read_interpolation(source, nr)?;
        Ok(Tab2 { NBT, INT })
    }
}

// NBT/INT come interleaved, three pairs per payload.
fn read_interpolation<S>(source: &mut S, nr: i32) -> Result<(Vec<i32>, Vec<i32>), EndfError>
where
    S: PayloadSource,
{
    let nr = element_count(nr)?;
    let mut pairs: Vec<i32> = Vec::with_capacity(lines_for(nr * 2, 6) * 6);
    for _ in 0..lines_for(nr * 2, 6) {
        let payload = source.next_payload()?;
        parse_int_row(&payload, &mut pairs)?;
    }
    pairs.truncate(nr * 2);

    let mut NBT = Vec::with_capacity(nr);
    let mut INT = Vec::with_capacity(nr);
    for pair in pairs.chunks(2) {
        NBT.push(pair[0]);
        INT.push(pair[1]);
    }
    Ok((NBT, INT))
}

fn element_count(n: i32) -> Result<usize, EndfError> {
    usize::try_from(n).map_err(|_| EndfError::BadSchema(format!("negative element count {n}")))
}

// ceil of integer division
fn lines_for(n: usize, per_line: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 + (n - 1) / per_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Payloads(Vec<String>);

    impl PayloadSource for Payloads {
        fn next_payload(&mut self) -> Result<String, EndfError> {
            if self.0.is_empty() {
                return Err(EndfError::BadFraming("payloads exhausted".to_owned()));
            }
            Ok(self.0.remove(0))
        }
    }

    fn reals(values: &[&str]) -> String {
        let mut payload = String::new();
        for v in values {
            payload.push_str(&format!("{v:>11}"));
        }
        format!("{payload:<66}")
    }

    fn ints(values: &[i32]) -> String {
        let mut payload = String::new();
        for v in values {
            payload.push_str(&format!("{v:>11}"));
        }
        format!("{payload:<66}")
    }

    #[test]
    fn list_truncates_padding() {
        let mut source = Payloads(vec![
            reals(&["1.0+0", "2.0+0", "3.0+0", "4.0+0", "5.0+0", "6.0+0"]),
            reals(&["7.0+0"]),
        ]);
        let list = read_list(&mut source, 7).unwrap();
        assert_eq!(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], list);
    }

    #[test]
    fn empty_list_reads_nothing() {
        let mut source = Payloads(vec![]);
        assert!(read_list(&mut source, 0).unwrap().is_empty());
    }

    #[test]
    fn tab1_length_law() {
        // NR=2 ranges, NP=4 points over two payloads
        let mut source = Payloads(vec![
            ints(&[2, 2, 4, 5]),
            reals(&["1.0-5", "1.0+0", "2.0+0", "4.0+0", "3.0+0", "9.0+0"]),
            reals(&["2.0+7", "1.6+1"]),
        ]);
        let tab = Tab1::read_from(&mut source, 2, 4).unwrap();
        assert_eq!(2, tab.nr());
        assert_eq!(tab.NBT.len(), tab.INT.len());
        assert_eq!(4, tab.np());
        assert_eq!(tab.x().len(), tab.y().len());
        assert_eq!(vec![2, 4], tab.NBT);
        assert_eq!(vec![2, 5], tab.INT);
        assert_eq!(2.0e7, tab.x()[3]);
        assert_eq!(16.0, tab.y()[3]);
    }

    #[test]
    fn negative_count_is_bad_schema() {
        let mut source = Payloads(vec![]);
        assert!(matches!(
            read_list(&mut source, -1),
            Err(EndfError::BadSchema(_))
        ));
    }

    #[test]
    fn tab2_prelude() {
        let mut source = Payloads(vec![ints(&[10, 2])]);
        let tab = Tab2::read_from(&mut source, 1).unwrap();
        assert_eq!(vec![10], tab.NBT);
        assert_eq!(vec![2], tab.INT);
    }
}
