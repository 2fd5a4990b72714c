//! Field-level decoding: the ENDF real dialect and the six-field
//! 11-column rows every body record is built from.

use super::error::EndfError;

///
/// Parse ENDF real format into an `f64`.
///
/// The canonical encoding carries a signed exponent with no `E` marker
/// (` 9.423900+4`), FORTRAN `D` exponents appear in older evaluations,
/// and an empty field means zero.
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use endfdb::parse_real;
/// assert_eq!(9.4239e+4, parse_real(" 9.423900+4").unwrap());
/// assert_eq!(1.0e-3, parse_real("     1.0D-3").unwrap());
/// assert_eq!(0.0, parse_real("           ").unwrap());
/// ```
///
pub fn parse_real(s: &str) -> Result<f64, EndfError> {
    let mut buf = String::new();
    parse_real_buf(s, &mut buf)
}

/// Parse ENDF real format reusing a scratch buffer
pub fn parse_real_buf(s: &str, buf: &mut String) -> Result<f64, EndfError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }

    buf.truncate(0);
    for c in s.chars() {
        buf.push(match c {
            'D' | 'd' => 'E',
            c => c,
        });
    }

    if !buf.contains(['e', 'E']) {
        // exponent marker omitted: splice one in before the last sign
        // of the mantissa, skipping a sign in the leading position
        if let Some(pos) = buf.rfind(['+', '-']).filter(|&pos| pos > 0) {
            buf.insert(pos, 'E');
        }
    }

    let value: f64 = buf
        .parse()
        .map_err(|_| EndfError::BadFloat(s.to_owned()))?;
    if !value.is_finite() {
        return Err(EndfError::BadFloat(s.to_owned()));
    }
    Ok(value)
}

///
/// Split a 66-column payload into its six 11-column fields.
///
/// Columns are character positions: Latin-1 text decodes one char per
/// column, so descriptive text cannot skew field boundaries. Anything
/// past column 66 (the record identity) is ignored.
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use endfdb::fields;
///
/// const PAYLOAD: &str = concat!(
///     " 1.000000-5 3.000000+0 2.000000+7",
///     " 4.000000+0                      ");
///
/// assert_eq!(" 2.000000+7", fields(PAYLOAD)[2]);
/// assert_eq!("           ", fields(PAYLOAD)[4]);
/// ```
///
pub fn fields(payload: &str) -> [&str; 6] {
    let mut bounds = [payload.len(); 7];
    for (n, (i, _)) in payload.char_indices().enumerate() {
        if n % 11 == 0 {
            bounds[n / 11] = i;
            if n / 11 == 6 {
                break;
            }
        }
    }
    [
        &payload[bounds[0]..bounds[1]],
        &payload[bounds[1]..bounds[2]],
        &payload[bounds[2]..bounds[3]],
        &payload[bounds[3]..bounds[4]],
        &payload[bounds[4]..bounds[5]],
        &payload[bounds[5]..bounds[6]],
    ]
}

/// Parse a signed integer field; an empty field decodes to zero.
pub fn parse_int(s: &str) -> Result<i32, EndfError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    Ok(s.parse()?)
}

///
/// Decode one payload of six reals into a provided buffer, empty
/// fields reading as zero.
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use endfdb::parse_real_row;
///
/// const REALS_EXAMPLE: &str = concat!(
///     " 6.15077-10 1.41078-10 1.323138-8",
///     " 1.205944-8 1.093930-8 9.896124-9",
///     "943735 18 6342");
///
/// let mut buf: Vec<f64> = Vec::new();
/// parse_real_row(REALS_EXAMPLE, &mut buf).unwrap();
///
/// let expect = vec![
///     6.15077e-10, 1.41078e-10, 1.323138e-8,
///     1.205944e-8, 1.093930e-8, 9.896124e-9];
///
/// assert_eq!(expect, buf);
/// ```
///
pub fn parse_real_row(payload: &str, buf: &mut Vec<f64>) -> Result<(), EndfError> {
    let mut tmp = String::new();
    parse_real_row_buf(payload, buf, &mut tmp)
}

/// Decode a row of reals using a scratch buffer
pub fn parse_real_row_buf(
    payload: &str,
    buf: &mut Vec<f64>,
    tmp: &mut String,
) -> Result<(), EndfError> {
    for w in fields(payload) {
        buf.push(parse_real_buf(w, tmp)?);
    }
    Ok(())
}

///
/// Decode one payload of six integers into a provided buffer, empty
/// fields reading as zero.
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use endfdb::parse_int_row;
///
/// const INTS_EXAMPLE: &str = concat!(
///     "          1          2          3",
///     "                                 ",
///     "943735 18 6342");
///
/// let mut buf: Vec<i32> = Vec::new();
/// parse_int_row(INTS_EXAMPLE, &mut buf).unwrap();
///
/// assert_eq!(vec![1, 2, 3, 0, 0, 0], buf);
/// ```
///
pub fn parse_int_row(payload: &str, buf: &mut Vec<i32>) -> Result<(), EndfError> {
    for w in fields(payload) {
        buf.push(parse_int(w)?);
    }
    Ok(())
}
