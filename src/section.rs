//! Section parsing: one HEAD record through the terminating SEND, for
//! every supported (MF, MT) schema.

use ::std::io::BufRead;

use log::debug;

use super::error::EndfError;
use super::reader::RecordReader;
use super::record::Record;
use super::tabular::{read_list, PayloadSource, Tab1};

/// Descriptive data and directory section `MF=1, MT=451`
///
/// This section is described in Chapter 1.1 of ENDF-6 Formats Manual
#[derive(Debug, Clone)]
pub struct DescriptionCard {
    /// `(Z, A)` Designation of the original nuclide. `ZA = 1000 * Z + A`
    pub ZA: f64,
    /// AWR: Ratio of mass of atom (or molecule) to that of the neutron.
    pub AWR: f64,
    /// LRP: Indicates whether resolved and/or unresolved
    /// resonance parameters given in File 2.
    pub LRP: i32,
    /// LFI: Indicates whether this material is fissionable.
    pub LFI: i32,
    /// NLIB: Library identifier.
    pub NLIB: i32,
    /// NMOD: Modification number.
    pub NMOD: i32,

    /// ELIS: Excitation energy of the target nucleus.
    pub ELIS: f64,
    /// STA: Target stability flag.
    pub STA: f64,
    /// LIS: State number of the target nucleus.
    pub LIS: i32,
    /// LISO: Isomeric state number of the target nucleus.
    pub LISO: i32,
    /// NFOR: Library format.
    pub NFOR: i32,

    /// AWI: Projectile mass in neutron units.
    pub AWI: f64,
    /// EMAX: Upper limit of energy range for evaluation.
    pub EMAX: f64,
    /// LREL: Release number.
    pub LREL: i32,
    /// NSUB: Sub-library number.
    pub NSUB: i32,
    /// NVER: Library version number.
    pub NVER: i32,

    /// TEMP: Target temperature.
    pub TEMP: f64,
    /// LDRV: Distinguishes between different evaluations
    /// with the same material keys.
    pub LDRV: i32,
    /// NWD: Number of text records.
    pub NWD: i32,
    /// NXC: Number of entries in the directory.
    pub NXC: i32,

    /// Text records joined by newlines.
    pub desc: String,
    /// Directory of the sections present in this material. May be
    /// shorter than NXC when the section carries an early SEND.
    pub directory: Vec<DirectoryEntry>,
}

/// Section directory descriptor
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// MF: File number.
    pub MF: i32,
    /// MT: Reaction type number.
    pub MT: i32,
    /// NC: Number of records in the section.
    pub NC: i32,
    /// MOD: Modification indicator.
    pub MOD: i32,
}

/// Polynomial neutron yield `MF=1, MT=452|456` with `LNU=1`
#[derive(Debug, Clone)]
pub struct YieldPolynomial {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// Polynomial coefficients
    pub C: Vec<f64>,
}

/// Tabulated neutron yield `MF=1, MT=452|456` with `LNU=2`
#[derive(Debug, Clone)]
pub struct YieldTable {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// Yield versus incident energy
    pub table: Tab1,
}

/// Delayed neutron data `MF=1, MT=455` with `LDG=0, LNU=1`
#[derive(Debug, Clone)]
pub struct DelayedConstant {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// Decay constant per precursor family
    pub lambda: Vec<f64>,
    /// Total delayed yield (a one-element list)
    pub Vd: Vec<f64>,
}

/// Delayed neutron data `MF=1, MT=455` with `LDG=0, LNU=2`
#[derive(Debug, Clone)]
pub struct DelayedTable {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// Decay constant per precursor family
    pub lambda: Vec<f64>,
    /// Delayed yield versus incident energy
    pub table: Tab1,
}

/// Components of fission energy release `MF=1, MT=458`
///
/// This section is described in Chapter 1.5 of ENDF-6 Formats Manual
#[derive(Debug, Clone)]
pub struct EnergyRelease {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// NPLY: Polynomial expansion order
    pub NPLY: i32,
    /// Energy release components and their uncertainties
    pub C: Vec<f64>,
    /// Tabulated components, present when `LFC=1`
    pub components: Vec<EnergyComponent>,
}

/// One tabulated component of fission energy release (`LFC=1`)
#[derive(Debug, Clone)]
pub struct EnergyComponent {
    /// LDRV: Derived quantity flag
    pub LDRV: i32,
    /// IFC: Component index
    pub IFC: i32,
    /// Energy release versus incident energy
    pub table: Tab1,
}

/// Discrete delayed photon data `MF=1, MT=460` with `LO=1`
///
/// This section is described in Chapter 1.6 of ENDF-6 Formats Manual
#[derive(Debug, Clone)]
pub struct PhotonDiscrete {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// One entry per discrete photon
    pub groups: Vec<PhotonGroup>,
}

/// One discrete photon group (`LO=1`)
#[derive(Debug, Clone)]
pub struct PhotonGroup {
    /// E: Photon energy
    pub E: f64,
    /// iNG: Index of this photon
    pub iNG: i32,
    /// Multiplicity versus time
    pub table: Tab1,
}

/// Continuous delayed photon data `MF=1, MT=460` with `LO=2`
#[derive(Debug, Clone)]
pub struct PhotonContinuous {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// Decay constant per precursor family
    pub lambda: Vec<f64>,
}

/// Reaction cross section `MF=3`
///
/// This section is described in Chapter 3 of ENDF-6 Formats Manual
#[derive(Debug, Clone)]
pub struct CrossSection {
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// QM: Mass-difference Q value
    pub QM: f64,
    /// QI: Reaction Q value for the lowest-lying state
    pub QI: f64,
    /// LR: Complex-breakup flag
    pub LR: i32,
    /// Cross section versus incident energy
    pub table: Tab1,
}

/// Decoded payload of one section, tagged per (MF, MT) schema
#[derive(Debug, Clone)]
pub enum SectionBody {
    /// `MF=1 MT=451`: descriptive data and directory
    Description(DescriptionCard),
    /// `MF=1 MT=452|456`, `LNU=1`: polynomial neutron yield
    YieldPolynomial(YieldPolynomial),
    /// `MF=1 MT=452|456`, `LNU=2`: tabulated neutron yield
    YieldTable(YieldTable),
    /// `MF=1 MT=455`, `LDG=0, LNU=1`: delayed neutrons, constant yield
    DelayedConstant(DelayedConstant),
    /// `MF=1 MT=455`, `LDG=0, LNU=2`: delayed neutrons, tabulated yield
    DelayedTable(DelayedTable),
    /// `MF=1 MT=458`: components of fission energy release
    EnergyRelease(EnergyRelease),
    /// `MF=1 MT=460`, `LO=1`: discrete delayed photons
    PhotonDiscrete(PhotonDiscrete),
    /// `MF=1 MT=460`, `LO=2`: continuous delayed photons
    PhotonContinuous(PhotonContinuous),
    /// `MF=3`: reaction cross section
    CrossSection(CrossSection),
    /// Unsupported (MF, MT): records drained to the SEND and discarded
    Unparsed,
}

/// One parsed section: identity plus its decoded payload
#[derive(Debug, Clone)]
pub struct Section {
    /// MAT of the owning material
    pub MAT: i32,
    /// MF of the owning file
    pub MF: i32,
    /// MT of this section
    pub MT: i32,
    /// Decoded payload
    pub body: SectionBody,
}

impl Section {
    /// False when the (MF, MT) layout is outside the supported set and
    /// the records were drained rather than decoded.
    pub fn parsed(&self) -> bool {
        !matches!(self.body, SectionBody::Unparsed)
    }

    /// Parse one section from its HEAD record through its SEND.
    ///
    /// Unsupported (MF, MT) layouts are not an error: their records
    /// are consumed up to the SEND and the section comes back
    /// [`SectionBody::Unparsed`].
    pub fn read_from<R>(head: Record, reader: &mut RecordReader<R>) -> Result<Section, EndfError>
    where
        R: BufRead,
    {
        let (MAT, MF, MT) = (head.MAT, head.MF, head.MT);
        let mut cursor = SectionCursor {
            reader,
            MAT,
            MF,
            MT,
        };

        let body = match (MF, MT) {
            (1, 451) => read_description(&head, &mut cursor)?,
            (1, 452) | (1, 456) => seal(read_neutron_yield(&head, &mut cursor), &mut cursor)?,
            (1, 455) => seal(read_delayed_neutrons(&head, &mut cursor), &mut cursor)?,
            (1, 458) => seal(read_energy_release(&head, &mut cursor), &mut cursor)?,
            (1, 460) => seal(read_delayed_photons(&head, &mut cursor), &mut cursor)?,
            (3, _) => seal(read_cross_section(&head, &mut cursor), &mut cursor)?,
            (mf, mt) => {
                debug!("skipping unsupported section MF={mf} MT={mt}");
                cursor.drain_to_send()?;
                SectionBody::Unparsed
            }
        };

        Ok(Section { MAT, MF, MT, body })
    }
}

// A supported schema must be followed by its SEND; a layout the
// decoders do not cover degrades to an unparsed section.
fn seal<R>(
    body: Result<SectionBody, EndfError>,
    cursor: &mut SectionCursor<'_, R>,
) -> Result<SectionBody, EndfError>
where
    R: BufRead,
{
    match body {
        Ok(body) => {
            cursor.expect_send()?;
            Ok(body)
        }
        Err(EndfError::NotImplemented { mf, mt }) => {
            debug!("skipping not-implemented layout MF={mf} MT={mt}");
            cursor.drain_to_send()?;
            Ok(SectionBody::Unparsed)
        }
        Err(err) => Err(err),
    }
}

fn read_description<R>(
    head: &Record,
    cursor: &mut SectionCursor<'_, R>,
) -> Result<SectionBody, EndfError>
where
    R: BufRead,
{
    let (ZA, AWR, LRP, LFI, NLIB, NMOD) = head.cont()?;
    let (ELIS, STA, LIS, LISO, _, NFOR) = cursor.next_cont()?;
    let (AWI, EMAX, LREL, _, NSUB, NVER) = cursor.next_cont()?;
    let (TEMP, _, LDRV, _, NWD, NXC) = cursor.next_cont()?;

    let mut desc = String::new();
    for _ in 0..NWD.max(0) {
        let rec = cursor.next_body()?;
        if !desc.is_empty() {
            desc.push('\n');
        }
        desc.push_str(&rec.content);
    }

    // The directory may be cut short by an early SEND.
    let mut directory = Vec::new();
    let mut terminated = false;
    for _ in 0..NXC.max(0) {
        match cursor.next_body_or_send()? {
            None => {
                terminated = true;
                break;
            }
            Some(rec) => {
                let (_, _, MF, MT, NC, MOD) = rec.cont()?;
                directory.push(DirectoryEntry { MF, MT, NC, MOD });
            }
        }
    }
    if !terminated {
        cursor.expect_send()?;
    }

    Ok(SectionBody::Description(DescriptionCard {
        ZA,
        AWR,
        LRP,
        LFI,
        NLIB,
        NMOD,
        ELIS,
        STA,
        LIS,
        LISO,
        NFOR,
        AWI,
        EMAX,
        LREL,
        NSUB,
        NVER,
        TEMP,
        LDRV,
        NWD,
        NXC,
        desc,
        directory,
    }))
}

fn read_neutron_yield<R>(
    head: &Record,
    cursor: &mut SectionCursor<'_, R>,
) -> Result<SectionBody, EndfError>
where
    R: BufRead,
{
    let (ZA, AWR, _, LNU, _, _) = head.cont()?;
    let (_, _, _, _, N1, N2) = cursor.next_cont()?;
    match LNU {
        1 => {
            let C = read_list(cursor, N1)?;
            Ok(SectionBody::YieldPolynomial(YieldPolynomial { ZA, AWR, C }))
        }
        2 => {
            let table = Tab1::read_from(cursor, N1, N2)?;
            Ok(SectionBody::YieldTable(YieldTable { ZA, AWR, table }))
        }
        _ => Err(EndfError::BadSchema(format!(
            "invalid LNU={LNU} for MF={} MT={}",
            head.MF, head.MT
        ))),
    }
}

fn read_delayed_neutrons<R>(
    head: &Record,
    cursor: &mut SectionCursor<'_, R>,
) -> Result<SectionBody, EndfError>
where
    R: BufRead,
{
    let (ZA, AWR, LDG, LNU, _, _) = head.cont()?;
    match LDG {
        0 => {}
        // energy-dependent precursor families
        1 => {
            return Err(EndfError::NotImplemented {
                mf: head.MF,
                mt: head.MT,
            })
        }
        _ => {
            return Err(EndfError::BadSchema(format!(
                "invalid LDG={LDG} for MF=1 MT=455"
            )))
        }
    }

    let (_, _, _, _, NNF, _) = cursor.next_cont()?;
    let lambda = read_list(cursor, NNF)?;
    let (_, _, _, _, NR, NP) = cursor.next_cont()?;
    match LNU {
        1 => {
            let Vd = read_list(cursor, 1)?;
            Ok(SectionBody::DelayedConstant(DelayedConstant {
                ZA,
                AWR,
                lambda,
                Vd,
            }))
        }
        2 => {
            let table = Tab1::read_from(cursor, NR, NP)?;
            Ok(SectionBody::DelayedTable(DelayedTable {
                ZA,
                AWR,
                lambda,
                table,
            }))
        }
        _ => Err(EndfError::BadSchema(format!(
            "invalid LNU={LNU} for MF=1 MT=455"
        ))),
    }
}

fn read_energy_release<R>(
    head: &Record,
    cursor: &mut SectionCursor<'_, R>,
) -> Result<SectionBody, EndfError>
where
    R: BufRead,
{
    let (ZA, AWR, _, LFC, _, NFC) = head.cont()?;
    let (_, _, _, NPLY, N1, _) = cursor.next_cont()?;
    let C = read_list(cursor, N1)?;

    let mut components = Vec::new();
    if LFC == 1 {
        for _ in 0..NFC.max(0) {
            let (_, _, LDRV, IFC, NR, NP) = cursor.next_cont()?;
            let table = Tab1::read_from(cursor, NR, NP)?;
            components.push(EnergyComponent { LDRV, IFC, table });
        }
    }

    Ok(SectionBody::EnergyRelease(EnergyRelease {
        ZA,
        AWR,
        NPLY,
        C,
        components,
    }))
}

fn read_delayed_photons<R>(
    head: &Record,
    cursor: &mut SectionCursor<'_, R>,
) -> Result<SectionBody, EndfError>
where
    R: BufRead,
{
    let (ZA, AWR, LO, _, NG, _) = head.cont()?;
    match LO {
        1 => {
            let mut groups = Vec::new();
            for _ in 0..NG.max(0) {
                let (E, _, iNG, _, NR, NP) = cursor.next_cont()?;
                let table = Tab1::read_from(cursor, NR, NP)?;
                groups.push(PhotonGroup { E, iNG, table });
            }
            Ok(SectionBody::PhotonDiscrete(PhotonDiscrete { ZA, AWR, groups }))
        }
        2 => {
            let (_, _, _, _, _, NNF) = cursor.next_cont()?;
            let lambda = read_list(cursor, NNF)?;
            Ok(SectionBody::PhotonContinuous(PhotonContinuous {
                ZA,
                AWR,
                lambda,
            }))
        }
        _ => Err(EndfError::BadSchema(format!(
            "invalid LO={LO} for MF=1 MT=460"
        ))),
    }
}

fn read_cross_section<R>(
    head: &Record,
    cursor: &mut SectionCursor<'_, R>,
) -> Result<SectionBody, EndfError>
where
    R: BufRead,
{
    let (ZA, AWR, _, _, _, _) = head.cont()?;
    let (QM, QI, _, LR, NR, NP) = cursor.next_cont()?;
    let table = Tab1::read_from(cursor, NR, NP)?;
    Ok(SectionBody::CrossSection(CrossSection {
        ZA,
        AWR,
        QM,
        QI,
        LR,
        table,
    }))
}

// Record source scoped to one section: every record read through it
// must carry the section's (MAT, MF, MT) identity.
struct SectionCursor<'a, R> {
    reader: &'a mut RecordReader<R>,
    MAT: i32,
    MF: i32,
    MT: i32,
}

impl<R: BufRead> SectionCursor<'_, R> {
    fn next(&mut self) -> Result<Record, EndfError> {
        match self.reader.next_record()? {
            Some(rec) => Ok(rec),
            None => Err(EndfError::BadFraming(format!(
                "end of tape inside section MAT={} MF={} MT={}",
                self.MAT, self.MF, self.MT
            ))),
        }
    }

    // None means the section's SEND was consumed.
    fn next_body_or_send(&mut self) -> Result<Option<Record>, EndfError> {
        let rec = self.next()?;
        if rec.is_send() {
            if rec.MAT != self.MAT || rec.MF != self.MF {
                return Err(EndfError::BadFraming(format!(
                    "SEND with MAT={} MF={} terminating section MAT={} MF={} MT={}",
                    rec.MAT, rec.MF, self.MAT, self.MF, self.MT
                )));
            }
            return Ok(None);
        }
        if rec.is_terminator() {
            return Err(EndfError::BadFraming(format!(
                "section MAT={} MF={} MT={} ended before its layout was complete",
                self.MAT, self.MF, self.MT
            )));
        }
        if (rec.MAT, rec.MF, rec.MT) != (self.MAT, self.MF, self.MT) {
            return Err(EndfError::BadFraming(format!(
                "record MAT={} MF={} MT={} inside section MAT={} MF={} MT={}",
                rec.MAT, rec.MF, rec.MT, self.MAT, self.MF, self.MT
            )));
        }
        Ok(Some(rec))
    }

    fn next_body(&mut self) -> Result<Record, EndfError> {
        match self.next_body_or_send()? {
            Some(rec) => Ok(rec),
            None => Err(EndfError::BadFraming(format!(
                "section MAT={} MF={} MT={} ended before its layout was complete",
                self.MAT, self.MF, self.MT
            ))),
        }
    }

    fn next_cont(&mut self) -> Result<(f64, f64, i32, i32, i32, i32), EndfError> {
        self.next_body()?.cont()
    }

    fn expect_send(&mut self) -> Result<(), EndfError> {
        let rec = self.next()?;
        if !rec.is_send() {
            return Err(EndfError::BadFraming(format!(
                "record where SEND expected after section MAT={} MF={} MT={}",
                self.MAT, self.MF, self.MT
            )));
        }
        Ok(())
    }

    fn drain_to_send(&mut self) -> Result<(), EndfError> {
        loop {
            let rec = self.next()?;
            if rec.is_send() {
                return Ok(());
            }
            if rec.is_terminator() {
                return Err(EndfError::BadFraming(format!(
                    "section MAT={} MF={} MT={} not terminated by SEND",
                    self.MAT, self.MF, self.MT
                )));
            }
        }
    }
}

impl<R: BufRead> PayloadSource for SectionCursor<'_, R> {
    fn next_payload(&mut self) -> Result<String, EndfError> {
        Ok(self.next_body()?.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;

    fn line(content: &str, mat: i32, mf: i32, mt: i32, ns: i32) -> String {
        format!("{content:<66}{mat:>4}{mf:>2}{mt:>3}{ns:>5}\n")
    }

    fn cont(c1: &str, c2: &str, l1: i32, l2: i32, n1: i32, n2: i32) -> String {
        format!("{c1:>11}{c2:>11}{l1:>11}{l2:>11}{n1:>11}{n2:>11}")
    }

    fn send(mat: i32, mf: i32) -> String {
        line("", mat, mf, 0, 99999)
    }

    fn reals_row(values: &[&str]) -> String {
        let mut payload = String::new();
        for v in values {
            payload.push_str(&format!("{v:>11}"));
        }
        format!("{payload:<66}")
    }

    fn parse(tape: &str) -> Result<Section, EndfError> {
        let mut reader = RecordReader::new(tape.as_bytes());
        let mut head = reader.next_record().unwrap().unwrap();
        head.mark(RecordKind::Head);
        Section::read_from(head, &mut reader)
    }

    #[test]
    fn cross_section_section() {
        let xy = format!(
            "{:>11}{:>11}{:>11}{:>11}{:>22}",
            "1.000000-5", "3.000000+0", "2.000000+7", "4.000000+0", ""
        );
        let tape = [
            line(&cont("1.001000+3", "9.991673-1", 0, 0, 0, 0), 125, 3, 1, 1),
            line(&cont("2.224648+6", "2.224648+6", 0, 0, 1, 2), 125, 3, 1, 2),
            line(&format!("{:>11}{:>11}{:>44}", 2, 2, ""), 125, 3, 1, 3),
            line(&xy, 125, 3, 1, 4),
            send(125, 3),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        assert!(section.parsed());
        let SectionBody::CrossSection(cs) = section.body else {
            panic!("expected a cross section");
        };
        assert_eq!(2224648.0, cs.QM);
        assert_eq!(vec![2], cs.table.NBT);
        assert_eq!(vec![2], cs.table.INT);
        assert_eq!(vec![1.0e-5, 2.0e7], cs.table.x().to_vec());
        assert_eq!(vec![3.0, 4.0], cs.table.y().to_vec());
    }

    #[test]
    fn polynomial_yield_section() {
        let tape = [
            line(&cont("9.423900+4", "2.369986+2", 0, 1, 0, 0), 9437, 1, 452, 1),
            line(&cont("0.0", "0.0", 0, 0, 2, 0), 9437, 1, 452, 2),
            line(&cont("2.874262+0", "1.363788-1", 0, 0, 0, 0), 9437, 1, 452, 3),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        let SectionBody::YieldPolynomial(nu) = section.body else {
            panic!("expected a polynomial yield");
        };
        assert_eq!(vec![2.874262, 0.1363788], nu.C);
    }

    #[test]
    fn tabulated_yield_section() {
        let xy = format!(
            "{:>11}{:>11}{:>11}{:>11}{:>22}",
            "1.000000-5", "2.874262+0", "2.000000+7", "5.294530+0", ""
        );
        let tape = [
            line(&cont("9.423900+4", "2.369986+2", 0, 2, 0, 0), 9437, 1, 456, 1),
            line(&cont("0.0", "0.0", 0, 0, 1, 2), 9437, 1, 456, 2),
            line(&format!("{:>11}{:>11}{:>44}", 2, 2, ""), 9437, 1, 456, 3),
            line(&xy, 9437, 1, 456, 4),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        let SectionBody::YieldTable(nu) = section.body else {
            panic!("expected a tabulated yield");
        };
        assert_eq!(2, nu.table.np());
        assert_eq!(5.29453, nu.table.y()[1]);
    }

    #[test]
    fn delayed_neutron_section() {
        let lambdas = reals_row(&[
            "1.271700-2", "3.174000-2", "1.160000-1", "3.110000-1", "1.400000+0", "3.870000+0",
        ]);
        let xy = format!(
            "{:>11}{:>11}{:>11}{:>11}{:>22}",
            "1.000000-5", "6.450000-3", "2.000000+7", "9.000000-3", ""
        );
        let tape = [
            line(&cont("9.423900+4", "2.369986+2", 0, 2, 0, 0), 9437, 1, 455, 1),
            line(&cont("0.0", "0.0", 0, 0, 6, 0), 9437, 1, 455, 2),
            line(&lambdas, 9437, 1, 455, 3),
            line(&cont("0.0", "0.0", 0, 0, 1, 2), 9437, 1, 455, 4),
            line(&format!("{:>11}{:>11}{:>44}", 2, 2, ""), 9437, 1, 455, 5),
            line(&xy, 9437, 1, 455, 6),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        let SectionBody::DelayedTable(delayed) = section.body else {
            panic!("expected tabulated delayed neutrons");
        };
        assert_eq!(6, delayed.lambda.len());
        assert_eq!(3.87, delayed.lambda[5]);
        assert_eq!(2, delayed.table.np());
    }

    #[test]
    fn energy_release_section() {
        let tape = [
            line(&cont("9.423900+4", "2.369986+2", 0, 0, 0, 0), 9437, 1, 458, 1),
            line(&cont("0.0", "0.0", 0, 0, 4, 2), 9437, 1, 458, 2),
            line(
                &reals_row(&["1.69e+8", "4.9e+5", "7.4e+6", "1.13e+6"]),
                9437,
                1,
                458,
                3,
            ),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        let SectionBody::EnergyRelease(er) = section.body else {
            panic!("expected energy release components");
        };
        assert_eq!(0, er.NPLY);
        assert_eq!(4, er.C.len());
        assert_eq!(1.69e8, er.C[0]);
        assert!(er.components.is_empty());
    }

    #[test]
    fn delayed_photon_sections() {
        // LO=1: one discrete group
        let xy = format!(
            "{:>11}{:>11}{:>11}{:>11}{:>22}",
            "0.0", "1.000000+0", "1.000000+2", "5.000000-1", ""
        );
        let discrete = [
            line(&cont("9.423900+4", "2.369986+2", 1, 0, 1, 0), 9437, 1, 460, 1),
            line(&cont("2.500000+5", "0.0", 1, 0, 1, 2), 9437, 1, 460, 2),
            line(&format!("{:>11}{:>11}{:>44}", 2, 2, ""), 9437, 1, 460, 3),
            line(&xy, 9437, 1, 460, 4),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&discrete).unwrap();
        let SectionBody::PhotonDiscrete(photons) = section.body else {
            panic!("expected discrete delayed photons");
        };
        assert_eq!(1, photons.groups.len());
        assert_eq!(2.5e5, photons.groups[0].E);
        assert_eq!(1, photons.groups[0].iNG);

        // LO=2: decay constants, NNF in the N2 position
        let continuous = [
            line(&cont("9.423900+4", "2.369986+2", 2, 0, 0, 0), 9437, 1, 460, 1),
            line(&cont("0.0", "0.0", 0, 0, 0, 2), 9437, 1, 460, 2),
            line(&reals_row(&["1.271700-2", "3.174000-2"]), 9437, 1, 460, 3),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&continuous).unwrap();
        let SectionBody::PhotonContinuous(photons) = section.body else {
            panic!("expected continuous delayed photons");
        };
        assert_eq!(vec![1.2717e-2, 3.174e-2], photons.lambda);
    }

    #[test]
    fn unsupported_section_is_drained() {
        let tape = [
            line(&cont("1.001000+3", "9.991673-1", 0, 1, 0, 0), 125, 4, 2, 1),
            line(&cont("0.0", "0.0", 1, 2, 3, 4), 125, 4, 2, 2),
            send(125, 4),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        assert!(!section.parsed());
        assert!(matches!(section.body, SectionBody::Unparsed));
    }

    #[test]
    fn delayed_ldg1_is_skipped_not_failed() {
        let tape = [
            line(&cont("9.423900+4", "2.369986+2", 1, 2, 0, 0), 9437, 1, 455, 1),
            line(&cont("1.0+0", "2.0+0", 0, 0, 0, 0), 9437, 1, 455, 2),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        assert!(!section.parsed());
    }

    #[test]
    fn invalid_lnu_is_bad_schema() {
        let tape = [
            line(&cont("9.423900+4", "2.369986+2", 0, 3, 0, 0), 9437, 1, 452, 1),
            line(&cont("0.0", "0.0", 0, 0, 2, 0), 9437, 1, 452, 2),
            send(9437, 1),
        ]
        .concat();
        assert!(matches!(parse(&tape), Err(EndfError::BadSchema(_))));
    }

    #[test]
    fn early_send_in_description() {
        let tape = [
            line(&cont("9.423900+4", "2.369986+2", 1, 1, 0, 1), 9437, 1, 451, 1),
            line(&cont("0.0", "1.0", 0, 0, 0, 6), 9437, 1, 451, 2),
            line(&cont("1.0+0", "2.0+7", 0, 0, 10, 8), 9437, 1, 451, 3),
            line(&cont("2.936+2", "0.0", 0, 0, 1, 10), 9437, 1, 451, 4),
            line(" text line", 9437, 1, 451, 5),
            line(&cont("0.0", "0.0", 3, 1, 4, 1), 9437, 1, 451, 6),
            line(&cont("0.0", "0.0", 3, 2, 4, 1), 9437, 1, 451, 7),
            line(&cont("0.0", "0.0", 3, 18, 4, 1), 9437, 1, 451, 8),
            send(9437, 1),
        ]
        .concat();
        let section = parse(&tape).unwrap();
        let SectionBody::Description(card) = section.body else {
            panic!("expected a description card");
        };
        // NXC declared 10, SEND after three entries
        assert_eq!(10, card.NXC);
        assert_eq!(3, card.directory.len());
        assert_eq!(18, card.directory[2].MT);
        assert_eq!(" text line", card.desc.trim_end());
    }

    #[test]
    fn record_identity_mismatch_is_bad_framing() {
        let tape = [
            line(&cont("1.001000+3", "9.991673-1", 0, 0, 0, 0), 125, 3, 1, 1),
            line(&cont("0.0", "0.0", 0, 0, 1, 1), 126, 3, 1, 2),
            send(125, 3),
        ]
        .concat();
        assert!(matches!(parse(&tape), Err(EndfError::BadFraming(_))));
    }

    #[test]
    fn missing_send_is_bad_framing() {
        // a second HEAD where the SEND should be
        let tape = [
            line(&cont("1.001000+3", "9.991673-1", 0, 0, 0, 0), 125, 3, 1, 1),
            line(&cont("0.0", "0.0", 0, 0, 0, 0), 125, 3, 1, 2),
            line(&cont("1.001000+3", "9.991673-1", 0, 0, 0, 0), 125, 3, 2, 3),
        ]
        .concat();
        assert!(matches!(parse(&tape), Err(EndfError::BadFraming(_))));
    }
}
