//! Tape structure: the state machine that groups sections into files,
//! files into materials and materials into a tape.
//!
//! Terminators are data, not exceptions: every grouping level peeks at
//! the next record and either closes on its terminator or recurses
//! into the level below.

use ::std::io::BufRead;

use log::debug;

use super::cancel::CancelToken;
use super::error::EndfError;
use super::reader::RecordReader;
use super::record::RecordKind;
use super::section::{DescriptionCard, Section, SectionBody};

/// An ordered run of sections sharing one MF, closed by a FEND
#[derive(Debug, Clone)]
pub struct FileGroup {
    /// MAT of the owning material
    pub MAT: i32,
    /// MF shared by every section of this file
    pub MF: i32,
    /// Sections in tape order
    pub sections: Vec<Section>,
}

impl FileGroup {
    /// Look up a section by MT.
    pub fn section(&self, MT: i32) -> Option<&Section> {
        self.sections.iter().find(|s| s.MT == MT)
    }

    fn read_from<R>(
        reader: &mut RecordReader<R>,
        MAT: i32,
        cancel: &CancelToken,
    ) -> Result<FileGroup, EndfError>
    where
        R: BufRead,
    {
        let MF = match reader.peek()? {
            Some(rec) => rec.MF,
            None => {
                return Err(EndfError::BadFraming(format!(
                    "end of tape where a file of MAT={MAT} should begin"
                )))
            }
        };

        let mut sections = Vec::new();
        loop {
            cancel.check()?;
            let (kind, rmat, rmf, rmt) = match reader.peek()? {
                Some(rec) => (rec.kind(), rec.MAT, rec.MF, rec.MT),
                None => {
                    return Err(EndfError::BadFraming(format!(
                        "end of tape inside file MAT={MAT} MF={MF}"
                    )))
                }
            };
            match kind {
                RecordKind::Fend => {
                    if rmat != MAT {
                        return Err(EndfError::BadFraming(format!(
                            "FEND with MAT={rmat} terminating file MAT={MAT} MF={MF}"
                        )));
                    }
                    reader.next_record()?;
                    break;
                }
                RecordKind::Mend | RecordKind::Tend => {
                    return Err(EndfError::BadFraming(format!(
                        "file MAT={MAT} MF={MF} not terminated by FEND"
                    )));
                }
                RecordKind::Send => {
                    return Err(EndfError::BadFraming(format!(
                        "stray SEND where a section of MAT={MAT} MF={MF} should begin"
                    )));
                }
                _ => {}
            }
            if rmat != MAT || rmf != MF {
                return Err(EndfError::BadFraming(format!(
                    "record MAT={rmat} MF={rmf} inside file MAT={MAT} MF={MF}"
                )));
            }
            if rmt == 0 {
                return Err(EndfError::BadFraming(format!(
                    "record with MT=0 where a section HEAD of MAT={MAT} MF={MF} is expected"
                )));
            }

            let mut head = match reader.next_record()? {
                Some(rec) => rec,
                None => {
                    return Err(EndfError::BadFraming(format!(
                        "end of tape inside file MAT={MAT} MF={MF}"
                    )))
                }
            };
            head.mark(RecordKind::Head);
            sections.push(Section::read_from(head, reader)?);
        }

        debug!("finished parsing file MAT={MAT} MF={MF}");
        Ok(FileGroup { MAT, MF, sections })
    }
}

/// An ordered run of files sharing one MAT, closed by a MEND
#[derive(Debug, Clone)]
pub struct Material {
    /// MAT identifier
    pub MAT: i32,
    /// Files in tape order
    pub files: Vec<FileGroup>,
}

impl Material {
    /// Look up a file by MF.
    pub fn file(&self, MF: i32) -> Option<&FileGroup> {
        self.files.iter().find(|f| f.MF == MF)
    }

    /// The descriptive (`MF=1, MT=451`) card of this material, when
    /// present and parsed.
    pub fn description(&self) -> Option<&DescriptionCard> {
        match self.file(1)?.section(451)?.body {
            SectionBody::Description(ref card) => Some(card),
            _ => None,
        }
    }

    fn read_from<R>(
        reader: &mut RecordReader<R>,
        cancel: &CancelToken,
    ) -> Result<Material, EndfError>
    where
        R: BufRead,
    {
        let MAT = match reader.peek()? {
            Some(rec) => rec.MAT,
            None => {
                return Err(EndfError::BadFraming(
                    "end of tape where a material should begin".to_owned(),
                ))
            }
        };
        if MAT <= 0 {
            return Err(EndfError::BadFraming(format!(
                "material HEAD with MAT={MAT}"
            )));
        }

        let mut files = Vec::new();
        loop {
            cancel.check()?;
            let (kind, rmat) = match reader.peek()? {
                Some(rec) => (rec.kind(), rec.MAT),
                None => {
                    return Err(EndfError::BadFraming(format!(
                        "end of tape inside material MAT={MAT}"
                    )))
                }
            };
            match kind {
                RecordKind::Mend => {
                    reader.next_record()?;
                    break;
                }
                RecordKind::Tend => {
                    return Err(EndfError::BadFraming(format!(
                        "material MAT={MAT} not terminated by MEND"
                    )));
                }
                RecordKind::Fend | RecordKind::Send => {
                    return Err(EndfError::BadFraming(format!(
                        "stray terminator where a file of MAT={MAT} should begin"
                    )));
                }
                _ => {}
            }
            if rmat != MAT {
                return Err(EndfError::BadFraming(format!(
                    "record MAT={rmat} inside material MAT={MAT}"
                )));
            }
            files.push(FileGroup::read_from(reader, MAT, cancel)?);
        }

        debug!("finished parsing material MAT={MAT}");
        Ok(Material { MAT, files })
    }
}

/// A parsed ENDF-6 tape: the TPID record and its materials
#[derive(Debug, Clone)]
pub struct Tape {
    /// Verbatim 66-column text of the tape identification record
    pub TPID: String,
    /// NTAPE: the MAT field of the TPID record
    pub NTAPE: i32,
    /// Materials in tape order
    pub materials: Vec<Material>,
}

impl Tape {
    /// Parse a complete tape: TPID, materials through their MEND
    /// records, and a single final TEND.
    ///
    /// Example:
    ///
    /// ```rust
    /// use endfdb::{CancelToken, RecordReader, Tape};
    /// use std::fs::File;
    /// use std::io::BufReader;
    ///
    /// # fn foo() -> Result<(), endfdb::EndfError> {
    /// let file = File::open("input.dat")?;
    /// let mut reader = RecordReader::new(BufReader::new(file));
    /// let tape = Tape::read_from(&mut reader, &CancelToken::new())?;
    /// println!("{} materials", tape.materials.len());
    /// # Ok(()) }
    /// ```
    pub fn read_from<R>(
        reader: &mut RecordReader<R>,
        cancel: &CancelToken,
    ) -> Result<Tape, EndfError>
    where
        R: BufRead,
    {
        // The first record is the tape identification whatever its
        // CONT image claims.
        let mut tpid = match reader.next_record()? {
            Some(rec) => rec,
            None => return Err(EndfError::BadFraming("empty tape".to_owned())),
        };
        tpid.mark(RecordKind::Tpid);
        let NTAPE = tpid.MAT;

        let mut materials = Vec::new();
        loop {
            cancel.check()?;
            let is_tend = match reader.peek()? {
                Some(rec) => rec.is_tend(),
                None => {
                    return Err(EndfError::BadFraming(
                        "tape has no TEND record".to_owned(),
                    ))
                }
            };
            if is_tend {
                reader.next_record()?;
                break;
            }
            materials.push(Material::read_from(reader, cancel)?);
        }

        // Only blank lines may follow the TEND.
        if let Some(rec) = reader.next_record()? {
            return Err(EndfError::BadFraming(if rec.is_tend() {
                "duplicate TEND record".to_owned()
            } else {
                format!(
                    "record after TEND: MAT={} MF={} MT={}",
                    rec.MAT, rec.MF, rec.MT
                )
            }));
        }

        Ok(Tape {
            TPID: tpid.content,
            NTAPE,
            materials,
        })
    }
}
