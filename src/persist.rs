//! Depth-first persistence of a parsed tape.
//!
//! Each material runs in its own transaction. The `MF=1 MT=451`
//! section is persisted first: the library and material keys it yields
//! propagate by value to every other section of the material. A failed
//! material is rolled back, its diagnostic is recorded on the owning
//! Files row, and the walk continues with the next material.

use log::{debug, info, warn};

use super::cancel::CancelToken;
use super::error::EndfError;
use super::idpool::IdPool;
use super::section::{CrossSection, DescriptionCard, SectionBody};
use super::store::{
    CrossSectionDataRow, CrossSectionInfoRow, DirectoryRow, GeneralInfoRow, InterpolationRow,
    LibraryRow, MaterialRow, Store,
};
use super::tape::{Material, Tape};

/// Rows per bulk insert
pub const BATCH_SIZE: usize = 10_000;

// Keys learned from the (1,451) section, passed down by value.
#[derive(Debug, Clone, Copy)]
struct MaterialKeys {
    library_key: i64,
    material_key: i64,
}

/// Persists parsed tapes into a [`Store`], one transaction per
/// material
pub struct Persister<'a, S: Store> {
    store: &'a mut S,
    ids: &'a IdPool,
    cancel: CancelToken,
}

impl<'a, S: Store> Persister<'a, S> {
    /// New persister writing through `store`, drawing ids from `ids`.
    pub fn new(store: &'a mut S, ids: &'a IdPool, cancel: CancelToken) -> Persister<'a, S> {
        Persister { store, ids, cancel }
    }

    /// Persist every material of `tape` against the Files row
    /// `file_key`, returning the number of committed materials.
    pub fn persist_tape(&mut self, tape: &Tape, file_key: i64) -> Result<usize, EndfError> {
        let mut committed = 0;
        for material in &tape.materials {
            if self.cancel.is_cancelled() {
                return Err(EndfError::Cancelled);
            }
            match self.persist_material(material, file_key) {
                Ok(true) => {
                    self.store.commit()?;
                    committed += 1;
                }
                Ok(false) => {
                    self.store.commit()?;
                }
                Err(EndfError::Cancelled) => {
                    self.store.rollback()?;
                    return Err(EndfError::Cancelled);
                }
                Err(err) => {
                    warn!("persist failed for MAT={}: {err}", material.MAT);
                    self.store.rollback()?;
                    // the diagnostic gets its own transaction
                    self.store.set_file_comment(file_key, &format!("Persist: {err}"))?;
                    self.store.commit()?;
                }
            }
        }
        Ok(committed)
    }

    fn persist_material(&mut self, material: &Material, file_key: i64) -> Result<bool, EndfError> {
        self.store.begin()?;

        let Some(card) = material.description() else {
            warn!(
                "material MAT={} has no MF=1 MT=451 section, skipping",
                material.MAT
            );
            return Ok(false);
        };
        let keys = self.persist_description(material.MAT, card, file_key)?;

        for file in &material.files {
            for section in &file.sections {
                self.cancel.check()?;
                match section.body {
                    // already persisted in the first pass
                    SectionBody::Description(_) => {}
                    SectionBody::CrossSection(ref cs) => {
                        self.persist_cross_section(section.MT, cs, keys)?;
                    }
                    // parsed but carrying no relational mapping
                    _ => {}
                }
            }
        }
        Ok(true)
    }

    fn persist_description(
        &mut self,
        MAT: i32,
        card: &DescriptionCard,
        file_key: i64,
    ) -> Result<MaterialKeys, EndfError> {
        let mut library = LibraryRow {
            id: 0,
            NLIB: card.NLIB,
            NVER: card.NVER,
            LREL: card.LREL,
            NSUB: card.NSUB,
            NFOR: card.NFOR,
            IPART: card.NSUB / 10,
            ITYPE: card.NSUB % 10,
        };
        let library_key = match self.store.find_library(&library)? {
            Some(id) => {
                debug!(
                    "library exists for NLIB={} NSUB={} NVER={} LREL={} NFOR={}",
                    card.NLIB, card.NSUB, card.NVER, card.LREL, card.NFOR
                );
                id
            }
            None => {
                library.id = self.ids.next(self.store)?;
                info!(
                    "persisting library NLIB={} NSUB={} NVER={} LREL={} NFOR={}",
                    card.NLIB, card.NSUB, card.NVER, card.LREL, card.NFOR
                );
                self.store.insert_library(&library)?;
                library.id
            }
        };

        let za = card.ZA as i32;
        let mut material = MaterialRow {
            id: 0,
            MAT,
            Z: za / 1000,
            A: za % 1000,
            AWR: card.AWR,
            LFI: card.LFI,
            LIS: card.LIS,
            LISO: card.LISO,
            ELIS: card.ELIS,
            STA: card.STA,
        };
        let material_key = match self.store.find_material(&material)? {
            Some(id) => id,
            None => {
                material.id = self.ids.next(self.store)?;
                info!(
                    "persisting material MAT={MAT} AWR={} LFI={} LIS={} LISO={} ELIS={} STA={}",
                    card.AWR, card.LFI, card.LIS, card.LISO, card.ELIS, card.STA
                );
                self.store.insert_material(&material)?;
                material.id
            }
        };

        let general_info_key = match self.store.find_general_info(material_key, library_key)? {
            Some(id) => id,
            None => {
                let id = self.ids.next(self.store)?;
                self.store.insert_general_info(&GeneralInfoRow {
                    id,
                    material_key,
                    library_key,
                    file_key: Some(file_key),
                    LRP: card.LRP,
                    NMOD: card.NMOD,
                    AWI: card.AWI,
                    EMAX: card.EMAX,
                    TEMP: card.TEMP,
                    LDRV: card.LDRV,
                    description: card.desc.clone(),
                })?;
                id
            }
        };

        if !self.store.has_directory(general_info_key)? {
            let ids = self.ids.acquire(self.store, card.directory.len())?;
            let rows: Vec<DirectoryRow> = card
                .directory
                .iter()
                .zip(ids)
                .map(|(entry, id)| DirectoryRow {
                    id,
                    general_info_key,
                    MF: entry.MF,
                    MT: entry.MT,
                    NC: entry.NC,
                    MOD: entry.MOD,
                })
                .collect();
            for chunk in rows.chunks(BATCH_SIZE) {
                self.store.insert_directory(chunk)?;
            }
        }

        Ok(MaterialKeys {
            library_key,
            material_key,
        })
    }

    fn persist_cross_section(
        &mut self,
        MT: i32,
        cs: &CrossSection,
        keys: MaterialKeys,
    ) -> Result<(), EndfError> {
        let info_key =
            match self
                .store
                .find_cross_section_info(MT, keys.material_key, keys.library_key)?
            {
                Some(id) => id,
                None => {
                    let id = self.ids.next(self.store)?;
                    self.store.insert_cross_section_info(&CrossSectionInfoRow {
                        id,
                        MT,
                        material_key: keys.material_key,
                        library_key: keys.library_key,
                        ZA: cs.ZA,
                        AWR: cs.AWR,
                        QM: cs.QM,
                        QI: cs.QI,
                        LR: cs.LR,
                        NR: cs.table.nr() as i32,
                        NP: cs.table.np() as i32,
                    })?;
                    id
                }
            };

        if !self.store.has_interpolation(info_key)? {
            let ids = self.ids.acquire(self.store, cs.table.nr())?;
            let rows: Vec<InterpolationRow> = cs
                .table
                .NBT
                .iter()
                .zip(&cs.table.INT)
                .zip(ids)
                .map(|((&NBT, &INT), id)| InterpolationRow {
                    id,
                    info_key,
                    MT,
                    MF: 3,
                    NBT,
                    INT,
                })
                .collect();
            for chunk in rows.chunks(BATCH_SIZE) {
                self.store.insert_interpolation(chunk)?;
            }
        }

        if !self.store.has_cross_section_data(info_key)? {
            if cs.table.data.iter().any(|v| v.is_nan()) {
                return Err(EndfError::NaNInData(MT));
            }
            let ids = self.ids.acquire(self.store, cs.table.np())?;
            let rows: Vec<CrossSectionDataRow> = cs
                .table
                .data
                .rows()
                .into_iter()
                .zip(ids)
                .map(|(point, id)| CrossSectionDataRow {
                    id,
                    info_key,
                    MT,
                    energy: point[0],
                    cross_section: point[1],
                })
                .collect();
            for chunk in rows.chunks(BATCH_SIZE) {
                self.store.insert_cross_section_data(chunk)?;
            }
        }

        Ok(())
    }
}
