//! The relational store seam: row types and the operations the
//! persistence walk performs against them.
//!
//! The store itself is an external collaborator. Backends own one
//! connection with autocommit off; everything between [`Store::begin`]
//! and [`Store::commit`] belongs to one explicit transaction (READ
//! COMMITTED equivalent). [`Store::rollback`] with no open transaction
//! is a no-op. [`crate::MemoryStore`] is the in-crate implementation
//! used by the tests and by dry-run ingest.

use thiserror::Error;

/// Failure reported by a store backend
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    /// Backend diagnostic
    pub message: String,
}

impl StoreError {
    /// New error wrapping a backend diagnostic.
    pub fn new(message: impl Into<String>) -> StoreError {
        StoreError {
            message: message.into(),
        }
    }
}

/// Library row, keyed by (NLIB, NSUB, NVER, LREL, NFOR)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRow {
    /// Row id
    pub id: i64,
    /// NLIB: library identifier
    pub NLIB: i32,
    /// NVER: library version number
    pub NVER: i32,
    /// LREL: release number
    pub LREL: i32,
    /// NSUB: sub-library number
    pub NSUB: i32,
    /// NFOR: library format
    pub NFOR: i32,
    /// IPART: incident particle, `NSUB / 10`
    pub IPART: i32,
    /// ITYPE: data type, `NSUB % 10`
    pub ITYPE: i32,
}

/// Material row
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRow {
    /// Row id
    pub id: i64,
    /// MAT identifier
    pub MAT: i32,
    /// Z: charge number, `ZA / 1000`
    pub Z: i32,
    /// A: mass number, `ZA % 1000`
    pub A: i32,
    /// AWR: target to neutron mass ratio
    pub AWR: f64,
    /// LFI: fission flag
    pub LFI: i32,
    /// LIS: state number
    pub LIS: i32,
    /// LISO: isomeric state number
    pub LISO: i32,
    /// ELIS: excitation energy
    pub ELIS: f64,
    /// STA: stability flag
    pub STA: f64,
}

/// General-info row for one (material, library) pair, from the
/// `MF=1 MT=451` header
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralInfoRow {
    /// Row id
    pub id: i64,
    /// Owning Material row
    pub material_key: i64,
    /// Owning Library row
    pub library_key: i64,
    /// Owning Files row, when known
    pub file_key: Option<i64>,
    /// LRP: resonance parameter flag
    pub LRP: i32,
    /// NMOD: modification number
    pub NMOD: i32,
    /// AWI: projectile mass in neutron units
    pub AWI: f64,
    /// EMAX: upper energy limit
    pub EMAX: f64,
    /// TEMP: target temperature
    pub TEMP: f64,
    /// LDRV: derived evaluation flag
    pub LDRV: i32,
    /// Joined descriptive text
    pub description: String,
}

/// Directory row, one per `MF=1 MT=451` dictionary entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRow {
    /// Row id
    pub id: i64,
    /// Owning GeneralInfo row
    pub general_info_key: i64,
    /// MF of the indexed section
    pub MF: i32,
    /// MT of the indexed section
    pub MT: i32,
    /// NC: record count of the indexed section
    pub NC: i32,
    /// MOD: modification indicator
    pub MOD: i32,
}

/// Cross-section header row for one (MT, material, library)
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionInfoRow {
    /// Row id
    pub id: i64,
    /// MT of the reaction
    pub MT: i32,
    /// Owning Material row
    pub material_key: i64,
    /// Owning Library row
    pub library_key: i64,
    /// ZA of the target
    pub ZA: f64,
    /// AWR of the target
    pub AWR: f64,
    /// QM: mass-difference Q value
    pub QM: f64,
    /// QI: reaction Q value
    pub QI: f64,
    /// LR: complex-breakup flag
    pub LR: i32,
    /// NR: interpolation range count
    pub NR: i32,
    /// NP: tabulated point count
    pub NP: i32,
}

/// Interpolation row, one per TAB1 range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationRow {
    /// Row id
    pub id: i64,
    /// Owning CrossSectionInfo row
    pub info_key: i64,
    /// MT of the reaction
    pub MT: i32,
    /// MF of the owning file
    pub MF: i32,
    /// NBT: upper point index of the range
    pub NBT: i32,
    /// INT: interpolation scheme number
    pub INT: i32,
}

/// Cross-section data row, one per TAB1 point
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionDataRow {
    /// Row id
    pub id: i64,
    /// Owning CrossSectionInfo row
    pub info_key: i64,
    /// MT of the reaction
    pub MT: i32,
    /// Incident energy (the X value)
    pub energy: f64,
    /// Cross section at `energy` (the Y value)
    pub cross_section: f64,
}

/// Files registry row: one tape file or archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    /// Row id
    pub id: i64,
    /// File or archive-entry name
    pub name: String,
    /// Directory path relative to the library root
    pub path: String,
    /// Owning archive name when the tape is a zip entry
    pub zip_file: Option<String>,
    /// Latest parse or persist diagnostic
    pub comment: Option<String>,
}

/// Operations the persistence walk performs against the store
pub trait Store {
    /// Open a transaction.
    fn begin(&mut self) -> Result<(), StoreError>;
    /// Commit the open transaction.
    fn commit(&mut self) -> Result<(), StoreError>;
    /// Roll back the open transaction; no-op without one.
    fn rollback(&mut self) -> Result<(), StoreError>;

    /// Next contiguous id block as `(base, length)`, the
    /// `NEXTVAL(id_seq), increment` equivalent.
    fn next_id_block(&mut self) -> Result<(i64, i64), StoreError>;

    /// Files key for `(name, path, zip_file)`, if registered.
    fn find_file(
        &mut self,
        name: &str,
        path: &str,
        zip_file: Option<&str>,
    ) -> Result<Option<i64>, StoreError>;
    /// Register a tape file, returning its new key.
    fn insert_file(
        &mut self,
        name: &str,
        path: &str,
        zip_file: Option<&str>,
    ) -> Result<i64, StoreError>;
    /// Record a diagnostic on a Files row.
    fn set_file_comment(&mut self, file_key: i64, comment: &str) -> Result<(), StoreError>;

    /// Library key matching (NLIB, NSUB, NVER, LREL, NFOR).
    fn find_library(&mut self, row: &LibraryRow) -> Result<Option<i64>, StoreError>;
    /// Insert a Library row.
    fn insert_library(&mut self, row: &LibraryRow) -> Result<(), StoreError>;

    /// Material key matching (MAT, AWR, LFI, LIS, LISO, STA) with
    /// `|ELIS - row.ELIS| < 0.05`.
    fn find_material(&mut self, row: &MaterialRow) -> Result<Option<i64>, StoreError>;
    /// Insert a Material row.
    fn insert_material(&mut self, row: &MaterialRow) -> Result<(), StoreError>;

    /// GeneralInfo key for (material_key, library_key).
    fn find_general_info(
        &mut self,
        material_key: i64,
        library_key: i64,
    ) -> Result<Option<i64>, StoreError>;
    /// Insert a GeneralInfo row.
    fn insert_general_info(&mut self, row: &GeneralInfoRow) -> Result<(), StoreError>;

    /// True when Directory rows exist for this general-info key.
    fn has_directory(&mut self, general_info_key: i64) -> Result<bool, StoreError>;
    /// Bulk-insert Directory rows.
    fn insert_directory(&mut self, rows: &[DirectoryRow]) -> Result<(), StoreError>;

    /// CrossSectionInfo key for (MT, material_key, library_key).
    fn find_cross_section_info(
        &mut self,
        MT: i32,
        material_key: i64,
        library_key: i64,
    ) -> Result<Option<i64>, StoreError>;
    /// Insert a CrossSectionInfo row.
    fn insert_cross_section_info(&mut self, row: &CrossSectionInfoRow) -> Result<(), StoreError>;

    /// True when Interpolation rows exist for this info key.
    fn has_interpolation(&mut self, info_key: i64) -> Result<bool, StoreError>;
    /// Bulk-insert Interpolation rows.
    fn insert_interpolation(&mut self, rows: &[InterpolationRow]) -> Result<(), StoreError>;

    /// True when CrossSectionData rows exist for this info key.
    fn has_cross_section_data(&mut self, info_key: i64) -> Result<bool, StoreError>;
    /// Bulk-insert CrossSectionData rows.
    fn insert_cross_section_data(&mut self, rows: &[CrossSectionDataRow])
        -> Result<(), StoreError>;
}
