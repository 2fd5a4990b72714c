//! In-memory [`Store`] used by the test suite and by dry-run ingest.

use super::store::{
    CrossSectionDataRow, CrossSectionInfoRow, DirectoryRow, FileRow, GeneralInfoRow,
    InterpolationRow, LibraryRow, MaterialRow, Store, StoreError,
};

// Block length handed out by the local id sequence.
const ID_BLOCK: i64 = 500;

#[derive(Debug, Clone, Default)]
struct Tables {
    files: Vec<FileRow>,
    libraries: Vec<LibraryRow>,
    materials: Vec<MaterialRow>,
    general_info: Vec<GeneralInfoRow>,
    directory: Vec<DirectoryRow>,
    cross_section_info: Vec<CrossSectionInfoRow>,
    interpolation: Vec<InterpolationRow>,
    cross_section_data: Vec<CrossSectionDataRow>,
}

/// In-memory store with snapshot-based transactions and a local
/// `id_seq` counter.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Tables,
    snapshot: Option<Tables>,
    seq_next: i64,
}

impl Default for MemoryStore {
    fn default() -> MemoryStore {
        MemoryStore::new()
    }
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> MemoryStore {
        MemoryStore {
            tables: Tables::default(),
            snapshot: None,
            seq_next: 1,
        }
    }

    /// Registered tape files.
    pub fn files(&self) -> &[FileRow] {
        &self.tables.files
    }
    /// Library rows.
    pub fn libraries(&self) -> &[LibraryRow] {
        &self.tables.libraries
    }
    /// Material rows.
    pub fn materials(&self) -> &[MaterialRow] {
        &self.tables.materials
    }
    /// GeneralInfo rows.
    pub fn general_info(&self) -> &[GeneralInfoRow] {
        &self.tables.general_info
    }
    /// Directory rows.
    pub fn directory(&self) -> &[DirectoryRow] {
        &self.tables.directory
    }
    /// CrossSectionInfo rows.
    pub fn cross_section_info(&self) -> &[CrossSectionInfoRow] {
        &self.tables.cross_section_info
    }
    /// Interpolation rows.
    pub fn interpolation(&self) -> &[InterpolationRow] {
        &self.tables.interpolation
    }
    /// CrossSectionData rows.
    pub fn cross_section_data(&self) -> &[CrossSectionDataRow] {
        &self.tables.cross_section_data
    }
}

impl Store for MemoryStore {
    fn begin(&mut self) -> Result<(), StoreError> {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.tables.clone());
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        if let Some(snapshot) = self.snapshot.take() {
            self.tables = snapshot;
        }
        Ok(())
    }

    fn next_id_block(&mut self) -> Result<(i64, i64), StoreError> {
        let base = self.seq_next;
        self.seq_next += ID_BLOCK;
        Ok((base, ID_BLOCK))
    }

    fn find_file(
        &mut self,
        name: &str,
        path: &str,
        zip_file: Option<&str>,
    ) -> Result<Option<i64>, StoreError> {
        Ok(self
            .tables
            .files
            .iter()
            .find(|f| f.name == name && f.path == path && f.zip_file.as_deref() == zip_file)
            .map(|f| f.id))
    }

    fn insert_file(
        &mut self,
        name: &str,
        path: &str,
        zip_file: Option<&str>,
    ) -> Result<i64, StoreError> {
        let id = self.tables.files.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        self.tables.files.push(FileRow {
            id,
            name: name.to_owned(),
            path: path.to_owned(),
            zip_file: zip_file.map(str::to_owned),
            comment: None,
        });
        Ok(id)
    }

    fn set_file_comment(&mut self, file_key: i64, comment: &str) -> Result<(), StoreError> {
        let row = self
            .tables
            .files
            .iter_mut()
            .find(|f| f.id == file_key)
            .ok_or_else(|| StoreError::new(format!("no Files row with id {file_key}")))?;
        row.comment = Some(comment.to_owned());
        Ok(())
    }

    fn find_library(&mut self, row: &LibraryRow) -> Result<Option<i64>, StoreError> {
        Ok(self
            .tables
            .libraries
            .iter()
            .find(|l| {
                (l.NLIB, l.NSUB, l.NVER, l.LREL, l.NFOR)
                    == (row.NLIB, row.NSUB, row.NVER, row.LREL, row.NFOR)
            })
            .map(|l| l.id))
    }

    fn insert_library(&mut self, row: &LibraryRow) -> Result<(), StoreError> {
        self.tables.libraries.push(row.clone());
        Ok(())
    }

    fn find_material(&mut self, row: &MaterialRow) -> Result<Option<i64>, StoreError> {
        Ok(self
            .tables
            .materials
            .iter()
            .find(|m| {
                (m.MAT, m.AWR, m.LFI, m.LIS, m.LISO, m.STA)
                    == (row.MAT, row.AWR, row.LFI, row.LIS, row.LISO, row.STA)
                    && (m.ELIS - row.ELIS).abs() < 0.05
            })
            .map(|m| m.id))
    }

    fn insert_material(&mut self, row: &MaterialRow) -> Result<(), StoreError> {
        self.tables.materials.push(row.clone());
        Ok(())
    }

    fn find_general_info(
        &mut self,
        material_key: i64,
        library_key: i64,
    ) -> Result<Option<i64>, StoreError> {
        Ok(self
            .tables
            .general_info
            .iter()
            .find(|g| g.material_key == material_key && g.library_key == library_key)
            .map(|g| g.id))
    }

    fn insert_general_info(&mut self, row: &GeneralInfoRow) -> Result<(), StoreError> {
        self.tables.general_info.push(row.clone());
        Ok(())
    }

    fn has_directory(&mut self, general_info_key: i64) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .directory
            .iter()
            .any(|d| d.general_info_key == general_info_key))
    }

    fn insert_directory(&mut self, rows: &[DirectoryRow]) -> Result<(), StoreError> {
        self.tables.directory.extend_from_slice(rows);
        Ok(())
    }

    fn find_cross_section_info(
        &mut self,
        MT: i32,
        material_key: i64,
        library_key: i64,
    ) -> Result<Option<i64>, StoreError> {
        Ok(self
            .tables
            .cross_section_info
            .iter()
            .find(|c| c.MT == MT && c.material_key == material_key && c.library_key == library_key)
            .map(|c| c.id))
    }

    fn insert_cross_section_info(&mut self, row: &CrossSectionInfoRow) -> Result<(), StoreError> {
        self.tables.cross_section_info.push(row.clone());
        Ok(())
    }

    fn has_interpolation(&mut self, info_key: i64) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .interpolation
            .iter()
            .any(|i| i.info_key == info_key))
    }

    fn insert_interpolation(&mut self, rows: &[InterpolationRow]) -> Result<(), StoreError> {
        self.tables.interpolation.extend_from_slice(rows);
        Ok(())
    }

    fn has_cross_section_data(&mut self, info_key: i64) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .cross_section_data
            .iter()
            .any(|d| d.info_key == info_key))
    }

    fn insert_cross_section_data(
        &mut self,
        rows: &[CrossSectionDataRow],
    ) -> Result<(), StoreError> {
        self.tables.cross_section_data.extend_from_slice(rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_restores_the_snapshot() {
        let mut store = MemoryStore::new();
        store.insert_file("a.dat", "", None).unwrap();
        store.begin().unwrap();
        store.insert_file("b.dat", "", None).unwrap();
        store.rollback().unwrap();
        assert_eq!(1, store.files().len());

        store.begin().unwrap();
        store.insert_file("c.dat", "", None).unwrap();
        store.commit().unwrap();
        assert_eq!(2, store.files().len());
    }

    #[test]
    fn id_blocks_are_contiguous() {
        let mut store = MemoryStore::new();
        let (base, len) = store.next_id_block().unwrap();
        let (next, _) = store.next_id_block().unwrap();
        assert_eq!(base + len, next);
    }

    #[test]
    fn material_match_uses_elis_tolerance() {
        let mut store = MemoryStore::new();
        let row = MaterialRow {
            id: 7,
            MAT: 9437,
            Z: 94,
            A: 239,
            AWR: 236.9986,
            LFI: 1,
            LIS: 0,
            LISO: 0,
            ELIS: 0.0,
            STA: 0.0,
        };
        store.insert_material(&row).unwrap();
        let probe = MaterialRow {
            ELIS: 0.04,
            ..row.clone()
        };
        assert_eq!(Some(7), store.find_material(&probe).unwrap());
        let probe = MaterialRow { ELIS: 0.2, ..row };
        assert_eq!(None, store.find_material(&probe).unwrap());
    }
}
