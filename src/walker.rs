//! Library discovery and end-to-end tape loading.
//!
//! A library is a directory tree of `.dat`/`.txt` tape files and
//! `.zip` archives whose entries are tapes. Every tape is registered
//! in the Files table, parsed, and persisted; a tape that fails to
//! parse gets a `Parse: ` diagnostic and the loader moves on.

use ::std::fs::File;
use ::std::io::{BufRead, BufReader};
use ::std::path::{Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use super::cancel::CancelToken;
use super::error::EndfError;
use super::idpool::IdPool;
use super::persist::Persister;
use super::reader::RecordReader;
use super::store::Store;
use super::tape::Tape;

/// Counters reported by a load run
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadStats {
    /// Tapes parsed and handed to the persister
    pub tapes_loaded: usize,
    /// Tapes whose parse failed (diagnostic recorded)
    pub parse_failures: usize,
    /// Materials committed
    pub materials: usize,
}

/// Walks a library root, registers every tape in the Files registry,
/// and parses and persists each one
pub struct Loader<'a, S: Store> {
    store: &'a mut S,
    ids: &'a IdPool,
    cancel: CancelToken,
}

impl<'a, S: Store> Loader<'a, S> {
    /// New loader writing through `store`, drawing ids from `ids`.
    pub fn new(store: &'a mut S, ids: &'a IdPool, cancel: CancelToken) -> Loader<'a, S> {
        Loader { store, ids, cancel }
    }

    /// Discover and load every tape under `library_dir`.
    pub fn load_library(&mut self, library_dir: &Path) -> Result<LoadStats, EndfError> {
        let mut dats: Vec<PathBuf> = Vec::new();
        let mut zips: Vec<PathBuf> = Vec::new();
        info!("searching library directory: {}", library_dir.display());
        for entry in WalkDir::new(library_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| EndfError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match extension_of(entry.path()).as_deref() {
                Some("zip") => zips.push(entry.into_path()),
                Some("dat") | Some("txt") => dats.push(entry.into_path()),
                _ => {}
            }
        }
        info!("found data files: {}\tzip files: {}", dats.len(), zips.len());

        let mut stats = LoadStats::default();
        for dat in &dats {
            self.cancel.check()?;
            let (name, path) = split_library_path(library_dir, dat);
            let file_key = self.register(&name, &path, None)?;
            info!("parsing file: {name} at {path}");
            let source = BufReader::new(File::open(dat)?);
            self.load_tape(source, file_key, &mut stats)?;
        }

        for zip_path in &zips {
            self.cancel.check()?;
            let (zip_name, path) = split_library_path(library_dir, zip_path);
            let mut archive = ZipArchive::new(File::open(zip_path)?)
                .map_err(|e| EndfError::BadFraming(format!("zip {zip_name}: {e}")))?;
            for index in 0..archive.len() {
                self.cancel.check()?;
                let entry = archive
                    .by_index(index)
                    .map_err(|e| EndfError::BadFraming(format!("zip {zip_name}: {e}")))?;
                if entry.is_dir() {
                    continue;
                }
                let entry_name = entry.name().to_owned();
                let file_key = self.register(&entry_name, &path, Some(&zip_name))?;
                info!("parsing file: {entry_name} in zip {zip_name} at {path}");
                self.load_tape(BufReader::new(entry), file_key, &mut stats)?;
            }
        }

        Ok(stats)
    }

    fn register(
        &mut self,
        name: &str,
        path: &str,
        zip_file: Option<&str>,
    ) -> Result<i64, EndfError> {
        match self.store.find_file(name, path, zip_file)? {
            Some(id) => Ok(id),
            None => Ok(self.store.insert_file(name, path, zip_file)?),
        }
    }

    fn load_tape<R>(
        &mut self,
        source: R,
        file_key: i64,
        stats: &mut LoadStats,
    ) -> Result<(), EndfError>
    where
        R: BufRead,
    {
        let mut reader = RecordReader::new(source);
        let tape = match Tape::read_from(&mut reader, &self.cancel) {
            Ok(tape) => tape,
            Err(EndfError::Cancelled) => return Err(EndfError::Cancelled),
            Err(err) => {
                warn!("parse failed: {err}");
                self.store.set_file_comment(file_key, &format!("Parse: {err}"))?;
                self.store.commit()?;
                stats.parse_failures += 1;
                return Ok(());
            }
        };
        info!("finished parsing tape, {} materials", tape.materials.len());

        let mut persister = Persister::new(&mut *self.store, self.ids, self.cancel.clone());
        stats.materials += persister.persist_tape(&tape, file_key)?;
        stats.tapes_loaded += 1;
        Ok(())
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

// (file name, directory path relative to the library root)
fn split_library_path(root: &Path, file: &Path) -> (String, String) {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let path = file
        .parent()
        .and_then(|p| p.strip_prefix(root).ok())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    (name, path)
}
