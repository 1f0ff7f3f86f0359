use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::errors::StoreError;
use crate::types::{Catalogue, Page};

const PAGE_EXTENSION: &str = "md";
const FIELDS_PER_RECORD: usize = 3;

/// Owns the catalogue file and the directory of page bodies.
///
/// The catalogue is append-only and is the single source of truth for
/// whether an id exists. Writers are not serialized against each other.
#[derive(Debug, Clone)]
pub struct PageStore {
    pages_dir: PathBuf,
    meta_file: PathBuf,
}

impl PageStore {
    /// Create a store over existing locations without touching the filesystem
    pub fn new(pages_dir: PathBuf, meta_file: PathBuf) -> Self {
        debug!("Creating PageStore with pages dir {:?} and catalogue {:?}", pages_dir, meta_file);
        Self { pages_dir, meta_file }
    }

    /// Create a store, making sure the pages directory and the catalogue's
    /// parent directory exist.
    pub fn open(pages_dir: PathBuf, meta_file: PathBuf) -> Result<Self, StoreError> {
        let mut dirs = vec![pages_dir.clone()];
        if let Some(parent) = meta_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            dirs.push(parent.to_path_buf());
        }
        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|source| StoreError::Write { path: dir.clone(), source })?;
        }
        Ok(Self::new(pages_dir, meta_file))
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    pub fn meta_file(&self) -> &Path {
        &self.meta_file
    }

    /// Location of the body file for `id`. Pure; no I/O.
    pub fn derive_path(&self, id: &str) -> PathBuf {
        self.pages_dir.join(format!("{id}.{PAGE_EXTENSION}"))
    }

    /// Read every catalogue record as a stub.
    ///
    /// An absent or malformed catalogue reads as empty. One bad record
    /// empties the whole result rather than yielding a partial list.
    pub fn list(&self) -> Catalogue {
        let file = match File::open(&self.meta_file) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Catalogue {:?} does not exist yet", self.meta_file);
                return Vec::new();
            }
            Err(e) => {
                warn!("Unable to open catalogue {:?}: {}", self.meta_file, e);
                return Vec::new();
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(file);

        let mut pages = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Invalid catalogue {:?}: {}", self.meta_file, e);
                    return Vec::new();
                }
            };
            if record.len() != FIELDS_PER_RECORD {
                warn!(
                    "Invalid catalogue {:?}: record {} has {} fields, expected {}",
                    self.meta_file,
                    index + 1,
                    record.len(),
                    FIELDS_PER_RECORD
                );
                return Vec::new();
            }
            pages.push(Page::stub(&record[0], PathBuf::from(&record[1]), &record[2]));
        }

        debug!("Read {} catalogue records from {:?}", pages.len(), self.meta_file);
        pages
    }

    /// Load the first catalogue record matching `id`, together with its body.
    pub fn load(&self, id: &str) -> Result<Page, StoreError> {
        let mut page = self
            .list()
            .into_iter()
            .find(|stub| stub.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let body = fs::read(&page.page_path).map_err(|source| {
            warn!("Catalogue entry '{}' points at unreadable {:?}: {}", id, page.page_path, source);
            StoreError::Read { path: page.page_path.clone(), source }
        })?;

        debug!("Loaded page '{}' ({} bytes)", id, body.len());
        page.body = Some(body);
        Ok(page)
    }

    /// Write the page body to its path, creating or truncating the file.
    /// The catalogue is left untouched.
    pub fn save(&self, page: &Page) -> Result<(), StoreError> {
        let write_err = |source: io::Error| StoreError::Write { path: page.page_path.clone(), source };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&page.page_path).map_err(write_err)?;
        file.write_all(page.body_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        info!("Wrote page '{}' to {:?}", page.id, page.page_path);
        Ok(())
    }

    /// Append one `(id, path, title)` record to the catalogue, creating the
    /// file if needed. The record is flushed before returning.
    pub fn append_metadata(&self, id: &str, path: &Path, title: &str) -> Result<(), StoreError> {
        let write_err = |source: io::Error| StoreError::Write { path: self.meta_file.clone(), source };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.meta_file)
            .map_err(write_err)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let path_field = path.to_string_lossy();
        writer
            .write_record([id, path_field.as_ref(), title])
            .map_err(|e| write_err(e.into()))?;
        writer.flush().map_err(write_err)?;

        info!("Appended catalogue record for '{}'", id);
        Ok(())
    }
}
