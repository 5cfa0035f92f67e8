use crate::core::format;
use crate::core::loader::{self, LoadReport};
use crate::domain::ports::{ConfigProvider, PetStore};
use crate::domain::registry::PetList;
use crate::utils::error::{CareError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_DATA_FILE: &str = "data/cuddlecare.txt";

const TMP_ATTEMPTS: usize = 16;

/// The section-delimited text file holding pets and treatments.
#[derive(Debug)]
pub struct FlatFileStore {
    path: PathBuf,
    atomic_save: bool,
    tmp_counter: AtomicU64,
}

impl FlatFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic_save: true,
            tmp_counter: AtomicU64::new(0),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.data_file()).with_atomic_save(config.atomic_save())
    }

    /// With atomic saves off the target is truncated and rewritten in place,
    /// so a crash mid-write can leave a partial file.
    pub fn with_atomic_save(mut self, enabled: bool) -> Self {
        self.atomic_save = enabled;
        self
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn unique_tmp_path(&self) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = self
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.path
            .with_file_name(format!(".{}.{}.{}.tmp", file_name, std::process::id(), n))
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| CareError::storage(parent.display().to_string(), e))?;
            }
        }
        Ok(())
    }

    /// Creates a fresh temp file next to the target. A leftover file from an
    /// earlier process that had the same pid is skipped, not reused.
    fn create_tmp_file(&self) -> Result<(PathBuf, fs::File)> {
        let mut attempt = 0;
        loop {
            let temp = self.unique_tmp_path();
            match fs::OpenOptions::new().create_new(true).write(true).open(&temp) {
                Ok(file) => return Ok((temp, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists
                    && attempt + 1 < TMP_ATTEMPTS =>
                {
                    tracing::warn!("Temp file {} already exists, skipping it", temp.display());
                    attempt += 1;
                }
                Err(e) => return Err(CareError::storage(temp.display().to_string(), e)),
            }
        }
    }

    fn write_atomically(&self, contents: &str) -> Result<()> {
        let (temp, mut file) = self.create_tmp_file()?;
        let written = file
            .write_all(contents.as_bytes())
            .and_then(|_| file.sync_all());
        drop(file);
        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(CareError::storage(temp.display().to_string(), e));
        }

        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(CareError::storage(self.display_path(), e));
        }
        Ok(())
    }
}

impl PetStore for FlatFileStore {
    fn load(&self, pets: &mut PetList) -> Result<LoadReport> {
        if !self.path.exists() {
            tracing::info!("Save file {} does not exist, starting empty", self.display_path());
            pets.clear();
            return Ok(LoadReport::default());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| CareError::storage(self.display_path(), e))?;
        Ok(loader::load_from_str(&contents, pets))
    }

    fn save(&self, pets: &PetList) -> Result<()> {
        self.ensure_parent_dir()?;
        let contents = format::encode(pets);

        if self.atomic_save {
            self.write_atomically(&contents)?;
        } else {
            fs::write(&self.path, contents)
                .map_err(|e| CareError::storage(self.display_path(), e))?;
        }

        tracing::debug!(
            path = %self.path.display(),
            pets = pets.len(),
            atomic = self.atomic_save,
            "Data saved"
        );
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Pet;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(dir.path().join("absent.txt"));
        let mut pets = PetList::new();
        pets.add(Pet::new("Stale", "Fish", 1));

        let report = store.load(&mut pets).unwrap();
        assert!(pets.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("pets.txt");
        let store = FlatFileStore::new(&path);
        let mut pets = PetList::new();
        pets.add(Pet::new("Milo", "Cat", 3));

        store.save(&pets).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Pets\nMilo | Cat | 3\n"));
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pets.txt");
        let store = FlatFileStore::new(&path);
        let mut pets = PetList::new();
        pets.add(Pet::new("Milo", "Cat", 3));

        store.save(&pets).unwrap();
        store.save(&pets).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_atomic_save_steps_over_leftover_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pets.txt");
        let leftover = dir
            .path()
            .join(format!(".pets.txt.{}.0.tmp", std::process::id()));
        fs::write(&leftover, "half written").unwrap();

        let store = FlatFileStore::new(&path);
        let mut pets = PetList::new();
        pets.add(Pet::new("Milo", "Cat", 3));
        store.save(&pets).unwrap();
        store.save(&pets).unwrap();

        assert!(fs::read_to_string(&path).unwrap().starts_with("# Pets\nMilo | Cat | 3\n"));
        assert_eq!(fs::read_to_string(&leftover).unwrap(), "half written");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_in_place_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pets.txt");
        fs::write(&path, "# Pets\nold | junk | 1\nmore | junk | 2\n").unwrap();
        let store = FlatFileStore::new(&path).with_atomic_save(false);

        store.save(&PetList::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Pets\n\n# Treatments\n");
    }

    #[test]
    fn test_unreadable_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be cannot be read as text.
        let path = dir.path().join("pets.txt");
        fs::create_dir(&path).unwrap();
        let store = FlatFileStore::new(&path);
        let mut pets = PetList::new();
        assert!(matches!(
            store.load(&mut pets),
            Err(CareError::StorageError { .. })
        ));
    }
}
