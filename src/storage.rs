use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Error;

/// String key-value persistence backing the [`Session`](crate::Session).
///
/// Writes are whole-value replacements; there is no transaction across keys.
///
/// # Example
///
/// ```rust,ignore
/// struct KeyringStore { service: String }
///
/// impl KeyValueStore for KeyringStore {
///     fn get(&self, key: &str) -> Result<Option<String>, Error> { ... }
///     fn set(&self, key: &str, value: &str) -> Result<(), Error> { ... }
///     fn remove(&self, key: &str) -> Result<(), Error> { ... }
/// }
/// ```
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Process-local store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        lock(&self.entries)?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object file.
///
/// Every mutation rewrites the whole file through a sibling temporary file
/// and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries. A missing file is
    /// an empty store; it is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the file exists but cannot be read or
    /// is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::Storage(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(Error::Storage(format!("{}: {e}", path.display()))),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), Error> {
        let storage_err = |e: std::io::Error| Error::Storage(format!("{}: {e}", self.path.display()));

        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| Error::Storage(format!("{}: {e}", self.path.display())))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        write_private(&tmp, &bytes).map_err(storage_err)?;
        std::fs::rename(&tmp, &self.path).map_err(storage_err)
    }

    /// Apply `change` to a copy of the entries and swap it in only once the
    /// copy is on disk.
    fn update(&self, change: impl FnOnce(&mut HashMap<String, String>) -> bool) -> Result<(), Error> {
        let mut entries = lock(&self.entries)?;
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

/// Write `bytes` to a fresh file readable only by the owner.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, Error> {
    mutex
        .lock()
        .map_err(|_| Error::Storage("store lock poisoned".into()))
}
