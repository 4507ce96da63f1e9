use crate::{
    persist,
    resolver::ensure_single_line,
    upsert::{self, Keyed},
    ProtoError, ProtoResult,
};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use wgstar_lib::constant::{DEFAULT_WGSTAR_CONF_PATH, ETC_DIR_MODE};

const ENTRY_SEPARATOR: &str = " = ";
const PUBLIC_KEY: &str = "public key";
const PRESHARED_KEY: &str = "preshared key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresharedKeyEntry {
    pub public_key: String,
    pub preshared_key: String,
}

impl PresharedKeyEntry {
    pub fn new(public_key: impl Into<String>, preshared_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            preshared_key: preshared_key.into(),
        }
    }

    /// The public key may not contain the separator, and neither side may
    /// span lines.
    pub fn validate(&self) -> ProtoResult<()> {
        if self.public_key.contains(ENTRY_SEPARATOR) {
            return Err(ProtoError::MalformedEntry {
                line: self.to_string(),
            });
        }
        ensure_single_line(PUBLIC_KEY, &self.public_key)?;
        ensure_single_line(PRESHARED_KEY, &self.preshared_key)
    }

    pub fn parse(line: &str) -> ProtoResult<Self> {
        match line.split_once(ENTRY_SEPARATOR) {
            Some((public_key, preshared_key)) => {
                Ok(Self::new(public_key.trim(), preshared_key.trim()))
            }
            None => Err(ProtoError::MalformedEntry {
                line: line.to_string(),
            }),
        }
    }
}

impl Keyed for PresharedKeyEntry {
    fn key(&self) -> &str {
        &self.public_key
    }
}

impl fmt::Display for PresharedKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ENTRY_SEPARATOR}{}", self.public_key, self.preshared_key)
    }
}

/// Preshared keys by peer public key, kept apart from the WireGuard config so
/// they survive the peer list being regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresharedKeyStore {
    path: PathBuf,
    entries: Vec<PresharedKeyEntry>,
}

impl PresharedKeyStore {
    pub fn empty<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Reads the store at `path`. A missing file yields an empty store bound
    /// to `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> ProtoResult<Self> {
        let mut store = Self::empty(path);

        let content = match fs::read_to_string(&store.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Preshared key store not found ({})", store.path.display());
                return Ok(store);
            }
            Err(e) => return Err(e.into()),
        };

        store.entries = content
            .lines()
            .filter(|line| !line.is_empty())
            .map(PresharedKeyEntry::parse)
            .collect::<ProtoResult<Vec<_>>>()?;

        Ok(store)
    }

    pub fn load_default() -> ProtoResult<Self> {
        Self::load(DEFAULT_WGSTAR_CONF_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[PresharedKeyEntry] {
        &self.entries
    }

    /// Overwrites `path`, creating its directory with mode `0755` if needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ProtoResult<()> {
        self.entries
            .iter()
            .try_for_each(PresharedKeyEntry::validate)?;
        let path = path.as_ref();
        persist::write_private(path, &self.to_string(), ETC_DIR_MODE)?;
        info!(
            "Saved {} preshared key(s) to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }

    pub fn get_preshared_key(&self, public_key: &str) -> Option<&str> {
        upsert::find_by_key(&self.entries, public_key).map(|e| e.preshared_key.as_str())
    }

    /// Upserts the entry and immediately writes the store back to the path it
    /// was loaded from.
    pub fn set_preshared_key(
        &mut self,
        public_key: impl Into<String>,
        preshared_key: impl Into<String>,
    ) -> ProtoResult<()> {
        let entry = PresharedKeyEntry::new(public_key, preshared_key);
        entry.validate()?;
        upsert::upsert(&mut self.entries, entry);
        self.save(&self.path)
    }
}

impl fmt::Display for PresharedKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.entries.iter().map(ToString::to_string).collect();
        writeln!(f, "{}", lines.join("\n"))
    }
}
