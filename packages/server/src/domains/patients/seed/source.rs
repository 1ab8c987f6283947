//! Seed file lookup
//!
//! The seed CSV ships inside the binary (`resources/seed/`), like a packaged
//! resource. A seed root directory can be configured to use files on disk
//! instead.

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::fmt;
use std::path::{Path, PathBuf};

/// Resource names tried in order; the first one present wins
pub const SEED_RESOURCE_NAMES: [&str; 2] = ["seed/hms_patients.csv", "seed/patients.csv"];

// Embed seed resources at compile time
#[derive(RustEmbed)]
#[folder = "resources/"]
pub struct SeedAssets;

/// Where a seed file was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOrigin {
    Embedded,
    Disk(PathBuf),
}

impl fmt::Display for SeedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedOrigin::Embedded => write!(f, "embedded"),
            SeedOrigin::Disk(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A seed file read fully into memory
#[derive(Debug, Clone)]
pub struct SeedFile {
    pub name: String,
    pub origin: SeedOrigin,
    contents: String,
}

impl SeedFile {
    /// Find the seed file, trying each resource name in order.
    ///
    /// With `seed_root`, names resolve against that directory; otherwise the
    /// embedded resources are used. `Ok(None)` means there is nothing to seed.
    pub fn locate(seed_root: Option<&Path>) -> Result<Option<Self>> {
        for name in SEED_RESOURCE_NAMES {
            let found = match seed_root {
                Some(root) => Self::from_dir(root, name)?,
                None => Self::from_embedded(name)?,
            };
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    /// Read a specific file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;

        Ok(Self::new(
            path.display().to_string(),
            SeedOrigin::Disk(path.to_path_buf()),
            contents,
        ))
    }

    fn from_dir(root: &Path, name: &str) -> Result<Option<Self>> {
        let path = root.join(name);
        if !path.is_file() {
            return Ok(None);
        }

        let mut file = Self::from_path(&path)?;
        file.name = name.to_string();
        Ok(Some(file))
    }

    fn from_embedded(name: &str) -> Result<Option<Self>> {
        let Some(asset) = SeedAssets::get(name) else {
            return Ok(None);
        };

        let contents = String::from_utf8(asset.data.into_owned())
            .with_context(|| format!("Seed resource {} is not valid UTF-8", name))?;

        Ok(Some(Self::new(name.to_string(), SeedOrigin::Embedded, contents)))
    }

    fn new(name: String, origin: SeedOrigin, contents: String) -> Self {
        // Spreadsheet exports often start with a byte order mark
        let contents = match contents.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => contents,
        };

        Self {
            name,
            origin,
            contents,
        }
    }

    /// Raw lines in file order, line endings removed
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.contents.lines()
    }
}
