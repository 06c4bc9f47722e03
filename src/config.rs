//! Interpreter settings.
//!
//! Layered from lowest to highest precedence: built-in defaults, a TOML file,
//! environment variables, then command-line flags (applied by the caller).
//!
//! ```toml
//! [tape]
//! capacity = 1000
//! dump_cells = 10
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cross_xdg::BaseDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::tape::DEFAULT_CAPACITY;

pub const DEFAULT_DUMP_CELLS: usize = 10;
const CONFIG_FILE: &str = "lince.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Number of tape cells.
    pub capacity: usize,
    /// Number of cells shown by the debug dump.
    pub dump_cells: usize,
}

/// On-disk layout of `lince.toml`. Unknown tables and keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tape: TapeSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TapeSection {
    capacity: Option<usize>,
    dump_cells: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            dump_cells: DEFAULT_DUMP_CELLS,
        }
    }
}

impl Settings {
    /// Defaults, overlaid with the config file and then the environment.
    ///
    /// `explicit` is a file named on the command line; otherwise
    /// `LINCE_CONFIG` or the user config directory is tried.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut settings = Self::default();
        if let Some(path) = explicit.map(Path::to_path_buf).or_else(config_path) {
            settings.apply_file(&path);
        }
        settings.apply_env(|key| env::var(key).ok());
        settings.normalized()
    }

    /// Overlay values from a TOML document. Unknown keys are ignored; a
    /// wrongly typed value rejects the whole document.
    pub fn apply_toml(&mut self, source: &str) -> Result<(), toml::de::Error> {
        let ConfigFile { tape } = toml::from_str(source)?;
        if let Some(capacity) = tape.capacity {
            self.capacity = capacity;
        }
        if let Some(cells) = tape.dump_cells {
            self.dump_cells = cells;
        }
        Ok(())
    }

    /// Overlay `LINCE_CAPACITY` and `LINCE_DUMP_CELLS` as read by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<usize>().ok());
        if let Some(capacity) = parse("LINCE_CAPACITY") {
            self.capacity = capacity;
        }
        if let Some(cells) = parse("LINCE_DUMP_CELLS") {
            self.dump_cells = cells;
        }
    }

    /// Capacity of at least one cell; dump no wider than the tape.
    pub fn normalized(mut self) -> Self {
        self.capacity = self.capacity.max(1);
        self.dump_cells = self.dump_cells.min(self.capacity);
        self
    }

    fn apply_file(&mut self, path: &Path) {
        let Ok(content) = fs::read_to_string(path) else {
            debug!(path = %path.display(), "no config file");
            return;
        };
        match self.apply_toml(&content) {
            Ok(()) => debug!(path = %path.display(), "loaded config"),
            Err(e) => warn!(path = %path.display(), "ignoring malformed config: {e}"),
        }
    }
}

/// `LINCE_CONFIG`, else `lince.toml` in the user config directory.
fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("LINCE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    // On Linux and macOS: ~/.config
    let Ok(base_dirs) = BaseDirs::new() else {
        debug!("no user config directory");
        return None;
    };
    Some(PathBuf::from(base_dirs.config_home()).join(CONFIG_FILE))
}
