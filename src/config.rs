use crate::{
    error::{GenError, Result},
    fix_path,
    utils::{get_ron_formatter, FixPath},
};
use ron::{error::SpannedResult, extensions::Extensions, ser::to_string_pretty, Options};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf};
use tracing::debug;

/// Name of the script written next to each specification file.
pub const DEFAULT_SCRIPT_NAME: &str = "_all.sh";
pub const DEFAULT_INTERPRETER: &str = "#!/bin/bash";
pub const DEFAULT_HEADER: &str = "# AUTOGEN'D - DO NOT EDIT!";
/// Extension used to pick specification files out of a directory argument.
pub const DEFAULT_SPEC_EXTENSION: &str = "gss";

/// Settings that shape the generated scripts and the run itself.
///
/// Loaded from an optional RON file. Every field may be left out, in which
/// case the built-in default applies.
///
/// ```ron
/// (
///     script_name: "_all.sh",
///     interpreter: "#!/bin/bash",
///     header: "# AUTOGEN'D - DO NOT EDIT!",
///     spec_extension: "gss",
///     strict: false,
/// )
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GenConfig {
    /// File name of the generated script.
    pub script_name: String,
    /// First line of the script.
    pub interpreter: String,
    /// Comment line warning that the script is generated.
    pub header: String,
    /// Extension of specification files found inside directory arguments.
    pub spec_extension: String,
    /// Exit with a failure status when any input could not be processed.
    pub strict: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            script_name: DEFAULT_SCRIPT_NAME.into(),
            interpreter: DEFAULT_INTERPRETER.into(),
            header: DEFAULT_HEADER.into(),
            spec_extension: DEFAULT_SPEC_EXTENSION.into(),
            strict: false,
        }
    }
}

/// Locations searched for a config file when none is given, in order.
fn default_config_paths() -> Vec<PathBuf> {
    match home::home_dir() {
        Some(home) => vec![
            home.join(".gen-sync-scripts.ron"),
            home.join(".config/gen-sync-scripts/config.ron"),
        ],
        None => Vec::new(),
    }
}

impl GenConfig {
    /// Loads the config file.
    ///
    /// With an explicit `filepath` the file must exist and parse. Without
    /// one, the first existing file among the default locations is used,
    /// and the built-in defaults apply when there is none.
    pub fn load(filepath: Option<&str>) -> Result<Self> {
        if let Some(path) = filepath {
            return Self::from_file(fix_path!(path));
        }

        match default_config_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parses a RON config file.
    pub fn from_file(path: PathBuf) -> Result<Self> {
        debug!("loading config from {}", path.display());

        let contents = fs::read_to_string(&path).map_err(|source| GenError::ConfigRead {
            path: path.clone(),
            source,
        })?;

        Self::from_ron(&contents).map_err(|source| GenError::ConfigParse { path, source })
    }

    /// Parses RON text into a config.
    pub fn from_ron(contents: &str) -> SpannedResult<Self> {
        Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(contents)
    }

    /// Renders the config as pretty RON, suitable as a starting file.
    pub fn to_ron(&self) -> std::result::Result<String, ron::Error> {
        to_string_pretty(self, get_ron_formatter())
    }
}

impl fmt::Display for GenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        write!(f, "script_name: {}, ", self.script_name)?;
        write!(f, "interpreter: {}, ", self.interpreter)?;
        write!(f, "header: {}, ", self.header)?;
        write!(f, "spec_extension: {}, ", self.spec_extension)?;
        write!(f, "strict: {} ", self.strict)?;
        write!(f, "}}")
    }
}
