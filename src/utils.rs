use ron::{extensions::Extensions, ser::PrettyConfig};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A macro that expands a user supplied path, falling back to the path
/// itself when there is nothing to expand.
///
/// # Examples
///
/// ```rust
/// use gen_sync_scripts::fix_path;
/// use gen_sync_scripts::utils::FixPath;
/// use std::path::PathBuf;
///
/// let path = fix_path!("/etc/gen-sync-scripts.ron");
/// assert_eq!(path, PathBuf::from("/etc/gen-sync-scripts.ron"));
/// ```
#[macro_export]
macro_rules! fix_path {
    ($path:expr) => {
        $path.fix_path().unwrap_or($path.into())
    };
}

/// A trait for expanding `~` to the home directory and `./` to the current
/// working directory.
///
/// Returns `None` when the path needs no change or when the directory it
/// would be expanded against cannot be determined.
pub trait FixPath<T> {
    fn fix_path(&self) -> Option<PathBuf>;
}

/// Expand a path for type `std::path::PathBuf`
///
/// # Examples
///
/// ```rust
/// use gen_sync_scripts::utils::FixPath;
/// use std::path::PathBuf;
///
/// let path = PathBuf::from("~/specs").fix_path();
/// assert_eq!(path, home::home_dir().map(|h| h.join("specs")));
///
/// assert!(PathBuf::from("/srv/specs").fix_path().is_none());
/// ```
impl FixPath<PathBuf> for PathBuf {
    fn fix_path(&self) -> Option<PathBuf> {
        self.as_path().fix_path()
    }
}

impl FixPath<&Path> for &Path {
    fn fix_path(&self) -> Option<PathBuf> {
        if let Ok(rest) = self.strip_prefix("~") {
            return home::home_dir().map(|home| home.join(rest));
        }
        if let Ok(rest) = self.strip_prefix(".") {
            return std::env::current_dir().ok().map(|cwd| cwd.join(rest));
        }
        None
    }
}

/// Expand a path for type `std::string::String`
impl FixPath<String> for String {
    fn fix_path(&self) -> Option<PathBuf> {
        Path::new(self).fix_path()
    }
}

/// Expand a path for string slices
///
/// # Examples
///
/// ```rust
/// use gen_sync_scripts::utils::FixPath;
///
/// assert!("relative/spec.gss".fix_path().is_none());
/// assert!("./spec.gss".fix_path().unwrap().is_absolute());
/// ```
impl FixPath<&str> for &str {
    fn fix_path(&self) -> Option<PathBuf> {
        Path::new(self).fix_path()
    }
}

/// Get a pretty printer configuration for RON serialization.
pub fn get_ron_formatter() -> PrettyConfig {
    PrettyConfig::new()
        .depth_limit(2)
        .extensions(Extensions::IMPLICIT_SOME)
}

/// Collect every file under `dir` whose extension is `extension`, sorted by
/// path so that the processing order does not depend on the filesystem.
///
/// Unreadable entries are skipped.
pub fn collect_spec_files<P: AsRef<Path>>(dir: P, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == extension))
        .collect();

    files.sort();
    files
}
