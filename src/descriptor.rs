use crate::error::{GenError, Result};
use std::{
    fmt, fs,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};
use tracing::debug;

/// In-memory form of one specification file.
///
/// A specification file is line oriented:
///
/// ```text
/// <root command>
/// <source path>
/// <destination path>
///
/// <subdirectory>
/// <subdirectory>
/// ```
///
/// The descriptor lives only as long as it takes to emit the script for it.
/// Fields are kept as raw bytes: paths on Unix need not be valid UTF-8 and
/// are copied into the script unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDescriptor {
    /// Absolute directory the script is written into.
    pub base_dir: PathBuf,
    /// Command prefix, copied verbatim from the first line.
    pub root_command: Vec<u8>,
    pub source: Vec<u8>,
    pub destination: Vec<u8>,
    /// Subdirectories in file order, duplicates included.
    pub subdirectories: Vec<Vec<u8>>,
}

/// Trim the bytes that never belong to a subdirectory name.
fn trim_subdirectory(line: &[u8]) -> &[u8] {
    let keep = |b: &u8| *b != b' ' && *b != b'/';
    let Some(start) = line.iter().position(keep) else {
        return &[];
    };
    let end = line.iter().rposition(keep).map_or(line.len(), |i| i + 1);
    &line[start..end]
}

/// Reads one line without its `\n` or `\r\n` terminator. `None` at end of input.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

impl SyncDescriptor {
    /// Parses the specification file at `path`.
    ///
    /// The base directory is the absolute form of the file's parent
    /// directory. Fails when the file cannot be read, when the parent cannot
    /// be made absolute, or when the file stops before the destination line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let base_dir = absolute_parent(path)?;

        let file = fs::File::open(path).map_err(|e| GenError::read(path, e))?;
        Self::parse(BufReader::new(file), base_dir, path)
    }

    /// Parses specification text from any buffered reader.
    ///
    /// `origin` is only used to label errors.
    pub fn parse<R: BufRead>(mut reader: R, base_dir: PathBuf, origin: &Path) -> Result<Self> {
        let mut next_line = |missing: &'static str| -> Result<Vec<u8>> {
            read_line(&mut reader)
                .map_err(|e| GenError::read(origin, e))?
                .ok_or_else(|| GenError::Malformed {
                    path: origin.to_path_buf(),
                    missing,
                })
        };

        let root_command = next_line("root command")?;
        let source = next_line("source")?;
        let destination = next_line("destination")?;

        // The separator line carries no data; a missing one just means
        // there are no subdirectories.
        let has_separator = match next_line("separator") {
            Ok(_) => true,
            Err(GenError::Malformed { .. }) => false,
            Err(e) => return Err(e),
        };

        let mut subdirectories = Vec::new();
        if has_separator {
            while let Some(line) = read_line(&mut reader).map_err(|e| GenError::read(origin, e))? {
                let dir = trim_subdirectory(&line);
                if !dir.is_empty() {
                    subdirectories.push(dir.to_vec());
                }
            }
        }

        debug!(
            "parsed {}: {} subdirectories",
            origin.display(),
            subdirectories.len()
        );

        Ok(Self {
            base_dir,
            root_command,
            source,
            destination,
            subdirectories,
        })
    }
}

/// Absolute directory that contains `path`.
fn absolute_parent(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::path::absolute(parent).map_err(|source| GenError::PathResolution {
        path: parent.to_path_buf(),
        source,
    })
}

impl fmt::Display for SyncDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generating scripts in {}", self.base_dir.display())?;
        writeln!(f, "Synch root: {}", String::from_utf8_lossy(&self.root_command))?;
        writeln!(f, "Source: {}", String::from_utf8_lossy(&self.source))?;
        writeln!(f, "Destination: {}", String::from_utf8_lossy(&self.destination))?;
        writeln!(f, "Directories to synch:")?;
        for dir in &self.subdirectories {
            writeln!(f, "{}", String::from_utf8_lossy(dir))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn parse<T: AsRef<[u8]>>(text: T) -> Result<SyncDescriptor> {
        SyncDescriptor::parse(
            Cursor::new(text),
            PathBuf::from("/base"),
            Path::new("test.gss"),
        )
    }

    fn dirs(descriptor: &SyncDescriptor) -> Vec<&str> {
        descriptor
            .subdirectories
            .iter()
            .map(|d| std::str::from_utf8(d).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = parse("rsync -av --delete\n/mnt/a\n/mnt/b\n\nphotos\nmusic\n").unwrap();

        assert_eq!(descriptor.base_dir, PathBuf::from("/base"));
        assert_eq!(descriptor.root_command, b"rsync -av --delete");
        assert_eq!(descriptor.source, b"/mnt/a");
        assert_eq!(descriptor.destination, b"/mnt/b");
        assert_eq!(dirs(&descriptor), vec!["photos", "music"]);
    }

    #[test]
    fn test_header_lines_are_verbatim() {
        let descriptor = parse("  rsync -a  \n /src/ \n/dst/\n\nx\n").unwrap();

        assert_eq!(descriptor.root_command, b"  rsync -a  ");
        assert_eq!(descriptor.source, b" /src/ ");
        assert_eq!(descriptor.destination, b"/dst/");
    }

    #[test]
    fn test_subdirectory_trimming() {
        let descriptor = parse("r\ns\nd\n\n  foo/  \n / // \n/bar/baz/\n\n").unwrap();

        assert_eq!(dirs(&descriptor), vec!["foo", "bar/baz"]);
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let descriptor = parse("r\ns\nd\n\nb\na\nb\n").unwrap();

        assert_eq!(dirs(&descriptor), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_separator_content_is_ignored() {
        let descriptor = parse("r\ns\nd\nnot-a-dir\nreal\n").unwrap();

        assert_eq!(dirs(&descriptor), vec!["real"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let descriptor = parse("rsync -a\r\n/A\r\n/B\r\n\r\nx\r\n").unwrap();

        assert_eq!(descriptor.root_command, b"rsync -a");
        assert_eq!(descriptor.destination, b"/B");
        assert_eq!(dirs(&descriptor), vec!["x"]);
    }

    #[test]
    fn test_non_utf8_bytes_are_kept() {
        let descriptor = parse(b"rsync -a\n/d\xe9p\xf4t\n/B\n\ncaf\xe9/\nx\n").unwrap();

        assert_eq!(descriptor.source, b"/d\xe9p\xf4t");
        assert_eq!(
            descriptor.subdirectories,
            vec![b"caf\xe9".to_vec(), b"x".to_vec()]
        );
    }

    #[test]
    fn test_three_lines_yield_no_subdirectories() {
        let descriptor = parse("r\ns\nd").unwrap();

        assert!(descriptor.subdirectories.is_empty());
    }

    #[test]
    fn test_short_input_is_malformed() {
        let err = parse("rsync -a\n/A\n").unwrap_err();
        assert!(matches!(
            err,
            GenError::Malformed {
                missing: "destination",
                ..
            }
        ));

        let err = parse("").unwrap_err();
        assert!(matches!(
            err,
            GenError::Malformed {
                missing: "root command",
                ..
            }
        ));
    }

    #[test]
    fn test_from_file_resolves_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("backup.gss");
        fs::write(&spec, "rsync -a\n/A\n/B\n\nx\n").unwrap();

        let descriptor = SyncDescriptor::from_file(&spec).unwrap();

        assert_eq!(descriptor.base_dir, dir.path());
        assert_eq!(dirs(&descriptor), vec!["x"]);
    }

    #[test]
    fn test_from_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SyncDescriptor::from_file(dir.path().join("nope.gss")).unwrap_err();

        assert!(matches!(err, GenError::Read { .. }));
        assert!(err.to_string().contains("nope.gss"));
    }
}
