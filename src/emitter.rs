use crate::{
    config::GenConfig,
    descriptor::SyncDescriptor,
    error::{GenError, Result},
};
use std::{io::Write, path::PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Mode of the generated script.
#[cfg(unix)]
const SCRIPT_MODE: u32 = 0o755;

/// Builds one synchronization command. The trailing slash goes on the first
/// path only, so the sync tool copies the directory contents rather than the
/// directory itself.
pub fn command_line(root_command: &[u8], dir: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let parts: [&[u8]; 9] = [root_command, b" ", from, b"/", dir, b"/ ", to, b"/", dir];
    parts.concat()
}

/// Wraps a command in an echo statement. Single quotes inside `cmd` are not
/// escaped.
pub fn echo_line(cmd: &[u8]) -> Vec<u8> {
    let parts: [&[u8]; 3] = [b"echo '", cmd, b"'"];
    parts.concat()
}

/// Renders the full script for `descriptor`.
///
/// Every subdirectory produces a forward (source to destination) and a
/// reverse (destination to source) command, each preceded by an echo of
/// itself, followed by a blank line. Path bytes are copied as they are.
pub fn render(descriptor: &SyncDescriptor, config: &GenConfig) -> Vec<u8> {
    let mut script = format!("{}\n{}\n\n", config.interpreter, config.header).into_bytes();

    for dir in &descriptor.subdirectories {
        let to = command_line(
            &descriptor.root_command,
            dir,
            &descriptor.source,
            &descriptor.destination,
        );
        let from = command_line(
            &descriptor.root_command,
            dir,
            &descriptor.destination,
            &descriptor.source,
        );

        for cmd in [to, from] {
            script.extend_from_slice(&echo_line(&cmd));
            script.push(b'\n');
            script.extend_from_slice(&cmd);
            script.push(b'\n');
        }
        script.push(b'\n');
    }

    script
}

/// Path the script for `descriptor` is written to.
pub fn script_path(descriptor: &SyncDescriptor, config: &GenConfig) -> PathBuf {
    descriptor.base_dir.join(&config.script_name)
}

/// Renders the script and writes it next to the specification file,
/// replacing any previous script. Returns the path written.
///
/// The content is written to a temporary file in the same directory and
/// renamed into place, so a failed write leaves the previous script intact.
pub fn write_script(descriptor: &SyncDescriptor, config: &GenConfig) -> Result<PathBuf> {
    println!("{descriptor}");

    let target = script_path(descriptor, config);
    let script = render(descriptor, config);

    let mut tmp =
        NamedTempFile::new_in(&descriptor.base_dir).map_err(|e| GenError::write(&target, e))?;
    tmp.write_all(&script)
        .map_err(|e| GenError::write(&target, e))?;

    #[cfg(unix)]
    {
        use std::{fs::Permissions, os::unix::fs::PermissionsExt};
        tmp.as_file()
            .set_permissions(Permissions::from_mode(SCRIPT_MODE))
            .map_err(|e| GenError::write(&target, e))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| GenError::write(&target, e))?;

    tmp.persist(&target)
        .map_err(|e| GenError::write(&target, e.error))?;

    debug!("wrote {} bytes to {}", script.len(), target.display());
    Ok(target)
}
