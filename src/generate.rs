use crate::{
    config::GenConfig,
    descriptor::SyncDescriptor,
    emitter,
    error::{GenError, Result},
    utils::collect_spec_files,
};
use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

/// What a run did: the scripts written and the inputs that failed.
#[derive(Debug, Default)]
pub struct Report {
    pub generated: Vec<PathBuf>,
    pub failures: Vec<GenError>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives parsing and emitting for every input of a run.
pub struct Generator {
    config: GenConfig,
    print_only: bool,
}

impl Generator {
    pub fn new(config: GenConfig) -> Self {
        Self {
            config,
            print_only: false,
        }
    }

    /// Print scripts to stdout instead of writing them.
    pub fn print_only(mut self, print_only: bool) -> Self {
        self.print_only = print_only;
        self
    }

    /// Progress goes to stderr in print mode so stdout carries only scripts.
    fn status(&self, message: fmt::Arguments<'_>) {
        if self.print_only {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    /// Turns the command line paths into the list of specification files to
    /// process. Paths that do not exist are reported and left out;
    /// directories are expanded into the specification files beneath them.
    pub fn resolve_inputs<P: AsRef<Path>>(&self, args: &[P]) -> (Vec<PathBuf>, Vec<GenError>) {
        let mut inputs = Vec::new();
        let mut failures = Vec::new();

        for arg in args {
            let arg = arg.as_ref();
            match fs::metadata(arg) {
                Ok(meta) if meta.is_dir() => {
                    let found = collect_spec_files(arg, &self.config.spec_extension);
                    if found.is_empty() {
                        self.status(format_args!(
                            "No .{} files found in {}",
                            self.config.spec_extension,
                            arg.display()
                        ));
                    }
                    debug!("{} expands to {} files", arg.display(), found.len());
                    inputs.extend(found);
                }
                Ok(_) => inputs.push(arg.to_path_buf()),
                Err(source) => {
                    eprintln!("Unable to process {} - {source}", arg.display());
                    failures.push(GenError::InputNotFound {
                        path: arg.to_path_buf(),
                        source,
                    });
                }
            }
        }

        (inputs, failures)
    }

    /// Parses one specification file and writes (or prints) its script.
    ///
    /// Returns the path of the written script, or `None` in print mode.
    pub fn generate(&self, spec: &Path) -> Result<Option<PathBuf>> {
        self.status(format_args!("Generating synch scripts for {}", spec.display()));

        let descriptor = SyncDescriptor::from_file(spec).inspect_err(|e| {
            eprintln!("Unable to parse {} - {e}", spec.display());
        })?;

        if self.print_only {
            let script = emitter::render(&descriptor, &self.config);
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&script)
                .and_then(|()| stdout.flush())
                .map_err(|e| GenError::write("<stdout>", e))?;
            return Ok(None);
        }

        let written = emitter::write_script(&descriptor, &self.config).inspect_err(|e| {
            eprintln!(
                "Unable to write script to {} - {e}",
                emitter::script_path(&descriptor, &self.config).display()
            );
        })?;

        Ok(Some(written))
    }

    /// Processes every argument in order. A failure only abandons the input
    /// it belongs to.
    pub fn run<P: AsRef<Path>>(&self, args: &[P]) -> Report {
        let (inputs, failures) = self.resolve_inputs(args);
        let mut report = Report {
            failures,
            ..Report::default()
        };

        for spec in &inputs {
            match self.generate(spec) {
                Ok(Some(path)) => report.generated.push(path),
                Ok(None) => {}
                Err(e) => {
                    eprintln!(
                        "Unable to generate the scripts for {} - {e}",
                        spec.display()
                    );
                    report.failures.push(e);
                }
            }
        }

        debug!(
            "{} scripts generated, {} failures",
            report.generated.len(),
            report.failures.len()
        );
        report
    }
}
