use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gen-sync-scripts")]
#[command(author = "Utsav Balar")]
#[command(version, about, long_about)]
pub struct Args {
    /// Specification files, or directories to search for them
    pub paths: Vec<PathBuf>,

    /// Print the generated scripts instead of writing them
    #[clap(short, long)]
    pub print: bool,

    /// Exit with a failure status if any input could not be processed
    #[clap(short, long)]
    pub strict: bool,

    /// Prints a new config file template
    #[clap(short, long)]
    pub new: bool,

    /// Show debug logging
    #[clap(short, long)]
    pub verbose: bool,

    /// The path of the config file (default: ~/.gen-sync-scripts.ron)
    #[clap(long = "cpath")]
    pub config_path: Option<String>,
}

pub fn get_env_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_paths_and_flags() {
        let args = Args::parse_from(["gen-sync-scripts", "-s", "a.gss", "specs/", "--cpath", "c.ron"]);

        assert_eq!(args.paths, vec![PathBuf::from("a.gss"), PathBuf::from("specs/")]);
        assert!(args.strict);
        assert!(!args.print);
        assert_eq!(args.config_path.as_deref(), Some("c.ron"));
    }

    #[test]
    fn test_no_paths_is_valid() {
        let args = Args::parse_from(["gen-sync-scripts"]);
        assert!(args.paths.is_empty());
    }
}
