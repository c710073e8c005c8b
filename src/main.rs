use anyhow::{Context, Result};
use gen_sync_scripts::{args, GenConfig, Generator};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = args::get_env_args();

    if args.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("Failed to set tracing subscriber")?;
    }

    if args.new {
        let template = GenConfig::default()
            .to_ron()
            .context("Failed to serialize config template")?;
        println!("{template}");
        return Ok(());
    }

    let config =
        GenConfig::load(args.config_path.as_deref()).context("Failed to load config file")?;
    let strict = args.strict || config.strict;
    tracing::debug!("using config {config}");

    let report = Generator::new(config).print_only(args.print).run(&args.paths);

    if strict && !report.is_success() {
        eprintln!(
            "{} of the inputs could not be processed",
            report.failures.len()
        );
        std::process::exit(1);
    }

    Ok(())
}
