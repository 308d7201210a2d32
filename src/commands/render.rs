use console::style;
use miette::Result;

use ssm_hydrate::config::load_user_config;
use ssm_hydrate::{build_functions, hydrate, HydrateOptions};

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let config = load_user_config()?
        .unwrap_or_default()
        .merge(cli.profile, cli.region);

    let functions = build_functions(config.profile.as_deref(), config.region.as_deref())?;

    let options = HydrateOptions {
        values: cli.values,
        target_dir: cli.target_dir,
        verbose: cli.verbose,
        dry_run: cli.dry_run,
    };

    let results = hydrate(&options, &functions)?;

    for file in &results {
        if file.written.is_empty() {
            println!(
                "{} {}",
                style("rendered").green(),
                file.source.display()
            );
        } else {
            let targets: Vec<String> = file
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            println!(
                "{} {} {} {}",
                style("rendered").green(),
                file.source.display(),
                style("\u{2192}").dim(),
                targets.join(", ")
            );
        }
    }

    if options.dry_run {
        println!(
            "\n{} Dry run \u{2014} no files written.",
            style("\u{2139}").blue().bold()
        );
    }

    Ok(())
}
