use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ssm-hydrate",
    about = "Render YAML templates with values from AWS SSM Parameter Store",
    version
)]
pub struct Cli {
    /// Template files to render in place (comma separated or repeated)
    #[arg(
        short = 'f',
        long = "values",
        value_name = "FILE",
        value_delimiter = ',',
        required = true
    )]
    pub values: Vec<PathBuf>,

    /// Also write rendered files into this directory
    #[arg(short = 'o', long)]
    pub target_dir: Option<PathBuf>,

    /// AWS profile used to fetch the SSM parameters
    #[arg(short, long)]
    pub profile: Option<String>,

    /// AWS region used to fetch the SSM parameters
    #[arg(short, long)]
    pub region: Option<String>,

    /// Show the rendered content of each file
    #[arg(short, long)]
    pub verbose: bool,

    /// Render without replacing any file content
    #[arg(short, long)]
    pub dry_run: bool,
}
