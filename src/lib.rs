pub mod config;
pub mod error;
pub mod functions;
pub mod output;
pub mod render;
pub mod ssm;

use std::path::{Path, PathBuf};

use crate::error::{HydrateError, Result};
use crate::functions::FunctionMap;

pub use functions::build_functions;
pub use render::render;

/// Options for the `hydrate` operation.
pub struct HydrateOptions {
    /// Template files, rendered in order.
    pub values: Vec<PathBuf>,
    /// Also write each rendered file into this directory.
    pub target_dir: Option<PathBuf>,
    /// Echo rendered content to stderr.
    pub verbose: bool,
    /// Render only; never write.
    pub dry_run: bool,
}

/// Outcome for one template file.
pub struct HydratedFile {
    pub source: PathBuf,
    pub content: String,
    /// Files written for this template (empty on a dry run).
    pub written: Vec<PathBuf>,
}

/// Render every template in `options.values` with `functions`, writing the
/// result back over each template unless this is a dry run.
///
/// Stops at the first file that fails; files before it have already been
/// written, the failing one is left untouched.
pub fn hydrate(options: &HydrateOptions, functions: &FunctionMap) -> Result<Vec<HydratedFile>> {
    let mut results = Vec::with_capacity(options.values.len());

    for path in &options.values {
        let content = render(path, functions, options.verbose)?;

        let written = if options.dry_run {
            log::info!("dry run, not writing {}", path.display());
            Vec::new()
        } else {
            write_output(path, options.target_dir.as_deref(), &content)?
        };

        results.push(HydratedFile {
            source: path.clone(),
            content,
            written,
        });
    }

    Ok(results)
}

/// Write rendered `content` into `target_dir` (if any) and over `path`.
pub fn write_output(path: &Path, target_dir: Option<&Path>, content: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(dir) = target_dir {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| HydrateError::Io {
                context: format!("determining file name of {}", path.display()),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path has no file name",
                ),
            })?;
        written.push(output::write_file_in(dir, file_name, content)?);
    }

    output::write_file(path, content)?;
    written.push(path.to_path_buf());

    log::info!("wrote {}", path.display());
    Ok(written)
}
