use std::path::Path;

use console::style;
use lithos_gotmpl_core::{Error, FunctionSource, Template};
use serde_json::Value;

use crate::error::{HydrateError, Result};
use crate::functions::FunctionMap;

/// Render the template file at `path` with `functions` and no variables.
///
/// With `verbose`, the rendered text is also echoed to stderr.
pub fn render(path: &Path, functions: &FunctionMap, verbose: bool) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| HydrateError::Io {
        context: format!("reading template {}", path.display()),
        source: e,
    })?;

    log::info!("rendering {}", path.display());
    let rendered = render_str(&path.display().to_string(), &content, functions)?;

    if verbose {
        eprintln!("{} {}", style("==>").cyan().bold(), style(path.display()).cyan());
        eprintln!("{rendered}");
    }

    Ok(rendered)
}

/// Render template `content` registered under `name`.
///
/// Parsing and execution are kept apart so a malformed template, or one
/// calling a function the map does not have, is reported as `TemplateParse`
/// and a failing function call as `TemplateExecution`. Calls are checked on
/// every branch, taken or not. Either way nothing is returned for the
/// document.
pub fn render_str(name: &str, content: &str, functions: &FunctionMap) -> Result<String> {
    let parse_error = |source| HydrateError::TemplateParse {
        path: name.to_string(),
        source,
    };

    let template = Template::parse_with_functions(name, content, functions.registry())
        .map_err(parse_error)?;

    let analysis = template.analyze();
    if let Some(call) = analysis
        .functions
        .iter()
        .find(|call| call.source == FunctionSource::Unknown)
    {
        return Err(parse_error(Error::parse_with_span(
            format!("function \"{}\" not defined", call.name),
            call.span,
        )));
    }

    template
        .render(&Value::Null)
        .map_err(|e| HydrateError::TemplateExecution {
            path: name.to_string(),
            source: e,
        })
}
