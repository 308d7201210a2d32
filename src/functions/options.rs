use serde_json::Value;

use crate::error::{HydrateError, Result};

const KNOWN_OPTIONS: &[&str] = &["prefix", "region", "required"];

/// Arguments of a single `{{ ssm "name" "default" "key=value"... }}` call.
///
/// The first argument is the parameter name, the second an optional default.
/// Anything after that is a `key=value` option.
#[derive(Debug, Clone, PartialEq)]
pub struct SsmArgs {
    pub name: String,
    /// Empty defaults count as absent.
    pub default: Option<String>,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub required: bool,
}

impl SsmArgs {
    pub fn parse(function: &str, args: &[Value]) -> Result<Self> {
        let invalid = |reason: String| HydrateError::InvalidFunctionArgs {
            function: function.to_string(),
            reason,
        };

        let name = string_at(function, args, 0, "the parameter name")?
            .ok_or_else(|| invalid("missing the parameter name".to_string()))?
            .to_string();
        let default = string_at(function, args, 1, "the default")?
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let mut parsed = Self {
            name,
            default,
            prefix: None,
            region: None,
            required: true,
        };

        for index in 2..args.len() {
            let option = string_at(function, args, index, "an option")?.unwrap_or_default();
            let (key, value) = option
                .split_once('=')
                .ok_or_else(|| invalid(format!("option '{option}' is not of the form key=value")))?;
            match key {
                "prefix" => parsed.prefix = Some(value.to_string()).filter(|p| !p.is_empty()),
                "region" => parsed.region = Some(value.to_string()).filter(|r| !r.is_empty()),
                "required" => {
                    parsed.required = value.parse::<bool>().map_err(|_| {
                        invalid(format!("'required' must be true or false, got {value}"))
                    })?;
                }
                _ => {
                    return Err(invalid(format!(
                        "unknown option '{key}', expected one of {}",
                        KNOWN_OPTIONS.join(", ")
                    )));
                }
            }
        }

        Ok(parsed)
    }

    /// The name actually sent to the store.
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{}", self.name),
            None => self.name.clone(),
        }
    }
}

fn string_at<'a>(
    function: &str,
    args: &'a [Value],
    index: usize,
    what: &str,
) -> Result<Option<&'a str>> {
    match args.get(index) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(HydrateError::InvalidFunctionArgs {
            function: function.to_string(),
            reason: format!("{what} must be a string, got {other}"),
        }),
    }
}
