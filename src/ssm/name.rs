use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::{HydrateError, Result};

/// Characters allowed in a parameter name, as reported in validation errors.
pub const NAME_PATTERN: &str = r"[a-zA-Z0-9.\-_/]+";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME_PATTERN}$")).expect("valid regex"));

/// Check that `name` consists solely of allowed characters.
///
/// The whole string has to match: a name with a valid suffix but a stray
/// character anywhere is rejected, as is the empty name.
pub fn validate_name(name: &str) -> Result<()> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(HydrateError::InvalidParameterName {
            name: name.to_string(),
            pattern: NAME_PATTERN,
        })
    }
}
