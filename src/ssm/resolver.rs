use std::sync::Arc;

use crate::error::{HydrateError, Result};
use crate::ssm::name::validate_name;
use crate::ssm::store::ParameterStore;

/// Looks up parameters by name, falling back to a caller-supplied default
/// when the store has no such parameter.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn ParameterStore>,
    decrypt: bool,
}

impl Resolver {
    pub fn new(store: Arc<dyn ParameterStore>, decrypt: bool) -> Self {
        Self { store, decrypt }
    }

    /// Resolve `name` in the store's default region.
    pub fn resolve(&self, name: &str, default: Option<&str>) -> Result<Option<String>> {
        self.resolve_in(name, default, None)
    }

    /// Resolve `name`, optionally against a specific region.
    ///
    /// The name is validated before any request is made. A missing parameter
    /// yields `default` when one is given, `ParameterNotFound` otherwise.
    /// Any other store failure is returned as `Remote` and never retried.
    pub fn resolve_in(
        &self,
        name: &str,
        default: Option<&str>,
        region: Option<&str>,
    ) -> Result<Option<String>> {
        validate_name(name)?;

        log::debug!("fetching SSM parameter {name} (decrypt: {})", self.decrypt);
        match self.store.get_parameter(name, self.decrypt, region) {
            Ok(value) => Ok(value),
            Err(e) if e.is_not_found() => match default {
                Some(default) => {
                    log::info!("SSM parameter {name} not found, using default value");
                    Ok(Some(default.to_string()))
                }
                None => Err(HydrateError::ParameterNotFound {
                    name: name.to_string(),
                    source: e,
                }),
            },
            Err(e) => Err(HydrateError::Remote {
                name: name.to_string(),
                source: e,
            }),
        }
    }
}
