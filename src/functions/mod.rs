pub mod options;

use std::collections::BTreeSet;
use std::sync::Arc;

use lithos_gotmpl_core::{
    install_text_template_functions, EvalContext, FunctionRegistry, FunctionRegistryBuilder,
};
use lithos_sprig::install_sprig_functions;
use serde_json::Value;

use crate::error::{HydrateError, Result};
use crate::ssm::{Resolver, SsmStore};

pub use options::SsmArgs;

/// Name under which the parameter lookup is exposed to templates.
pub const SSM_FUNCTION: &str = "ssm";

/// The functions available to a template: Go's text/template helpers, the
/// sprig library, and whatever was registered on top. Read-only once
/// rendering starts.
#[derive(Clone)]
pub struct FunctionMap {
    registry: FunctionRegistry,
    registered: BTreeSet<String>,
}

impl FunctionMap {
    /// Only the text/template and sprig helpers.
    pub fn builtin() -> Self {
        let mut builder = FunctionRegistryBuilder::new();
        install_text_template_functions(&mut builder);
        install_sprig_functions(&mut builder);

        Self {
            registry: builder.build(),
            registered: BTreeSet::new(),
        }
    }

    /// Built-ins plus `ssm` bound to `resolver`.
    pub fn with_resolver(resolver: Resolver) -> Result<Self> {
        let mut functions = Self::builtin();
        let ssm = Arc::new(SsmFunction { resolver });
        functions.register(SSM_FUNCTION, move |_ctx, args| ssm.call(args))?;
        Ok(functions)
    }

    /// Add a function. Names must be unique across the whole map, library
    /// helpers included.
    pub fn register<F>(&mut self, name: &str, function: F) -> Result<()>
    where
        F: Fn(&mut EvalContext, &[Value]) -> std::result::Result<Value, lithos_gotmpl_core::Error>
            + Send
            + Sync
            + 'static,
    {
        if self.contains(name) {
            return Err(HydrateError::DuplicateFunction {
                name: name.to_string(),
            });
        }

        let mut builder = FunctionRegistryBuilder::new();
        builder.extend(&self.registry).register(name, function);
        self.registry = builder.build();
        self.registered.insert(name.to_string());
        Ok(())
    }

    /// Whether the engine resolves `name` to a function.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    /// Functions registered on top of the library helpers.
    pub fn registered(&self) -> impl Iterator<Item = &str> {
        self.registered.iter().map(String::as_str)
    }

    pub(crate) fn registry(&self) -> FunctionRegistry {
        self.registry.clone()
    }
}

/// Build the function map used for a run: `ssm` reads from AWS SSM with the
/// given profile/region and always asks for decryption.
pub fn build_functions(profile: Option<&str>, region: Option<&str>) -> Result<FunctionMap> {
    let store = SsmStore::new(profile, region)?;
    FunctionMap::with_resolver(Resolver::new(Arc::new(store), true))
}

struct SsmFunction {
    resolver: Resolver,
}

impl SsmFunction {
    fn call(&self, args: &[Value]) -> std::result::Result<Value, lithos_gotmpl_core::Error> {
        let args = SsmArgs::parse(SSM_FUNCTION, args)
            .map_err(|e| render_error(format!("invalid {SSM_FUNCTION} call"), e))?;
        let name = args.full_name();

        let resolved = self
            .resolver
            .resolve_in(&name, args.default.as_deref(), args.region.as_deref());
        match resolved {
            Ok(value) => Ok(Value::String(value.unwrap_or_default())),
            Err(HydrateError::ParameterNotFound { .. }) if !args.required => {
                log::warn!("SSM parameter {name} not found and not required, rendering empty");
                Ok(Value::String(String::new()))
            }
            Err(e) => Err(render_error(format!("ssm lookup of {name} failed"), e)),
        }
    }
}

/// A render failure that keeps `cause` in the source chain, so callers can
/// still recover it with [`HydrateError::lookup_error`].
fn render_error(message: String, cause: HydrateError) -> lithos_gotmpl_core::Error {
    lithos_gotmpl_core::Error::Render {
        message,
        source: Some(Box::new(cause)),
        span: None,
    }
}
