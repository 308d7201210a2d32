use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use aws_config::BehaviorVersion;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::Client;
use tokio::runtime::Runtime;

use crate::error::{HydrateError, Result};
use crate::ssm::store::{ParameterStore, StoreError};

/// AWS Systems Manager Parameter Store backend.
///
/// The SDK is async; every lookup blocks on a private current-thread runtime
/// so template functions can stay synchronous. The client is only built on
/// the first lookup, which keeps templates without `ssm` calls off the network.
/// Clients for per-call region overrides are built once per region and reused.
///
/// Lookups call [`Runtime::block_on`], which panics when invoked from inside
/// another tokio runtime. Use the store from synchronous code only.
pub struct SsmStore {
    runtime: Runtime,
    profile: Option<String>,
    region: Option<String>,
    client: OnceLock<Client>,
    regional: Mutex<HashMap<String, Client>>,
}

impl SsmStore {
    pub fn new(profile: Option<&str>, region: Option<&str>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HydrateError::StoreSetup { source: e })?;

        Ok(Self {
            runtime,
            profile: profile.filter(|p| !p.is_empty()).map(str::to_string),
            region: region.filter(|r| !r.is_empty()).map(str::to_string),
            client: OnceLock::new(),
            regional: Mutex::new(HashMap::new()),
        })
    }

    fn client(&self) -> &Client {
        self.client.get_or_init(|| {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(profile) = &self.profile {
                loader = loader.profile_name(profile);
            }
            if let Some(region) = &self.region {
                loader = loader.region(Region::new(region.clone()));
            }
            log::debug!(
                "loading AWS config (profile: {}, region: {})",
                self.profile.as_deref().unwrap_or("default"),
                self.region.as_deref().unwrap_or("default"),
            );
            let config = self.runtime.block_on(loader.load());
            Client::new(&config)
        })
    }

    fn client_for(&self, region: Option<&str>) -> Client {
        let base = self.client();
        let Some(region) = region else {
            return base.clone();
        };

        let mut regional = self
            .regional
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        regional
            .entry(region.to_string())
            .or_insert_with(|| {
                log::debug!("building SSM client for region {region}");
                let config = base
                    .config()
                    .to_builder()
                    .region(Region::new(region.to_string()))
                    .build();
                Client::from_conf(config)
            })
            .clone()
    }
}

impl ParameterStore for SsmStore {
    fn get_parameter(
        &self,
        name: &str,
        decrypt: bool,
        region: Option<&str>,
    ) -> std::result::Result<Option<String>, StoreError> {
        let client = self.client_for(region);

        let request = client
            .get_parameter()
            .name(name)
            .with_decryption(decrypt)
            .send();

        match self.runtime.block_on(request) {
            Ok(output) => Ok(output
                .parameter()
                .and_then(|p| p.value())
                .map(str::to_string)),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found());
                if not_found {
                    Err(StoreError::not_found(err.into_service_error()))
                } else {
                    Err(StoreError::request(err))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regional_clients_are_built_once_per_region() {
        let store = SsmStore::new(Some("does-not-exist"), Some("eu-west-1")).unwrap();

        let first = store.client_for(Some("us-east-1"));
        store.client_for(Some("us-east-1"));
        store.client_for(Some("ap-southeast-2"));
        let base = store.client_for(None);

        let regional = store.regional.lock().unwrap();
        assert_eq!(regional.len(), 2);
        assert_eq!(first.config().region().map(|r| r.as_ref()), Some("us-east-1"));
        assert_eq!(base.config().region().map(|r| r.as_ref()), Some("eu-west-1"));
    }

    #[test]
    fn new_store_has_no_clients() {
        let store = SsmStore::new(None, None).unwrap();
        assert!(store.client.get().is_none());
        assert!(store.regional.lock().unwrap().is_empty());
    }
}
