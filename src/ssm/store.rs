use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a [`ParameterStore`].
///
/// Callers only need to tell "the parameter does not exist" apart from
/// everything else (auth, throttling, transport).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("parameter not found")]
    NotFound {
        #[source]
        source: BoxError,
    },

    #[error("parameter store request failed")]
    Request {
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn not_found(source: impl Into<BoxError>) -> Self {
        StoreError::NotFound {
            source: source.into(),
        }
    }

    pub fn request(source: impl Into<BoxError>) -> Self {
        StoreError::Request {
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// A keyed lookup service holding named (optionally encrypted) values.
///
/// `get_parameter` performs exactly one remote request. `Ok(None)` means the
/// parameter exists but carries no value.
pub trait ParameterStore: Send + Sync {
    fn get_parameter(
        &self,
        name: &str,
        decrypt: bool,
        region: Option<&str>,
    ) -> std::result::Result<Option<String>, StoreError>;
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-memory store that records every request it receives.
    #[derive(Default)]
    pub struct FakeStore {
        values: HashMap<String, String>,
        failing: Option<String>,
        calls: AtomicUsize,
        requests: Mutex<Vec<(String, bool, Option<String>)>>,
    }

    impl FakeStore {
        pub fn with(mut self, name: &str, value: &str) -> Self {
            self.values.insert(name.to_string(), value.to_string());
            self
        }

        /// Every request fails with a non-"not found" error.
        pub fn failing(mut self, message: &str) -> Self {
            self.failing = Some(message.to_string());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<(String, bool, Option<String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ParameterStore for FakeStore {
        fn get_parameter(
            &self,
            name: &str,
            decrypt: bool,
            region: Option<&str>,
        ) -> std::result::Result<Option<String>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push((
                name.to_string(),
                decrypt,
                region.map(str::to_string),
            ));

            if let Some(message) = &self.failing {
                return Err(StoreError::request(message.clone()));
            }
            match self.values.get(name) {
                Some(value) => Ok(Some(value.clone())),
                None => Err(StoreError::not_found(
                    "ParameterNotFound: Parameter does not exist in SSM",
                )),
            }
        }
    }
}
