pub mod aws;
pub mod name;
pub mod resolver;
pub mod store;

pub use aws::SsmStore;
pub use name::{validate_name, NAME_PATTERN};
pub use resolver::Resolver;
pub use store::{ParameterStore, StoreError};
