// Clients for the brick marketplace, set catalog and LEGO replacement-parts services

pub mod brickset;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod lego;
pub mod logging;
pub mod report;
pub mod serde_util;
pub mod store;
pub mod user;

// Re-export key types for convenience
pub use brickset::{BricksetClient, Set, SetQuery};
pub use config::{ClientConfig, RetryConfig};
pub use credentials::Credentials;
pub use error::{ApiError, CredentialsError};
pub use http::ClientStats;
pub use lego::{LegoClient, ProductInformation};
pub use report::{report_owned_wanted_parts, OwnedWantedPart, OwnedWantedReport, WantedListSource};
pub use store::{Direction, StoreClient};
pub use user::UserClient;
