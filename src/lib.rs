pub mod aggregate;
pub mod config;
pub mod country;
pub mod dataset;
pub mod export;
pub mod http_client;
pub mod load;
pub mod mock_roster;
pub mod priority;
pub mod records;
pub mod recovery;
pub mod state;

pub use records::{PlayerRecord, StatField};
