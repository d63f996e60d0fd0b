//! CSV persistence for the dispatch engine: network, restaurants, couriers,
//! customers, order history and orders still pending.

pub mod data_dir;
pub mod error;
pub mod load;
pub mod records;
pub mod store;

pub use data_dir::DataDir;
pub use error::LoadError;
pub use load::{
    load_couriers, load_customers, load_network, load_order_history, load_pending,
    load_restaurants, load_submissions,
};
pub use records::SubmissionRow;
pub use store::{save_customers, save_order_history, save_pending, CsvHistorySink};
