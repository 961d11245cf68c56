pub mod db;
pub mod models;
pub mod query;
pub mod stats;
pub use db::*;
pub use models::*;
pub use query::*;
pub use stats::*;
