pub mod db;
pub mod models;
pub use db::*;
pub use models::*;
