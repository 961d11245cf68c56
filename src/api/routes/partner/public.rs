//! Public types for the partner API
pub use crate::api::routes::calendar::public::MonthEventsResponse;
