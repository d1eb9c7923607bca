#![forbid(unsafe_code)]
//! Wire contracts for the collection service: request/response DTOs and the
//! error model the server maps onto HTTP statuses.

mod dto;
mod errors;

pub use dto::{CaughtAck, CaughtUpsert, IdField, IdentityProfile, ValidatedUpsert};
pub use errors::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "catchdex-api";
