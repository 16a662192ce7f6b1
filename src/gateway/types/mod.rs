//! Gateway types module
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for API input
//! - [`TransferRequest`], [`CreateAccountRequest`], [`ListAccountsQuery`]
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Error half of [`ApiResult`]

pub mod money;
pub mod request;
pub mod response;

pub use money::StrictDecimal;
pub use request::{CreateAccountRequest, ListAccountsQuery, TransferRequest};
pub use response::{ApiError, ApiResponse, ApiResult, error_codes, ok};
