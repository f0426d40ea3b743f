pub mod order_extractor;
pub mod order_paginator;
pub mod otp_login;

pub use order_extractor::extract;
pub use order_paginator::{OrderPageSource, OrderPaginator, PageProgress, PaginationOutcome, StopReason};
pub use otp_login::{LoginState, OtpLogin};
