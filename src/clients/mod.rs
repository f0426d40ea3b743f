pub mod swiggy_client;

pub use swiggy_client::{ApiReply, SwiggyClient};
