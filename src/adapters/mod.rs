pub mod health_handler;
pub mod metrics_handler;
pub mod policy_handler;
pub mod query_handler;
pub mod rate_limit;
pub mod session_handler;
