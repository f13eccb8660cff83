#[path = "../../common/mod.rs"]
pub mod fixtures;
pub mod test_server;
