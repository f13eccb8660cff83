mod common;
mod health_test;
mod policy_test;
