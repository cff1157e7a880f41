pub mod api;
pub mod cache;
pub mod conf;
pub mod core;
pub mod delegate;
pub mod service;
pub mod table;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
