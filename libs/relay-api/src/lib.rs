// Lets `#[derive(ConfigParams)]` expand to `relay_api::...` paths inside this crate.
extern crate self as relay_api;

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod ffi;
pub mod forwarder;
pub mod trace;

pub use relay_api_derive::ConfigParams;
