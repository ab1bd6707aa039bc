//! Wi-Fi fan controller: an H-bridge-driven DC fan behind a self-hosted
//! access point, controlled from a single embedded web page.

pub mod motor;
pub mod page;
pub mod request;
pub mod server;
#[cfg(target_os = "espidf")]
pub mod wifi;
