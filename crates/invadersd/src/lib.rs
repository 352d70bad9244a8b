//! Component assembly for the Pod Invaders backend.
//!
//! The HTTP layer (and the `invadersd` binary) build one [`Services`] at
//! startup and call into it; shutdown goes through [`Services::shutdown`].

pub mod services;

pub use services::{Services, validate_monitor_url};
