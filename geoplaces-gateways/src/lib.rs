#![cfg_attr(test, deny(warnings))]

//! # geoplaces-gateways
//!
//! Gateway implementations for external services, currently the
//! Google Maps geocoding and timezone APIs.

pub mod google;
