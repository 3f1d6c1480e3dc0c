//! Client SDK for the email-to-address link registry.
//!
//! Submits signed link requests, directly on-chain or through an
//! off-chain validator relay, and queries the resulting mappings. The
//! validator voting that settles a request lives on-chain and is outside
//! this crate.

pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod provider;
pub mod relay;
pub mod signing;

pub use client::{AddRequestFlow, AddRequestStep, LinkClient, RegisterFlow, RegisterStep};
pub use config::{ClientContext, ContextBuilder, Network};
pub use contract::{RequestInfo, RequestStatus, ValidatorInfo};
pub use error::{LinkError, LinkResult};
