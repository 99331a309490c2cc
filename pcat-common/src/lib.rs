//! # PCAT Common Library
//!
//! Shared code for the pricing catalog fixture tools including:
//! - Price point model and identity keys
//! - Quantity range normalization
//! - Fixture document loading, processing and saving
//! - Configuration loading
//! - Logging initialization
//! - Build identification for startup banners

pub mod build_info;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;

pub use document::{ContainerOutcome, DocumentReport, PriceDocument, ProcessOptions};
pub use error::{ContainerError, DocumentError, Error, ModelError, NormalizeError, Result};
pub use model::{IdentityKey, PricePoint, QuantityRange, UpperBound};
pub use normalize::{ConflictPolicy, FinalBound, NormalizeOptions};
