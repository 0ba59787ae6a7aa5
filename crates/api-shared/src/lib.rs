//! # API Shared
//!
//! Wire types shared by the upload tracker's core and its REST surface.
//!
//! Contains:
//! - Request/response bodies (`wire` module), with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! The core builds these types directly so that what leaves the core is exactly what goes over
//! the wire. In particular [`UploadRes`] has no storage path field.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
