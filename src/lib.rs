//! Lodgebook - short-term rental property management service
//!
//! Warranties, assets, damage reports, inventory, inspections, and
//! invitations for a small property portfolio, backed by SeaORM with a
//! JSON HTTP API on top. It exposes all modules for testing purposes.

pub mod email;
pub mod entities;
pub mod errors;
pub mod files;
pub mod inventory;
pub mod jobs;
pub mod rate_limit;
pub mod settings;
pub mod storage;
pub mod validate;
pub mod warranty;
pub mod web;
