//! Data models for DIAN invoice extraction.

pub mod collection;
pub mod config;
pub mod invoice;
