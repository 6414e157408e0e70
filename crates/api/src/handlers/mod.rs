//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod jobs;
pub mod labels;
pub mod regions;
