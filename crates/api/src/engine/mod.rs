//! Request-scoped orchestration over the repositories.

pub mod allocator;
