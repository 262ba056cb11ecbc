//! Use-case services over the resolver.

pub mod dashboard_service;
