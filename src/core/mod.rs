//! Core implementation: policy model, composition engine and declaration files

pub mod config;
pub mod error;
pub mod iam;
