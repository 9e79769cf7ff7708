//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep boundary layers decoupled from storage details.
//!
//! # Invariants
//! - Services validate and normalize input above the repositories and never
//!   bypass repository persistence contracts.

pub mod file_service;
pub mod folder_service;
pub mod rollover;
pub mod task_service;
