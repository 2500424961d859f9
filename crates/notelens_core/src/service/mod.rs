//! Core use-case services.
//!
//! # Responsibility
//! - Own note mutations and their persistence.
//! - Keep CLI and session layers decoupled from storage details.

pub mod note_service;
