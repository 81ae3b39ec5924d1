//! Viva Engine - Adaptive Technical Interview Orchestration
//!
//! This crate drives multi-turn interview sessions: question generation with
//! difficulty adaptation, multi-signal answer evaluation with a critic pass,
//! and concurrent session lifecycle management.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
