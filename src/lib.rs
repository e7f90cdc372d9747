//! Vendor Pilot - Agent Tool-Calling Orchestrator
//!
//! This crate implements the conversational agent core of the vendor
//! commerce back office: a tool registry with deterministic mock
//! suggestions, dual-mode (mock/live) turn orchestration, and the
//! feedback-to-QA pipeline.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
