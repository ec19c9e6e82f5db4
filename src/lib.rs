//! NeuroScan: a caregiving dashboard backend.
//!
//! REST façade over a per-patient document store, with a generative
//! analysis gateway (memory therapy narratives, cognitive assessment
//! grading, agitation risk prediction) that degrades to deterministic
//! fallbacks when no model endpoint is reachable.

pub mod api;
pub mod config;
pub mod db;
pub mod gateway;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod state;
