//! Core types and precalculation for skill tree graphs.
//!
//! Provides the document model ([`graph::SkillTree`]), the travel-stat
//! classifier, the earliest-mandatory-node annotation pass, JSON persistence,
//! and configuration.

pub mod annotate;
pub mod config;
pub mod error;
pub mod graph;
pub mod schema;
pub mod storage;
pub mod travel;
