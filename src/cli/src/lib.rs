//! Dockerfile parser CLI - parse, reconstruct and inspect Dockerfiles.

pub mod batch;
pub mod commands;
pub mod discover;
pub mod output;
