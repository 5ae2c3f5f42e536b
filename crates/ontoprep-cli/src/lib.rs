//! Library side of the `ontoprep` binary: configuration, logging, the
//! mapping-engine seam and the pipeline orchestrator.

#![allow(missing_docs)]

pub mod checksum;
pub mod config;
pub mod engine;
pub mod logging;
pub mod pipeline;
