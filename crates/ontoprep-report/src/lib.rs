//! Output generation for the ontoprep pipeline.
//!
//! - **Taxonomy Turtle**: root classes and grouped subclass declarations
//! - **Verification JSON**: versioned envelope around a verification report

mod json;
mod turtle;

pub use json::{
    REPORT_SCHEMA, REPORT_SCHEMA_VERSION, ReportEnvelope, report_to_json, write_report_json,
};
pub use turtle::{TurtleOptions, serialize, serialize_with, write_taxonomy};
