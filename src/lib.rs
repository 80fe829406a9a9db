//! netlib-regress - cpp-netlib regression runner library
//!
//! This library provides the steps of a regression run:
//! - Boost installation probe (BOOST_ROOT)
//! - Tarball and zipball package download and extraction
//! - bjam invocation with output captured in the report
//! - Report metadata and the orchestrator tying the steps together

pub mod build;
pub mod cli;
pub mod domain;
pub mod environment;
pub mod error;
pub mod orchestrator;
pub mod package;
pub mod progress;
pub mod report;
