#![doc = "icond-core: core pipeline library for icond."]

//! This crate contains the icon pipeline: SVG normalization and naming, TypeScript
//! generation, export rewriting, bundling and publishing. The CLI crate only parses
//! arguments, loads configuration and wires these pieces together.
//!
//! # Usage
//! Add this as a dependency for all shared pipeline, processing, config and publish code.

pub mod bundle;
pub mod changelog;
pub mod config;
pub mod contract;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod naming;
pub mod optimize;
pub mod package;
pub mod pipeline;
pub mod preprocess;
pub mod publish;
pub mod rewrite;
pub mod svg;
pub mod tool;
