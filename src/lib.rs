//! Core library for the tier-splitter command line application.
//!
//! A master price list workbook carries one price column per tier on every
//! sheet. The library re-projects it into one workbook per tier, each sheet
//! reduced to the canonical columns `S/N`, `TARIFF NAME`, `PRICE`,
//! `SNOMED CODE`, `SNOMED DESCRIPTION EN`.
//!
//! Header matching lives in [`schema`], per-sheet projection in [`project`],
//! per-tier assembly and the split itself in [`split`]. File adapters live
//! under [`io`] and the file-level entry points used by the CLI in
//! [`pipeline`].

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod project;
pub mod schema;
pub mod split;

pub use config::SplitterConfig;
pub use error::{Result, ToolError};
pub use split::{TierWorkbookAssembler, WorkbookSplitter};
