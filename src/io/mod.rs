//! File adapters around the core: workbook reading, tier workbook writing, and
//! output packing.

pub mod archive;
pub mod excel_read;
pub mod excel_write;
