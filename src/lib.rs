// ocrbench: token-level benchmarking of OCR engines.
//
// This is the library root. The token engine and comparison matrix are pure
// and synchronous; the pipelines wrap them with file I/O and the external
// OCR tool.

pub mod config;
pub mod document;
pub mod io;
pub mod matrix;
pub mod models;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod tokens;
