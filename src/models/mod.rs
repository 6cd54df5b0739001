// Data models: the records read from and written to disk.
//
// Kept separate from the pipelines so the token engine and the reports can
// share them without pulling in any file handling.

pub mod benchmark;
pub mod ocr_output;
