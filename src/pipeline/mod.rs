// Pipelines: the end-to-end commands built on the token engine.

pub mod benchmark;
pub mod columns;
pub mod compare_models;
pub mod export_key;
pub mod markdown;
