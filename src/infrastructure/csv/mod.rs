// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV decoding, parsing, and column type inference

mod csv_parser;
mod value_inference;

pub use csv_parser::CsvParser;
