mod excel_parser;

pub use excel_parser::ExcelParser;
