// Parser module: CSV text to rows, rows to product records.

pub mod csv_feed;
pub mod row_mapper;

pub use csv_feed::{CsvFeedParser, Parser};
pub use row_mapper::map_rows;
