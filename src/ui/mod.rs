pub mod table;
pub mod theme;

pub use table::{TableBuilder, places_table, stats_table};
pub use theme::{Theme, theme};
