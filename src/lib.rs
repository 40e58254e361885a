pub mod fetch;
pub mod process;
pub mod table;

pub use process::clean;
pub use table::{Row, Table};
