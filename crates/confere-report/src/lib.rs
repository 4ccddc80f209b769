pub mod common;
pub mod csv;
pub mod xlsx;

pub use common::{ColorPolicy, ExportOptions};
pub use csv::write_csv;
pub use xlsx::{write_xlsx, write_xlsx_many};
