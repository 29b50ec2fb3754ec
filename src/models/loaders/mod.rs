pub mod csv_loader;

pub use csv_loader::{parse_orders, parse_orders_file, REQUIRED_COLUMNS};
