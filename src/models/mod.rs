pub mod layout;
pub mod loaders;
pub mod order;
pub mod selectors;

pub use layout::OutputLayout;
pub use loaders::{parse_orders, parse_orders_file, REQUIRED_COLUMNS};
pub use order::{Confirmation, OrderRecord, ReceiptArtifacts, SubmissionOutcome};
pub use selectors::Selectors;
