pub mod archive_builder;
pub mod form_submitter;
pub mod order_source;
pub mod receipt_capturer;

pub use archive_builder::{ArchiveBuilder, ArchiveInput, ArchiveSummary};
pub use form_submitter::FormSubmitter;
pub use order_source::OrderSource;
pub use receipt_capturer::ReceiptCapturer;
