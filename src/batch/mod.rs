pub mod events;
pub mod runner;
pub mod source;

pub use events::BatchEvent;
pub use runner::{BatchItem, BatchReport, BatchRunner};
pub use source::{expand_home, has_list_extension, read_url_file};
