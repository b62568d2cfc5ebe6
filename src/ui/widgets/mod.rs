//! UI Widgets

pub mod disk_table;
pub mod footer;
pub mod progress;

pub use disk_table::DiskTable;
pub use footer::Footer;
pub use progress::ProgressBar;
