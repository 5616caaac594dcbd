//! Message catalogue adapters.

mod fs_catalogue;

pub use fs_catalogue::FsMessageCatalogue;
