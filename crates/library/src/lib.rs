pub mod convert;
pub mod error;
pub mod picker;
pub mod request;
pub mod scan;

pub use crate::convert::{ConversionBatchResult, ConversionItem, convert, destination_path};
pub use crate::picker::{DialogPicker, FixedFolder, FolderPicker};
pub use crate::request::{ConvertRequest, ConvertResponse, DiscoverResponse, DiscoverySettings};
pub use crate::scan::{EnrichedFileEntry, ExtensionFilter, scan};
