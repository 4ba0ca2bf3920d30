pub mod dates;
pub mod extractor;
pub mod fallback;
pub mod fields;
pub mod links;
pub mod pagination;

pub use dates::parse_date;
pub use extractor::{DEFAULT_AUTHOR, ListingExtractor};
pub use pagination::PaginationResolver;
