pub mod pageable;
pub mod suchkriterien;

pub use pageable::{Page, Pageable, Slice};
pub use suchkriterien::Suchkriterien;
