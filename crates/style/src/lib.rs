pub mod page;
pub mod text;

pub use page::{page_size, PageSize, PageSizeKey, PageSizeParseError, PrintMargins};
pub use text::{wrap_lines, TextAlign};
