pub mod color;
pub mod geometry;
pub mod ids;
pub mod row;

pub use color::Color;
pub use geometry::{Point, Rect, Size};
pub use ids::FieldId;
pub use row::DataRow;
