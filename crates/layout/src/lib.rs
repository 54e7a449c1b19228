use cardpress_types::FieldId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Cannot delete '{0}': a layout must keep at least one field.")]
    LastField(FieldId),
    #[error("No field with id '{0}' in the layout.")]
    UnknownField(FieldId),
    #[error("Layout JSON is invalid: {0}")]
    Parse(String),
    #[error("A layout must contain at least one field.")]
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InteractionError {
    #[error("A resize handle was pressed but no field is selected.")]
    NoSelection,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub mod config;
pub mod field;
pub mod interaction;
pub mod model;
pub mod projector;
pub mod viewport;

pub use self::config::InteractionConfig;
pub use self::field::{FieldDefaults, FieldDescriptor, FieldPatch, MIN_FIELD_SIZE};
pub use self::interaction::{
    move_field, resize_field, Handle, InteractionController, InteractionState,
};
pub use self::model::Layout;
pub use self::projector::{project, DrawInstruction};
pub use self::viewport::{fit_scale, padded, zoom_percent, MIN_PREVIEW_SCALE};
