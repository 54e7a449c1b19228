//! Pointer-driven move and resize of fields.
//!
//! A gesture starts on pointer-down over a field body or one of the selected
//! field's corner handles and ends on pointer-up or cancel. While a gesture is
//! active every pointer position is turned into a new descriptor computed from
//! the snapshot taken at pointer-down, never from the previous move event.

use crate::config::InteractionConfig;
use crate::field::{FieldDescriptor, MIN_FIELD_SIZE};
use crate::model::Layout;
use crate::viewport::MIN_PREVIEW_SCALE;
use crate::{InteractionError, LayoutError};
use cardpress_style::PageSize;
use cardpress_types::{FieldId, Point};
use std::fmt;
use std::str::FromStr;

/// A corner resize handle, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];

    /// `true` when the handle moves the east edge, `false` for the west edge.
    const fn horizontal_edge(self) -> bool {
        matches!(self, Handle::Ne | Handle::Se)
    }

    /// `true` when the handle moves the south edge, `false` for the north edge.
    const fn vertical_edge(self) -> bool {
        matches!(self, Handle::Sw | Handle::Se)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Nw => "nw",
            Handle::Ne => "ne",
            Handle::Sw => "sw",
            Handle::Se => "se",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nw" => Ok(Handle::Nw),
            "ne" => Ok(Handle::Ne),
            "sw" => Ok(Handle::Sw),
            "se" => Ok(Handle::Se),
            other => Err(format!("Unknown resize handle '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Moving(FieldId),
    Resizing(FieldId, Handle),
}

#[derive(Debug, Clone)]
struct Gesture {
    field_id: FieldId,
    handle: Option<Handle>,
    pointer_origin: Point,
    initial: FieldDescriptor,
}

/// Moves `initial` by `delta` (points) and snaps its horizontal center to
/// `page_center_x` when within `threshold`. Returns the new descriptor and
/// whether it snapped.
pub fn move_field(
    initial: &FieldDescriptor,
    delta: Point,
    page_center_x: f32,
    threshold: f32,
) -> (FieldDescriptor, bool) {
    let mut field = initial.clone();
    field.x = initial.x + delta.x;
    field.y = initial.y + delta.y;

    let snapped = (field.center_x() - page_center_x).abs() <= threshold;
    if snapped {
        field.x = page_center_x - field.width / 2.0;
    }
    (field, snapped)
}

/// Resizes `initial` by dragging `handle` by `delta` (points).
///
/// Each compass letter of the handle moves one edge; the opposite edge stays
/// anchored and neither dimension drops below [`MIN_FIELD_SIZE`].
pub fn resize_field(initial: &FieldDescriptor, handle: Handle, delta: Point) -> FieldDescriptor {
    let mut field = initial.clone();

    if handle.horizontal_edge() {
        field.width = (initial.width + delta.x).max(MIN_FIELD_SIZE);
    } else {
        let dx = delta.x.min(initial.width - MIN_FIELD_SIZE);
        field.x = initial.x + dx;
        field.width = initial.width - dx;
    }

    if handle.vertical_edge() {
        field.height = (initial.height + delta.y).max(MIN_FIELD_SIZE);
    } else {
        let dy = delta.y.min(initial.height - MIN_FIELD_SIZE);
        field.y = initial.y + dy;
        field.height = initial.height - dy;
    }

    field
}

/// Owns selection and gesture state; the layout itself is passed in by the
/// session on every call and changes come back as new layout values.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    config: InteractionConfig,
    selected: Option<FieldId>,
    gesture: Option<Gesture>,
    snapped: bool,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn state(&self) -> InteractionState {
        match &self.gesture {
            None => InteractionState::Idle,
            Some(Gesture {
                field_id,
                handle: None,
                ..
            }) => InteractionState::Moving(field_id.clone()),
            Some(Gesture {
                field_id,
                handle: Some(handle),
                ..
            }) => InteractionState::Resizing(field_id.clone(), *handle),
        }
    }

    pub fn selected(&self) -> Option<&FieldId> {
        self.selected.as_ref()
    }

    /// Selects a field, or clears the selection with `None`.
    pub fn select(&mut self, id: Option<FieldId>) {
        self.selected = id;
    }

    /// Whether the last move snapped to the page center. Reset when the gesture ends.
    pub fn is_snapped(&self) -> bool {
        self.snapped
    }

    /// Move and release events only need to be routed here while this is true.
    pub fn listens_globally(&self) -> bool {
        self.gesture.is_some()
    }

    /// Pointer pressed on a field's body: select it and start moving it.
    pub fn pointer_down_on_field(
        &mut self,
        layout: &Layout,
        id: &FieldId,
        pointer: Point,
    ) -> Result<(), InteractionError> {
        let initial = layout
            .get(id)
            .cloned()
            .ok_or_else(|| LayoutError::UnknownField(id.clone()))?;
        self.selected = Some(id.clone());
        self.begin(id.clone(), None, pointer, initial);
        Ok(())
    }

    /// Pointer pressed on one of the selected field's corner handles.
    pub fn pointer_down_on_handle(
        &mut self,
        layout: &Layout,
        handle: Handle,
        pointer: Point,
    ) -> Result<(), InteractionError> {
        let id = self.selected.clone().ok_or(InteractionError::NoSelection)?;
        let initial = layout
            .get(&id)
            .cloned()
            .ok_or_else(|| LayoutError::UnknownField(id.clone()))?;
        self.begin(id, Some(handle), pointer, initial);
        Ok(())
    }

    /// Pointer pressed on empty canvas: clears the selection.
    pub fn pointer_down_on_canvas(&mut self) {
        self.selected = None;
    }

    /// Applies the current pointer position to the active gesture.
    ///
    /// `scale` is the preview's pixels-per-point factor. Returns the updated
    /// layout, or `None` when idle or when the gesture's field no longer exists.
    pub fn pointer_move(
        &mut self,
        layout: &Layout,
        pointer: Point,
        scale: f32,
        page: &PageSize,
    ) -> Option<Layout> {
        let gesture = self.gesture.as_ref()?;
        let delta = pointer
            .delta_from(gesture.pointer_origin)
            .scaled(1.0 / scale.max(MIN_PREVIEW_SCALE));

        let next = match gesture.handle {
            None => {
                let (field, snapped) = move_field(
                    &gesture.initial,
                    delta,
                    page.center_x(),
                    self.config.snap_threshold,
                );
                self.snapped = snapped;
                field
            }
            Some(handle) => resize_field(&gesture.initial, handle, delta),
        };

        match layout.replace_field(&gesture.field_id, next) {
            Ok(layout) => Some(layout),
            Err(err) => {
                log::debug!("Dropping gesture: {}", err);
                self.end();
                None
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.end();
    }

    pub fn pointer_cancel(&mut self) {
        self.end();
    }

    fn begin(
        &mut self,
        field_id: FieldId,
        handle: Option<Handle>,
        pointer_origin: Point,
        initial: FieldDescriptor,
    ) {
        self.snapped = false;
        self.gesture = Some(Gesture {
            field_id,
            handle,
            pointer_origin,
            initial,
        });
    }

    fn end(&mut self) {
        self.gesture = None;
        self.snapped = false;
    }
}
