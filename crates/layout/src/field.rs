//! Field descriptors and partial updates.

use cardpress_style::TextAlign;
use cardpress_types::{Color, Rect};
use serde::{Deserialize, Serialize};

/// Smallest width or height a field may have, in points.
pub const MIN_FIELD_SIZE: f32 = 20.0;

/// One labeled text region on the page.
///
/// `label` doubles as the column name looked up in each data row. Geometry is
/// in points relative to the page's top-left corner; `x` and `y` may lie off
/// the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(alias = "size")]
    pub font_size: f32,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub align: TextAlign,
}

impl FieldDescriptor {
    pub fn new(label: impl Into<String>, rect: Rect, font_size: f32) -> Self {
        let mut field = Self {
            label: label.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            font_size,
            color: Color::BLACK,
            align: TextAlign::Left,
        };
        field.clamp_size();
        field
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub(crate) fn clamp_size(&mut self) {
        self.width = self.width.max(MIN_FIELD_SIZE);
        self.height = self.height.max(MIN_FIELD_SIZE);
    }

    /// Overwrites every attribute present in `patch`, then re-applies the size floor.
    pub fn apply(&mut self, patch: &FieldPatch) {
        if let Some(label) = &patch.label {
            self.label.clone_from(label);
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(align) = patch.align {
            self.align = align;
        }
        self.clamp_size();
    }
}

/// A partial field update. `None` leaves the attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub font_size: Option<f32>,
    pub color: Option<Color>,
    pub align: Option<TextAlign>,
}

impl FieldPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == FieldPatch::default()
    }
}

/// Geometry and style given to a newly added field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaults {
    pub label: String,
    pub rect: Rect,
    pub font_size: f32,
    pub color: Color,
    pub align: TextAlign,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            label: "Item".to_string(),
            rect: Rect::new(50.0, 50.0, 200.0, 50.0),
            font_size: 20.0,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }
}

impl FieldDefaults {
    pub fn to_descriptor(&self) -> FieldDescriptor {
        FieldDescriptor::new(self.label.clone(), self.rect, self.font_size)
            .with_color(self.color)
            .with_align(self.align)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_to_floor() {
        let field = FieldDescriptor::new("tiny", Rect::new(0.0, 0.0, 5.0, 1.0), 10.0);
        assert_eq!((field.width, field.height), (MIN_FIELD_SIZE, MIN_FIELD_SIZE));
    }

    #[test]
    fn test_apply_overwrites_only_patched_attributes() {
        let mut field = FieldDefaults::default().to_descriptor();
        field.apply(&FieldPatch::default().position(-30.0, 700.0).color(Color::rgb(255, 0, 102)));
        assert_eq!((field.x, field.y), (-30.0, 700.0));
        assert_eq!(field.width, 200.0);
        assert_eq!(field.label, "Item");
        assert_eq!(field.color, Color::rgb(255, 0, 102));
    }

    #[test]
    fn test_apply_enforces_floor() {
        let mut field = FieldDefaults::default().to_descriptor();
        field.apply(&FieldPatch::default().size(3.0, -10.0));
        assert!(field.width >= MIN_FIELD_SIZE && field.height >= MIN_FIELD_SIZE);
    }

    #[test]
    fn test_descriptor_json_accepts_size_alias() {
        let json = r##"{"label":"word","x":1,"y":2,"width":100,"height":30,"size":18,"color":"#666666","align":"center"}"##;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.font_size, 18.0);
        assert_eq!(field.align, TextAlign::Center);
        assert_eq!(field.color, Color::gray(0x66));
    }

    #[test]
    fn test_empty_patch() {
        assert!(FieldPatch::default().is_empty());
        assert!(!FieldPatch::default().font_size(12.0).is_empty());
    }
}
