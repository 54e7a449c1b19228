//! Projection of a layout and one data row into positioned text.
//!
//! The preview surface and both export modes consume the same instructions.

use crate::model::Layout;
use cardpress_style::TextAlign;
use cardpress_traits::FieldNode;
use cardpress_types::{Color, DataRow, FieldId, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub field_id: FieldId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub color: Color,
    pub align: TextAlign,
}

impl DrawInstruction {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The x coordinate the text is anchored to for its alignment.
    pub fn anchor_x(&self) -> f32 {
        self.align.anchor_x(self.x, self.width)
    }

    /// The line the first text line's glyph bottoms (descenders) sit on.
    pub fn text_bottom_y(&self) -> f32 {
        self.y + self.font_size
    }
}

impl From<DrawInstruction> for FieldNode {
    fn from(instruction: DrawInstruction) -> Self {
        FieldNode {
            rect: instruction.rect(),
            id: instruction.field_id,
            text: instruction.text,
            font_size: instruction.font_size,
            color: instruction.color,
            align: instruction.align,
        }
    }
}

/// One instruction per field, in layout order.
///
/// Text is the row's value for the field's label, or the label itself when
/// there is no row or the row lacks that column.
pub fn project(layout: &Layout, row: Option<&DataRow>) -> Vec<DrawInstruction> {
    layout
        .iter()
        .map(|(id, field)| {
            let text = row
                .and_then(|row| row.get(&field.label))
                .unwrap_or(&field.label)
                .to_string();
            DrawInstruction {
                field_id: id.clone(),
                text,
                x: field.x,
                y: field.y,
                width: field.width,
                height: field.height,
                font_size: field.font_size,
                color: field.color,
                align: field.align,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldDescriptor;

    fn layout() -> Layout {
        Layout::from_fields([
            (
                FieldId::from("w"),
                FieldDescriptor::new("word", Rect::new(0.0, 0.0, 100.0, 20.0), 12.0),
            ),
            (
                FieldId::from("m"),
                FieldDescriptor::new("meaning", Rect::new(10.0, 40.0, 200.0, 30.0), 16.0)
                    .with_align(TextAlign::Right),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_row_values_and_label_fallback() {
        let row = DataRow::new().with("word", "hello");
        let out = project(&layout(), Some(&row));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "hello");
        assert_eq!(out[1].text, "meaning");
        assert_eq!(out[1].anchor_x(), 210.0);
        assert_eq!(out[1].text_bottom_y(), 56.0);
    }

    #[test]
    fn test_empty_value_is_kept() {
        let row = DataRow::new().with("word", "");
        assert_eq!(project(&layout(), Some(&row))[0].text, "");
    }

    #[test]
    fn test_no_row_shows_labels() {
        let texts: Vec<String> = project(&layout(), None).into_iter().map(|d| d.text).collect();
        assert_eq!(texts, ["word", "meaning"]);
    }

    #[test]
    fn test_projection_is_pure() {
        let row = DataRow::new().with("meaning", "意味");
        let layout = layout();
        assert_eq!(project(&layout, Some(&row)), project(&layout, Some(&row)));
    }

    #[test]
    fn test_into_field_node() {
        let node: FieldNode = project(&layout(), None).remove(0).into();
        assert_eq!(node.id.as_str(), "w");
        assert_eq!(node.rect, Rect::new(0.0, 0.0, 100.0, 20.0));
    }
}
