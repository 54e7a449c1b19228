use crate::canvas::Canvas;
use cardpress_style::wrap_lines;
use cardpress_traits::{CaptureError, CaptureOptions, FieldNode, RasterFrame, RenderSurface};
use cardpress_types::{Color, FieldId, Rect, Size};
use fontdue::{Font, FontSettings};
use image::RgbaImage;

pub const HANDLE_COLOR: Color = Color::rgb(0x93, 0x33, 0xea);
pub const GUIDE_COLOR: Color = Color::rgb(0xef, 0x44, 0x44);
const BORDER_COLOR: Color = Color::rgb(0xcc, 0xcc, 0xcc);
const HANDLE_SIZE_PT: f32 = 8.0;
const BORDER_DASH_PX: u32 = 4;

/// A render surface drawn in software.
///
/// Holds the same state the interactive preview shows: one node per field,
/// the background, the selection and the center guide. Text is rasterized
/// with fontdue; without a font only backgrounds and overlays are drawn.
pub struct SoftwareSurface {
    page: Size,
    nodes: Vec<FieldNode>,
    mounted: bool,
    background: Option<RgbaImage>,
    font: Option<Font>,
    line_height: f32,
    selection: Option<FieldId>,
    center_guide: bool,
}

impl Default for SoftwareSurface {
    fn default() -> Self {
        Self {
            page: Size::zero(),
            nodes: Vec::new(),
            mounted: false,
            background: None,
            font: None,
            line_height: 1.4,
            selection: None,
            center_guide: false,
        }
    }
}

impl SoftwareSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(font: Font) -> Self {
        Self {
            font: Some(font),
            ..Self::default()
        }
    }

    pub fn from_font_bytes(bytes: &[u8]) -> Result<Self, CaptureError> {
        Self::from_font_face(bytes, 0)
    }

    /// Loads face `index` of a font file or collection.
    pub fn from_font_face(bytes: &[u8], index: u32) -> Result<Self, CaptureError> {
        let settings = FontSettings {
            collection_index: index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings)
            .map_err(|e| CaptureError::Failed(format!("font could not be loaded: {}", e)))?;
        Ok(Self::with_font(font))
    }

    /// A surface using an installed sans-serif font, if one can be found.
    #[cfg(feature = "system-fonts")]
    pub fn with_system_font() -> Option<Self> {
        let found = crate::find_system_font()?;
        Self::from_font_face(&found.data, found.index)
            .inspect_err(|e| log::warn!("System font '{}' is unusable: {}", found.family, e))
            .ok()
    }

    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn page(&self) -> Size {
        self.page
    }

    pub fn nodes(&self) -> &[FieldNode] {
        &self.nodes
    }

    pub fn selection(&self) -> Option<&FieldId> {
        self.selection.as_ref()
    }

    pub fn center_guide(&self) -> bool {
        self.center_guide
    }

    /// Draws the current state at `scale` pixels per point.
    pub fn render(&self, scale: f32, show_overlays: bool, transparent: bool) -> RgbaImage {
        let width = ((self.page.width * scale).round() as u32).max(1);
        let height = ((self.page.height * scale).round() as u32).max(1);
        let mut canvas = Canvas::new(width, height, (!transparent).then_some(Color::WHITE));

        if let Some(background) = &self.background {
            canvas.draw_stretched(background);
        }

        if show_overlays {
            for node in &self.nodes {
                if self.selection.as_ref() != Some(&node.id) {
                    canvas.stroke_rect(node.rect.scaled(scale), BORDER_COLOR, BORDER_DASH_PX);
                }
            }
        }

        if let Some(font) = &self.font {
            for node in &self.nodes {
                self.draw_text(&mut canvas, font, node, scale);
            }
        } else if self.nodes.iter().any(|n| !n.text.is_empty()) {
            log::debug!("Surface has no font; field text is not rasterized");
        }

        if show_overlays {
            if let Some(node) = self
                .selection
                .as_ref()
                .and_then(|id| self.nodes.iter().find(|n| &n.id == id))
            {
                let rect = node.rect.scaled(scale);
                canvas.stroke_rect(rect, HANDLE_COLOR, 0);
                let size = HANDLE_SIZE_PT * scale;
                for (cx, cy) in [
                    (rect.x, rect.y),
                    (rect.right(), rect.y),
                    (rect.x, rect.bottom()),
                    (rect.right(), rect.bottom()),
                ] {
                    let handle = Rect::new(cx - size / 2.0, cy - size / 2.0, size, size);
                    canvas.fill_rect(handle, HANDLE_COLOR, 1.0);
                }
            }
            if self.center_guide {
                canvas.vertical_line(self.page.width / 2.0 * scale, GUIDE_COLOR);
            }
        }

        canvas.into_image()
    }

    fn draw_text(&self, canvas: &mut Canvas, font: &Font, node: &FieldNode, scale: f32) {
        if node.text.is_empty() {
            return;
        }
        let px = node.font_size * scale;
        let measure = |s: &str| -> f32 { s.chars().map(|c| font.metrics(c, px).advance_width).sum() };

        let rect = node.rect.scaled(scale);
        let anchor = node.align.anchor_x(rect.x, rect.width);
        // Glyph bottoms sit on the line `font_size` below the field top.
        let descent = font
            .horizontal_line_metrics(px)
            .map(|m| m.descent)
            .unwrap_or(0.0);
        let first_baseline = rect.y + px + descent;

        for (i, line) in wrap_lines(&node.text, Some(rect.width), measure)
            .iter()
            .enumerate()
        {
            let baseline = first_baseline + i as f32 * px * self.line_height;
            let mut pen_x = node.align.line_start(anchor, measure(line));
            for ch in line.chars() {
                let (metrics, bitmap) = font.rasterize(ch, px);
                let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;
                canvas.draw_coverage(
                    (pen_x + metrics.xmin as f32).round() as i64,
                    glyph_top.round() as i64,
                    metrics.width,
                    &bitmap,
                    node.color,
                );
                pen_x += metrics.advance_width;
            }
        }
    }
}

impl RenderSurface for SoftwareSurface {
    fn mount(&mut self, page: Size, nodes: Vec<FieldNode>) {
        self.page = page;
        self.nodes = nodes;
        self.mounted = true;
        if let Some(id) = &self.selection
            && !self.nodes.iter().any(|n| &n.id == id)
        {
            self.selection = None;
        }
    }

    fn set_background(&mut self, image: Option<&[u8]>) -> Result<(), CaptureError> {
        self.background = match image {
            None => None,
            Some(bytes) => Some(
                image::load_from_memory(bytes)
                    .map_err(|e| CaptureError::Background(e.to_string()))?
                    .to_rgba8(),
            ),
        };
        Ok(())
    }

    fn set_field_text(&mut self, id: &FieldId, text: &str) -> bool {
        match self.nodes.iter_mut().find(|n| &n.id == id) {
            Some(node) => {
                node.text.clear();
                node.text.push_str(text);
                true
            }
            None => false,
        }
    }

    fn field_text(&self, id: &FieldId) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| &n.id == id)
            .map(|n| n.text.as_str())
    }

    fn renders_text(&self) -> bool {
        self.has_font()
    }

    fn set_selection(&mut self, id: Option<&FieldId>) {
        self.selection = id.cloned();
    }

    fn set_center_guide(&mut self, visible: bool) {
        self.center_guide = visible;
    }

    fn capture(&mut self, options: &CaptureOptions) -> Result<RasterFrame, CaptureError> {
        if !self.mounted {
            return Err(CaptureError::NotMounted);
        }
        if self.page.is_empty() || !(options.scale > 0.0) {
            return Err(CaptureError::Failed(format!(
                "cannot capture a {}x{}pt page at scale {}",
                self.page.width, self.page.height, options.scale
            )));
        }
        let image = self.render(
            options.scale,
            !options.hide_overlays,
            options.transparent_background,
        );
        Ok(RasterFrame {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        })
    }
}
