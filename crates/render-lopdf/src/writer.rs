use crate::fonts::{EmbeddedFont, RegisteredFont};
use crate::xobject::{add_image_xobject, deflate};
use cardpress_style::wrap_lines;
use cardpress_traits::{
    Baseline, DocumentWriter, FontAsset, FontError, RenderError, TextOptions,
};
use cardpress_types::{Color, Rect};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
struct TextState {
    font: usize,
    font_size: f32,
    fill_color: Color,
}

/// An in-memory PDF writer using the `lopdf` library.
///
/// Pages are flushed into the object graph as soon as the next page starts;
/// fonts and the shared resources dictionary are written on `save`.
pub struct LopdfDocumentWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page_width: f32,
    page_height: f32,
    content: Content,
    fonts: Vec<RegisteredFont>,
    font_names: HashMap<String, usize>,
    images: HashMap<u64, (String, ObjectId)>,
    state: TextState,
}

impl LopdfDocumentWriter {
    fn flush_page(&mut self) -> Result<(), RenderError> {
        let content = std::mem::replace(&mut self.content, Content { operations: vec![] });
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_stream = Stream::new(dictionary! {"Filter" => "FlateDecode"}, deflate(&encoded)?);
        let content_id = self.document.add_object(content_stream);

        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), self.page_width.into(), self.page_height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.document.add_object(page_dict);
        self.page_ids.push(page_id);
        Ok(())
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn image_resource(&mut self, data: &[u8]) -> Result<String, RenderError> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let key = hasher.finish();
        if let Some((name, _)) = self.images.get(&key) {
            return Ok(name.clone());
        }
        let id = add_image_xobject(&mut self.document, data)?;
        let name = format!("Im{}", self.images.len() + 1);
        self.images.insert(key, (name.clone(), id));
        Ok(name)
    }
}

impl DocumentWriter for LopdfDocumentWriter {
    fn create(page_width: f32, page_height: f32) -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        let mut font_names = HashMap::new();
        font_names.insert(crate::BUILTIN_FONT.to_string(), 0);

        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            page_width,
            page_height,
            content: Content { operations: vec![] },
            fonts: vec![RegisteredFont::helvetica("F1".to_string())],
            font_names,
            images: HashMap::new(),
            state: TextState {
                font: 0,
                font_size: 12.0,
                fill_color: Color::BLACK,
            },
        }
    }

    fn add_page(&mut self) -> Result<(), RenderError> {
        self.flush_page()
    }

    fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    fn embed_font(&mut self, font: &FontAsset) -> Result<(), FontError> {
        if self.font_names.contains_key(&font.name) {
            return Ok(());
        }
        let embedded = EmbeddedFont::parse(font)?;
        let index = self.fonts.len();
        self.fonts
            .push(RegisteredFont::embedded(format!("F{}", index + 1), embedded));
        self.font_names.insert(font.name.clone(), index);
        log::info!("Embedded font '{}' as F{}", font.name, index + 1);
        Ok(())
    }

    fn set_font(&mut self, name: &str) -> Result<(), RenderError> {
        let index = *self
            .font_names
            .get(name)
            .ok_or_else(|| RenderError::UnknownFont(name.to_string()))?;
        self.state.font = index;
        Ok(())
    }

    fn set_font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    fn set_text_color(&mut self, color: Color) {
        self.state.fill_color = color;
    }

    fn draw_image(&mut self, data: &[u8], rect: Rect) -> Result<(), RenderError> {
        let name = self.image_resource(data)?;
        let y = self.page_height - (rect.y + rect.height);
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                rect.width.into(),
                0.into(),
                0.into(),
                rect.height.into(),
                rect.x.into(),
                y.into(),
            ],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        options: &TextOptions,
    ) -> Result<(), RenderError> {
        let state = self.state.clone();
        let size = state.font_size;
        let font = self
            .fonts
            .get_mut(state.font)
            .ok_or_else(|| RenderError::Other("No current font".into()))?;

        let lines = wrap_lines(text, options.max_width, |s| font.measure(s, size));
        let first_baseline = match options.baseline {
            Baseline::Alphabetic => y,
            Baseline::Bottom => y - font.descent_ratio() * size,
        };
        let resource_name = font.resource_name.clone();
        let (r, g, b) = state.fill_color.to_unit_rgb();

        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = first_baseline + i as f32 * size * options.line_height;
            let line_x = options.align.line_start(x, font.measure(line, size));
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(resource_name.clone().into_bytes()), size.into()],
            ));
            operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            operations.push(Operation::new(
                "Td",
                vec![line_x.into(), (self.page_height - baseline).into()],
            ));
            operations.push(Operation::new("Tj", vec![font.encode(line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        self.content.operations.extend(operations);
        Ok(())
    }

    fn save(mut self) -> Result<Vec<u8>, RenderError> {
        self.flush_page()?;

        let mut font_dict = Dictionary::new();
        for font in &self.fonts {
            let id = font.write(&mut self.document)?;
            font_dict.set(font.resource_name.as_bytes(), Object::Reference(id));
        }
        let mut resources = dictionary! { "Font" => font_dict };
        if !self.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, id) in self.images.values() {
                xobjects.set(name.as_bytes(), Object::Reference(*id));
            }
            resources.set("XObject", xobjects);
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i32,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self
            .document
            .add_object(dictionary! { "Type" => "Catalog", "Pages" => self.pages_id });
        self.document.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        log::debug!("Saved PDF with {} pages ({} bytes)", self.page_ids.len(), buffer.len());
        Ok(buffer)
    }
}
