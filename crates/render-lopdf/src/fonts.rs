//! Fonts known to a document: built-in Helvetica and embedded TrueType faces.

use crate::xobject::deflate;
use cardpress_traits::{FontAsset, FontError, RenderError, SharedFontData};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::{BTreeMap, HashMap};

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];
const HELVETICA_DEFAULT_WIDTH: u16 = 556;
const HELVETICA_DESCENT: f32 = 0.207;

fn helvetica_width(c: char) -> u16 {
    match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => HELVETICA_DEFAULT_WIDTH,
    }
}

fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(|c| if c as u32 <= 255 { c as u8 } else { b'?' }).collect()
}

/// A font registered with a document under a resource name such as `F1`.
pub(crate) struct RegisteredFont {
    pub resource_name: String,
    kind: FontKind,
}

enum FontKind {
    Helvetica,
    Embedded(EmbeddedFont),
}

impl RegisteredFont {
    pub fn helvetica(resource_name: String) -> Self {
        Self {
            resource_name,
            kind: FontKind::Helvetica,
        }
    }

    pub fn embedded(resource_name: String, font: EmbeddedFont) -> Self {
        Self {
            resource_name,
            kind: FontKind::Embedded(font),
        }
    }

    /// Width of `text` in points at `size`.
    pub fn measure(&mut self, text: &str, size: f32) -> f32 {
        match &mut self.kind {
            FontKind::Helvetica => {
                let units: u32 = text.chars().map(|c| helvetica_width(c) as u32).sum();
                units as f32 * size / 1000.0
            }
            FontKind::Embedded(font) => font.measure(text, size),
        }
    }

    /// Distance from baseline to the bottom of the em box, as a fraction of the size.
    pub fn descent_ratio(&self) -> f32 {
        match &self.kind {
            FontKind::Helvetica => HELVETICA_DESCENT,
            FontKind::Embedded(font) => font.descent_ratio(),
        }
    }

    /// Encodes `text` as a string operand for `Tj`.
    pub fn encode(&mut self, text: &str) -> Object {
        match &mut self.kind {
            FontKind::Helvetica => Object::String(to_win_ansi(text), StringFormat::Literal),
            FontKind::Embedded(font) => Object::String(font.encode(text), StringFormat::Hexadecimal),
        }
    }

    /// Adds the font's objects to `document` and returns the font dictionary id.
    pub fn write(&self, document: &mut Document) -> Result<ObjectId, RenderError> {
        match &self.kind {
            FontKind::Helvetica => Ok(document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => crate::BUILTIN_FONT,
                "Encoding" => "WinAnsiEncoding",
            })),
            FontKind::Embedded(font) => font.write(document),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Glyph {
    id: u16,
    advance: u16,
}

/// A TrueType face embedded whole, addressed by glyph id (Identity-H).
pub(crate) struct EmbeddedFont {
    data: SharedFontData,
    postscript_name: String,
    units_per_em: f32,
    ascender: i16,
    descender: i16,
    cap_height: i16,
    bbox: [i16; 4],
    glyphs: HashMap<char, Glyph>,
    used: BTreeMap<u16, (char, u16)>,
}

impl EmbeddedFont {
    pub fn parse(asset: &FontAsset) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&asset.data, 0).map_err(|e| FontError::Invalid {
            name: asset.name.clone(),
            message: e.to_string(),
        })?;
        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(FontError::Invalid {
                name: asset.name.clone(),
                message: "unitsPerEm is zero".to_string(),
            });
        }
        let bbox = face.global_bounding_box();
        let postscript_name = extract_postscript_name(&face)
            .unwrap_or_else(|| asset.name.replace(' ', ""));
        log::debug!("Parsed font '{}' as {}", asset.name, postscript_name);

        Ok(Self {
            data: asset.data.clone(),
            postscript_name,
            units_per_em: units_per_em as f32,
            ascender: face.ascender(),
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or(face.ascender()),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            glyphs: HashMap::new(),
            used: BTreeMap::new(),
        })
    }

    fn glyph(&mut self, c: char) -> Glyph {
        if let Some(glyph) = self.glyphs.get(&c) {
            return *glyph;
        }
        let glyph = match ttf_parser::Face::parse(&self.data, 0) {
            Ok(face) => {
                let id = face.glyph_index(c).unwrap_or(ttf_parser::GlyphId(0));
                Glyph {
                    id: id.0,
                    advance: face.glyph_hor_advance(id).unwrap_or(0),
                }
            }
            Err(_) => Glyph { id: 0, advance: 0 },
        };
        if glyph.id == 0 {
            log::debug!("No glyph for {:?} in {}", c, self.postscript_name);
        }
        self.glyphs.insert(c, glyph);
        glyph
    }

    fn measure(&mut self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.glyph(c).advance as u32).sum();
        units as f32 * size / self.units_per_em
    }

    fn descent_ratio(&self) -> f32 {
        -(self.descender as f32) / self.units_per_em
    }

    fn encode(&mut self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for c in text.chars() {
            let glyph = self.glyph(c);
            self.used.entry(glyph.id).or_insert((c, glyph.advance));
            bytes.extend_from_slice(&glyph.id.to_be_bytes());
        }
        bytes
    }

    fn to_pdf_units(&self, value: i16) -> i64 {
        (value as f32 * 1000.0 / self.units_per_em).round() as i64
    }

    fn write(&self, document: &mut Document) -> Result<ObjectId, RenderError> {
        let font_file = Stream::new(
            dictionary! {
                "Length1" => self.data.len() as i64,
                "Filter" => "FlateDecode",
            },
            deflate(&self.data)?,
        );
        let font_file_id = document.add_object(font_file);

        let descriptor_id = document.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => self.postscript_name.as_str(),
            "Flags" => 4,
            "FontBBox" => self.bbox.iter().map(|v| Object::Integer(self.to_pdf_units(*v))).collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => self.to_pdf_units(self.ascender),
            "Descent" => self.to_pdf_units(self.descender),
            "CapHeight" => self.to_pdf_units(self.cap_height),
            "StemV" => 80,
            "FontFile2" => font_file_id,
        });

        let mut widths = Vec::with_capacity(self.used.len() * 2);
        for (gid, (_, advance)) in &self.used {
            widths.push(Object::Integer(*gid as i64));
            widths.push(Object::Array(vec![Object::Integer(
                (*advance as f32 * 1000.0 / self.units_per_em).round() as i64,
            )]));
        }

        let cid_font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => self.postscript_name.as_str(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = document.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            deflate(self.to_unicode_cmap().as_bytes())?,
        ));

        Ok(document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => self.postscript_name.as_str(),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        }))
    }

    fn to_unicode_cmap(&self) -> String {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );
        let entries: Vec<(&u16, &(char, u16))> = self.used.iter().collect();
        for chunk in entries.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (gid, (c, _)) in chunk {
                let mut units = [0u16; 2];
                let utf16: String = c
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect();
                cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap
    }
}

/// PostScript name, falling back to the full name and then the family name.
fn extract_postscript_name(face: &ttf_parser::Face) -> Option<String> {
    [
        ttf_parser::name_id::POST_SCRIPT_NAME,
        ttf_parser::name_id::FULL_NAME,
        ttf_parser::name_id::FAMILY,
    ]
    .into_iter()
    .find_map(|id| {
        face.names()
            .into_iter()
            .find(|n| n.name_id == id)
            .and_then(|n| n.to_string())
    })
    .map(|name| name.replace(' ', ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_helvetica_metrics() {
        let mut font = RegisteredFont::helvetica("F1".into());
        assert_eq!(font.measure("A", 10.0), 6.67);
        assert_eq!(font.measure("", 10.0), 0.0);
        assert!((font.descent_ratio() - 0.207).abs() < f32::EPSILON);
    }

    #[test]
    fn test_win_ansi_replaces_unmapped_chars() {
        assert_eq!(to_win_ansi("café 한"), b"caf\xe9 ?".to_vec());
    }

    #[test]
    fn test_invalid_font_is_rejected() {
        let asset = FontAsset::new("Broken", Arc::new(vec![0u8; 16]));
        let err = EmbeddedFont::parse(&asset).err().unwrap();
        assert!(matches!(err, FontError::Invalid { .. }));
    }
}
