//! The layout model: an insertion-ordered map of field id to descriptor.
//!
//! A [`Layout`] is an immutable value. Every mutation returns a new layout and
//! leaves the receiver untouched, so any holder of an older layout keeps a
//! consistent snapshot.

use crate::field::{FieldDefaults, FieldDescriptor, FieldPatch};
use crate::LayoutError;
use cardpress_style::TextAlign;
use cardpress_types::{Color, FieldId, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Never empty: every constructor rejects a layout without fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    fields: Arc<IndexMap<FieldId, FieldDescriptor>>,
}

impl Layout {
    /// Builds a layout from `(id, descriptor)` pairs, keeping their order.
    /// Sizes below the floor are raised to it.
    pub fn from_fields<I>(fields: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (FieldId, FieldDescriptor)>,
    {
        let fields: IndexMap<_, _> = fields
            .into_iter()
            .map(|(id, mut field)| {
                field.clamp_size();
                (id, field)
            })
            .collect();
        if fields.is_empty() {
            return Err(LayoutError::Empty);
        }
        Ok(Self {
            fields: Arc::new(fields),
        })
    }

    /// The vocabulary-card layout a new session starts with.
    pub fn starter() -> Self {
        let field = |label: &str, rect: Rect, size: f32, color: Color, align: TextAlign| {
            FieldDescriptor::new(label, rect, size)
                .with_color(color)
                .with_align(align)
        };
        let fields = [
            (
                FieldId::from("korean"),
                field(
                    "韓国語",
                    Rect::new(20.0, 150.0, 390.0, 80.0),
                    50.0,
                    Color::BLACK,
                    TextAlign::Center,
                ),
            ),
            (
                FieldId::from("yomi"),
                field(
                    "読み",
                    Rect::new(20.0, 230.0, 390.0, 40.0),
                    18.0,
                    Color::gray(0x66),
                    TextAlign::Center,
                ),
            ),
            (
                FieldId::from("meaning"),
                field(
                    "日本語の意味",
                    Rect::new(20.0, 280.0, 390.0, 60.0),
                    28.0,
                    Color::rgb(0xff, 0x00, 0x66),
                    TextAlign::Center,
                ),
            ),
            (
                FieldId::from("exp"),
                field(
                    "ニュアンス・解説",
                    Rect::new(40.0, 400.0, 350.0, 100.0),
                    14.0,
                    Color::gray(0x33),
                    TextAlign::Left,
                ),
            ),
            (
                FieldId::from("example"),
                field(
                    "使える例文",
                    Rect::new(40.0, 520.0, 350.0, 100.0),
                    14.0,
                    Color::gray(0x33),
                    TextAlign::Left,
                ),
            ),
        ];
        Self {
            fields: Arc::new(fields.into_iter().collect()),
        }
    }

    /// Parses a layout from a JSON object of `id -> descriptor`.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let fields: IndexMap<FieldId, FieldDescriptor> =
            serde_json::from_str(json).map_err(|e| LayoutError::Parse(e.to_string()))?;
        Self::from_fields(fields)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, id: &FieldId) -> Option<&FieldDescriptor> {
        self.fields.get(id)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.fields.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldDescriptor)> {
        self.fields.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.keys()
    }

    /// Appends a field built from `defaults` under a fresh time-based id.
    pub fn add_field(&self, defaults: &FieldDefaults) -> (Layout, FieldId) {
        let id = self.fresh_id(chrono::Utc::now().timestamp_millis());
        let mut fields = (*self.fields).clone();
        fields.insert(id.clone(), defaults.to_descriptor());
        log::debug!("Added field '{}' ({} fields)", id, fields.len());
        (
            Self {
                fields: Arc::new(fields),
            },
            id,
        )
    }

    /// Removes a field. The last remaining field can never be removed.
    pub fn remove_field(&self, id: &FieldId) -> Result<Layout, LayoutError> {
        if self.fields.len() <= 1 {
            return Err(LayoutError::LastField(id.clone()));
        }
        if !self.fields.contains_key(id) {
            return Err(LayoutError::UnknownField(id.clone()));
        }
        let mut fields = (*self.fields).clone();
        fields.shift_remove(id);
        Ok(Self {
            fields: Arc::new(fields),
        })
    }

    /// Merges `patch` into one field's descriptor.
    pub fn set_field(&self, id: &FieldId, patch: &FieldPatch) -> Result<Layout, LayoutError> {
        let mut descriptor = self
            .fields
            .get(id)
            .cloned()
            .ok_or_else(|| LayoutError::UnknownField(id.clone()))?;
        descriptor.apply(patch);
        Ok(self.with_descriptor(id, descriptor))
    }

    /// Replaces one field's descriptor wholesale, keeping its position in the order.
    pub fn replace_field(
        &self,
        id: &FieldId,
        descriptor: FieldDescriptor,
    ) -> Result<Layout, LayoutError> {
        if !self.fields.contains_key(id) {
            return Err(LayoutError::UnknownField(id.clone()));
        }
        let mut descriptor = descriptor;
        descriptor.clamp_size();
        Ok(self.with_descriptor(id, descriptor))
    }

    fn with_descriptor(&self, id: &FieldId, descriptor: FieldDescriptor) -> Layout {
        let mut fields = (*self.fields).clone();
        if let Some(slot) = fields.get_mut(id) {
            *slot = descriptor;
        }
        Self {
            fields: Arc::new(fields),
        }
    }

    fn fresh_id(&self, millis: i64) -> FieldId {
        let base = format!("item_{}", millis);
        let mut candidate = FieldId::from(base.as_str());
        let mut suffix = 2;
        while self.fields.contains_key(&candidate) {
            candidate = FieldId::from(format!("{}_{}", base, suffix));
            suffix += 1;
        }
        candidate
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = (&'a FieldId, &'a FieldDescriptor);
    type IntoIter = indexmap::map::Iter<'a, FieldId, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for Layout {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = IndexMap::<FieldId, FieldDescriptor>::deserialize(deserializer)?;
        Layout::from_fields(fields).map_err(serde::de::Error::custom)
    }
}
