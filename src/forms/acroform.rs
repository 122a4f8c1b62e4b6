//! AcroForm access on top of `lopdf`.
//!
//! [`PdfForm`] indexes the interactive form of a template once, when it is opened:
//! every terminal field is recorded under its fully-qualified name (partial names joined
//! with `.`), together with its kind, its widget annotations and, for button fields, the
//! appearance states its widgets can show. Writers go through the [`FieldAccess`] trait.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::mapping::FieldType;

/// `/Ff` bit 16: the button is a radio group.
const FLAG_RADIO: i64 = 1 << 15;
/// `/Ff` bit 17: the button is a push button.
const FLAG_PUSHBUTTON: i64 = 1 << 16;
const OFF_STATE: &[u8] = b"Off";

/// Kind of a field as the template declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AcroFieldKind {
    Text,
    Checkbox,
    Radio,
    Button,
    Choice,
    Signature,
    Unknown,
}

impl AcroFieldKind {
    fn classify(field_type: Option<&[u8]>, flags: i64) -> Self {
        match field_type {
            Some(b"Tx") => Self::Text,
            Some(b"Btn") if flags & FLAG_PUSHBUTTON != 0 => Self::Button,
            Some(b"Btn") if flags & FLAG_RADIO != 0 => Self::Radio,
            Some(b"Btn") => Self::Checkbox,
            Some(b"Ch") => Self::Choice,
            Some(b"Sig") => Self::Signature,
            _ => Self::Unknown,
        }
    }

    fn accepts(self, expected: FieldType) -> bool {
        matches!(
            (expected, self),
            (FieldType::Text, Self::Text)
                | (FieldType::Checkbox, Self::Checkbox)
                | (FieldType::Radio, Self::Radio)
        )
    }
}

impl fmt::Display for AcroFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Button => "push button",
            Self::Choice => "choice",
            Self::Signature => "signature",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Public description of one template field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldInfo {
    pub name: String,
    pub kind: AcroFieldKind,
    /// Selectable options for radio groups, on-state names for checkboxes.
    pub options: Vec<String>,
}

/// Failure to update a single field. Never fatal to a document.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    #[error("no field named '{0}' in the template")]
    NotFound(String),
    #[error("field '{name}' is a {actual} field, not {expected}")]
    WrongKind {
        name: String,
        expected: FieldType,
        actual: AcroFieldKind,
    },
    #[error("radio group '{name}' has no option '{option}' (available: {available:?})")]
    OptionNotFound {
        name: String,
        option: String,
        available: Vec<String>,
    },
    #[error("field '{name}' could not be updated: {reason}")]
    Pdf { name: String, reason: String },
}

/// Errors opening or serializing a template.
#[derive(Debug, Error)]
pub enum PdfFormError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    #[error("failed to serialize PDF: {0}")]
    Save(String),
}

/// The field-level capabilities the writer needs from a form.
pub trait FieldAccess {
    fn set_text(&mut self, name: &str, value: &str) -> Result<(), FieldError>;
    fn set_checkbox(&mut self, name: &str, checked: bool) -> Result<(), FieldError>;
    fn select_radio(&mut self, name: &str, option: &str) -> Result<(), FieldError>;
}

#[derive(Debug, Clone)]
struct Widget {
    id: ObjectId,
    on_state: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
struct FieldEntry {
    id: ObjectId,
    kind: AcroFieldKind,
    widgets: Vec<Widget>,
    /// Option label paired with the appearance state that shows it.
    choices: Vec<(String, Vec<u8>)>,
}

impl FieldEntry {
    fn labels(&self) -> Vec<String> {
        self.choices.iter().map(|(label, _)| label.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum AcroFormLocation {
    Indirect(ObjectId),
    InCatalog(ObjectId),
}

/// A template opened for filling.
pub struct PdfForm {
    doc: Document,
    acroform: Option<AcroFormLocation>,
    fields: BTreeMap<String, FieldEntry>,
    needs_appearances: bool,
}

impl fmt::Debug for PdfForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfForm")
            .field("field_count", &self.fields.len())
            .finish_non_exhaustive()
    }
}

impl PdfForm {
    /// Parse a template and index its AcroForm fields.
    ///
    /// A document without an interactive form opens fine and simply has no fields.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfFormError> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfFormError::Parse(e.to_string()))?;
        let acroform = locate_acroform(&doc);

        let fields = match acroform.and_then(|location| acroform_dict(&doc, location)) {
            Some(acroform_dict) => {
                let mut collector = FieldCollector::new(&doc);
                for root in reference_array(&doc, acroform_dict, b"Fields") {
                    collector.visit(root, None, Inherited::default());
                }
                collector.fields
            }
            None => {
                log::debug!("Template has no AcroForm dictionary");
                BTreeMap::new()
            }
        };

        Ok(Self {
            doc,
            acroform,
            fields,
            needs_appearances: false,
        })
    }

    pub fn field_kind(&self, name: &str) -> Option<AcroFieldKind> {
        self.fields.get(name).map(|entry| entry.kind)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// List every terminal field in name order.
    pub fn fields(&self) -> Vec<FieldInfo> {
        self.fields
            .iter()
            .map(|(name, entry)| FieldInfo {
                name: name.clone(),
                kind: entry.kind,
                options: entry.labels(),
            })
            .collect()
    }

    /// Current `/V` of a text field.
    pub fn text_value(&self, name: &str) -> Option<String> {
        let value = self.field_value(name)?;
        decode_text(value)
    }

    /// Whether a checkbox currently shows an on-state.
    pub fn is_checked(&self, name: &str) -> Option<bool> {
        let entry = self.fields.get(name)?;
        if entry.kind != AcroFieldKind::Checkbox {
            return None;
        }
        Some(matches!(self.field_value(name), Some(Object::Name(state)) if state != OFF_STATE))
    }

    /// The option label currently selected in a radio group.
    pub fn selected_option(&self, name: &str) -> Option<String> {
        let entry = self.fields.get(name)?;
        let Some(Object::Name(state)) = self.field_value(name) else {
            return None;
        };
        entry
            .choices
            .iter()
            .find(|(_, choice_state)| choice_state == state)
            .map(|(label, _)| label.clone())
    }

    /// Serialize the document, leaving fields editable.
    pub fn save(&mut self) -> Result<Vec<u8>, PdfFormError> {
        if self.needs_appearances {
            if let Some(location) = self.acroform {
                if let Some(acroform) = acroform_dict_mut(&mut self.doc, location) {
                    acroform.set("NeedAppearances", Object::Boolean(true));
                }
            }
        }

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| PdfFormError::Save(e.to_string()))?;
        Ok(buffer)
    }

    fn field_value(&self, name: &str) -> Option<&Object> {
        let entry = self.fields.get(name)?;
        let dict = self.doc.get_object(entry.id).ok()?.as_dict().ok()?;
        dict.get(b"V").ok().map(|value| resolve(&self.doc, value))
    }

    fn lookup(&self, name: &str, expected: FieldType) -> Result<&FieldEntry, FieldError> {
        let entry = self
            .fields
            .get(name)
            .ok_or_else(|| FieldError::NotFound(name.to_string()))?;
        if !entry.kind.accepts(expected) {
            return Err(FieldError::WrongKind {
                name: name.to_string(),
                expected,
                actual: entry.kind,
            });
        }
        Ok(entry)
    }

    fn dict_mut(&mut self, id: ObjectId, name: &str) -> Result<&mut Dictionary, FieldError> {
        self.doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| FieldError::Pdf {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

impl FieldAccess for PdfForm {
    fn set_text(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let id = self.lookup(name, FieldType::Text)?.id;
        self.dict_mut(id, name)?.set("V", encode_text(value));
        self.needs_appearances = true;
        Ok(())
    }

    fn set_checkbox(&mut self, name: &str, checked: bool) -> Result<(), FieldError> {
        let entry = self.lookup(name, FieldType::Checkbox)?;
        let id = entry.id;
        let widgets = entry.widgets.clone();

        let on_state = widgets
            .iter()
            .find_map(|widget| widget.on_state.clone())
            .unwrap_or_else(|| b"Yes".to_vec());
        let value = if checked { on_state } else { OFF_STATE.to_vec() };
        self.dict_mut(id, name)?.set("V", Object::Name(value.clone()));

        // Widgets exporting a different on-state stay off, as in a radio group.
        for widget in widgets {
            let shows_value = match widget.on_state.as_deref() {
                Some(state) => state == value.as_slice(),
                None => checked,
            };
            let shown = if shows_value { value.clone() } else { OFF_STATE.to_vec() };
            self.dict_mut(widget.id, name)?.set("AS", Object::Name(shown));
        }
        Ok(())
    }

    fn select_radio(&mut self, name: &str, option: &str) -> Result<(), FieldError> {
        let entry = self.lookup(name, FieldType::Radio)?;
        let Some((_, state)) = entry.choices.iter().find(|(label, _)| label == option) else {
            return Err(FieldError::OptionNotFound {
                name: name.to_string(),
                option: option.to_string(),
                available: entry.labels(),
            });
        };
        let state = state.clone();
        let id = entry.id;
        let widgets = entry.widgets.clone();

        self.dict_mut(id, name)?.set("V", Object::Name(state.clone()));
        for widget in widgets {
            let shown = if widget.on_state.as_deref() == Some(state.as_slice()) {
                state.clone()
            } else {
                OFF_STATE.to_vec()
            };
            self.dict_mut(widget.id, name)?.set("AS", Object::Name(shown));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Inherited<'a> {
    field_type: Option<&'a [u8]>,
    flags: i64,
}

struct FieldCollector<'a> {
    doc: &'a Document,
    visited: HashSet<ObjectId>,
    fields: BTreeMap<String, FieldEntry>,
}

impl<'a> FieldCollector<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            visited: HashSet::new(),
            fields: BTreeMap::new(),
        }
    }

    fn visit(&mut self, id: ObjectId, parent_name: Option<&str>, inherited: Inherited<'a>) {
        if !self.visited.insert(id) {
            return;
        }
        let doc = self.doc;
        let Some(dict) = object_dict(doc, id) else {
            return;
        };

        let partial = dict
            .get(b"T")
            .ok()
            .and_then(|t| decode_text(resolve(doc, t)));
        let name = match (parent_name, partial) {
            (Some(parent), Some(partial)) => format!("{parent}.{partial}"),
            (None, Some(partial)) => partial,
            _ => return,
        };

        let inherited = Inherited {
            field_type: match dict.get(b"FT").map(|ft| resolve(doc, ft)) {
                Ok(Object::Name(ft)) => Some(ft.as_slice()),
                _ => inherited.field_type,
            },
            flags: dict
                .get(b"Ff")
                .ok()
                .and_then(|ff| resolve(doc, ff).as_i64().ok())
                .unwrap_or(inherited.flags),
        };

        let (child_fields, widget_ids): (Vec<ObjectId>, Vec<ObjectId>) =
            reference_array(doc, dict, b"Kids")
                .into_iter()
                .partition(|kid| object_dict(doc, *kid).is_some_and(|kid| kid.has(b"T")));

        if !child_fields.is_empty() {
            for kid in child_fields {
                self.visit(kid, Some(&name), inherited);
            }
            return;
        }

        // A terminal field without widget kids is merged with its own widget.
        let widget_ids = if widget_ids.is_empty() {
            vec![id]
        } else {
            widget_ids
        };
        let widgets: Vec<Widget> = widget_ids
            .into_iter()
            .map(|widget_id| Widget {
                id: widget_id,
                on_state: object_dict(doc, widget_id).and_then(|w| on_state(doc, w)),
            })
            .collect();

        let kind = AcroFieldKind::classify(inherited.field_type, inherited.flags);
        let choices = match kind {
            AcroFieldKind::Radio | AcroFieldKind::Checkbox => {
                button_choices(doc, dict, &widgets)
            }
            _ => Vec::new(),
        };

        if self.fields.contains_key(&name) {
            log::warn!("Duplicate AcroForm field name '{}'; keeping the first", name);
            return;
        }
        self.fields.insert(
            name,
            FieldEntry {
                id,
                kind,
                widgets,
                choices,
            },
        );
    }
}

/// Pair each widget's on-state with its export label. `/Opt` labels win over state names.
fn button_choices(doc: &Document, field: &Dictionary, widgets: &[Widget]) -> Vec<(String, Vec<u8>)> {
    let labels: Vec<String> = field
        .get(b"Opt")
        .ok()
        .and_then(|opt| resolve(doc, opt).as_array().ok())
        .map(|opts| {
            opts.iter()
                .filter_map(|opt| decode_text(resolve(doc, opt)))
                .collect()
        })
        .unwrap_or_default();

    let mut choices: Vec<(String, Vec<u8>)> = Vec::new();
    for (index, widget) in widgets.iter().enumerate() {
        let Some(state) = &widget.on_state else {
            continue;
        };
        let label = labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| String::from_utf8_lossy(state).into_owned());
        if !choices.iter().any(|(existing, _)| *existing == label) {
            choices.push((label, state.clone()));
        }
    }
    choices
}

/// First non-`Off` key of the widget's normal appearance dictionary.
fn on_state(doc: &Document, widget: &Dictionary) -> Option<Vec<u8>> {
    let appearance = resolve(doc, widget.get(b"AP").ok()?).as_dict().ok()?;
    let normal = resolve(doc, appearance.get(b"N").ok()?).as_dict().ok()?;
    normal
        .iter()
        .map(|(key, _)| key)
        .find(|key| key.as_slice() != OFF_STATE)
        .cloned()
}

fn locate_acroform(doc: &Document) -> Option<AcroFormLocation> {
    let root_id = doc.trailer.get(b"Root").ok()?.as_reference().ok()?;
    match object_dict(doc, root_id)?.get(b"AcroForm").ok()? {
        Object::Reference(id) => Some(AcroFormLocation::Indirect(*id)),
        Object::Dictionary(_) => Some(AcroFormLocation::InCatalog(root_id)),
        _ => None,
    }
}

fn acroform_dict(doc: &Document, location: AcroFormLocation) -> Option<&Dictionary> {
    match location {
        AcroFormLocation::Indirect(id) => object_dict(doc, id),
        AcroFormLocation::InCatalog(root_id) => object_dict(doc, root_id)?
            .get(b"AcroForm")
            .ok()?
            .as_dict()
            .ok(),
    }
}

fn acroform_dict_mut(doc: &mut Document, location: AcroFormLocation) -> Option<&mut Dictionary> {
    match location {
        AcroFormLocation::Indirect(id) => doc.get_object_mut(id).ok()?.as_dict_mut().ok(),
        AcroFormLocation::InCatalog(root_id) => doc
            .get_object_mut(root_id)
            .ok()?
            .as_dict_mut()
            .ok()?
            .get_mut(b"AcroForm")
            .ok()?
            .as_dict_mut()
            .ok(),
    }
}

fn object_dict(doc: &Document, id: ObjectId) -> Option<&Dictionary> {
    doc.get_object(id).ok()?.as_dict().ok()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

fn reference_array(doc: &Document, dict: &Dictionary, key: &[u8]) -> Vec<ObjectId> {
    dict.get(key)
        .ok()
        .and_then(|value| resolve(doc, value).as_array().ok())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_reference().ok())
                .collect()
        })
        .unwrap_or_default()
}

fn decode_text(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// UTF-16BE when the string carries a byte-order mark, otherwise UTF-8 with a
/// Latin-1 fallback.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn encode_text(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
