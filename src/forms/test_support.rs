//! Test doubles: AcroForm fixtures built with lopdf and an in-memory field sink.

use std::collections::HashMap;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::acroform::{AcroFieldKind, FieldAccess, FieldError};
use super::mapping::FieldType;

pub(crate) enum FixtureField<'a> {
    Text(&'a str),
    Checkbox(&'a str),
    Radio(&'a str, &'a [&'a str]),
    /// Radio group whose `/Opt` labels differ from the widgets' state names.
    LabelledRadio(&'a str, &'a [(&'a str, &'a str)]),
    /// Checkbox field with one kid widget per on-state.
    CheckboxWidgets(&'a str, &'a [&'a str]),
    Choice(&'a str),
    /// Text field `child` under a non-terminal parent `parent`.
    Nested(&'a str, &'a str),
}

fn rect() -> Object {
    Object::Array(vec![0.into(), 0.into(), 20.into(), 20.into()])
}

fn appearance(doc: &mut Document, on_state: &str) -> Dictionary {
    let stream = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
    let mut normal = Dictionary::new();
    normal.set(on_state, stream);
    normal.set("Off", stream);
    dictionary! { "N" => normal }
}

fn kid_widgets(
    doc: &mut Document,
    parent_id: ObjectId,
    page_id: ObjectId,
    states: &[&str],
    widgets: &mut Vec<Object>,
) -> Vec<Object> {
    let mut kids: Vec<Object> = Vec::new();
    for state in states {
        let ap = appearance(doc, state);
        let kid = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "Parent" => parent_id,
            "AS" => "Off",
            "AP" => ap,
            "Rect" => rect(),
            "P" => page_id,
        });
        kids.push(kid.into());
        widgets.push(kid.into());
    }
    kids
}

/// One-page PDF carrying the given fields. An empty slice yields a PDF without an
/// AcroForm dictionary. `tests/common.rs` builds text, checkbox and radio fields with the
/// same dictionaries; change both together.
pub(crate) fn form_pdf(fields: &[FixtureField<'_>]) -> Vec<u8> {
    build(fields, false)
}

/// Same as [`form_pdf`], with the AcroForm dictionary stored directly in the catalog.
pub(crate) fn form_pdf_inline_acroform(fields: &[FixtureField<'_>]) -> Vec<u8> {
    build(fields, true)
}

fn build(fields: &[FixtureField<'_>], inline_acroform: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let mut roots: Vec<Object> = Vec::new();
    let mut widgets: Vec<Object> = Vec::new();

    for field in fields {
        match field {
            FixtureField::Text(name) => {
                let id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Widget",
                    "FT" => "Tx",
                    "T" => Object::string_literal(*name),
                    "Rect" => rect(),
                    "P" => page_id,
                });
                roots.push(id.into());
                widgets.push(id.into());
            }
            FixtureField::Checkbox(name) => {
                let ap = appearance(&mut doc, "Yes");
                let id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Widget",
                    "FT" => "Btn",
                    "T" => Object::string_literal(*name),
                    "V" => "Off",
                    "AS" => "Off",
                    "AP" => ap,
                    "Rect" => rect(),
                    "P" => page_id,
                });
                roots.push(id.into());
                widgets.push(id.into());
            }
            FixtureField::Radio(name, options) => {
                let parent_id: ObjectId = doc.new_object_id();
                let kids = kid_widgets(&mut doc, parent_id, page_id, options, &mut widgets);
                doc.objects.insert(
                    parent_id,
                    Object::Dictionary(dictionary! {
                        "FT" => "Btn",
                        "Ff" => (1i64 << 15),
                        "T" => Object::string_literal(*name),
                        "Kids" => kids,
                    }),
                );
                roots.push(parent_id.into());
            }
            FixtureField::LabelledRadio(name, options) => {
                let parent_id: ObjectId = doc.new_object_id();
                let states: Vec<&str> = options.iter().map(|(_, state)| *state).collect();
                let kids = kid_widgets(&mut doc, parent_id, page_id, &states, &mut widgets);
                let labels: Vec<Object> = options
                    .iter()
                    .map(|(label, _)| Object::string_literal(*label))
                    .collect();
                doc.objects.insert(
                    parent_id,
                    Object::Dictionary(dictionary! {
                        "FT" => "Btn",
                        "Ff" => (1i64 << 15),
                        "T" => Object::string_literal(*name),
                        "Opt" => labels,
                        "Kids" => kids,
                    }),
                );
                roots.push(parent_id.into());
            }
            FixtureField::CheckboxWidgets(name, states) => {
                let parent_id: ObjectId = doc.new_object_id();
                let kids = kid_widgets(&mut doc, parent_id, page_id, states, &mut widgets);
                doc.objects.insert(
                    parent_id,
                    Object::Dictionary(dictionary! {
                        "FT" => "Btn",
                        "T" => Object::string_literal(*name),
                        "V" => "Off",
                        "Kids" => kids,
                    }),
                );
                roots.push(parent_id.into());
            }
            FixtureField::Choice(name) => {
                let id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Widget",
                    "FT" => "Ch",
                    "T" => Object::string_literal(*name),
                    "Rect" => rect(),
                    "P" => page_id,
                });
                roots.push(id.into());
                widgets.push(id.into());
            }
            FixtureField::Nested(parent, child) => {
                let parent_id: ObjectId = doc.new_object_id();
                let child_id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Widget",
                    "FT" => "Tx",
                    "T" => Object::string_literal(*child),
                    "Parent" => parent_id,
                    "Rect" => rect(),
                    "P" => page_id,
                });
                doc.objects.insert(
                    parent_id,
                    Object::Dictionary(dictionary! {
                        "T" => Object::string_literal(*parent),
                        "Kids" => vec![Object::from(child_id)],
                    }),
                );
                roots.push(parent_id.into());
                widgets.push(child_id.into());
            }
        }
    }

    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            "Annots" => widgets,
        }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !roots.is_empty() {
        let acroform = dictionary! {
            "Fields" => roots,
            "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
        };
        if inline_acroform {
            catalog.set("AcroForm", acroform);
        } else {
            let acroform_id = doc.add_object(acroform);
            catalog.set("AcroForm", acroform_id);
        }
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("failed to save fixture PDF");
    buffer
}

/// In-memory [`FieldAccess`] that records every successful write as `(field, value)`.
#[derive(Default)]
pub(crate) struct MemoryForm {
    kinds: HashMap<String, (AcroFieldKind, Vec<String>)>,
    pub(crate) writes: Vec<(String, String)>,
}

impl MemoryForm {
    pub(crate) fn with(mut self, name: &str, kind: AcroFieldKind, options: &[&str]) -> Self {
        self.kinds.insert(
            name.to_string(),
            (kind, options.iter().map(|o| o.to_string()).collect()),
        );
        self
    }

    pub(crate) fn written(&self, name: &str) -> Option<&str> {
        self.writes
            .iter()
            .rev()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    fn expect_kind(
        &self,
        name: &str,
        expected: FieldType,
        want: AcroFieldKind,
    ) -> Result<(), FieldError> {
        match self.kinds.get(name) {
            None => Err(FieldError::NotFound(name.to_string())),
            Some((kind, _)) if *kind != want => Err(FieldError::WrongKind {
                name: name.to_string(),
                expected,
                actual: *kind,
            }),
            Some(_) => Ok(()),
        }
    }
}

impl FieldAccess for MemoryForm {
    fn set_text(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        self.expect_kind(name, FieldType::Text, AcroFieldKind::Text)?;
        self.writes.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_checkbox(&mut self, name: &str, checked: bool) -> Result<(), FieldError> {
        self.expect_kind(name, FieldType::Checkbox, AcroFieldKind::Checkbox)?;
        self.writes.push((name.to_string(), checked.to_string()));
        Ok(())
    }

    fn select_radio(&mut self, name: &str, option: &str) -> Result<(), FieldError> {
        self.expect_kind(name, FieldType::Radio, AcroFieldKind::Radio)?;
        let options = &self.kinds[name].1;
        if !options.iter().any(|o| o == option) {
            return Err(FieldError::OptionNotFound {
                name: name.to_string(),
                option: option.to_string(),
                available: options.clone(),
            });
        }
        self.writes.push((name.to_string(), option.to_string()));
        Ok(())
    }
}
