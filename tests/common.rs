#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use serde_json::Value;

use nybar_packet_server::forms::assets::{AssetError, AssetKind, AssetStore};
use nybar_packet_server::forms::FormId;
use nybar_packet_server::AppState;

/// Template field for [`template`].
pub enum Field<'a> {
    Text(&'a str),
    Checkbox(&'a str),
    Radio(&'a str, &'a [&'a str]),
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

/// One-page fillable PDF. Field dictionaries have the same shape as the crate's unit
/// test fixtures, so both suites exercise identical templates.
pub fn template(fields: &[Field<'_>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();
    let mut roots: Vec<Object> = Vec::new();
    let mut widgets: Vec<Object> = Vec::new();

    for field in fields {
        match field {
            Field::Text(name) => {
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
            Field::Checkbox(name) => {
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
            Field::Radio(name, options) => {
                let parent_id: ObjectId = doc.new_object_id();
                let mut kids: Vec<Object> = Vec::new();
                for option in options.iter() {
                    let ap = appearance(&mut doc, option);
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
    let acroform_id = doc.add_object(dictionary! {
        "Fields" => roots,
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => acroform_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("failed to save test template");
    buffer
}

/// In-memory [`AssetStore`] for tests.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: HashMap<(FormId, AssetKind), Vec<u8>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, form: FormId, template: Vec<u8>, mapping: Value) -> Self {
        self.assets.insert((form, AssetKind::Template), template);
        self.assets
            .insert((form, AssetKind::Mapping), mapping.to_string().into_bytes());
        self
    }

    pub fn with_raw(mut self, form: FormId, kind: AssetKind, bytes: &[u8]) -> Self {
        self.assets.insert((form, kind), bytes.to_vec());
        self
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn load(&self, form: FormId, kind: AssetKind) -> Result<Vec<u8>, AssetError> {
        self.assets
            .get(&(form, kind))
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                kind,
                location: format!("memory://{}/{}", kind, form),
            })
    }
}

pub fn app_state(store: MemoryAssetStore) -> web::Data<AppState> {
    web::Data::new(AppState::with_store(Arc::new(store), Duration::from_secs(60)))
}
