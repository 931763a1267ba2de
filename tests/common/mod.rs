#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use conference_cert_server::certificate::{TemplateKind, TemplateStore};

pub const PAGE_W: f32 = 612.0;
pub const PAGE_H: f32 = 792.0;

/// A minimal single-page document standing in for a provisioned template.
pub fn blank_template(width: f32, height: f32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        Content { operations: vec![] }.encode().unwrap(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0f32.into(), 0f32.into(), width.into(), height.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Cursor::new(Vec::new());
    doc.save_to(&mut out).unwrap();
    out.into_inner()
}

/// Write all three template kinds into `dir` and load them as a store.
pub fn provision_templates(dir: &Path) -> Arc<TemplateStore> {
    for kind in TemplateKind::all() {
        std::fs::write(dir.join(kind.file_name()), blank_template(PAGE_W, PAGE_H)).unwrap();
    }
    Arc::new(TemplateStore::load(dir).unwrap())
}
