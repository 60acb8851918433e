//! `NAME=VALUE` listing of every macro-backed element, in document order.

use crate::model::Document;
use crate::render::Renderer;
use anyhow::Result;

pub struct KeysRenderer;

impl Renderer for KeysRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let mut out = String::new();
        for (name, value) in doc.flatten().entries() {
            out.push_str(&format!("{}={}\n", name, value));
        }
        Ok(out)
    }
}
