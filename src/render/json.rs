//! JSON renderer — the parsed tree, for tooling integration.

use crate::model::Document;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let mut out = serde_json::to_string_pretty(doc).context("failed to serialize document")?;
        out.push('\n');
        Ok(out)
    }
}
