//! Renderer module — trait-based format dispatch.

pub mod header;
pub mod json;
pub mod keys;

use crate::model::Document;
use anyhow::{anyhow, Result};

/// Trait for rendering a Document into a specific output format.
pub trait Renderer {
    fn render(&self, doc: &Document) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "header" | "h" => Ok(Box::new(header::HeaderRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "keys" => Ok(Box::new(keys::KeysRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use header, json, or keys",
            format
        )),
    }
}
