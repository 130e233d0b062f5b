//! The element seam between the slider and whatever draws it.
//!
//! A [`HostElement`] is the slider container: it carries the image list as an
//! attribute and owns the two background layers, found by selector. The
//! controller only ever sets a layer's `background-image` value and toggles
//! its visibility class; fading is the host's business.

use std::collections::{BTreeSet, HashMap};

use crate::constants::*;
use crate::image_list::ImageList;
use crate::rotation::Layer;

pub trait LayerElement {
    /// Receives a CSS value such as `url("a.jpg")`.
    fn set_background_image(&mut self, value: &str);
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
    fn has_class(&self, class: &str) -> bool;
}

pub trait HostElement {
    type Layer: LayerElement;

    fn attribute(&self, name: &str) -> Option<&str>;
    fn query_layer(&mut self, selector: &str) -> Option<&mut Self::Layer>;
}

pub fn css_url(reference: &str) -> String {
    format!("url(\"{}\")", reference)
}

pub fn parse_css_url(value: &str) -> Option<&str> {
    value.strip_prefix("url(\"")?.strip_suffix("\")")
}

// --- In-memory host ---

/// Layer that only records what was done to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayer {
    background: Option<String>,
    classes: BTreeSet<String>,
    writes: usize,
}

impl MemoryLayer {
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Image reference behind the current `url("...")` background.
    pub fn image(&self) -> Option<&str> {
        self.background.as_deref().and_then(parse_css_url)
    }

    pub fn is_visible(&self) -> bool {
        self.has_class(VISIBLE_CLASS)
    }

    /// Number of mutating calls received so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl LayerElement for MemoryLayer {
    fn set_background_image(&mut self, value: &str) {
        self.background = Some(value.to_owned());
        self.writes += 1;
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_owned());
        self.writes += 1;
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
        self.writes += 1;
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone)]
pub struct MemoryHost {
    attributes: HashMap<String, String>,
    layer_a: Option<MemoryLayer>,
    layer_b: Option<MemoryLayer>,
}

impl MemoryHost {
    /// Container with both layers and no attributes.
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
            layer_a: Some(MemoryLayer::default()),
            layer_b: Some(MemoryLayer::default()),
        }
    }

    pub fn with_images(images: &ImageList) -> Self {
        Self::new().with_attribute(IMAGES_ATTRIBUTE, &images.to_attribute())
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn without_layer(mut self, layer: Layer) -> Self {
        match layer {
            Layer::A => self.layer_a = None,
            Layer::B => self.layer_b = None,
        }
        self
    }

    pub fn layer(&self, layer: Layer) -> Option<&MemoryLayer> {
        match layer {
            Layer::A => self.layer_a.as_ref(),
            Layer::B => self.layer_b.as_ref(),
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostElement for MemoryHost {
    type Layer = MemoryLayer;

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn query_layer(&mut self, selector: &str) -> Option<&mut MemoryLayer> {
        match selector {
            LAYER_A_SELECTOR => self.layer_a.as_mut(),
            LAYER_B_SELECTOR => self.layer_b.as_mut(),
            _ => None,
        }
    }
}
