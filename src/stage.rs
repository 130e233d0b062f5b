//! raylib host for the slider: two full-screen layers that fade in and out
//! as their visibility class comes and goes.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use raylib::prelude::*;
use tracing::warn;

use crate::constants::*;
use crate::host::{HostElement, LayerElement, parse_css_url};
use crate::texture_loader::load_texture_with_exif_rotation;

#[derive(Debug, Default)]
pub struct StageLayer {
    background: Option<String>,
    classes: BTreeSet<String>,
    opacity: f32,
}

impl StageLayer {
    pub fn image(&self) -> Option<&str> {
        self.background.as_deref().and_then(parse_css_url)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Linear opacity transition toward 1.0 while visible, 0.0 otherwise.
    pub fn update(&mut self, dt: f32) {
        let target = if self.has_class(VISIBLE_CLASS) { 1.0 } else { 0.0 };
        let step = dt / FADE_DURATION;
        self.opacity = if self.opacity < target {
            (self.opacity + step).min(target)
        } else {
            (self.opacity - step).max(target)
        };
    }

    fn draw(&self, d: &mut RaylibDrawHandle, texture: &Texture2D) {
        if self.opacity <= 0.0 {
            return;
        }

        let tex_width = texture.width() as f32;
        let tex_height = texture.height() as f32;

        // Cover the whole render target, cropping the overflow
        let scale = (RENDER_WIDTH as f32 / tex_width).max(RENDER_HEIGHT as f32 / tex_height);
        let scaled_width = tex_width * scale;
        let scaled_height = tex_height * scale;

        d.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            Rectangle::new(
                (RENDER_WIDTH as f32 - scaled_width) * 0.5,
                (RENDER_HEIGHT as f32 - scaled_height) * 0.5,
                scaled_width,
                scaled_height,
            ),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::new(255, 255, 255, (self.opacity * 255.0).round() as u8),
        );
    }
}

impl LayerElement for StageLayer {
    fn set_background_image(&mut self, value: &str) {
        self.background = Some(value.to_owned());
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_owned());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

pub struct Stage {
    attributes: HashMap<String, String>,
    layer_a: StageLayer,
    layer_b: StageLayer,
    // None marks a reference that failed to load, not retried while a layer shows it
    textures: HashMap<String, Option<Texture2D>>,
}

impl Stage {
    pub fn new(images_attribute: &str) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(IMAGES_ATTRIBUTE.to_owned(), images_attribute.to_owned());
        Self {
            attributes,
            layer_a: StageLayer::default(),
            layer_b: StageLayer::default(),
            textures: HashMap::new(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.layer_a.update(dt);
        self.layer_b.update(dt);
    }

    /// Loads the textures of the images the layers currently reference and
    /// releases the rest.
    pub fn load_textures(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        self.evict_unused();
        for layer in [&self.layer_a, &self.layer_b] {
            let Some(reference) = layer.image() else { continue };
            if self.textures.contains_key(reference) {
                continue;
            }

            let texture = match load_texture_with_exif_rotation(rl, thread, Path::new(reference)) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    warn!("{:#}", e);
                    None
                }
            };
            self.textures.insert(reference.to_owned(), texture);
        }
    }

    fn evict_unused(&mut self) {
        let (a, b) = (self.layer_a.image(), self.layer_b.image());
        self.textures
            .retain(|reference, _| Some(reference.as_str()) == a || Some(reference.as_str()) == b);
    }

    /// Hidden layer first so the visible one fades in on top.
    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        let (bottom, top) = if self.layer_a.has_class(VISIBLE_CLASS) {
            (&self.layer_b, &self.layer_a)
        } else {
            (&self.layer_a, &self.layer_b)
        };

        for layer in [bottom, top] {
            let texture = layer
                .image()
                .and_then(|reference| self.textures.get(reference))
                .and_then(Option::as_ref);
            if let Some(texture) = texture {
                layer.draw(d, texture);
            }
        }
    }
}

impl HostElement for Stage {
    type Layer = StageLayer;

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn query_layer(&mut self, selector: &str) -> Option<&mut StageLayer> {
        match selector {
            LAYER_A_SELECTOR => Some(&mut self.layer_a),
            LAYER_B_SELECTOR => Some(&mut self.layer_b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::css_url;
    use crate::rotation::Layer;
    use crate::slider::SliderController;
    use std::time::Duration;

    #[test]
    fn opacity_follows_visibility_class() {
        let mut layer = StageLayer::default();
        layer.add_class(VISIBLE_CLASS);
        layer.update(FADE_DURATION / 2.0);
        assert!((layer.opacity() - 0.5).abs() < 1e-6);
        layer.update(FADE_DURATION);
        assert_eq!(layer.opacity(), 1.0);

        layer.remove_class(VISIBLE_CLASS);
        layer.update(FADE_DURATION * 2.0);
        assert_eq!(layer.opacity(), 0.0);
    }

    #[test]
    fn layer_reads_back_its_image() {
        let mut layer = StageLayer::default();
        assert_eq!(layer.image(), None);
        layer.set_background_image(&css_url("photos/1.jpg"));
        assert_eq!(layer.image(), Some("photos/1.jpg"));
    }

    #[test]
    fn stage_exposes_images_attribute_and_layers() {
        let mut stage = Stage::new(r#"["a.jpg"]"#);
        assert_eq!(stage.attribute(IMAGES_ATTRIBUTE), Some(r#"["a.jpg"]"#));
        assert!(stage.query_layer(LAYER_A_SELECTOR).is_some());
        assert!(stage.query_layer(LAYER_B_SELECTOR).is_some());
        assert!(stage.query_layer(".missing").is_none());
    }

    #[test]
    fn outgoing_layer_is_transparent_when_its_image_changes() {
        let attribute = r#"["a.jpg","b.jpg","c.jpg"]"#;
        let mut slider = SliderController::mount(Some(Stage::new(attribute))).unwrap();
        slider.host_mut().update(FADE_DURATION);
        assert_eq!(slider.host().layer_a.opacity(), 1.0);

        slider.update(TICK_INTERVAL);
        let frame = 1.0 / FPS as f32;
        let mut swapped = false;
        for _ in 0..FPS {
            let before = slider.host().layer_a.image().map(str::to_owned);
            // Same order as the window loop: timers first, then the fade
            slider.update(Duration::from_secs_f32(frame));
            if slider.host().layer_a.image() != before.as_deref() {
                assert_eq!(slider.host().layer_a.image(), Some("c.jpg"));
                assert_eq!(slider.host().layer_a.opacity(), 0.0);
                assert_eq!(slider.host().layer_b.opacity(), 1.0);
                swapped = true;
            }
            slider.host_mut().update(frame);
        }
        assert!(swapped);
        assert!(slider.host().layer_b.has_class(VISIBLE_CLASS));
        assert_eq!(slider.state().visible_layer(), Layer::B);
    }

    #[test]
    fn fade_ends_before_swap_delay() {
        assert!(FADE_DURATION < SWAP_DELAY.as_secs_f32());
    }

    #[test]
    fn unused_textures_are_released() {
        let mut stage = Stage::new("[]");
        stage.layer_a.set_background_image(&css_url("a.jpg"));
        stage.layer_b.set_background_image(&css_url("b.jpg"));
        for reference in ["old.jpg", "a.jpg", "b.jpg"] {
            stage.textures.insert(reference.to_owned(), None);
        }

        stage.evict_unused();

        let mut kept: Vec<_> = stage.textures.keys().cloned().collect();
        kept.sort();
        assert_eq!(kept, vec!["a.jpg", "b.jpg"]);
    }
}
