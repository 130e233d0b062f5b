use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ImageListError {
    #[error("image list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image list must be a JSON array, found {0}")]
    NotAnArray(&'static str),
}

/// Ordered image references fed to the slider. Immutable once mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageList {
    images: Vec<String>,
}

impl ImageList {
    pub fn new(images: Vec<String>) -> Self {
        Self { images }
    }

    /// Strict parse of the JSON attribute form: `["a.jpg", "b.jpg"]`.
    ///
    /// Entries that are not strings are kept and stringified the way a
    /// browser would when building `url("...")`: `1` reads as `"1"`, `null`
    /// as `"null"`.
    pub fn parse(raw: &str) -> Result<Self, ImageListError> {
        let value: Value = serde_json::from_str(raw)?;
        match value {
            Value::Array(entries) => Ok(Self {
                images: entries.iter().map(js_string).collect(),
            }),
            other => Err(ImageListError::NotAnArray(kind_of(&other))),
        }
    }

    /// Lenient parse used at mount time: a missing attribute reads as `[]` and
    /// anything unparsable becomes an empty list.
    pub fn from_attribute(raw: Option<&str>) -> Self {
        let raw = raw.unwrap_or("[]");
        match Self::parse(raw) {
            Ok(list) => list,
            Err(e) => {
                debug!("ignoring malformed image list {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    pub fn to_attribute(&self) -> String {
        Value::from(self.images.clone()).to_string()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.images.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(String::as_str)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.images.retain(|image| keep(image.as_str()));
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.images.shuffle(rng);
    }
}

impl From<Vec<String>> for ImageList {
    fn from(images: Vec<String>) -> Self {
        Self::new(images)
    }
}

/// String conversion of a JSON value as JavaScript's `String(value)` does it.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            // Whole floats print without a fraction, 1.0 reads as "1"
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        // Nested null reads as an empty slot: String([null, 1]) is ",1"
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_null() { String::new() } else { js_string(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// --- Directory discovery ---

/// Image files directly inside `dir`, sorted by file name. A missing or
/// unreadable directory yields no images.
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("no images from {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    paths
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Where the slideshow looks for images, in order of preference.
#[derive(Debug, Clone, Default)]
pub struct ImageSources {
    pub primary_dir: Option<PathBuf>,
    pub fallback_dir: Option<PathBuf>,
    pub fallback_image: Option<PathBuf>,
}

impl ImageSources {
    /// Primary directory if it holds at least two images, else the first few
    /// images of the fallback directory (again at least two), else the single
    /// fallback image.
    pub fn resolve(&self) -> ImageList {
        self.resolve_with(|_| true)
    }

    /// Same chain, counting only the images `keep` accepts.
    pub fn resolve_with(&self, keep: impl Fn(&Path) -> bool) -> ImageList {
        let listed = |dir: &Path| -> Vec<PathBuf> {
            list_images(dir).into_iter().filter(|p| keep(p.as_path())).collect()
        };

        if let Some(dir) = &self.primary_dir {
            let paths = listed(dir);
            if paths.len() >= MIN_DIR_IMAGES {
                return to_list(paths);
            }
            debug!("{:?} has {} usable image(s), falling back", dir, paths.len());
        }

        if let Some(dir) = &self.fallback_dir {
            let mut paths = listed(dir);
            paths.truncate(FALLBACK_DIR_LIMIT);
            if paths.len() >= MIN_DIR_IMAGES {
                return to_list(paths);
            }
            debug!("{:?} has {} usable image(s), falling back", dir, paths.len());
        }

        match &self.fallback_image {
            Some(image) if keep(image.as_path()) => to_list(vec![image.clone()]),
            _ => ImageList::default(),
        }
    }
}

fn to_list(paths: Vec<PathBuf>) -> ImageList {
    paths
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .into()
}
