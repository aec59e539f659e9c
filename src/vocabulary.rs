//! Class vocabulary: the ordered list of recognized class names.
//!
//! A name's position in the list is its YOLO class id.

use log::warn;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Defect classes of the NEU-DET dataset, in their published order.
pub const NEU_DET_CLASSES: &[&str] = &[
    "crazing",
    "inclusion",
    "patches",
    "pitted_surface",
    "rolled-in_scale",
    "scratches",
];

/// Ordered, de-duplicated class names with O(1) name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVocabulary {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl ClassVocabulary {
    /// The built-in NEU-DET vocabulary
    pub fn neu_det() -> Self {
        Self::from_names(NEU_DET_CLASSES.iter().copied())
    }

    /// Build a vocabulary from names in order. Names are trimmed, blank entries
    /// are dropped and only the first occurrence of a repeated name is kept.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = ClassVocabulary {
            names: Vec::new(),
            ids: HashMap::new(),
        };
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if vocabulary.ids.contains_key(name) {
                warn!("Duplicate class name '{}' ignored", name);
                continue;
            }
            vocabulary.ids.insert(name.to_string(), vocabulary.names.len());
            vocabulary.names.push(name.to_string());
        }
        vocabulary
    }

    /// Load a newline-delimited class list.
    ///
    /// No path, a missing file or a file without any names all fall back to
    /// [`ClassVocabulary::neu_det`]. Only a file that exists but cannot be read
    /// is an error.
    pub fn load(path: Option<&Path>) -> io::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::neu_det());
        };
        if !path.exists() {
            warn!(
                "Class file {} not found, using the built-in NEU-DET classes",
                path.display()
            );
            return Ok(Self::neu_det());
        }

        let content = fs::read_to_string(path)?;
        let vocabulary = Self::from_names(content.lines());
        if vocabulary.is_empty() {
            warn!(
                "Class file {} lists no classes, using the built-in NEU-DET classes",
                path.display()
            );
            return Ok(Self::neu_det());
        }
        Ok(vocabulary)
    }

    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `(id, name)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}

impl Default for ClassVocabulary {
    fn default() -> Self {
        Self::neu_det()
    }
}
