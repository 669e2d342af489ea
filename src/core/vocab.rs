use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::pointer::{dot, SemanticPointer};

/// Ordered name -> pointer table.
///
/// Keys keep insertion order so readouts are stable across runs.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    dims: usize,
    names: Vec<String>,
    pointers: Vec<SemanticPointer>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            names: Vec::new(),
            pointers: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn add(&mut self, name: impl Into<String>, pointer: SemanticPointer) -> Result<()> {
        let name = name.into();
        if pointer.dims() != self.dims {
            return Err(Error::config(
                "vocabulary",
                format!(
                    "pointer `{name}` has {} dims, vocabulary has {}",
                    pointer.dims(),
                    self.dims
                ),
            ));
        }
        if self.index.contains_key(&name) {
            return Err(Error::config(
                "vocabulary",
                format!("duplicate key `{name}`"),
            ));
        }
        self.push_unique(name, pointer);
        Ok(())
    }

    // Caller guarantees `name` is new and dims match.
    pub(crate) fn push_unique(&mut self, name: String, pointer: SemanticPointer) {
        debug_assert!(!self.index.contains_key(&name));
        debug_assert_eq!(pointer.dims(), self.dims);
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.pointers.push(pointer);
    }

    pub fn get(&self, name: &str) -> Option<&SemanticPointer> {
        self.index.get(name).map(|&i| &self.pointers[i])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Entry with the largest dot product against `v`.
    pub fn nearest(&self, v: &[f32]) -> Option<(&str, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.pointers.iter().enumerate() {
            let s = dot(p.as_slice(), v);
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((i, s));
            }
        }
        best.map(|(i, s)| (self.names[i].as_str(), s))
    }
}
