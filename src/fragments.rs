use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// A named piece of content handed to the render layer.
///
/// The shape is fixed when the fragment is first registered: a `Single`
/// fragment is replaced on every write, an `Appendable` one accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Single(String),
    Appendable(Vec<String>),
}

impl Fragment {
    fn write(&mut self, content: String) {
        match self {
            Self::Single(existing) => *existing = content,
            Self::Appendable(parts) => parts.push(content),
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Single(content) => content.clone(),
            Self::Appendable(parts) => parts.concat(),
        }
    }
}

/// Request-scoped named content for the render collaborator.
///
/// Handlers use this to hand values like a page title or extra head
/// markup to whatever renders the response. Insertion order is not
/// significant.
#[derive(Debug, Clone, Default)]
pub struct ContentFragments {
    fragments: Arc<Mutex<HashMap<String, Fragment>>>,
}

impl ContentFragments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as a single-valued fragment and set its content.
    pub fn set(&self, name: impl Into<String>, content: impl Into<String>) {
        self.fragments
            .lock()
            .unwrap()
            .insert(name.into(), Fragment::Single(content.into()));
    }

    /// Register `name` as an accumulating fragment, seeding it with `content`.
    pub fn set_appendable(&self, name: impl Into<String>, content: impl Into<String>) {
        self.fragments
            .lock()
            .unwrap()
            .insert(name.into(), Fragment::Appendable(vec![content.into()]));
    }

    /// Write to an already registered fragment, or register a single-valued
    /// one. Whether the write replaces or appends was decided at
    /// registration time.
    pub fn add(&self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();

        let mut fragments = self.fragments.lock().unwrap();
        match fragments.get_mut(&name) {
            Some(fragment) => fragment.write(content),
            None => {
                fragments.insert(name, Fragment::Single(content));
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.fragments
            .lock()
            .unwrap()
            .get(name)
            .map(Fragment::render)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fragments.lock().unwrap().contains_key(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_fragment_overwrites() {
        let fragments = ContentFragments::new();
        fragments.set("title", "First");
        fragments.add("title", "Second");

        assert_eq!(fragments.get("title").as_deref(), Some("Second"));
    }

    #[test]
    fn test_appendable_fragment_accumulates() {
        let fragments = ContentFragments::new();
        fragments.set_appendable("head", "<meta>");
        fragments.add("head", "<script>");

        assert_eq!(fragments.get("head").as_deref(), Some("<meta><script>"));
    }

    #[test]
    fn test_add_registers_single_by_default() {
        let fragments = ContentFragments::new();
        fragments.add("title", "Lessons");

        assert!(fragments.contains("title"));
        assert_eq!(fragments.get("title").as_deref(), Some("Lessons"));
    }

    #[test]
    fn test_missing_fragment() {
        let fragments = ContentFragments::new();
        assert_eq!(fragments.get("title"), None);
        assert!(!fragments.contains("title"));
    }
}
