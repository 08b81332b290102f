//! Directory grammars and their registry.
//!
//! Every EDIFACT directory (version + release, for example `D96A`) defines
//! its own segments and messages, so message bodies are parsed by a grammar
//! chosen per directory. Grammars are looked up in a [`DirectoryTable`], an
//! explicit map from directory key to constructor, and instantiated lazily
//! by a [`DirectoryRegistry`] owned by one parser.

mod dictionary;
mod segments;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{Error, GrammarError, Result};
use crate::event::EventSink;
use crate::segment::SegmentStream;

pub use dictionary::{DictionaryGrammar, Directory, BUILTIN_DIRECTORIES, D01B, D93A, D96A};

/// Parses one message body against one directory.
///
/// A grammar instance is reused for every message of its directory. It
/// must not carry state from one message to the next: the only thing that
/// survives a call is the position of the shared stream.
pub trait DirectoryGrammar {
    /// Parse the body of a message of type `message_type`, up to and
    /// including its trailer, emitting events straight into `sink`.
    fn parse_message_body(
        &mut self,
        message_type: &str,
        stream: &mut SegmentStream<'_>,
        sink: &mut dyn EventSink,
    ) -> std::result::Result<(), GrammarError>;
}

/// Constructor for a compiled-in directory grammar.
pub type GrammarConstructor = fn() -> Box<dyn DirectoryGrammar>;

type Factory = Box<dyn Fn() -> Box<dyn DirectoryGrammar>>;

/// Maps directory keys to grammar constructors.
pub struct DirectoryTable {
    factories: HashMap<String, Factory>,
}

impl DirectoryTable {
    /// A table with no directories.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// The directories compiled into this crate.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (key, constructor) in BUILTIN_DIRECTORIES.entries() {
            table.insert(*key, *constructor);
        }
        table
    }

    /// Register a grammar constructor, replacing any previous entry for the
    /// same (case-insensitive) key.
    pub fn insert<F>(&mut self, key: impl AsRef<str>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn DirectoryGrammar> + 'static,
    {
        self.factories
            .insert(normalize_key(key.as_ref()), Box::new(factory));
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<F>(mut self, key: impl AsRef<str>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn DirectoryGrammar> + 'static,
    {
        self.insert(key, factory);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(&normalize_key(key))
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn construct(&self, key: &str) -> Option<Box<dyn DirectoryGrammar>> {
        self.factories.get(key).map(|factory| factory())
    }
}

impl Default for DirectoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for DirectoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryTable")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Directory keys are case-insensitive.
pub fn normalize_key(key: &str) -> String {
    key.to_uppercase()
}

/// Lazily constructed, cached grammar instances, one per directory key.
pub struct DirectoryRegistry {
    table: DirectoryTable,
    grammars: HashMap<String, Box<dyn DirectoryGrammar>>,
}

impl DirectoryRegistry {
    pub fn new(table: DirectoryTable) -> Self {
        Self {
            table,
            grammars: HashMap::new(),
        }
    }

    /// The grammar for `key`, constructed on first request.
    ///
    /// Fails with [`Error::UnsupportedDirectory`] when the table has no
    /// entry for the key.
    pub fn get(&mut self, key: &str) -> Result<&mut dyn DirectoryGrammar> {
        let key = normalize_key(key);
        let grammar = match self.grammars.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let grammar = self
                    .table
                    .construct(entry.key())
                    .ok_or_else(|| Error::UnsupportedDirectory(entry.key().clone()))?;
                debug!(directory = %entry.key(), "directory grammar created");
                entry.insert(grammar)
            }
        };
        Ok(grammar.as_mut())
    }

    /// Whether a grammar for `key` has been constructed already.
    pub fn is_cached(&self, key: &str) -> bool {
        self.grammars.contains_key(&normalize_key(key))
    }

    /// Whether the table can serve `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains(key)
    }

    /// Number of constructed grammars.
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    pub fn table(&self) -> &DirectoryTable {
        &self.table
    }
}

impl fmt::Debug for DirectoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cached: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        cached.sort_unstable();
        f.debug_struct("DirectoryRegistry")
            .field("table", &self.table)
            .field("cached", &cached)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;

    impl DirectoryGrammar for Nop {
        fn parse_message_body(
            &mut self,
            _message_type: &str,
            _stream: &mut SegmentStream<'_>,
            _sink: &mut dyn EventSink,
        ) -> std::result::Result<(), GrammarError> {
            Ok(())
        }
    }

    fn address(grammar: &mut dyn DirectoryGrammar) -> *const () {
        grammar as *mut dyn DirectoryGrammar as *const ()
    }

    #[test]
    fn test_same_key_same_instance() {
        let mut registry = DirectoryRegistry::new(DirectoryTable::builtin());
        let first = address(registry.get("d96a").unwrap());
        let second = address(registry.get("D96A").unwrap());
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_directories_distinct_instances() {
        let mut registry = DirectoryRegistry::new(DirectoryTable::builtin());
        let d96a = address(registry.get("D96A").unwrap());
        let d01b = address(registry.get("D01B").unwrap());
        assert_ne!(d96a, d01b);
        assert_eq!(registry.len(), 2);
        assert!(registry.is_cached("d01b"));
    }

    #[test]
    fn test_unsupported_directory() {
        let mut registry = DirectoryRegistry::new(DirectoryTable::builtin());
        match registry.get("D99Z") {
            Err(Error::UnsupportedDirectory(key)) => assert_eq!(key, "D99Z"),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("D99Z should not resolve"),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_custom_table() {
        let table =
            DirectoryTable::empty().with("s93a", || Box::new(Nop) as Box<dyn DirectoryGrammar>);
        assert_eq!(table.keys(), vec!["S93A"]);
        let mut registry = DirectoryRegistry::new(table);
        assert!(registry.contains("S93A"));
        assert!(registry.get("S93A").is_ok());
        assert!(registry.get("D96A").is_err());
    }

    #[test]
    fn test_builtin_keys() {
        let table = DirectoryTable::builtin();
        assert_eq!(table.keys(), vec!["D01B", "D93A", "D96A"]);
    }
}
