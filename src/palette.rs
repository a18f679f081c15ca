//! User palette: up to [`PALETTE_CAPACITY`] distinct colors, persisted as a
//! JSON array of hex strings under [`PALETTE_STORAGE_KEY`].

use crate::color::HexColor;
use crate::config::{PALETTE_CAPACITY, PALETTE_STORAGE_KEY};
use crate::error::{StorageError, ToolError};
use crate::storage::KeyValueStore;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<HexColor>,
}

impl Palette {
    pub const CAPACITY: usize = PALETTE_CAPACITY;

    /// Reads the stored palette. Missing, unreadable or corrupt data gives an
    /// empty palette; invalid entries and duplicates are dropped.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(PALETTE_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) | Err(_) => return Self::default(),
        };
        let entries: Vec<String> = serde_json::from_str(&raw).unwrap_or_default();
        let mut palette = Self::default();
        for color in entries.iter().filter_map(|e| HexColor::parse_lenient(e)) {
            if palette.colors.len() == Self::CAPACITY {
                break;
            }
            if !palette.contains(color) {
                palette.colors.push(color);
            }
        }
        palette
    }

    pub fn colors(&self) -> &[HexColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= Self::CAPACITY
    }

    pub fn contains(&self, color: HexColor) -> bool {
        self.colors.contains(&color)
    }

    /// Appends `color` unless already present. Returns whether the palette
    /// changed. A full palette is rejected even for a duplicate.
    pub fn add(&mut self, color: HexColor, store: &dyn KeyValueStore) -> Result<bool, ToolError> {
        if self.is_full() {
            return Err(ToolError::PaletteFull { max: Self::CAPACITY });
        }
        if self.contains(color) {
            return Ok(false);
        }
        self.colors.push(color);
        self.persist(store);
        Ok(true)
    }

    pub fn remove(&mut self, index: usize, store: &dyn KeyValueStore) -> Option<HexColor> {
        if index >= self.colors.len() {
            return None;
        }
        let removed = self.colors.remove(index);
        self.persist(store);
        Some(removed)
    }

    /// Fails on an empty palette. The caller asks for confirmation first.
    pub fn clear(&mut self, store: &dyn KeyValueStore) -> Result<(), ToolError> {
        if self.is_empty() {
            return Err(ToolError::PaletteEmpty);
        }
        self.colors.clear();
        self.persist(store);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(&self.colors)?)
    }

    /// Write failures leave the palette usable in memory for the session.
    fn persist(&self, store: &dyn KeyValueStore) {
        let _ = self
            .to_json()
            .and_then(|json| store.set(PALETTE_STORAGE_KEY, &json));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected("quota".into()))
        }
    }

    fn hex(s: &str) -> HexColor {
        s.parse().unwrap()
    }

    #[test]
    fn add_persists_and_dedupes() {
        let store = MemoryStore::new();
        let mut p = Palette::default();
        assert_eq!(p.add(hex("#ff00aa"), &store), Ok(true));
        assert_eq!(p.add(hex("#FF00AA"), &store), Ok(false));
        assert_eq!(p.len(), 1);
        assert_eq!(
            store.get(PALETTE_STORAGE_KEY).unwrap().as_deref(),
            Some("[\"#ff00aa\"]")
        );
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        for raw in ["{not json", "42", "{\"a\":1}", ""] {
            let store = MemoryStore::with_entry(PALETTE_STORAGE_KEY, raw);
            assert!(Palette::load(&store).is_empty(), "raw {raw:?}");
        }
        assert!(Palette::load(&BrokenStore).is_empty());
        assert!(Palette::load(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn load_sanitises_entries() {
        let many: Vec<String> = (0..30).map(|i| format!("#0000{i:02x}")).collect();
        let mut raw: Vec<String> = vec!["bogus".into(), "#0000AA".into(), "#0000aa".into()];
        raw.extend(many);
        let store = MemoryStore::with_entry(PALETTE_STORAGE_KEY, &serde_json::to_string(&raw).unwrap());
        let p = Palette::load(&store);
        assert_eq!(p.len(), Palette::CAPACITY);
        assert_eq!(p.colors()[0], hex("#0000aa"));
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let mut p = Palette::default();
        assert_eq!(p.add(hex("#123456"), &BrokenStore), Ok(true));
        assert_eq!(p.remove(0, &BrokenStore), Some(hex("#123456")));
        assert!(p.is_empty());
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let store = MemoryStore::new();
        let mut p = Palette::default();
        p.add(hex("#111111"), &store).unwrap();
        assert_eq!(p.remove(3, &store), None);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn clear_requires_entries() {
        let store = MemoryStore::new();
        let mut p = Palette::default();
        assert_eq!(p.clear(&store), Err(ToolError::PaletteEmpty));
        p.add(hex("#111111"), &store).unwrap();
        assert_eq!(p.clear(&store), Ok(()));
        assert_eq!(store.get(PALETTE_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }
}
