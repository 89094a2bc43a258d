//! Saved durations for quick reuse.

use regex::Regex;

use crate::Error;

/// An ordered list of saved durations, in seconds.
///
/// Insertion order is preserved and duplicates are allowed, matching the
/// selection list the labels feed. The list starts empty and only grows
/// within a session.
#[derive(Clone, Debug, Default)]
pub struct PresetStore {
    entries: Vec<u32>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a duration. Returns the index of the new entry.
    ///
    /// Rejects a zero duration with [`Error::InvalidDuration`] and leaves
    /// the list unchanged.
    pub fn add(&mut self, seconds: u32) -> Result<usize, Error> {
        if seconds == 0 {
            return Err(Error::InvalidDuration {
                input: seconds.to_string(),
            });
        }

        self.entries.push(seconds);

        Ok(self.entries.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.entries.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().copied()
    }

    /// The selectable label for a saved duration, e.g. `"90 segundos"`.
    pub fn label(seconds: u32) -> String {
        format!("{} segundos", seconds)
    }

    /// Read a duration back out of a label produced by [`PresetStore::label`].
    ///
    /// Takes the leading integer token of the label; returns `None` when
    /// there is no such token. Every label this store renders resolves back
    /// to the duration it was rendered from.
    pub fn resolve(label: &str) -> Option<u32> {
        let re = Regex::new(r"^\s*([0-9]+)(\s|$)").unwrap();
        let token = re.captures(label)?.get(1)?;

        token.as_str().parse().ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_returns_the_new_index() {
        let mut presets = PresetStore::new();

        assert_eq!(presets.add(90), Ok(0));
        assert_eq!(presets.add(45), Ok(1));
        assert_eq!(presets.add(90), Ok(2));

        assert_eq!(presets.len(), 3);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut presets = PresetStore::new();

        presets.add(90).unwrap();
        presets.add(45).unwrap();
        presets.add(120).unwrap();

        let entries: Vec<u32> = presets.iter().collect();

        assert_eq!(entries, vec![90, 45, 120]);
        assert_eq!(presets.get(1), Some(45));
        assert_eq!(presets.get(3), None);
    }

    #[test]
    fn rejects_zero() {
        let mut presets = PresetStore::new();

        let err = presets.add(0).unwrap_err();

        assert!(matches!(err, Error::InvalidDuration { .. }));
        assert!(presets.is_empty());
    }

    #[test]
    fn labels_round_trip() {
        for seconds in [1, 45, 90, 3600, u32::MAX] {
            let label = PresetStore::label(seconds);

            assert_eq!(PresetStore::resolve(&label), Some(seconds));
        }
    }

    #[test]
    fn resolve_rejects_labels_without_a_leading_number() {
        assert_eq!(PresetStore::resolve(""), None);
        assert_eq!(PresetStore::resolve("segundos"), None);
        assert_eq!(PresetStore::resolve("abc segundos"), None);
        assert_eq!(PresetStore::resolve("-5 segundos"), None);
        assert_eq!(PresetStore::resolve("90segundos"), None);
    }

    #[test]
    fn save_then_reload_by_label() {
        let mut presets = PresetStore::new();

        presets.add(90).unwrap();
        presets.add(45).unwrap();

        let selected = PresetStore::resolve(&PresetStore::label(45));

        assert_eq!(selected, Some(45));
    }
}
