// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered keyframe storage.
//!
//! Order is the only structure: adjacent keyframes form a segment. Invalid
//! indices are ignored rather than reported, and a no-op mutation does not
//! fire the change signal.

use crate::keyframe::CameraKeyframe;
use std::fmt;

/// What changed in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// A keyframe was appended at this index
    Appended(usize),
    /// The keyframe at this index was removed
    Removed(usize),
    /// Two neighbouring keyframes swapped places
    Swapped(usize, usize),
    /// All keyframes were removed
    Cleared,
    /// The transition duration of a keyframe was edited
    DurationChanged(usize),
    /// The whole list was replaced (import); holds the new length
    Replaced(usize),
    /// The selected index changed
    SelectionChanged(Option<usize>),
}

/// Callback invoked after every store mutation
pub type StoreCallback = Box<dyn Fn(&StoreChange) + Send + Sync>;

/// Ordered, mutable list of camera keyframes with a single selection
#[derive(Default)]
pub struct KeyframeStore {
    keyframes: Vec<CameraKeyframe>,
    selected: Option<usize>,
    listeners: Vec<StoreCallback>,
    revision: u64,
}

impl fmt::Debug for KeyframeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeStore")
            .field("keyframes", &self.keyframes)
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl KeyframeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener
    pub fn on_change(&mut self, callback: StoreCallback) {
        self.listeners.push(callback);
    }

    /// Counter bumped on every change, for observers that poll
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self, change: StoreChange) {
        self.revision += 1;
        tracing::debug!(?change, len = self.keyframes.len(), "Keyframe store changed");
        for listener in &self.listeners {
            listener(&change);
        }
    }

    /// Append a keyframe, returning its index
    pub fn append(&mut self, keyframe: CameraKeyframe) -> usize {
        self.keyframes.push(keyframe);
        let index = self.keyframes.len() - 1;
        self.notify(StoreChange::Appended(index));
        index
    }

    /// Remove the keyframe at `index`; out of bounds is ignored
    pub fn remove_at(&mut self, index: usize) -> Option<CameraKeyframe> {
        if index >= self.keyframes.len() {
            return None;
        }

        let removed = self.keyframes.remove(index);
        let selection_before = self.selected;
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };

        self.notify(StoreChange::Removed(index));
        if self.selected != selection_before {
            self.notify(StoreChange::SelectionChanged(self.selected));
        }
        Some(removed)
    }

    /// Swap the keyframe at `index` with its predecessor
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.keyframes.len() {
            return false;
        }
        self.swap_adjacent(index - 1);
        true
    }

    /// Swap the keyframe at `index` with its successor
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.keyframes.len() {
            return false;
        }
        self.swap_adjacent(index);
        true
    }

    /// Swap `first` and `first + 1`, keeping the selection on the same keyframe
    fn swap_adjacent(&mut self, first: usize) {
        let second = first + 1;
        self.keyframes.swap(first, second);
        self.selected = match self.selected {
            Some(sel) if sel == first => Some(second),
            Some(sel) if sel == second => Some(first),
            other => other,
        };
        self.notify(StoreChange::Swapped(first, second));
    }

    /// Remove every keyframe and the selection
    pub fn clear(&mut self) {
        self.keyframes.clear();
        self.selected = None;
        self.notify(StoreChange::Cleared);
    }

    /// Replace the whole list (import); selection is cleared
    pub fn replace_all(&mut self, keyframes: Vec<CameraKeyframe>) {
        self.keyframes = keyframes;
        self.selected = None;
        self.notify(StoreChange::Replaced(self.keyframes.len()));
    }

    /// Edit the incoming transition duration of a keyframe
    pub fn set_duration_ms(&mut self, index: usize, duration_ms: u32) -> bool {
        let Some(keyframe) = self.keyframes.get_mut(index) else {
            return false;
        };
        if keyframe.duration_ms() == duration_ms.max(1) {
            return false;
        }
        keyframe.set_duration_ms(duration_ms);
        self.notify(StoreChange::DurationChanged(index));
        true
    }

    /// Get a keyframe
    pub fn get(&self, index: usize) -> Option<&CameraKeyframe> {
        self.keyframes.get(index)
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Whether there are enough keyframes for a timeline
    pub fn is_playable(&self) -> bool {
        self.keyframes.len() >= 2
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[CameraKeyframe] {
        &self.keyframes
    }

    /// Iterate keyframes in order
    pub fn iter(&self) -> impl Iterator<Item = &CameraKeyframe> {
        self.keyframes.iter()
    }

    /// Total playback time of the timeline in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.keyframes
            .iter()
            .skip(1)
            .map(|k| u64::from(k.duration_ms()))
            .sum()
    }

    /// Currently selected index
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select a keyframe; out of bounds is ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.keyframes.len() {
            return false;
        }
        if self.selected != Some(index) {
            self.selected = Some(index);
            self.notify(StoreChange::SelectionChanged(self.selected));
        }
        true
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.notify(StoreChange::SelectionChanged(None));
        }
    }

    /// Select the next keyframe (first one if nothing is selected)
    pub fn select_next(&mut self) -> Option<usize> {
        let next = match self.selected {
            None => 0,
            Some(sel) => (sel + 1).min(self.keyframes.len().saturating_sub(1)),
        };
        self.select(next);
        self.selected
    }

    /// Select the previous keyframe (last one if nothing is selected)
    pub fn select_previous(&mut self) -> Option<usize> {
        let previous = match self.selected {
            None => self.keyframes.len().saturating_sub(1),
            Some(sel) => sel.saturating_sub(1),
        };
        self.select(previous);
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn keyframe(z: f32) -> CameraKeyframe {
        CameraKeyframe::looking_at([0.0, 0.0, z], [0.0; 3])
    }

    fn store_with(zs: &[f32]) -> KeyframeStore {
        let mut store = KeyframeStore::new();
        for &z in zs {
            store.append(keyframe(z));
        }
        store
    }

    fn zs(store: &KeyframeStore) -> Vec<f32> {
        store.iter().map(|k| k.position[2]).collect()
    }

    #[test]
    fn test_append_returns_last_index() {
        let mut store = KeyframeStore::new();
        assert_eq!(store.append(keyframe(1.0)), 0);
        assert_eq!(store.append(keyframe(2.0)), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_append_then_remove_restores() {
        let mut store = store_with(&[1.0, 2.0]);
        let last_id = store.get(1).map(|k| k.id);
        store.append(keyframe(3.0));
        store.remove_at(store.len() - 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).map(|k| k.id), last_id);
    }

    #[test]
    fn test_remove_out_of_bounds_is_noop() {
        let mut store = KeyframeStore::new();
        assert!(store.remove_at(0).is_none());
        assert_eq!(store.revision(), 0);

        let mut store = store_with(&[1.0]);
        let revision = store.revision();
        assert!(store.remove_at(5).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_remove_adjusts_selection() {
        let mut store = store_with(&[1.0, 2.0, 3.0, 4.0]);
        store.select(2);
        store.remove_at(0);
        assert_eq!(store.selected(), Some(1));
        assert_eq!(store.get(1).map(|k| k.position[2]), Some(3.0));

        store.remove_at(1);
        assert_eq!(store.selected(), None);

        store.select(0);
        store.remove_at(1);
        assert_eq!(store.selected(), Some(0));
    }

    #[test]
    fn test_move_boundaries() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        assert!(!store.move_up(0));
        assert!(!store.move_down(2));
        assert!(!store.move_down(7));
        assert_eq!(zs(&store), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_move_up_then_down_restores_order() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        assert!(store.move_up(1));
        assert_eq!(zs(&store), vec![2.0, 1.0, 3.0]);
        assert!(store.move_down(0));
        assert_eq!(zs(&store), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_selection_follows_swap() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        store.select(1);
        store.move_down(1);
        assert_eq!(store.selected(), Some(2));
        store.move_up(1);
        assert_eq!(store.selected(), Some(1));
        assert_eq!(store.get(1).map(|k| k.position[2]), Some(2.0));
    }

    #[test]
    fn test_clear_drops_selection() {
        let mut store = store_with(&[1.0, 2.0]);
        store.select(1);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        assert_eq!(store.select_next(), Some(0));
        assert_eq!(store.select_next(), Some(1));
        assert_eq!(store.select_next(), Some(2));
        assert_eq!(store.select_next(), Some(2));
        store.clear_selection();
        assert_eq!(store.select_previous(), Some(2));

        let mut empty = KeyframeStore::new();
        assert_eq!(empty.select_next(), None);
        assert_eq!(empty.select_previous(), None);
    }

    #[test]
    fn test_change_signal() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut store = KeyframeStore::new();
        store.on_change(Box::new(move |change| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(*change);
            }
        }));

        store.append(keyframe(1.0));
        store.append(keyframe(2.0));
        store.move_up(0);
        store.move_down(0);
        store.set_duration_ms(1, 500);
        store.set_duration_ms(1, 500);
        store.remove_at(9);
        store.clear();

        let seen = seen.lock().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(
            seen,
            vec![
                StoreChange::Appended(0),
                StoreChange::Appended(1),
                StoreChange::Swapped(0, 1),
                StoreChange::DurationChanged(1),
                StoreChange::Cleared,
            ]
        );
        assert_eq!(store.revision(), 5);
    }

    #[test]
    fn test_total_duration_skips_first() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        store.set_duration_ms(0, 9999);
        store.set_duration_ms(2, 300);
        assert_eq!(store.total_duration_ms(), 1200 + 300);
    }
}
