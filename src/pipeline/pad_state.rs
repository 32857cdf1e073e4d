use crate::shared::{PadCategory, PadConfig};

/// Pads per category, oldest surviving pad first. Every list holds only
/// its own category, has no duplicates and stays within
/// `PadCategory::capacity`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SamplePadState {
    pub bass: Vec<PadConfig>,
    pub drum: Vec<PadConfig>,
    pub sounds: Vec<PadConfig>,
}

impl SamplePadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, category: PadCategory) -> &[PadConfig] {
        match category {
            PadCategory::Bass => &self.bass,
            PadCategory::Drum => &self.drum,
            PadCategory::Sounds => &self.sounds,
        }
    }

    pub fn list_mut(&mut self, category: PadCategory) -> &mut Vec<PadConfig> {
        match category {
            PadCategory::Bass => &mut self.bass,
            PadCategory::Drum => &mut self.drum,
            PadCategory::Sounds => &mut self.sounds,
        }
    }

    pub fn contains(&self, pad: &PadConfig) -> bool {
        self.list(pad.category).contains(pad)
    }

    pub fn is_empty(&self) -> bool {
        self.bass.is_empty() && self.drum.is_empty() && self.sounds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bass.len() + self.drum.len() + self.sounds.len()
    }

    /// Drops `pad` if present. Returns whether anything was removed.
    pub fn remove(&mut self, pad: &PadConfig) -> bool {
        let list = self.list_mut(pad.category);
        let before = list.len();
        list.retain(|p| p != pad);
        list.len() != before
    }

    pub fn clear(&mut self) {
        self.bass.clear();
        self.drum.clear();
        self.sounds.clear();
    }

    /// All pads, bass then sounds then drum.
    pub fn iter(&self) -> impl Iterator<Item = &PadConfig> {
        self.bass.iter().chain(self.sounds.iter()).chain(self.drum.iter())
    }

    pub fn is_well_formed(&self) -> bool {
        PadCategory::ALL.iter().all(|&category| {
            let list = self.list(category);
            list.len() <= category.capacity()
                && list.iter().all(|p| p.category == category && p.is_valid())
                && list.iter().enumerate().all(|(i, p)| !list[..i].contains(p))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(category: PadCategory, slot: u8) -> PadConfig {
        PadConfig { category, slot }
    }

    #[test]
    fn default_is_empty() {
        let state = SamplePadState::new();
        assert!(state.is_empty());
        assert_eq!(state.len(), 0);
        assert!(state.is_well_formed());
    }

    #[test]
    fn contains_checks_category_and_slot() {
        let mut state = SamplePadState::new();
        state.bass.push(pad(PadCategory::Bass, 2));
        assert!(state.contains(&pad(PadCategory::Bass, 2)));
        assert!(!state.contains(&pad(PadCategory::Drum, 2)));
        assert!(!state.contains(&pad(PadCategory::Bass, 3)));
    }

    #[test]
    fn remove_only_touches_matching_pad() {
        let mut state = SamplePadState::new();
        state.sounds = vec![pad(PadCategory::Sounds, 0), pad(PadCategory::Sounds, 4)];
        assert!(state.remove(&pad(PadCategory::Sounds, 0)));
        assert!(!state.remove(&pad(PadCategory::Sounds, 0)));
        assert_eq!(state.sounds, vec![pad(PadCategory::Sounds, 4)]);
    }

    #[test]
    fn well_formed_rejects_overfull_and_misfiled_lists() {
        let mut state = SamplePadState::new();
        state.bass = vec![pad(PadCategory::Bass, 0), pad(PadCategory::Bass, 1)];
        assert!(!state.is_well_formed());

        let mut state = SamplePadState::new();
        state.drum = vec![pad(PadCategory::Bass, 0)];
        assert!(!state.is_well_formed());

        let mut state = SamplePadState::new();
        state.sounds = vec![pad(PadCategory::Sounds, 1), pad(PadCategory::Sounds, 1)];
        assert!(!state.is_well_formed());
    }

    #[test]
    fn iter_walks_every_category() {
        let mut state = SamplePadState::new();
        state.bass.push(pad(PadCategory::Bass, 1));
        state.drum.push(pad(PadCategory::Drum, 9));
        state.sounds.push(pad(PadCategory::Sounds, 15));
        assert_eq!(state.iter().count(), 3);
        assert_eq!(state.len(), 3);
    }
}
