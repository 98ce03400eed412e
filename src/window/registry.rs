use crate::constants::Z_FLOOR;

use super::{Pane, PaneId, PaneKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusChange {
    pub gained: Option<PaneId>,
    pub lost: Vec<PaneId>,
}

/// Result of a z-order renormalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZOrder {
    /// z-index for the focusing pane, or the next free z-index when nothing
    /// was being focused.
    pub z: i32,
    pub focus: Option<FocusChange>,
}

#[derive(Debug, Default)]
pub struct PaneRegistry {
    panes: Vec<Pane>,
    next_id: u64,
    focused: Option<PaneId>,
}

impl PaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused id. Ids only grow, and any id still present is skipped.
    pub fn allocate_id(&mut self) -> PaneId {
        loop {
            self.next_id += 1;
            let id = PaneId::new(self.next_id);
            if !self.contains(id) {
                return id;
            }
        }
    }

    pub fn push(&mut self, mut pane: Pane) -> usize {
        let index = self.panes.len();
        pane.index = index;
        self.panes.push(pane);
        index
    }

    /// Splices the pane out and renumbers every later pane.
    pub fn remove(&mut self, id: PaneId) -> Option<Pane> {
        let position = self.position(id)?;
        let pane = self.panes.remove(position);
        for (index, pane) in self.panes.iter_mut().enumerate().skip(position) {
            pane.index = index;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        Some(pane)
    }

    pub fn position(&self, id: PaneId) -> Option<usize> {
        self.panes.iter().position(|p| p.id == id)
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id == id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Pane> {
        self.panes.iter().find(|p| p.spec.title == title)
    }

    pub fn find_kind(&self, kind: PaneKind) -> Option<&Pane> {
        self.panes.iter().find(|p| p.spec.id == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pane> {
        self.panes.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pane> {
        self.panes.iter_mut()
    }

    pub fn ids(&self) -> Vec<PaneId> {
        self.panes.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn focused(&self) -> Option<PaneId> {
        self.focused
    }

    /// Visible pane with the highest z-index.
    pub fn topmost(&self) -> Option<PaneId> {
        self.panes
            .iter()
            .filter(|p| !p.minimized)
            .filter_map(|p| p.z_index.map(|z| (z, p.id)))
            .max()
            .map(|(_, id)| id)
    }

    /// Packs every z-index into a contiguous band from [`Z_FLOOR`], placing
    /// `focusing` on top, and reports whether the visible top changed.
    pub fn get_max_z(&mut self, focusing: Option<PaneId>) -> ZOrder {
        let mut ranked: Vec<(bool, i32, usize)> = self
            .panes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.z_index.is_some() || Some(p.id) == focusing)
            .map(|(i, p)| (Some(p.id) == focusing, p.z_index.unwrap_or(i32::MAX), i))
            .collect();
        ranked.sort_unstable();
        for (rank, (_, _, index)) in ranked.iter().enumerate() {
            self.panes[*index].z_index = Some(Z_FLOOR + rank as i32);
        }

        let top = self.topmost();
        let focus = (top != self.focused).then(|| FocusChange {
            gained: top,
            lost: self
                .panes
                .iter()
                .filter(|p| p.z_index.is_some() && Some(p.id) != top)
                .map(|p| p.id)
                .collect(),
        });
        self.focused = top;

        let z = focusing
            .and_then(|id| self.get(id))
            .and_then(|p| p.z_index)
            .unwrap_or(Z_FLOOR + ranked.len() as i32);
        ZOrder { z, focus }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::window::{PaneElements, PaneSpec};

    fn registry_with(n: usize) -> (PaneRegistry, Vec<PaneId>) {
        let mut doc: Document<()> = Document::new();
        let mut registry = PaneRegistry::new();
        let mut ids = Vec::new();
        for i in 0..n {
            let id = registry.allocate_id();
            let el = doc.create_element("div");
            let elements = PaneElements {
                container: el,
                titlebar: None,
                content: el,
                exit_button: None,
                max_button: None,
                min_button: None,
            };
            registry.push(Pane::new(id, format!("0-obj{id}"), PaneSpec::new(format!("p{i}"), ""), elements));
            ids.push(id);
        }
        (registry, ids)
    }

    #[test]
    fn remove_renumbers_indexes() {
        let (mut registry, ids) = registry_with(4);
        assert!(registry.remove(ids[1]).is_some());
        assert!(registry.remove(ids[1]).is_none());
        let indexes: Vec<usize> = registry.iter().map(Pane::index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn ids_are_never_reused() {
        let (mut registry, ids) = registry_with(2);
        registry.remove(ids[1]);
        let next = registry.allocate_id();
        assert!(!ids.contains(&next));
    }

    #[test]
    fn focusing_pane_goes_to_the_top_of_a_packed_band() {
        let (mut registry, ids) = registry_with(3);
        for id in &ids {
            registry.get_max_z(Some(*id));
        }
        assert_eq!(registry.topmost(), Some(ids[2]));

        let order = registry.get_max_z(Some(ids[0]));
        assert_eq!(order.z, Z_FLOOR + 2);
        let change = order.focus.unwrap_or_else(|| panic!("focus should move"));
        assert_eq!(change.gained, Some(ids[0]));
        assert_eq!(change.lost, vec![ids[1], ids[2]]);
        let zs: Vec<Option<i32>> = registry.iter().map(Pane::z_index).collect();
        assert_eq!(zs, vec![Some(102), Some(100), Some(101)]);
    }

    #[test]
    fn get_max_z_is_idempotent() {
        let (mut registry, ids) = registry_with(3);
        for id in &ids {
            registry.get_max_z(Some(*id));
        }
        let first = registry.get_max_z(None);
        let top = registry.topmost();
        let second = registry.get_max_z(None);
        assert_eq!(first.focus, None);
        assert_eq!(second, first);
        assert_eq!(registry.topmost(), top);
        assert_eq!(second.z, Z_FLOOR + 3);
    }

    #[test]
    fn minimized_panes_never_hold_focus() {
        let (mut registry, ids) = registry_with(2);
        registry.get_max_z(Some(ids[0]));
        registry.get_max_z(Some(ids[1]));
        if let Some(p) = registry.get_mut(ids[1]) {
            p.minimized = true;
        }
        let order = registry.get_max_z(None);
        assert_eq!(order.focus.and_then(|f| f.gained), Some(ids[0]));
        assert_eq!(registry.focused(), Some(ids[0]));
    }
}
