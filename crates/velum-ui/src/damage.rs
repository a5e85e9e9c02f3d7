//! Damage bits and accumulated window regions.
//!
//! Non-window widgets carry only the small [`Damage`] bitmask; fine-
//! grained dirty rectangles accumulate on the owning window's registry
//! entry as a [`Region`]. A child marking itself dirty propagates the
//! cheap `CHILD` bit up through its ancestors, so redraw can walk down
//! from the window touching only damaged subtrees.

use bitflags::bitflags;
use velum_core::geometry::Rect;

use crate::context::Ui;
use crate::tree::WidgetId;

bitflags! {
    /// What kind of repaint a widget needs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Damage: u8 {
        /// A descendant needs repainting; the widget itself is intact.
        const CHILD   = 0b0000_0001;
        /// A previously obscured part was exposed.
        const EXPOSE  = 0b0000_0010;
        /// Scrolled contents moved.
        const SCROLL  = 0b0000_0100;
        /// An overlay needs redrawing.
        const OVERLAY = 0b0000_1000;
        /// Reserved for widget-specific use.
        const USER1   = 0b0001_0000;
        /// Reserved for widget-specific use.
        const USER2   = 0b0010_0000;
        /// Everything must be repainted.
        const ALL     = 0b1000_0000;
    }
}

/// Union of dirty rectangles accumulated on one window between flushes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new(rect: Rect) -> Self {
        Region { rects: vec![rect] }
    }

    pub fn add(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        // skip rectangles already covered by an accumulated one
        if self.rects.iter().any(|r| r.covers(&rect)) {
            return;
        }
        self.rects.push(rect);
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Bounding box of the accumulated damage.
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::default(), |acc, r| acc.union(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }
}

impl Ui {
    /// Mark a widget fully dirty.
    pub fn redraw(&mut self, id: WidgetId) {
        self.damage_widget(id, Damage::ALL);
    }

    /// Mark every shown window fully dirty.
    pub fn redraw_all(&mut self) {
        let windows: Vec<_> = self.windows.iter_widgets().collect();
        for w in windows {
            self.redraw(w);
        }
    }

    /// Mark a whole widget with the given damage bits.
    ///
    /// On a window this discards any fine-grained region, since the whole
    /// surface will repaint anyway. On a plain widget it damages the
    /// rectangle the widget covers.
    pub fn damage_widget(&mut self, id: WidgetId, bits: Damage) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        if !node.behavior.is_window() {
            let rect = node.rect;
            self.damage_rect(id, bits, rect);
            return;
        }
        // window not mapped yet: nothing to repaint
        let Some(entry) = self.windows.entry_mut(id) else {
            return;
        };
        entry.region = None;
        if let Some(node) = self.tree.get_mut(id) {
            node.damage |= bits;
        }
        self.damage_pending = true;
    }

    /// Mark a sub-rectangle of a widget dirty.
    ///
    /// `rect` is window-relative, like all widget geometry. The rectangle
    /// is clipped against the owning window; empty results are dropped,
    /// and a rectangle covering the whole window collapses into the
    /// cheaper whole-window path.
    pub fn damage_rect(&mut self, id: WidgetId, bits: Damage, rect: Rect) {
        let mut bits = bits;
        let mut wi = id;
        // mark all plain widgets between id and its window with CHILD
        loop {
            let Some(node) = self.tree.get_mut(wi) else {
                return;
            };
            if node.behavior.is_window() {
                break;
            }
            node.damage |= bits;
            let Some(parent) = node.parent else {
                return;
            };
            wi = parent;
            bits = Damage::CHILD;
        }
        if self.windows.entry(wi).is_none() {
            return; // window not mapped
        }

        let win = match self.tree.get(wi) {
            Some(node) => node.rect,
            None => return,
        };
        let mut r = rect;
        if r.x < 0 {
            r.w += r.x;
            r.x = 0;
        }
        if r.y < 0 {
            r.h += r.y;
            r.y = 0;
        }
        if r.w > win.w - r.x {
            r.w = win.w - r.x;
        }
        if r.h > win.h - r.y {
            r.h = win.h - r.y;
        }
        if r.is_empty() {
            return;
        }

        if r.x == 0 && r.y == 0 && r.w == win.w && r.h == win.h {
            self.damage_widget(wi, bits);
            return;
        }

        let window_damage = self.tree.get(wi).map(|n| n.damage).unwrap_or_default();
        let entry = match self.windows.entry_mut(wi) {
            Some(entry) => entry,
            None => return,
        };
        if !window_damage.is_empty() {
            // merge with the damage already accumulated
            if let Some(region) = entry.region.as_mut() {
                region.add(r);
            }
            if let Some(node) = self.tree.get_mut(wi) {
                node.damage |= bits;
            }
        } else {
            entry.region = Some(Region::new(r));
            if let Some(node) = self.tree.get_mut(wi) {
                node.damage = bits;
            }
        }
        self.damage_pending = true;
    }

    /// Damage bits currently accumulated on a widget.
    pub fn damage(&self, id: WidgetId) -> Damage {
        self.tree.get(id).map(|n| n.damage).unwrap_or_default()
    }

    /// Clear a widget's damage bits after it has been repainted.
    pub fn clear_damage(&mut self, id: WidgetId) {
        if let Some(node) = self.tree.get_mut(id) {
            node.damage = Damage::empty();
        }
    }

    /// True if any window has damage waiting for the next flush.
    pub fn damage_pending(&self) -> bool {
        self.damage_pending
    }

    /// Fine-grained damage accumulated on a window since the last
    /// flush; `None` once damage covers the whole window.
    pub fn window_region(&self, id: WidgetId) -> Option<&Region> {
        self.windows.entry(id).and_then(|e| e.region.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_all_is_not_child() {
        assert!(!Damage::ALL.contains(Damage::CHILD));
        assert!((Damage::ALL | Damage::CHILD).contains(Damage::CHILD));
    }

    #[test]
    fn test_region_drops_empty_and_covered() {
        let mut region = Region::new(Rect::new(0, 0, 50, 50));
        region.add(Rect::new(10, 10, 0, 5));
        region.add(Rect::new(5, 5, 10, 10));
        assert_eq!(region.iter().count(), 1);
        region.add(Rect::new(60, 0, 10, 10));
        assert_eq!(region.iter().count(), 2);
    }

    #[test]
    fn test_region_bounds() {
        let mut region = Region::new(Rect::new(0, 0, 10, 10));
        region.add(Rect::new(40, 40, 10, 10));
        assert_eq!(region.bounds(), Rect::new(0, 0, 50, 50));
    }
}
