//! Bounding-box geometry shared between a view and its collaborators.
//!
//! A `BoundingBox` is a cheap-clone handle: the view that renders a block,
//! the container that lays it out, and the parent block that must grow
//! around it all hold the same box. Edge events notify the others when one
//! of them mutates it; subscriptions are disposer handles so a removed view
//! can detach without leaving a dangling listener on the shared box.
//!
//! Coordinates are relative to the parent SVG group, matching the rendered
//! `translate` transform. `BottomEdgeMoved` fires when the box's extent
//! changes at the bottom edge (a height change); whole-box translation
//! emits `Moved` only, so layout shifts do not cascade into growth
//! handling.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A geometry-change notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxEvent {
    /// The box was translated.
    Moved { dx: f32, dy: f32 },
    /// The box was resized to the given extent.
    Resized { w: f32, h: f32 },
    /// The bottom edge moved by `dy` because the height changed.
    BottomEdgeMoved { dy: f32 },
}

impl BoxEvent {
    pub fn kind(&self) -> BoxEventKind {
        match self {
            BoxEvent::Moved { .. } => BoxEventKind::Moved,
            BoxEvent::Resized { .. } => BoxEventKind::Resized,
            BoxEvent::BottomEdgeMoved { .. } => BoxEventKind::BottomEdgeMoved,
        }
    }
}

/// Registry key for box listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxEventKind {
    Moved,
    Resized,
    BottomEdgeMoved,
}

type BoxHandler = Rc<RefCell<dyn FnMut(&BoxEvent)>>;

struct BoxListener {
    id: u64,
    kind: BoxEventKind,
    handler: BoxHandler,
}

struct BoxState {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    listeners: Vec<BoxListener>,
    next_id: u64,
}

/// Shared mutable bounding box with edge events.
#[derive(Clone)]
pub struct BoundingBox {
    state: Rc<RefCell<BoxState>>,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            state: Rc::new(RefCell::new(BoxState {
                x,
                y,
                w,
                h,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn x(&self) -> f32 {
        self.state.borrow().x
    }

    pub fn y(&self) -> f32 {
        self.state.borrow().y
    }

    pub fn w(&self) -> f32 {
        self.state.borrow().w
    }

    pub fn h(&self) -> f32 {
        self.state.borrow().h
    }

    pub fn bottom(&self) -> f32 {
        let state = self.state.borrow();
        state.y + state.h
    }

    pub fn right(&self) -> f32 {
        let state = self.state.borrow();
        state.x + state.w
    }

    /// Translate the box. Emits `Moved`.
    pub fn move_by(&self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            state.x += dx;
            state.y += dy;
        }
        self.emit(&BoxEvent::Moved { dx, dy });
    }

    /// Move the box to an absolute position. Emits `Moved`.
    pub fn move_to(&self, x: f32, y: f32) {
        let (dx, dy) = {
            let state = self.state.borrow();
            (x - state.x, y - state.y)
        };
        self.move_by(dx, dy);
    }

    /// Resize the box. Emits `Resized`, then `BottomEdgeMoved` when the
    /// height changed.
    pub fn set_size(&self, w: f32, h: f32) {
        let dy = {
            let mut state = self.state.borrow_mut();
            if state.w == w && state.h == h {
                return;
            }
            let dy = h - state.h;
            state.w = w;
            state.h = h;
            dy
        };
        self.emit(&BoxEvent::Resized { w, h });
        if dy != 0.0 {
            self.emit(&BoxEvent::BottomEdgeMoved { dy });
        }
    }

    /// Grow (or shrink, with negative `dy`) the height.
    pub fn grow_height(&self, dy: f32) {
        let (w, h) = {
            let state = self.state.borrow();
            (state.w, state.h + dy)
        };
        self.set_size(w, h);
    }

    /// Zero the extent. Emits `Resized`, then `BottomEdgeMoved`.
    pub fn zero(&self) {
        self.set_size(0.0, 0.0);
    }

    /// Register `handler` for events of `kind` on this box.
    pub fn on(
        &self,
        kind: BoxEventKind,
        handler: impl FnMut(&BoxEvent) + 'static,
    ) -> BoxSubscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push(BoxListener {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        BoxSubscription {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Number of live listeners for `kind`.
    pub fn listener_count(&self, kind: BoxEventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }

    fn emit(&self, event: &BoxEvent) {
        let kind = event.kind();
        let matching: Vec<BoxHandler> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        for handler in matching {
            (&mut *handler.borrow_mut())(event);
        }
    }
}

/// Disposer handle for a box listener. Disposal is idempotent and also
/// runs on drop.
pub struct BoxSubscription {
    state: Weak<RefCell<BoxState>>,
    id: u64,
}

impl BoxSubscription {
    pub fn dispose(&self) {
        if let Some(state) = self.state.upgrade() {
            // Extract under the borrow, drop after releasing it: dropping
            // the handler can cascade into further disposals on this box.
            let removed = {
                let mut state = state.borrow_mut();
                state
                    .listeners
                    .iter()
                    .position(|l| l.id == self.id)
                    .map(|pos| state.listeners.remove(pos))
            };
            drop(removed);
        }
    }
}

impl Drop for BoxSubscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn grow_fires_bottom_edge() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let moved = Rc::new(Cell::new(0.0f32));

        let _sub = {
            let moved = Rc::clone(&moved);
            bbox.on(BoxEventKind::BottomEdgeMoved, move |e| {
                if let BoxEvent::BottomEdgeMoved { dy } = e {
                    moved.set(moved.get() + dy);
                }
            })
        };

        bbox.grow_height(30.0);
        bbox.grow_height(-10.0);
        assert_eq!(moved.get(), 20.0);
        assert_eq!(bbox.h(), 70.0);
    }

    #[test]
    fn translation_does_not_fire_bottom_edge() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let fired = Rc::new(Cell::new(false));

        let _sub = {
            let fired = Rc::clone(&fired);
            bbox.on(BoxEventKind::BottomEdgeMoved, move |_| fired.set(true))
        };

        bbox.move_by(0.0, 25.0);
        assert!(!fired.get(), "a shifted box has not grown");
        assert_eq!(bbox.bottom(), 75.0);
    }

    #[test]
    fn zero_resets_extent_and_notifies() {
        let bbox = BoundingBox::new(10.0, 10.0, 100.0, 50.0);
        let last_dy = Rc::new(Cell::new(0.0f32));

        let _sub = {
            let last_dy = Rc::clone(&last_dy);
            bbox.on(BoxEventKind::BottomEdgeMoved, move |e| {
                if let BoxEvent::BottomEdgeMoved { dy } = e {
                    last_dy.set(*dy);
                }
            })
        };

        bbox.zero();
        assert_eq!(bbox.w(), 0.0);
        assert_eq!(bbox.h(), 0.0);
        assert_eq!(last_dy.get(), -50.0);
    }

    #[test]
    fn disposed_listener_leaves_no_trace() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let sub = bbox.on(BoxEventKind::BottomEdgeMoved, |_| {});
        assert_eq!(bbox.listener_count(BoxEventKind::BottomEdgeMoved), 1);
        sub.dispose();
        assert_eq!(bbox.listener_count(BoxEventKind::BottomEdgeMoved), 0);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        {
            let _sub = bbox.on(BoxEventKind::Resized, |_| {});
            assert_eq!(bbox.listener_count(BoxEventKind::Resized), 1);
        }
        assert_eq!(bbox.listener_count(BoxEventKind::Resized), 0);
    }
}
