// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing: feed host element events to attached triggers.
//!
//! Hosts usually know their elements by their own keys (widget ids, box-tree
//! nodes, ECS entities). [`TriggerBindings`] maps those keys to
//! [`TriggerId`]s, owning the attach/detach lifecycle, and [`dispatch`]
//! routes a batch of keyed [`TriggerEvent`]s through any [`TriggerLookup`].
//!
//! ```
//! use core::time::Duration;
//! use kurbo::{Point, Size};
//! use understory_tooltip::events::{dispatch, TriggerBindings, TriggerEvent};
//! use understory_tooltip::{TooltipCoordinator, TriggerConfig};
//!
//! let mut tooltips = TooltipCoordinator::new();
//! let mut bindings = TriggerBindings::new();
//! bindings.attach(&mut tooltips, "save", TriggerConfig::new().with_content("Save"));
//!
//! let now = Duration::from_secs(5);
//! let events = [
//!     ("save", TriggerEvent::GeometryChanged {
//!         position: Point::new(0.0, 40.0),
//!         size: Size::new(80.0, 24.0),
//!     }),
//!     ("save", TriggerEvent::PointerEnter),
//!     // No tooltip on this element: skipped.
//!     ("canvas", TriggerEvent::PointerLeave),
//! ];
//! assert_eq!(dispatch(&mut tooltips, &bindings, events, now), Ok(2));
//!
//! tooltips.advance(now);
//! assert!(tooltips.is_visible());
//! ```

use core::hash::Hash;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::{Point, Size};

use crate::coordinator::TooltipCoordinator;
use crate::error::TooltipError;
use crate::trigger::{TriggerConfig, TriggerId};

/// A host notification addressed to one trigger.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TriggerEvent {
    /// The pointer entered the element.
    PointerEnter,
    /// The pointer left the element.
    PointerLeave,
    /// The element's layout changed.
    GeometryChanged {
        /// Top-left corner in screen coordinates.
        position: Point,
        /// Size in screen units.
        size: Size,
    },
    /// A frame is about to render.
    RenderTick {
        /// Current pointer location in screen coordinates.
        pointer: Point,
    },
}

impl<C> TooltipCoordinator<C> {
    /// Route one event to a trigger.
    pub fn handle(
        &mut self,
        id: TriggerId,
        event: TriggerEvent,
        now: Duration,
    ) -> Result<(), TooltipError> {
        match event {
            TriggerEvent::PointerEnter => self.pointer_enter(id, now),
            TriggerEvent::PointerLeave => self.pointer_leave(id, now),
            TriggerEvent::GeometryChanged { position, size } => {
                self.geometry_changed(id, position, size)
            }
            TriggerEvent::RenderTick { pointer } => self.render_tick(id, pointer).map(|_| ()),
        }
    }
}

/// Lookup from host element keys to attached triggers.
///
/// Hosts can implement this over whatever storage already maps their
/// elements to tooltip state. Any `Fn(&K) -> Option<TriggerId>` closure is a
/// lookup too.
pub trait TriggerLookup<K> {
    /// The trigger bound to `key`, or `None` if the element has no tooltip.
    fn trigger_for(&self, key: &K) -> Option<TriggerId>;
}

impl<K, F> TriggerLookup<K> for F
where
    F: Fn(&K) -> Option<TriggerId>,
{
    fn trigger_for(&self, key: &K) -> Option<TriggerId> {
        self(key)
    }
}

/// Host key to trigger map that owns the attach/detach lifecycle.
#[derive(Clone, Debug)]
pub struct TriggerBindings<K> {
    map: HashMap<K, TriggerId>,
}

impl<K> Default for TriggerBindings<K> {
    fn default() -> Self {
        Self {
            map: HashMap::default(),
        }
    }
}

impl<K: Hash + Eq> TriggerBindings<K> {
    /// Creates an empty binding map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The trigger bound to `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<TriggerId> {
        self.map.get(key).copied()
    }

    /// Bind `key` to an already attached trigger, returning the previous binding.
    pub fn bind(&mut self, key: K, id: TriggerId) -> Option<TriggerId> {
        self.map.insert(key, id)
    }

    /// Remove the binding for `key` without detaching its trigger.
    pub fn unbind(&mut self, key: &K) -> Option<TriggerId> {
        self.map.remove(key)
    }

    /// Attach a new trigger and bind it to `key`.
    ///
    /// A trigger previously bound to `key` is unbound but stays attached;
    /// use [`release`](Self::release) first to detach it.
    pub fn attach<C>(
        &mut self,
        coordinator: &mut TooltipCoordinator<C>,
        key: K,
        config: TriggerConfig<C>,
    ) -> TriggerId {
        let id = coordinator.attach(config);
        self.map.insert(key, id);
        id
    }

    /// Unbind `key` and detach its trigger.
    ///
    /// Returns `Ok(false)` when nothing was bound to `key`.
    pub fn release<C>(
        &mut self,
        coordinator: &mut TooltipCoordinator<C>,
        key: &K,
        now: Duration,
    ) -> Result<bool, TooltipError> {
        let Some(id) = self.map.remove(key) else {
            return Ok(false);
        };
        coordinator.detach(id, now)?;
        Ok(true)
    }
}

impl<K: Hash + Eq> TriggerLookup<K> for TriggerBindings<K> {
    fn trigger_for(&self, key: &K) -> Option<TriggerId> {
        self.get(key)
    }
}

/// Route a batch of keyed events to their triggers.
///
/// Events for keys without a trigger are skipped. Routing stops at the first
/// event whose trigger is not attached to `coordinator`. Returns the number
/// of events delivered.
pub fn dispatch<C, K, L>(
    coordinator: &mut TooltipCoordinator<C>,
    lookup: &L,
    events: impl IntoIterator<Item = (K, TriggerEvent)>,
    now: Duration,
) -> Result<usize, TooltipError>
where
    L: TriggerLookup<K> + ?Sized,
{
    let mut delivered = 0;
    for (key, event) in events {
        let Some(id) = lookup.trigger_for(&key) else {
            continue;
        };
        coordinator.handle(id, event, now)?;
        delivered += 1;
    }
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerPhase;

    #[test]
    fn release_detaches_and_unbinds() {
        let mut tooltips = TooltipCoordinator::<()>::new();
        let mut bindings = TriggerBindings::new();
        let id = bindings.attach(&mut tooltips, 1_u32, TriggerConfig::new());
        assert_eq!(bindings.get(&1), Some(id));

        assert_eq!(bindings.release(&mut tooltips, &1, Duration::ZERO), Ok(true));
        assert!(bindings.is_empty());
        assert_eq!(tooltips.trigger_count(), 0);
        assert_eq!(bindings.release(&mut tooltips, &1, Duration::ZERO), Ok(false));
    }

    #[test]
    fn dispatch_stops_at_detached_trigger() {
        let mut tooltips = TooltipCoordinator::<()>::new();
        let mut bindings = TriggerBindings::new();
        let id = tooltips.attach(TriggerConfig::new());
        bindings.bind("a", id);
        tooltips.detach(id, Duration::ZERO).unwrap();

        let result = dispatch(
            &mut tooltips,
            &bindings,
            [("a", TriggerEvent::PointerEnter)],
            Duration::ZERO,
        );
        assert_eq!(result, Err(TooltipError::Detached(id)));
    }

    #[test]
    fn dispatch_through_closure_lookup() {
        let mut tooltips = TooltipCoordinator::<()>::new();
        let ids = [
            tooltips.attach(TriggerConfig::new()),
            tooltips.attach(TriggerConfig::new()),
        ];
        let lookup = |key: &usize| ids.get(*key).copied();

        let delivered = dispatch(
            &mut tooltips,
            &lookup,
            [
                (1_usize, TriggerEvent::PointerEnter),
                (7, TriggerEvent::PointerEnter),
            ],
            Duration::ZERO,
        );
        assert_eq!(delivered, Ok(1));
        assert_eq!(tooltips.trigger_phase(ids[0]), Ok(TriggerPhase::Idle));
        assert_eq!(tooltips.trigger_phase(ids[1]), Ok(TriggerPhase::PendingShow));
    }

    #[test]
    fn render_tick_event_pushes_position() {
        let mut tooltips = TooltipCoordinator::<()>::new();
        let id = tooltips.attach(TriggerConfig::new().with_follow_pointer());
        let now = Duration::from_secs(3);
        tooltips.handle(id, TriggerEvent::PointerEnter, now).unwrap();
        tooltips.advance(now);
        tooltips
            .handle(
                id,
                TriggerEvent::RenderTick {
                    pointer: Point::new(12.0, 34.0),
                },
                now,
            )
            .unwrap();
        assert_eq!(tooltips.current().position, Point::new(12.0, 34.0));
    }
}
