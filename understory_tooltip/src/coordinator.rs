// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared tooltip state for one scope and the triggers attached to it.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};
use core::time::Duration;

use kurbo::{Point, Size};
use understory_timing::{TimerId, TimerQueue};

use crate::error::TooltipError;
use crate::placement::DEFAULT_MARGIN;
use crate::trigger::{Trigger, TriggerConfig, TriggerId, TriggerPhase};

/// Source of distinct scope ids so handles cannot cross coordinators.
static NEXT_SCOPE: AtomicU32 = AtomicU32::new(1);

/// Scope-wide timing and placement settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinatorConfig {
    /// How long the overlay stays mounted after a hide.
    ///
    /// A show during this window keeps the overlay mounted without a flicker.
    /// [`Duration::ZERO`] unmounts immediately.
    pub hide_grace: Duration,
    /// A pointer-enter within this long of the last hide skips the trigger's
    /// configured delay.
    pub skip_delay_window: Duration,
    /// Distance between a trigger's edge and an anchored tooltip.
    pub margin: f64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            hide_grace: Duration::from_secs(1),
            skip_delay_window: Duration::from_secs(1),
            margin: DEFAULT_MARGIN,
        }
    }
}

impl CoordinatorConfig {
    /// Set the hide grace period.
    #[must_use]
    pub fn with_hide_grace(mut self, hide_grace: Duration) -> Self {
        self.hide_grace = hide_grace;
        self
    }

    /// Set the fast re-hover window.
    #[must_use]
    pub fn with_skip_delay_window(mut self, window: Duration) -> Self {
        self.skip_delay_window = window;
        self
    }

    /// Set the anchored placement margin.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }
}

/// Read-only view of the shared tooltip state.
#[derive(Debug, PartialEq)]
pub struct TooltipSnapshot<'a, C> {
    /// Whether the active trigger wants the tooltip shown.
    pub visible: bool,
    /// Time of the most recent hide, or `None` if nothing was hidden yet.
    pub last_hide: Option<Duration>,
    /// The tooltip body currently owning the overlay.
    pub content: Option<&'a C>,
    /// Last pushed overlay anchor, in screen coordinates.
    pub position: Point,
    /// Whether the overlay is mounted; stays `true` through the hide grace.
    pub mounted: bool,
}

impl<C> Clone for TooltipSnapshot<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for TooltipSnapshot<'_, C> {}

/// What the single overlay renderer should draw.
///
/// Only produced while the overlay is mounted.
#[derive(Debug, PartialEq)]
pub struct Overlay<'a, C> {
    /// The tooltip body, if the showing trigger supplied one.
    pub content: Option<&'a C>,
    /// Screen-space anchor of the tooltip.
    pub position: Point,
    /// `false` while the overlay lingers in its hide grace, so the renderer
    /// can draw an exit state.
    pub visible: bool,
}

impl<C> Clone for Overlay<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Overlay<'_, C> {}

/// Deferred work scheduled on the coordinator's timer queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Task {
    CommitShow { trigger: TriggerId, epoch: u64 },
    HideGrace { epoch: u64 },
}

#[derive(Clone, Debug)]
struct TriggerSlot<C> {
    generation: u32,
    trigger: Option<Trigger<C>>,
}

/// Owner of the shared tooltip state for one scope.
///
/// A coordinator holds the visibility flag, the last hide time, the active
/// content, and the overlay position, plus every trigger attached to it.
/// Hosts create one per tooltip scope and pass it explicitly to whatever
/// routes element events. The only global is the counter that hands out
/// scope ids.
///
/// Time never comes from a clock: every operation that needs it takes `now`
/// as a [`Duration`] from the host's monotonic origin, and the host calls
/// [`advance`](Self::advance) to run due timers.
///
/// ```
/// use core::time::Duration;
/// use kurbo::{Point, Size};
/// use understory_tooltip::{TooltipCoordinator, TriggerConfig};
///
/// let mut tooltips = TooltipCoordinator::new();
/// let save = tooltips.attach(
///     TriggerConfig::new()
///         .with_delay(Duration::from_millis(500))
///         .with_content("Save"),
/// );
/// tooltips
///     .geometry_changed(save, Point::new(100.0, 100.0), Size::new(50.0, 20.0))
///     .unwrap();
///
/// tooltips.pointer_enter(save, Duration::from_secs(10)).unwrap();
/// tooltips.advance(Duration::from_millis(10_499));
/// assert!(tooltips.overlay().is_none());
///
/// tooltips.advance(Duration::from_millis(10_500));
/// tooltips.render_active(Point::ZERO);
/// let overlay = tooltips.overlay().unwrap();
/// assert_eq!(overlay.content, Some(&"Save"));
/// assert_eq!(overlay.position, Point::new(125.0, 70.0));
/// ```
#[derive(Debug)]
pub struct TooltipCoordinator<C> {
    config: CoordinatorConfig,
    scope: u32,
    visible: bool,
    mounted: bool,
    last_hide: Option<Duration>,
    content: Option<C>,
    position: Point,
    hide_timer: Option<TimerId>,
    hide_epoch: u64,
    timers: TimerQueue<Task>,
    triggers: Vec<TriggerSlot<C>>,
    free: Vec<u32>,
    active: Option<TriggerId>,
    revision: u64,
}

impl<C> Default for TooltipCoordinator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TooltipCoordinator<C> {
    /// Creates a coordinator with the default [`CoordinatorConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    /// Creates a coordinator with the given settings.
    #[must_use]
    pub fn with_config(config: CoordinatorConfig) -> Self {
        Self {
            config,
            scope: NEXT_SCOPE.fetch_add(1, Ordering::Relaxed),
            visible: false,
            mounted: false,
            last_hide: None,
            content: None,
            position: Point::ZERO,
            hide_timer: None,
            hide_epoch: 0,
            timers: TimerQueue::new(),
            triggers: Vec::new(),
            free: Vec::new(),
            active: None,
            revision: 0,
        }
    }

    /// The scope settings.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Monotonic counter bumped whenever observable state changes.
    ///
    /// Hosts compare it against the value they last rendered with to decide
    /// whether the overlay needs a redraw.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The current shared state.
    #[must_use]
    pub fn current(&self) -> TooltipSnapshot<'_, C> {
        TooltipSnapshot {
            visible: self.visible,
            last_hide: self.last_hide,
            content: self.content.as_ref(),
            position: self.position,
            mounted: self.mounted,
        }
    }

    /// What to draw, or `None` when the overlay is unmounted.
    #[must_use]
    pub fn overlay(&self) -> Option<Overlay<'_, C>> {
        self.mounted.then(|| Overlay {
            content: self.content.as_ref(),
            position: self.position,
            visible: self.visible,
        })
    }

    /// Whether the active trigger wants the tooltip shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the overlay is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Time of the most recent hide.
    #[must_use]
    pub fn last_hide(&self) -> Option<Duration> {
        self.last_hide
    }

    /// The trigger that most recently committed a show, if it is still attached.
    #[must_use]
    pub fn active_trigger(&self) -> Option<TriggerId> {
        self.active
    }

    /// Earliest time at which [`advance`](Self::advance) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Overwrite the overlay position.
    pub fn set_position(&mut self, position: Point) {
        if self.position != position {
            self.position = position;
            self.revision += 1;
        }
    }

    /// Overwrite the tooltip body; `None` clears it.
    pub fn set_content(&mut self, content: Option<C>) {
        let changed = self.content.is_some() || content.is_some();
        self.content = content;
        if changed {
            self.revision += 1;
        }
    }

    /// Show or hide the tooltip.
    ///
    /// Showing mounts the overlay immediately. Hiding records `now` as the
    /// last hide time and then either unmounts right away (zero hide grace)
    /// or starts the grace timer; the overlay is only unmounted when that
    /// timer fires if nothing showed the tooltip in the meantime.
    pub fn set_visible(&mut self, visible: bool, now: Duration) {
        self.hide_epoch = self.hide_epoch.wrapping_add(1);
        if let Some(timer) = self.hide_timer.take() {
            self.timers.cancel(timer);
        }

        if visible {
            if !self.visible || !self.mounted {
                self.visible = true;
                self.mounted = true;
                self.revision += 1;
                tracing::trace!(scope = self.scope, "tooltip shown");
            }
            return;
        }

        self.visible = false;
        self.last_hide = Some(now);
        self.revision += 1;

        if self.config.hide_grace.is_zero() || !self.mounted {
            self.unmount();
            return;
        }
        let epoch = self.hide_epoch;
        self.hide_timer = Some(self.timers.schedule_after(
            now,
            self.config.hide_grace,
            Task::HideGrace { epoch },
        ));
        tracing::trace!(scope = self.scope, ?now, "tooltip hide grace started");
    }

    /// Attach a trigger to this scope.
    pub fn attach(&mut self, config: TriggerConfig<C>) -> TriggerId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.triggers.len())
                    .expect("tooltip coordinator cannot hold more than u32::MAX triggers");
                self.triggers.push(TriggerSlot {
                    generation: 0,
                    trigger: None,
                });
                index
            }
        };
        let slot = &mut self.triggers[index as usize];
        slot.trigger = Some(Trigger::new(config));
        let id = TriggerId {
            scope: self.scope,
            index,
            generation: slot.generation,
        };
        tracing::trace!(?id, "tooltip trigger attached");
        id
    }

    /// Detach a trigger, cancelling anything it has scheduled.
    ///
    /// Detaching the trigger that is currently shown hides the tooltip as if
    /// the pointer had left it.
    pub fn detach(
        &mut self,
        id: TriggerId,
        now: Duration,
    ) -> Result<TriggerConfig<C>, TooltipError> {
        self.resolve(id)?;
        let slot = &mut self.triggers[id.index as usize];
        let Some(trigger) = slot.trigger.take() else {
            return Err(TooltipError::Detached(id));
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        if let Some(timer) = trigger.pending {
            self.timers.cancel(timer);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        if trigger.visible {
            self.set_visible(false, now);
        }
        tracing::trace!(?id, "tooltip trigger detached");
        Ok(trigger.config)
    }

    /// Number of attached triggers.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.triggers.len() - self.free.len()
    }

    /// Where the trigger is in its show/hide cycle.
    pub fn trigger_phase(&self, id: TriggerId) -> Result<TriggerPhase, TooltipError> {
        self.trigger(id).map(Trigger::phase)
    }

    /// The configuration the trigger was attached with.
    pub fn trigger_config(&self, id: TriggerId) -> Result<&TriggerConfig<C>, TooltipError> {
        self.trigger(id).map(|trigger| &trigger.config)
    }

    /// The pointer entered the trigger's element.
    ///
    /// Replaces any pending show with a fresh one, delayed by the trigger's
    /// configured delay, or by nothing when the tooltip was hidden less than
    /// [`CoordinatorConfig::skip_delay_window`] ago. The show commits during
    /// the first [`advance`](Self::advance) at or after its deadline.
    pub fn pointer_enter(&mut self, id: TriggerId, now: Duration) -> Result<(), TooltipError> {
        let last_hide = self.last_hide;
        let window = self.config.skip_delay_window;
        let (trigger, timers) = self.resolve(id)?;

        if let Some(timer) = trigger.pending.take() {
            timers.cancel(timer);
        }
        let epoch = trigger.bump_epoch();
        let delay = trigger.show_delay(now, last_hide, window);
        trigger.pending = Some(timers.schedule_after(
            now,
            delay,
            Task::CommitShow { trigger: id, epoch },
        ));
        tracing::trace!(?id, ?delay, "tooltip show scheduled");
        Ok(())
    }

    /// The pointer left the trigger's element.
    ///
    /// Cancels a pending show and hides the tooltip; the overlay itself
    /// lingers for the hide grace.
    pub fn pointer_leave(&mut self, id: TriggerId, now: Duration) -> Result<(), TooltipError> {
        let (trigger, timers) = self.resolve(id)?;
        if let Some(timer) = trigger.pending.take() {
            timers.cancel(timer);
        }
        trigger.bump_epoch();
        trigger.visible = false;
        tracing::trace!(?id, "tooltip trigger left");
        self.set_visible(false, now);
        Ok(())
    }

    /// The trigger's element moved or resized.
    ///
    /// `position` is the element's top-left corner in screen coordinates.
    /// Takes effect on the next render tick.
    pub fn geometry_changed(
        &mut self,
        id: TriggerId,
        position: Point,
        size: Size,
    ) -> Result<(), TooltipError> {
        let (trigger, _) = self.resolve(id)?;
        trigger.origin = position;
        trigger.size = size;
        Ok(())
    }

    /// Per-frame update for one trigger.
    ///
    /// While the trigger is shown, recomputes the tooltip position (anchored
    /// or pointer-following) and pushes it, returning the pushed position.
    /// A trigger that is not shown pushes nothing.
    pub fn render_tick(
        &mut self,
        id: TriggerId,
        pointer: Point,
    ) -> Result<Option<Point>, TooltipError> {
        let margin = self.config.margin;
        let position = self.trigger(id)?.position(pointer, margin);
        if let Some(position) = position {
            self.set_position(position);
        }
        Ok(position)
    }

    /// Per-frame update for the trigger that most recently committed a show.
    pub fn render_active(&mut self, pointer: Point) -> Option<Point> {
        let id = self.active?;
        self.render_tick(id, pointer).ok().flatten()
    }

    fn trigger(&self, id: TriggerId) -> Result<&Trigger<C>, TooltipError> {
        if id.scope != self.scope {
            tracing::warn!(?id, scope = self.scope, "tooltip trigger used outside its scope");
            return Err(TooltipError::ForeignScope(id));
        }
        match self.triggers.get(id.index as usize) {
            Some(TriggerSlot {
                generation,
                trigger: Some(trigger),
            }) if *generation == id.generation => Ok(trigger),
            _ => {
                tracing::warn!(?id, "tooltip trigger used after detach");
                Err(TooltipError::Detached(id))
            }
        }
    }

    /// Validate `id` and borrow its state alongside the timer queue.
    fn resolve(
        &mut self,
        id: TriggerId,
    ) -> Result<(&mut Trigger<C>, &mut TimerQueue<Task>), TooltipError> {
        self.trigger(id)?;
        match self.triggers.get_mut(id.index as usize) {
            Some(TriggerSlot {
                trigger: Some(trigger),
                ..
            }) => Ok((trigger, &mut self.timers)),
            _ => Err(TooltipError::Detached(id)),
        }
    }

    fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.content = None;
        self.active = None;
        self.revision += 1;
        tracing::trace!(scope = self.scope, "tooltip overlay unmounted");
    }
}

impl<C: Clone> TooltipCoordinator<C> {
    /// Run every timer due at `now`.
    ///
    /// Returns how many timers took effect. Timers whose owner has moved on
    /// (a newer enter or leave, a detach, a show during the hide grace) are
    /// discarded without effect.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut applied = 0;
        while let Some((timer, task)) = self.timers.pop_due(now) {
            if self.run(timer, task, now) {
                applied += 1;
            }
        }
        applied
    }

    fn run(&mut self, timer: TimerId, task: Task, now: Duration) -> bool {
        match task {
            Task::CommitShow { trigger: id, epoch } => {
                let Ok((trigger, _)) = self.resolve(id) else {
                    tracing::debug!(?id, "discarding show for detached trigger");
                    return false;
                };
                if trigger.epoch != epoch || trigger.pending != Some(timer) {
                    tracing::debug!(?id, "discarding stale show");
                    return false;
                }
                trigger.pending = None;
                trigger.visible = true;
                let content = trigger.config.content.clone();
                tracing::trace!(?id, "tooltip show committed");
                self.set_content(content);
                self.active = Some(id);
                self.set_visible(true, now);
                true
            }
            Task::HideGrace { epoch } => {
                if epoch != self.hide_epoch || self.visible {
                    tracing::debug!(scope = self.scope, "discarding stale hide grace");
                    return false;
                }
                self.hide_timer = None;
                self.unmount();
                true
            }
        }
    }
}
