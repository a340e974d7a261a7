// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-trigger configuration and runtime state.

use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use understory_timing::TimerId;

use crate::placement::{Direction, Placement};

/// Handle to a trigger attached to a [`TooltipCoordinator`](crate::TooltipCoordinator).
///
/// The handle records the coordinator scope it belongs to, so using it with
/// another coordinator (or after [`detach`](crate::TooltipCoordinator::detach))
/// is reported as a [`TooltipError`](crate::TooltipError) instead of silently
/// addressing some other trigger.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId {
    pub(crate) scope: u32,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Where a trigger is in its show/hide cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriggerPhase {
    /// Not shown and nothing scheduled.
    #[default]
    Idle,
    /// The pointer entered; a delayed show is scheduled.
    PendingShow,
    /// The show committed; this trigger drives the overlay position.
    ///
    /// A re-entry while shown queues a new commit but stays in this phase.
    Shown,
}

/// Immutable per-trigger settings.
///
/// ```
/// use core::time::Duration;
/// use kurbo::Vec2;
/// use understory_tooltip::{placement::Direction, TriggerConfig};
///
/// let config = TriggerConfig::new()
///     .with_direction(Direction::Right)
///     .with_offset(Vec2::new(4.0, 0.0))
///     .with_delay(Duration::from_millis(400))
///     .with_content("Save the document");
/// assert_eq!(config.content, Some("Save the document"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerConfig<C> {
    /// Added to the computed position.
    pub offset: Vec2,
    /// Anchored direction or pointer-follow.
    pub placement: Placement,
    /// Delay between pointer-enter and the tooltip appearing.
    pub delay: Duration,
    /// Tooltip body pushed to the coordinator when the show commits.
    pub content: Option<C>,
}

impl<C> Default for TriggerConfig<C> {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            placement: Placement::default(),
            delay: Duration::ZERO,
            content: None,
        }
    }
}

impl<C> TriggerConfig<C> {
    /// Zero offset, anchored on top, no delay, no content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offset added to the computed position.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Anchor the tooltip to the given side of the trigger.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.placement = Placement::Anchored(direction);
        self
    }

    /// Make the tooltip follow the pointer instead of anchoring to a side.
    #[must_use]
    pub fn with_follow_pointer(mut self) -> Self {
        self.placement = Placement::FollowPointer;
        self
    }

    /// Set the show delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the tooltip body.
    #[must_use]
    pub fn with_content(mut self, content: C) -> Self {
        self.content = Some(content);
        self
    }
}

/// Mutable state of one attached trigger.
#[derive(Clone, Debug)]
pub(crate) struct Trigger<C> {
    pub(crate) config: TriggerConfig<C>,
    /// Local visibility: set when a show commits, cleared on leave.
    pub(crate) visible: bool,
    pub(crate) pending: Option<TimerId>,
    /// Bumped on every transition; a scheduled commit is only honored if the
    /// epoch it captured is still current.
    pub(crate) epoch: u64,
    pub(crate) origin: Point,
    pub(crate) size: Size,
}

impl<C> Trigger<C> {
    pub(crate) fn new(config: TriggerConfig<C>) -> Self {
        Self {
            config,
            visible: false,
            pending: None,
            epoch: 0,
            origin: Point::ZERO,
            size: Size::ZERO,
        }
    }

    pub(crate) fn phase(&self) -> TriggerPhase {
        if self.visible {
            TriggerPhase::Shown
        } else if self.pending.is_some() {
            TriggerPhase::PendingShow
        } else {
            TriggerPhase::Idle
        }
    }

    pub(crate) fn bump_epoch(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    /// Delay before a show commits.
    ///
    /// A hide within `skip_window` of `now` skips the configured delay, so
    /// moving between neighbouring triggers does not re-pay it.
    pub(crate) fn show_delay(
        &self,
        now: Duration,
        last_hide: Option<Duration>,
        skip_window: Duration,
    ) -> Duration {
        match last_hide {
            Some(hidden_at) if now.saturating_sub(hidden_at) < skip_window => Duration::ZERO,
            _ => self.config.delay,
        }
    }

    pub(crate) fn anchor(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Position to push on a render tick, or `None` while not shown.
    pub(crate) fn position(&self, pointer: Point, margin: f64) -> Option<Point> {
        if !self.visible {
            return None;
        }
        Some(
            self.config
                .placement
                .resolve(self.anchor(), pointer, margin, self.config.offset),
        )
    }
}
