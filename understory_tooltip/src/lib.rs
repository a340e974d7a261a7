// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tooltip --heading-base-level=0

//! Understory Tooltip: host-agnostic tooltip coordination.
//!
//! This crate owns the behaviour of a single-overlay tooltip system: *when*
//! the tooltip appears and disappears, and *where* it is placed. It does not
//! render anything and does not know about any particular UI framework.
//!
//! - [`TooltipCoordinator`]: the shared state of one tooltip scope (visible
//!   flag, last hide time, active content, overlay position) plus the
//!   triggers attached to it. There is exactly one overlay per coordinator.
//! - Triggers: interactive elements attached with a [`TriggerConfig`] and
//!   addressed by [`TriggerId`]. Pointer enter schedules a debounced show;
//!   pointer leave cancels it and hides the tooltip.
//! - [`placement`]: the directional and pointer-following position math.
//! - [`events`]: routing keyed host events to triggers.
//!
//! ## Timing model
//!
//! The crate never reads a clock. Every operation that depends on time takes
//! `now` as a [`Duration`](core::time::Duration) from an origin the host
//! chooses, and deferred work (the show delay and the hide grace) sits in an
//! [`understory_timing::TimerQueue`] that the host drains with
//! [`TooltipCoordinator::advance`]. [`TooltipCoordinator::next_deadline`]
//! says when that next needs to happen.
//!
//! Two timing rules shape the feel of the tooltip:
//!
//! - **Fast re-hover**: entering a trigger less than
//!   [`CoordinatorConfig::skip_delay_window`] after the last hide shows the
//!   tooltip without the trigger's configured delay, so sweeping across a
//!   toolbar does not re-pay the delay on every button.
//! - **Hide grace**: after a hide the overlay stays mounted for
//!   [`CoordinatorConfig::hide_grace`] and only unmounts if nothing showed the
//!   tooltip in the meantime, so moving between neighbours does not flicker.
//!
//! ## Host responsibilities
//!
//! - Attach a trigger per element that has a tooltip; detach it when the
//!   element goes away.
//! - Report pointer enter/leave and element geometry changes.
//! - Every frame, call [`TooltipCoordinator::render_active`] (or
//!   [`TooltipCoordinator::render_tick`] per trigger) with the pointer
//!   location, then [`TooltipCoordinator::advance`].
//! - Draw [`TooltipCoordinator::overlay`] when it is `Some`.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::{Point, Size};
//! use understory_tooltip::placement::Direction;
//! use understory_tooltip::{TooltipCoordinator, TriggerConfig};
//!
//! let mut tooltips = TooltipCoordinator::new();
//! let copy = tooltips.attach(
//!     TriggerConfig::new()
//!         .with_direction(Direction::Right)
//!         .with_delay(Duration::from_millis(300))
//!         .with_content("Copy"),
//! );
//! tooltips
//!     .geometry_changed(copy, Point::new(100.0, 100.0), Size::new(50.0, 20.0))
//!     .unwrap();
//!
//! let t0 = Duration::from_secs(60);
//! tooltips.pointer_enter(copy, t0).unwrap();
//! tooltips.advance(t0 + Duration::from_millis(300));
//! tooltips.render_active(Point::new(110.0, 105.0));
//!
//! let overlay = tooltips.overlay().unwrap();
//! assert_eq!(overlay.content, Some(&"Copy"));
//! assert_eq!(overlay.position, Point::new(180.0, 110.0));
//!
//! // Leaving hides the tooltip; the overlay lingers for the hide grace.
//! tooltips.pointer_leave(copy, t0 + Duration::from_secs(2)).unwrap();
//! assert!(!tooltips.is_visible());
//! assert!(tooltips.is_mounted());
//! tooltips.advance(t0 + Duration::from_secs(3));
//! assert!(tooltips.overlay().is_none());
//! ```
//!
//! ## Errors
//!
//! Using a [`TriggerId`] that is not attached to the coordinator it is sent
//! to (detached, or from another scope) returns a [`TooltipError`]. That is
//! always an integration bug, so it is reported rather than ignored.
//!
//! ## Logging
//!
//! State transitions are reported through [`tracing`] at `trace` level,
//! discarded stale timers at `debug`, and misuse at `warn`. The crate never
//! installs a subscriber.
//!
//! ## Features
//!
//! - `std` (default): build Kurbo with the standard library.
//! - `libm`: build Kurbo's floating point support on `libm` for `no_std`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod coordinator;
mod error;
pub mod events;
pub mod placement;
mod trigger;

pub use coordinator::{CoordinatorConfig, Overlay, TooltipCoordinator, TooltipSnapshot};
pub use error::TooltipError;
pub use trigger::{TriggerConfig, TriggerId, TriggerPhase};
