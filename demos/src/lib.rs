// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless host glue for the tooltip demos.
//!
//! [`Toolbar`] stands in for a UI framework: a row of buttons, pointer hit
//! testing, and hover tracking that turns pointer moves into the enter/leave
//! events `understory_tooltip` expects.

use core::time::Duration;

use kurbo::{Point, Rect, Size};
use understory_tooltip::events::{TriggerBindings, TriggerEvent, dispatch};
use understory_tooltip::{CoordinatorConfig, TooltipCoordinator, TooltipError, TriggerConfig};

/// One toolbar button.
#[derive(Clone, Debug)]
pub struct Button {
    /// Button caption.
    pub label: &'static str,
    /// Screen rectangle.
    pub rect: Rect,
}

/// A horizontal row of buttons sharing one tooltip scope.
#[derive(Debug)]
pub struct Toolbar {
    /// Buttons, left to right.
    pub buttons: Vec<Button>,
    /// The shared tooltip state.
    pub tooltips: TooltipCoordinator<String>,
    bindings: TriggerBindings<usize>,
    hovered: Option<usize>,
}

impl Toolbar {
    /// Lay out `entries` (caption, tooltip text) left to right from `origin`.
    pub fn new(
        origin: Point,
        button_size: Size,
        entries: &[(&'static str, &str)],
        delay: Duration,
        config: CoordinatorConfig,
    ) -> Result<Self, TooltipError> {
        let mut tooltips = TooltipCoordinator::with_config(config);
        let mut bindings = TriggerBindings::new();
        let mut buttons = Vec::with_capacity(entries.len());
        let mut events = Vec::with_capacity(entries.len());

        let mut x = origin.x;
        for (index, (label, tip)) in entries.iter().enumerate() {
            let position = Point::new(x, origin.y);
            bindings.attach(
                &mut tooltips,
                index,
                TriggerConfig::new()
                    .with_delay(delay)
                    .with_content((*tip).to_owned()),
            );
            events.push((
                index,
                TriggerEvent::GeometryChanged {
                    position,
                    size: button_size,
                },
            ));
            buttons.push(Button {
                label: *label,
                rect: Rect::from_origin_size(position, button_size),
            });
            x += button_size.width;
        }
        dispatch(&mut tooltips, &bindings, events, Duration::ZERO)?;

        Ok(Self {
            buttons,
            tooltips,
            bindings,
            hovered: None,
        })
    }

    /// The button under `pointer`, if any.
    #[must_use]
    pub fn hit(&self, pointer: Point) -> Option<usize> {
        self.buttons
            .iter()
            .position(|button| button.rect.contains(pointer))
    }

    /// Feed a pointer move, emitting leave/enter when the hovered button changes.
    pub fn pointer_moved(&mut self, pointer: Point, now: Duration) -> Result<(), TooltipError> {
        let hit = self.hit(pointer);
        if hit == self.hovered {
            return Ok(());
        }
        let leave = self.hovered.map(|index| (index, TriggerEvent::PointerLeave));
        let enter = hit.map(|index| (index, TriggerEvent::PointerEnter));
        self.hovered = hit;
        dispatch(
            &mut self.tooltips,
            &self.bindings,
            leave.into_iter().chain(enter),
            now,
        )?;
        Ok(())
    }

    /// Run one frame: position the tooltip, then fire due timers.
    ///
    /// Returns a one-line description of what the overlay would draw.
    pub fn frame(&mut self, pointer: Point, now: Duration) -> Option<String> {
        self.tooltips.render_active(pointer);
        let fired = self.tooltips.advance(now);
        if fired > 0 {
            tracing::debug!(fired, ?now, "tooltip timers fired");
        }
        // A show that committed this frame gets its position right away.
        self.tooltips.render_active(pointer);

        let overlay = self.tooltips.overlay()?;
        let text = overlay.content.map_or("<empty>", String::as_str);
        let state = if overlay.visible { "shown" } else { "fading" };
        Some(format!(
            "{state} \"{text}\" at ({:.0}, {:.0})",
            overlay.position.x, overlay.position.y
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolbar() -> Toolbar {
        Toolbar::new(
            Point::new(0.0, 100.0),
            Size::new(40.0, 20.0),
            &[("B", "Bold"), ("I", "Italic")],
            Duration::from_millis(400),
            CoordinatorConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn sweeping_to_a_neighbour_skips_the_delay() {
        let mut bar = toolbar();
        let over_bold = Point::new(10.0, 110.0);
        let over_italic = Point::new(50.0, 110.0);

        bar.pointer_moved(over_bold, Duration::from_secs(1)).unwrap();
        assert_eq!(bar.frame(over_bold, Duration::from_millis(1_200)), None);
        let shown = bar.frame(over_bold, Duration::from_millis(1_400)).unwrap();
        assert_eq!(shown, "shown \"Bold\" at (20, 70)");

        bar.pointer_moved(over_italic, Duration::from_millis(1_500)).unwrap();
        let moved = bar.frame(over_italic, Duration::from_millis(1_500)).unwrap();
        assert_eq!(moved, "shown \"Italic\" at (60, 70)");
    }

    #[test]
    fn leaving_the_toolbar_fades_then_unmounts() {
        let mut bar = toolbar();
        let over_bold = Point::new(10.0, 110.0);
        let outside = Point::new(10.0, 300.0);

        bar.pointer_moved(over_bold, Duration::from_secs(1)).unwrap();
        bar.frame(over_bold, Duration::from_millis(1_400));
        bar.pointer_moved(outside, Duration::from_secs(2)).unwrap();

        let fading = bar.frame(outside, Duration::from_millis(2_500)).unwrap();
        assert!(fading.starts_with("fading"));
        assert_eq!(bar.frame(outside, Duration::from_secs(3)), None);
    }
}
