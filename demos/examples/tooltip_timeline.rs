// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip timeline.
//!
//! Sweep a simulated pointer across a toolbar and print what the tooltip
//! overlay shows on each frame: the first hover pays the delay, neighbours
//! show immediately, and leaving lets the overlay linger for the hide grace.
//!
//! Run:
//! - `cargo run -p understory_tooltip_demos --example tooltip_timeline`
//! - `RUST_LOG=understory_tooltip=trace cargo run -p understory_tooltip_demos --example tooltip_timeline`

use core::time::Duration;

use kurbo::{Point, Size};
use tracing_subscriber::EnvFilter;
use understory_tooltip::CoordinatorConfig;
use understory_tooltip_demos::Toolbar;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut toolbar = Toolbar::new(
        Point::new(20.0, 80.0),
        Size::new(48.0, 24.0),
        &[("Cut", "Cut selection"), ("Copy", "Copy selection"), ("Paste", "Paste")],
        Duration::from_millis(500),
        CoordinatorConfig::default().with_hide_grace(Duration::from_millis(300)),
    )?;

    // (time in ms, pointer x); y stays on the toolbar until the pointer leaves.
    let path = [
        (0, 0.0),
        (100, 30.0),
        (300, 35.0),
        (600, 40.0),
        (700, 80.0),
        (800, 130.0),
        (900, 130.0),
        (1_000, 200.0),
        (1_200, 200.0),
        (1_400, 200.0),
    ];

    let frame = Duration::from_millis(50);
    let mut now = Duration::ZERO;
    for window in path.windows(2) {
        let (start_ms, x) = window[0];
        let (end_ms, _) = window[1];
        let pointer = Point::new(x, 90.0);
        let end = Duration::from_millis(end_ms);
        now = now.max(Duration::from_millis(start_ms));

        toolbar.pointer_moved(pointer, now)?;
        while now < end {
            let hovered = toolbar
                .hit(pointer)
                .map_or("-", |index| toolbar.buttons[index].label);
            let shown = toolbar
                .frame(pointer, now)
                .unwrap_or_else(|| "nothing".to_owned());
            println!("{:>5} ms  over {hovered:<5}  {shown}", now.as_millis());
            now += frame;
        }
    }

    Ok(())
}
