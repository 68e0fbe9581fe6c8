// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pan/zoom state of the roadmap canvas, in catalog layout units.
//!
//! Layout coordinates grow downwards while the canvas y axis grows upwards, so y bounds are
//! mirrored.

use crate::model::Roadmap;

pub(crate) const MIN_ZOOM: f64 = 0.5;
pub(crate) const MAX_ZOOM: f64 = 3.0;
const ZOOM_STEP: f64 = 1.2;
const PAN_FRACTION: f64 = 0.1;
const FIT_MARGIN: f64 = 120.0;
const MIN_EXTENT: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Viewport {
    center_x: f64,
    center_y: f64,
    width: f64,
    height: f64,
    zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            width: MIN_EXTENT,
            height: MIN_EXTENT,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Frames every node of `roadmap` at zoom 1.
    pub(crate) fn fit(roadmap: &Roadmap) -> Self {
        let mut nodes = roadmap.nodes().iter().map(|node| node.position());
        let Some(first) = nodes.next() else {
            return Self::default();
        };
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for position in nodes {
            min_x = min_x.min(position.x);
            max_x = max_x.max(position.x);
            min_y = min_y.min(position.y);
            max_y = max_y.max(position.y);
        }

        Self {
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
            width: (max_x - min_x + 2.0 * FIT_MARGIN).max(MIN_EXTENT),
            height: (max_y - min_y + 2.0 * FIT_MARGIN).max(MIN_EXTENT),
            zoom: 1.0,
        }
    }

    pub(crate) fn zoom(&self) -> f64 {
        self.zoom
    }

    pub(crate) fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub(crate) fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub(crate) fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Moves by a fraction of the visible extent; positive `dy` moves down the layout.
    pub(crate) fn pan(&mut self, dx: i32, dy: i32) {
        self.center_x += f64::from(dx) * self.visible_width() * PAN_FRACTION;
        self.center_y += f64::from(dy) * self.visible_height() * PAN_FRACTION;
    }

    pub(crate) fn center_on(&mut self, x: f64, y: f64) {
        self.center_x = x;
        self.center_y = y;
    }

    fn visible_width(&self) -> f64 {
        self.width / self.zoom
    }

    fn visible_height(&self) -> f64 {
        self.height / self.zoom
    }

    pub(crate) fn x_bounds(&self) -> [f64; 2] {
        let half = self.visible_width() / 2.0;
        [self.center_x - half, self.center_x + half]
    }

    pub(crate) fn y_bounds(&self) -> [f64; 2] {
        let half = self.visible_height() / 2.0;
        [-(self.center_y + half), -(self.center_y - half)]
    }
}
