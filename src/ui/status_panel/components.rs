// src/ui/status_panel/components.rs
//
// Components and resources for the status panel.

use std::collections::VecDeque;

use bevy::prelude::*;

/// Marker for the status panel root node.
#[derive(Component, Debug)]
pub struct StatusPanel;

/// Rolling feed of recent happenings, newest last.
#[derive(Resource, Debug, Default)]
pub struct RecentActivity {
    entries: VecDeque<String>,
}

impl RecentActivity {
    const CAPACITY: usize = 4;

    pub fn push(&mut self, entry: String) {
        if self.entries.len() == Self::CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Marker for the text node rewritten every frame.
#[derive(Component, Debug)]
pub struct StatusPanelText;

/// Resource containing settings for status panel layout.
#[derive(Resource, Debug)]
pub struct StatusPanelSettings {
    /// Panel width (pixels).
    pub panel_width: f32,

    /// Padding inside panel (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Offset from top edge of screen (pixels).
    pub top_offset: f32,

    /// Offset from left edge of screen (pixels).
    pub left_offset: f32,

    /// Font size for the title row (points).
    pub title_font_size: f32,

    /// Font size for the status body (points).
    pub body_font_size: f32,
}

impl Default for StatusPanelSettings {
    fn default() -> Self {
        Self {
            panel_width: 380.0,
            padding: 12.0,
            border_width: 2.0,
            top_offset: 20.0,
            left_offset: 20.0,
            title_font_size: 18.0,
            body_font_size: 14.0,
        }
    }
}
