//! A JSON scene: grid configuration, container width and a script of
//! widget operations. Used by the CLI and the wasm entry points to lay out
//! a dashboard without building one through the Rust API.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GridError;
use crate::geometry::{GridRect, PixelBox};
use crate::layout::GridLayout;
use crate::model::{GridConfig, WidgetOptions};
use crate::stack::{Collaborators, GridStack};
use crate::tree::WidgetTree;
use crate::units::{FixedRatioMeasure, MeasureLength};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub config: GridConfig,

    /// Measured width of the container in pixels.
    #[serde(default = "default_container_width")]
    pub container_width: f64,

    /// Root font size for `em`/`rem` lengths when no measurer is supplied.
    #[serde(default)]
    pub font_size: Option<f64>,

    /// Widgets added to the grid, in order.
    #[serde(default)]
    pub widgets: Vec<SceneWidget>,

    /// Widgets added to the secondary region, in order.
    #[serde(default)]
    pub secondary_widgets: Vec<SceneWidget>,

    /// Applied after all widgets were added.
    #[serde(default)]
    pub updates: Vec<SceneUpdate>,

    /// Keys of widgets removed last.
    #[serde(default)]
    pub removals: Vec<String>,
}

fn default_container_width() -> f64 {
    1200.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneWidget {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(flatten)]
    pub options: WidgetOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneUpdate {
    pub target: String,
    #[serde(flatten)]
    pub options: WidgetOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    Primary,
    Secondary,
}

/// A widget in the final layout, by key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWidget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub region: Region,
    pub rect: GridRect,
    #[serde(rename = "box")]
    pub pixel: PixelBox,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLayout {
    pub widgets: Vec<PlacedWidget>,
    /// Widgets that found no free slot, by key or `#<index>`.
    pub unplaced: Vec<String>,
    /// Update and removal targets that matched no widget.
    pub unresolved: Vec<String>,
    pub layout: GridLayout,
}

const CONTAINER_KEY: &str = "grid";

/// Lay out a scene with a fixed-ratio unit table.
pub fn layout_scene(scene: &Scene) -> Result<SceneLayout, GridError> {
    let measure = match scene.font_size {
        Some(px) if px.is_finite() && px > 0.0 => FixedRatioMeasure::new().with_font_size(px),
        _ => FixedRatioMeasure::new(),
    };
    layout_scene_with(scene, measure)
}

/// Lay out a scene, measuring non-pixel lengths with `measure`.
pub fn layout_scene_with(
    scene: &Scene,
    measure: impl MeasureLength + 'static,
) -> Result<SceneLayout, GridError> {
    check_unique_keys(scene)?;

    let mut tree = WidgetTree::new();
    tree.create_root(Some(CONTAINER_KEY));
    let collaborators = Collaborators::new(scene.container_width).with_measure(measure);
    let mut stack = GridStack::mount(tree, CONTAINER_KEY, scene.config.clone(), collaborators)?;

    let mut unplaced = Vec::new();
    for (index, widget) in scene.widgets.iter().enumerate() {
        let id = match &widget.key {
            Some(key) => stack.add_widget_keyed(key, widget.options),
            None => stack.add_widget(widget.options),
        };
        if id.is_none() {
            unplaced.push(label(widget, index));
        }
    }
    for (index, widget) in scene.secondary_widgets.iter().enumerate() {
        let id = match &widget.key {
            Some(key) => stack.add_secondary_widget_keyed(key, widget.options),
            None => stack.add_secondary_widget(widget.options),
        };
        if id.is_none() {
            unplaced.push(format!("secondary {}", label(widget, index)));
        }
    }

    let mut unresolved = Vec::new();
    for update in &scene.updates {
        let ok = if stack.resolve(update.target.as_str()).is_some() {
            stack.update_widget(update.target.as_str(), update.options)
        } else {
            stack.update_secondary_widget(update.target.as_str(), update.options)
        };
        if !ok {
            unresolved.push(update.target.clone());
        }
    }
    for key in &scene.removals {
        let ok = stack.remove_widget(key.as_str()) || stack.remove_secondary_widget(key.as_str());
        if !ok {
            unresolved.push(key.clone());
        }
    }

    let layout = stack.last_layout().clone();
    let tree = stack.tree();
    let key_of = |id| tree.key(id).map(str::to_string);
    let mut widgets: Vec<PlacedWidget> = layout
        .items
        .iter()
        .map(|b| PlacedWidget {
            key: key_of(b.id),
            region: Region::Primary,
            rect: b.rect,
            pixel: b.pixel,
        })
        .collect();
    if let Some(region) = &layout.secondary {
        widgets.extend(region.grid.items.iter().map(|b| PlacedWidget {
            key: key_of(b.id),
            region: Region::Secondary,
            rect: b.rect,
            pixel: b.pixel,
        }));
    }

    debug!(
        widgets = widgets.len(),
        unplaced = unplaced.len(),
        unresolved = unresolved.len(),
        "scene laid out"
    );

    Ok(SceneLayout {
        widgets,
        unplaced,
        unresolved,
        layout,
    })
}

/// Parse a scene, lay it out, and serialize the result.
pub fn layout_json(json: &str) -> Result<String, GridError> {
    let scene: Scene = serde_json::from_str(json)?;
    let result = layout_scene(&scene)?;
    Ok(serde_json::to_string_pretty(&result)?)
}

fn label(widget: &SceneWidget, index: usize) -> String {
    widget.key.clone().unwrap_or_else(|| format!("#{}", index))
}

fn check_unique_keys(scene: &Scene) -> Result<(), GridError> {
    let mut seen = HashSet::new();
    let keys = scene
        .widgets
        .iter()
        .chain(scene.secondary_widgets.iter())
        .filter_map(|w| w.key.as_deref());
    for key in keys {
        if key == CONTAINER_KEY {
            return Err(GridError::InvalidScene(format!("widget key `{}` is reserved", key)));
        }
        if !seen.insert(key) {
            return Err(GridError::InvalidScene(format!("duplicate widget key `{}`", key)));
        }
    }
    Ok(())
}
