use wasm_bindgen::prelude::*;

use crate::scene::{layout_scene_with, Scene};
use crate::units::MeasureLength;

/// Lay out a scene given as JSON. Non-pixel lengths use the fixed table.
#[wasm_bindgen(js_name = layoutScene)]
pub fn layout_scene(json: &str) -> Result<String, JsValue> {
    crate::layout_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Lay out a scene object, measuring non-pixel lengths with a JS callback
/// `(magnitude, unit) => px`, typically backed by a hidden probe element.
#[wasm_bindgen(js_name = layoutSceneWith)]
pub fn layout_scene_with_measure(scene: JsValue, measure_length: js_sys::Function) -> Result<JsValue, JsValue> {
    let scene: Scene = serde_wasm_bindgen::from_value(scene)?;
    let layout = layout_scene_with(&scene, JsMeasure(measure_length))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(serde_wasm_bindgen::to_value(&layout)?)
}

struct JsMeasure(js_sys::Function);

impl MeasureLength for JsMeasure {
    fn measure(&self, magnitude: f64, unit: &str) -> f64 {
        self.0
            .call2(&JsValue::NULL, &JsValue::from_f64(magnitude), &JsValue::from_str(unit))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }
}
