//! Scripted drag-to-scroll scenes.
//!
//! A scene describes an element tree, the bindings to apply to it and a sequence of
//! input events. Replaying it against [`MemoryHost`] yields the final scroll offsets.

use dragscroll_core::{
    Axis, BindingId, ConfigError, DragScroll, DragScrollConfig, ElementId, FireResult, Host, MemoryHost,
    MouseButton,
};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Name of the implicit root element.
pub const ROOT: &str = "body";

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scene: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid binding config: {0}")]
    Config(#[from] ConfigError),
    #[error("Unknown element: {0}")]
    UnknownElement(String),
    #[error("Duplicate element: {0}")]
    DuplicateElement(String),
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// One element of the scene tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSpec {
    pub name: String,
    /// Parent element name; the root when absent.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Initial scroll offset.
    #[serde(default)]
    pub scroll: Option<Vec2>,
    /// Visible size and content size; together they bound the scroll range.
    #[serde(default)]
    pub viewport: Option<Size>,
    #[serde(default)]
    pub content: Option<Size>,
}

fn default_tag() -> String {
    "div".to_string()
}

/// Elements to bind and the configuration to bind them with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingSpec {
    pub targets: Vec<String>,
    #[serde(default)]
    pub config: DragScrollConfig,
}

/// A scripted input event. Move and release targets default to the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputSpec {
    MouseDown {
        target: String,
        at: Point,
        #[serde(default)]
        button: MouseButton,
    },
    MouseMove {
        #[serde(default)]
        target: Option<String>,
        at: Point,
    },
    MouseUp {
        #[serde(default)]
        target: Option<String>,
        at: Point,
        #[serde(default)]
        button: MouseButton,
    },
    TouchStart {
        target: String,
        at: Point,
    },
    TouchMove {
        #[serde(default)]
        target: Option<String>,
        at: Point,
    },
    TouchEnd {
        #[serde(default)]
        target: Option<String>,
    },
}

/// A complete scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub elements: Vec<ElementSpec>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
    #[serde(default)]
    pub events: Vec<InputSpec>,
}

impl Scene {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ReplayResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Final scroll offset of a bound element.
#[derive(Debug, Clone, PartialEq)]
pub struct Offset {
    pub name: String,
    pub scroll: Vec2,
}

/// A scene materialised into a host and a set of bindings.
#[derive(Debug)]
pub struct Replay {
    host: MemoryHost,
    scroller: DragScroll<ElementId>,
    names: BTreeMap<String, ElementId>,
    /// Bound element names in binding order, without repeats.
    targets: Vec<String>,
    bindings: Vec<BindingId>,
}

impl Replay {
    /// Build the element tree and apply every binding of `scene`.
    pub fn new(scene: &Scene) -> ReplayResult<Self> {
        let mut host = MemoryHost::new();
        let mut names = BTreeMap::new();
        names.insert(ROOT.to_string(), host.root());

        for spec in &scene.elements {
            if names.contains_key(&spec.name) {
                return Err(ReplayError::DuplicateElement(spec.name.clone()));
            }
            let parent = match &spec.parent {
                Some(parent) => *names
                    .get(parent)
                    .ok_or_else(|| ReplayError::UnknownElement(parent.clone()))?,
                None => host.root(),
            };
            let element = host.append(parent, &spec.tag);
            host.set_id(element, &spec.name);
            for class in &spec.classes {
                host.add_class(element, class);
            }
            if let Some(scroll) = spec.scroll {
                host.set_scroll_offset(&element, Axis::Horizontal, scroll.x);
                host.set_scroll_offset(&element, Axis::Vertical, scroll.y);
            }
            if let (Some(viewport), Some(content)) = (spec.viewport, spec.content) {
                host.set_scroll_extent(element, viewport, content);
            }
            names.insert(spec.name.clone(), element);
        }

        let mut replay = Self {
            host,
            scroller: DragScroll::new(),
            names,
            targets: Vec::new(),
            bindings: Vec::new(),
        };
        for spec in &scene.bindings {
            replay.bind(spec)?;
        }
        Ok(replay)
    }

    fn bind(&mut self, spec: &BindingSpec) -> ReplayResult<()> {
        spec.config.validate()?;
        let elements = spec
            .targets
            .iter()
            .map(|name| self.element(Some(name)))
            .collect::<ReplayResult<Vec<_>>>()?;
        let ids = self.scroller.bind(&mut self.host, elements, &spec.config);
        self.bindings.extend(ids);
        for name in &spec.targets {
            if !self.targets.contains(name) {
                self.targets.push(name.clone());
            }
        }
        Ok(())
    }

    fn element(&self, name: Option<&String>) -> ReplayResult<ElementId> {
        let name = name.map(String::as_str).unwrap_or(ROOT);
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| ReplayError::UnknownElement(name.to_string()))
    }

    /// Deliver one scripted event.
    pub fn apply(&mut self, input: &InputSpec) -> ReplayResult<FireResult> {
        let result = match input {
            InputSpec::MouseDown { target, at, button } => {
                let target = self.element(Some(target))?;
                self.host.mouse_down(&mut self.scroller, target, *at, *button)
            }
            InputSpec::MouseMove { target, at } => {
                let target = self.element(target.as_ref())?;
                self.host.mouse_move(&mut self.scroller, target, *at)
            }
            InputSpec::MouseUp { target, at, button } => {
                let target = self.element(target.as_ref())?;
                self.host.mouse_up(&mut self.scroller, target, *at, *button)
            }
            InputSpec::TouchStart { target, at } => {
                let target = self.element(Some(target))?;
                self.host.touch_start(&mut self.scroller, target, *at)
            }
            InputSpec::TouchMove { target, at } => {
                let target = self.element(target.as_ref())?;
                self.host.touch_move(&mut self.scroller, target, *at)
            }
            InputSpec::TouchEnd { target } => {
                let target = self.element(target.as_ref())?;
                self.host.touch_end(&mut self.scroller, target)
            }
        };
        log::debug!("{:?} -> {:?}", input, result);
        Ok(result)
    }

    /// Deliver every event in order.
    pub fn run(&mut self, inputs: &[InputSpec]) -> ReplayResult<Vec<FireResult>> {
        inputs.iter().map(|input| self.apply(input)).collect()
    }

    /// Scroll offsets of every bound element.
    pub fn offsets(&self) -> Vec<Offset> {
        self.targets
            .iter()
            .filter_map(|name| {
                let element = self.names.get(name)?;
                Some(Offset {
                    name: name.clone(),
                    scroll: self.host.scroll(*element),
                })
            })
            .collect()
    }

    /// Whether any binding is mid-drag.
    pub fn is_dragging(&self) -> bool {
        self.bindings.iter().any(|id| self.scroller.is_dragging(*id))
    }

    pub fn host(&self) -> &MemoryHost {
        &self.host
    }
}

/// Build a scene, replay its events and return the final offsets.
pub fn replay(scene: &Scene) -> ReplayResult<Vec<Offset>> {
    let mut replay = Replay::new(scene)?;
    replay.run(&scene.events)?;
    if replay.is_dragging() {
        log::warn!("Scene ended with a drag still in progress");
    }
    Ok(replay.offsets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GALLERY: &str = r#"{
        "elements": [
            { "name": "gallery", "classes": ["scroller"], "scroll": { "x": 100.0, "y": 100.0 },
              "viewport": { "width": 200.0, "height": 200.0 },
              "content": { "width": 1200.0, "height": 800.0 } },
            { "name": "strip", "parent": "gallery" },
            { "name": "thumb", "parent": "strip", "tag": "img" }
        ],
        "bindings": [ { "targets": ["gallery"] } ],
        "events": [
            { "type": "mouse_down", "target": "strip", "at": { "x": 100.0, "y": 100.0 } },
            { "type": "mouse_move", "at": { "x": 80.0, "y": 70.0 } },
            { "type": "mouse_up", "at": { "x": 80.0, "y": 70.0 } }
        ]
    }"#;

    #[test]
    fn test_gallery_scene() {
        let scene = Scene::from_json(GALLERY).unwrap();
        let offsets = replay(&scene).unwrap();
        assert_eq!(
            offsets,
            vec![Offset {
                name: "gallery".to_string(),
                scroll: Vec2::new(120.0, 130.0),
            }]
        );
    }

    #[test]
    fn test_step_results() {
        let scene = Scene::from_json(GALLERY).unwrap();
        let mut replay = Replay::new(&scene).unwrap();
        let results = replay.run(&scene.events).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.handled == 1 && r.default_prevented));
        assert!(!replay.is_dragging());
        assert!(replay.host().global_listeners().is_empty());
    }

    #[test]
    fn test_touch_and_locked_vertical() {
        let json = r#"{
            "elements": [
                { "name": "timeline" },
                { "name": "grip", "parent": "timeline", "classes": ["grip"] }
            ],
            "bindings": [ {
                "targets": ["timeline"],
                "config": {
                    "handle_selector": { "kind": "css", "value": ".grip" },
                    "allow_vertical": false
                }
            } ],
            "events": [
                { "type": "touch_start", "target": "grip", "at": { "x": 0.0, "y": 0.0 } },
                { "type": "touch_move", "at": { "x": -40.0, "y": 25.0 } },
                { "type": "touch_end" }
            ]
        }"#;
        let offsets = replay(&Scene::from_json(json).unwrap()).unwrap();
        assert_eq!(offsets[0].scroll, Vec2::new(40.0, 0.0));
    }

    #[test]
    fn test_unknown_elements() {
        let json = r#"{ "elements": [ { "name": "a", "parent": "missing" } ] }"#;
        assert!(matches!(
            Replay::new(&Scene::from_json(json).unwrap()),
            Err(ReplayError::UnknownElement(name)) if name == "missing"
        ));

        let json = r#"{ "elements": [], "bindings": [ { "targets": ["ghost"] } ] }"#;
        assert!(matches!(
            Replay::new(&Scene::from_json(json).unwrap()),
            Err(ReplayError::UnknownElement(_))
        ));

        let json = r#"{ "elements": [ { "name": "a" }, { "name": "a" } ] }"#;
        assert!(matches!(
            Replay::new(&Scene::from_json(json).unwrap()),
            Err(ReplayError::DuplicateElement(_))
        ));
    }

    #[test]
    fn test_invalid_binding_config() {
        let json = r#"{
            "elements": [ { "name": "a" } ],
            "bindings": [ { "targets": ["a"], "config": { "handle_selector": { "kind": "css", "value": "" } } } ]
        }"#;
        assert!(matches!(
            Replay::new(&Scene::from_json(json).unwrap()),
            Err(ReplayError::Config(ConfigError::EmptySelector))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GALLERY.as_bytes()).unwrap();

        let scene = Scene::load(file.path()).unwrap();
        assert_eq!(scene.elements.len(), 3);
        assert_eq!(scene.events.len(), 3);

        assert!(matches!(
            Scene::load(file.path().with_extension("missing")),
            Err(ReplayError::Io(_))
        ));
    }
}
