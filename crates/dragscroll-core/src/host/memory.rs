//! In-memory host implementation.

use super::{Axis, Host, ListenTarget, ListenerId};
use crate::binder::DragScroll;
use crate::config::HandleSelector;
use crate::input::{EventKind, MouseButton, PointerInfo};
use kurbo::{Point, Size, Vec2};

/// Handle to an element of a [`MemoryHost`] tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    scroll: Vec2,
    /// Largest reachable offset per axis. `None` leaves the element unbounded.
    max_scroll: Option<Vec2>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            parent,
            children: Vec::new(),
            scroll: Vec2::ZERO,
            max_scroll: None,
        }
    }
}

/// Payload of a simulated input event.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryInput {
    Mouse { position: Point, button: MouseButton },
    Touch { touches: Vec<Point> },
}

/// A simulated input event aimed at an element.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEvent {
    pub kind: EventKind,
    /// Element the event originates on.
    pub target: ElementId,
    pub input: MemoryInput,
}

impl MemoryEvent {
    pub fn mouse(kind: EventKind, target: ElementId, position: Point, button: MouseButton) -> Self {
        Self {
            kind,
            target,
            input: MemoryInput::Mouse { position, button },
        }
    }

    pub fn touch(kind: EventKind, target: ElementId, touches: Vec<Point>) -> Self {
        Self {
            kind,
            target,
            input: MemoryInput::Touch { touches },
        }
    }
}

/// What happened while an event travelled through the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireResult {
    /// Number of hooks that handled the event.
    pub handled: usize,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// In-memory element tree and event system for testing and headless use.
///
/// Events bubble from their target through its ancestors and finally reach the global
/// scope. Scroll offsets are clamped to `[0, content - viewport]` once an extent is set.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    nodes: Vec<Node>,
    listeners: Vec<(ListenTarget<ElementId>, ListenerId)>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            nodes: vec![Node::new("body", None)],
            listeners: Vec::new(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }
}

impl MemoryHost {
    /// Create a host holding only the root element.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root (`body`) element.
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Append a new element under `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node::new(tag, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_id(&mut self, element: ElementId, id: &str) {
        self.nodes[element.0].id = Some(id.to_string());
    }

    pub fn add_class(&mut self, element: ElementId, class: &str) {
        let classes = &mut self.nodes[element.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    /// Give an element a scrollable range and clamp its current offset into it.
    pub fn set_scroll_extent(&mut self, element: ElementId, viewport: Size, content: Size) {
        let node = &mut self.nodes[element.0];
        let max = Vec2::new(
            (content.width - viewport.width).max(0.0),
            (content.height - viewport.height).max(0.0),
        );
        node.max_scroll = Some(max);
        node.scroll = Vec2::new(node.scroll.x.clamp(0.0, max.x), node.scroll.y.clamp(0.0, max.y));
    }

    /// Both scroll offsets of an element.
    pub fn scroll(&self, element: ElementId) -> Vec2 {
        self.nodes[element.0].scroll
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes[element.0].parent
    }

    pub fn children(&self, element: ElementId) -> &[ElementId] {
        &self.nodes[element.0].children
    }

    /// Find the first element with the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
            .map(ElementId)
    }

    /// Whether `target` has a listener with this identity attached.
    pub fn has_listener(&self, target: &ListenTarget<ElementId>, listener: ListenerId) -> bool {
        self.listeners.iter().any(|(t, l)| t == target && *l == listener)
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners attached to the global scope.
    pub fn global_listeners(&self) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(t, _)| *t == ListenTarget::Global)
            .map(|(_, l)| *l)
            .collect()
    }

    /// `element` followed by each of its ancestors up to the root.
    fn ancestry(&self, element: ElementId) -> Vec<ElementId> {
        let mut path = vec![element];
        let mut current = element;
        while let Some(parent) = self.nodes[current.0].parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    fn descendants(&self, root: ElementId, out: &mut Vec<ElementId>) {
        for &child in &self.nodes[root.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    /// Deliver an event: bubble from its target to the root, then the global scope.
    pub fn fire(&mut self, scroller: &mut DragScroll<ElementId>, event: &MemoryEvent) -> FireResult {
        self.default_prevented = false;
        self.propagation_stopped = false;

        let mut path: Vec<ListenTarget<ElementId>> = self
            .ancestry(event.target)
            .into_iter()
            .map(ListenTarget::Element)
            .collect();
        path.push(ListenTarget::Global);

        let mut handled = 0;
        for node in &path {
            let hooks: Vec<ListenerId> = self
                .listeners
                .iter()
                .filter(|(t, l)| t == node && l.kind == event.kind)
                .map(|(_, l)| *l)
                .collect();
            for hook in hooks {
                // A hook earlier in this pass may have detached it.
                if !self.has_listener(node, hook) {
                    continue;
                }
                if scroller.dispatch(self, hook, node, event).is_handled() {
                    handled += 1;
                }
            }
            if self.propagation_stopped {
                break;
            }
        }

        FireResult {
            handled,
            default_prevented: self.default_prevented,
            propagation_stopped: self.propagation_stopped,
        }
    }

    pub fn mouse_down(
        &mut self,
        scroller: &mut DragScroll<ElementId>,
        target: ElementId,
        position: Point,
        button: MouseButton,
    ) -> FireResult {
        self.fire(scroller, &MemoryEvent::mouse(EventKind::MouseDown, target, position, button))
    }

    pub fn mouse_move(&mut self, scroller: &mut DragScroll<ElementId>, target: ElementId, position: Point) -> FireResult {
        self.fire(
            scroller,
            &MemoryEvent::mouse(EventKind::MouseMove, target, position, MouseButton::Left),
        )
    }

    pub fn mouse_up(
        &mut self,
        scroller: &mut DragScroll<ElementId>,
        target: ElementId,
        position: Point,
        button: MouseButton,
    ) -> FireResult {
        self.fire(scroller, &MemoryEvent::mouse(EventKind::MouseUp, target, position, button))
    }

    pub fn touch_start(&mut self, scroller: &mut DragScroll<ElementId>, target: ElementId, position: Point) -> FireResult {
        self.fire(
            scroller,
            &MemoryEvent::touch(EventKind::TouchStart, target, vec![position]),
        )
    }

    pub fn touch_move(&mut self, scroller: &mut DragScroll<ElementId>, target: ElementId, position: Point) -> FireResult {
        self.fire(
            scroller,
            &MemoryEvent::touch(EventKind::TouchMove, target, vec![position]),
        )
    }

    /// Lift the last finger; `touchend` carries no remaining touch points.
    pub fn touch_end(&mut self, scroller: &mut DragScroll<ElementId>, target: ElementId) -> FireResult {
        self.fire(scroller, &MemoryEvent::touch(EventKind::TouchEnd, target, Vec::new()))
    }
}

impl Host for MemoryHost {
    type Element = ElementId;
    type Event = MemoryEvent;

    fn find_descendants(&self, root: &ElementId, selector: &HandleSelector) -> Vec<ElementId> {
        match selector {
            HandleSelector::FirstChild => self.children(*root).first().copied().into_iter().collect(),
            HandleSelector::Css(css) => {
                let css = css.trim();
                let (direct, body) = match css.strip_prefix('>') {
                    Some(rest) => (true, rest),
                    None => (false, css),
                };
                let Some(selector) = SimpleSelector::parse(body) else {
                    log::warn!("Unsupported selector: {:?}", css);
                    return Vec::new();
                };
                let candidates = if direct {
                    self.children(*root).to_vec()
                } else {
                    let mut all = Vec::new();
                    self.descendants(*root, &mut all);
                    all
                };
                candidates
                    .into_iter()
                    .filter(|el| selector.matches(&self.nodes[el.0]))
                    .collect()
            }
        }
    }

    fn add_listener(&mut self, target: &ListenTarget<ElementId>, listener: ListenerId) {
        // Same (target, listener) pair is registered once, like addEventListener.
        if !self.has_listener(target, listener) {
            self.listeners.push((target.clone(), listener));
        }
    }

    fn remove_listener(&mut self, target: &ListenTarget<ElementId>, listener: ListenerId) {
        self.listeners.retain(|(t, l)| !(t == target && *l == listener));
    }

    fn scroll_offset(&self, element: &ElementId, axis: Axis) -> f64 {
        let scroll = self.nodes[element.0].scroll;
        match axis {
            Axis::Horizontal => scroll.x,
            Axis::Vertical => scroll.y,
        }
    }

    fn set_scroll_offset(&mut self, element: &ElementId, axis: Axis, value: f64) {
        let node = &mut self.nodes[element.0];
        let value = match (node.max_scroll, axis) {
            (Some(max), Axis::Horizontal) => value.clamp(0.0, max.x),
            (Some(max), Axis::Vertical) => value.clamp(0.0, max.y),
            (None, _) => value,
        };
        match axis {
            Axis::Horizontal => node.scroll.x = value,
            Axis::Vertical => node.scroll.y = value,
        }
    }

    fn pointer_info(&self, event: &MemoryEvent) -> Option<PointerInfo<ElementId>> {
        match &event.input {
            MemoryInput::Mouse { position, button } => Some(PointerInfo {
                position: *position,
                button: *button,
                original_target: event.target,
            }),
            MemoryInput::Touch { .. } => None,
        }
    }

    fn touch_info(&self, event: &MemoryEvent) -> Option<Point> {
        match &event.input {
            MemoryInput::Touch { touches } => touches.first().copied(),
            MemoryInput::Mouse { .. } => None,
        }
    }

    fn suppress(&mut self, _event: &MemoryEvent) {
        self.default_prevented = true;
        self.propagation_stopped = true;
    }
}

/// Compound selector of the form `tag#id.class1.class2`, any part optional.
#[derive(Debug, PartialEq)]
struct SimpleSelector<'a> {
    tag: Option<&'a str>,
    id: Option<&'a str>,
    classes: Vec<&'a str>,
}

impl<'a> SimpleSelector<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let end = input.find(['.', '#']).unwrap_or(input.len());
        let tag = &input[..end];
        if tag != "*" && !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }

        let mut selector = Self {
            tag: (!tag.is_empty() && tag != "*").then_some(tag),
            id: None,
            classes: Vec::new(),
        };

        let mut rest = &input[end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return None;
            }
            if marker == '.' {
                selector.classes.push(name);
            } else {
                selector.id = Some(name);
            }
            rest = &body[end..];
        }

        Some(selector)
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.is_none_or(|tag| node.tag.eq_ignore_ascii_case(tag))
            && self.id.is_none_or(|id| node.id.as_deref() == Some(id))
            && self.classes.iter().all(|class| node.classes.iter().any(|c| c == class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::BindingId;

    fn tree() -> (MemoryHost, ElementId, ElementId, ElementId, ElementId) {
        let mut host = MemoryHost::new();
        let root = host.root();
        let list = host.append(root, "div");
        let first = host.append(list, "span");
        host.add_class(first, "grip");
        let second = host.append(list, "div");
        host.set_id(second, "body");
        let nested = host.append(second, "span");
        host.add_class(nested, "grip");
        host.add_class(nested, "small");
        (host, list, first, second, nested)
    }

    #[test]
    fn test_first_child_selector() {
        let (host, list, first, _, _) = tree();
        assert_eq!(host.find_descendants(&list, &HandleSelector::FirstChild), vec![first]);

        let leaf = host.children(list)[0];
        assert!(host.find_descendants(&leaf, &HandleSelector::FirstChild).is_empty());
    }

    #[test]
    fn test_css_selectors() {
        let (host, list, first, second, nested) = tree();
        let find = |css: &str| host.find_descendants(&list, &HandleSelector::css(css));

        assert_eq!(find(".grip"), vec![first, nested]);
        assert_eq!(find("> .grip"), vec![first]);
        assert_eq!(find("span.grip.small"), vec![nested]);
        assert_eq!(find("#body"), vec![second]);
        assert_eq!(find("DIV"), vec![second]);
        assert_eq!(find("*").len(), 3);
        assert!(find(".missing").is_empty());
    }

    #[test]
    fn test_unsupported_selector_matches_nothing() {
        let (host, list, _, _, _) = tree();
        assert!(host.find_descendants(&list, &HandleSelector::css("div span")).is_empty());
        assert!(host.find_descendants(&list, &HandleSelector::css(".")).is_empty());
        assert!(host.find_descendants(&list, &HandleSelector::css("")).is_empty());
    }

    #[test]
    fn test_universal_tag_must_stand_alone() {
        assert_eq!(SimpleSelector::parse("*.grip").map(|s| s.tag), Some(None));
        assert!(SimpleSelector::parse("d*v").is_none());
        assert!(SimpleSelector::parse("**").is_none());

        let (host, list, first, _, nested) = tree();
        assert_eq!(host.find_descendants(&list, &HandleSelector::css("*.grip")), vec![first, nested]);
        assert!(host.find_descendants(&list, &HandleSelector::css("sp*n")).is_empty());
    }

    #[test]
    fn test_scroll_clamping() {
        let (mut host, list, _, _, _) = tree();

        host.set_scroll_offset(&list, Axis::Horizontal, -40.0);
        assert!((host.scroll_offset(&list, Axis::Horizontal) + 40.0).abs() < f64::EPSILON);

        host.set_scroll_extent(list, Size::new(100.0, 50.0), Size::new(400.0, 80.0));
        assert!(host.scroll_offset(&list, Axis::Horizontal).abs() < f64::EPSILON);

        host.set_scroll_offset(&list, Axis::Horizontal, 1000.0);
        host.set_scroll_offset(&list, Axis::Vertical, 10.0);
        assert_eq!(host.scroll(list), Vec2::new(300.0, 10.0));

        host.set_scroll_offset(&list, Axis::Vertical, 31.0);
        assert!((host.scroll_offset(&list, Axis::Vertical) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_listener_table() {
        let (mut host, _, first, _, _) = tree();
        let listener = ListenerId::new(BindingId::from_raw(1), EventKind::MouseDown);
        let target = ListenTarget::Element(first);

        host.add_listener(&target, listener);
        host.add_listener(&target, listener);
        assert_eq!(host.listener_count(), 1);
        assert!(host.has_listener(&target, listener));
        assert!(!host.has_listener(&ListenTarget::Global, listener));

        host.remove_listener(&target, listener);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_event_decoding() {
        let (host, _, first, _, _) = tree();

        let mouse = MemoryEvent::mouse(EventKind::MouseDown, first, Point::new(3.0, 4.0), MouseButton::Right);
        let info = host.pointer_info(&mouse).unwrap();
        assert_eq!(info.position, Point::new(3.0, 4.0));
        assert_eq!(info.button, MouseButton::Right);
        assert_eq!(info.original_target, first);
        assert_eq!(host.touch_info(&mouse), None);

        let touch = MemoryEvent::touch(
            EventKind::TouchMove,
            first,
            vec![Point::new(7.0, 8.0), Point::new(70.0, 80.0)],
        );
        assert_eq!(host.touch_info(&touch), Some(Point::new(7.0, 8.0)));
        assert!(host.pointer_info(&touch).is_none());
    }

    #[test]
    fn test_element_lookup_and_ancestry() {
        let (host, list, _, second, nested) = tree();
        assert_eq!(host.element_by_id("body"), Some(second));
        assert_eq!(host.element_by_id("nope"), None);
        assert_eq!(host.ancestry(nested), vec![nested, second, list, host.root()]);
    }
}
