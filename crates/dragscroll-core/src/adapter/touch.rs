//! Touch start/move/end hooks.
//!
//! Same lifecycle as the pointer hooks, driven by the first touch point. There is no
//! button or propagation filter, and suppression follows `touch_prevent_default`.

use super::{HookContext, begin, finish, follow};
use crate::host::Host;
use crate::input::{EventOutcome, Modality};

pub(crate) fn start<H: Host>(host: &mut H, mut ctx: HookContext<'_, H::Element>, event: &H::Event) -> EventOutcome {
    let Some(position) = host.touch_info(event) else {
        return EventOutcome::Ignored;
    };
    begin(host, &mut ctx, Modality::Touch, position);
    if ctx.config.touch_prevent_default {
        host.suppress(event);
    }
    EventOutcome::Handled
}

pub(crate) fn motion<H: Host>(host: &mut H, mut ctx: HookContext<'_, H::Element>, event: &H::Event) -> EventOutcome {
    let Some(position) = host.touch_info(event) else {
        return EventOutcome::Ignored;
    };
    if !follow(host, &mut ctx, Modality::Touch, position) {
        return EventOutcome::Ignored;
    }
    if ctx.config.touch_prevent_default {
        host.suppress(event);
    }
    EventOutcome::Handled
}

pub(crate) fn end<H: Host>(host: &mut H, mut ctx: HookContext<'_, H::Element>, event: &H::Event) -> EventOutcome {
    if !finish(host, &mut ctx, Modality::Touch) {
        return EventOutcome::Ignored;
    }
    if ctx.config.touch_prevent_default {
        host.suppress(event);
    }
    EventOutcome::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::BindingId;
    use crate::config::DragScrollConfig;
    use crate::host::{Axis, ElementId, MemoryEvent, MemoryHost};
    use crate::input::EventKind;
    use crate::session::DragSession;
    use kurbo::Point;

    fn setup() -> (MemoryHost, ElementId, ElementId) {
        let mut host = MemoryHost::new();
        let root = host.root();
        let list = host.append(root, "ul");
        let handle = host.append(list, "li");
        (host, list, handle)
    }

    #[test]
    fn test_touch_drag_scrolls() {
        let (mut host, list, handle) = setup();
        let config = DragScrollConfig::default();
        let mut session = DragSession::new(list);
        let mut live = None;
        let binding = BindingId::from_raw(7);

        macro_rules! ctx {
            () => {
                HookContext {
                    binding,
                    config: &config,
                    session: &mut session,
                    live: &mut live,
                }
            };
        }

        let down = MemoryEvent::touch(EventKind::TouchStart, handle, vec![Point::new(50.0, 50.0)]);
        assert_eq!(start(&mut host, ctx!(), &down), EventOutcome::Handled);

        let drag = MemoryEvent::touch(EventKind::TouchMove, list, vec![Point::new(20.0, 60.0)]);
        assert_eq!(motion(&mut host, ctx!(), &drag), EventOutcome::Handled);
        assert!((host.scroll_offset(&list, Axis::Horizontal) - 30.0).abs() < f64::EPSILON);
        assert!((host.scroll_offset(&list, Axis::Vertical) + 10.0).abs() < f64::EPSILON);

        let up = MemoryEvent::touch(EventKind::TouchEnd, list, Vec::new());
        assert_eq!(end(&mut host, ctx!(), &up), EventOutcome::Handled);
        assert!(!session.is_active());
        assert_eq!(live, None);
        assert!(host.global_listeners().is_empty());

        // A second end is inert.
        assert_eq!(end(&mut host, ctx!(), &up), EventOutcome::Ignored);
    }

    #[test]
    fn test_touch_start_without_points_is_ignored() {
        let (mut host, list, handle) = setup();
        let config = DragScrollConfig::default();
        let mut session = DragSession::new(list);
        let mut live = None;

        let ctx = HookContext {
            binding: BindingId::from_raw(1),
            config: &config,
            session: &mut session,
            live: &mut live,
        };
        let empty = MemoryEvent::touch(EventKind::TouchStart, handle, Vec::new());
        assert_eq!(start(&mut host, ctx, &empty), EventOutcome::Ignored);
        assert!(!session.is_active());
        assert_eq!(host.listener_count(), 0);
    }
}
