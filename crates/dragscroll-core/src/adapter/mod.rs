//! Input adapters translating raw pointer and touch events into drag session calls.
//!
//! Both adapters share the same lifecycle: a press starts the session and installs
//! move/release hooks on the global scope, release removes them and ends the session.

pub mod pointer;
pub mod touch;

use crate::binder::BindingId;
use crate::config::DragScrollConfig;
use crate::host::{Host, ListenTarget, ListenerId};
use crate::input::Modality;
use crate::session::DragSession;
use kurbo::Point;

/// Per-binding state handed to a hook for one invocation.
pub(crate) struct HookContext<'a, E> {
    pub binding: BindingId,
    pub config: &'a DragScrollConfig,
    pub session: &'a mut DragSession<E>,
    /// Modality whose move/release hooks are currently installed globally.
    pub live: &'a mut Option<Modality>,
}

impl<E> HookContext<'_, E> {
    /// Whether `modality` currently drives an active drag.
    pub fn owns(&self, modality: Modality) -> bool {
        *self.live == Some(modality) && self.session.is_active()
    }
}

/// Start (or re-anchor) the drag and make sure `modality`'s move/release hooks are the
/// only ones installed for this binding.
pub(crate) fn begin<H: Host>(host: &mut H, ctx: &mut HookContext<'_, H::Element>, modality: Modality, position: Point) {
    match *ctx.live {
        Some(current) if current == modality => {}
        Some(other) => {
            uninstall(host, ctx.binding, other);
            install(host, ctx.binding, modality);
        }
        None => install(host, ctx.binding, modality),
    }
    *ctx.live = Some(modality);

    if ctx.session.is_active() {
        log::debug!("{:?}: re-anchoring drag at ({}, {})", ctx.binding, position.x, position.y);
    } else {
        log::debug!("{:?}: {:?} drag started at ({}, {})", ctx.binding, modality, position.x, position.y);
    }
    ctx.session.start(position);
}

/// Follow the pointer. No-op unless `modality` owns the drag.
pub(crate) fn follow<H: Host>(host: &mut H, ctx: &mut HookContext<'_, H::Element>, modality: Modality, position: Point) -> bool {
    if !ctx.owns(modality) {
        return false;
    }
    match ctx.session.move_to(host, position, ctx.config.allow_vertical) {
        Some(delta) => {
            log::trace!("{:?}: drag delta ({}, {})", ctx.binding, delta.x, delta.y);
            true
        }
        None => false,
    }
}

/// Remove the global hooks and end the drag. No-op unless `modality` owns the drag.
pub(crate) fn finish<H: Host>(host: &mut H, ctx: &mut HookContext<'_, H::Element>, modality: Modality) -> bool {
    if *ctx.live != Some(modality) {
        return false;
    }
    uninstall(host, ctx.binding, modality);
    *ctx.live = None;
    if ctx.session.end() {
        log::debug!("{:?}: {:?} drag ended", ctx.binding, modality);
    }
    true
}

pub(crate) fn install<H: Host>(host: &mut H, binding: BindingId, modality: Modality) {
    host.add_listener(&ListenTarget::Global, ListenerId::new(binding, modality.move_kind()));
    host.add_listener(&ListenTarget::Global, ListenerId::new(binding, modality.release_kind()));
}

pub(crate) fn uninstall<H: Host>(host: &mut H, binding: BindingId, modality: Modality) {
    host.remove_listener(&ListenTarget::Global, ListenerId::new(binding, modality.move_kind()));
    host.remove_listener(&ListenTarget::Global, ListenerId::new(binding, modality.release_kind()));
}
