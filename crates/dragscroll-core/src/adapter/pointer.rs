//! Mouse press/move/release hooks.

use super::{HookContext, begin, finish, follow};
use crate::host::Host;
use crate::input::{EventOutcome, Modality};

/// Press hook attached to a handle.
///
/// Starts a drag only if the button matches the configured trigger and, when
/// propagated events are refused, the press originated on `handle` itself.
pub(crate) fn press<H: Host>(
    host: &mut H,
    mut ctx: HookContext<'_, H::Element>,
    handle: &H::Element,
    event: &H::Event,
) -> EventOutcome {
    let Some(info) = host.pointer_info(event) else {
        return EventOutcome::Ignored;
    };
    if info.button != ctx.config.trigger_button {
        log::debug!("{:?}: ignoring press with {:?}", ctx.binding, info.button);
        return EventOutcome::Ignored;
    }
    if !ctx.config.accept_propagated_event && info.original_target != *handle {
        log::debug!("{:?}: ignoring press propagated from {:?}", ctx.binding, info.original_target);
        return EventOutcome::Ignored;
    }

    begin(host, &mut ctx, Modality::Pointer, info.position);
    if ctx.config.prevent_default {
        host.suppress(event);
    }
    EventOutcome::Handled
}

/// Global move hook, live only during a mouse drag.
pub(crate) fn motion<H: Host>(host: &mut H, mut ctx: HookContext<'_, H::Element>, event: &H::Event) -> EventOutcome {
    let Some(position) = host.pointer_position(event) else {
        return EventOutcome::Ignored;
    };
    if !follow(host, &mut ctx, Modality::Pointer, position) {
        return EventOutcome::Ignored;
    }
    if ctx.config.prevent_default {
        host.suppress(event);
    }
    EventOutcome::Handled
}

/// Global release hook; removes itself and the move hook.
pub(crate) fn release<H: Host>(host: &mut H, mut ctx: HookContext<'_, H::Element>, event: &H::Event) -> EventOutcome {
    if !finish(host, &mut ctx, Modality::Pointer) {
        return EventOutcome::Ignored;
    }
    if ctx.config.prevent_default {
        host.suppress(event);
    }
    EventOutcome::Handled
}
