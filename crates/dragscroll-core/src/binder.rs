//! Binder: attaches drag-to-scroll behaviour to scrollable elements.

use crate::adapter::{self, HookContext, pointer, touch};
use crate::config::DragScrollConfig;
use crate::host::{Host, ListenTarget, ListenerId};
use crate::input::{EventKind, EventOutcome, Modality};
use crate::session::DragSession;
use thiserror::Error;

/// Binder errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("Unknown binding: {0:?}")]
    UnknownBinding(BindingId),
}

/// Identifier of one bound element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One scrollable element with its handles, configuration and drag session.
#[derive(Debug, Clone)]
pub struct Binding<E> {
    id: BindingId,
    config: DragScrollConfig,
    handles: Vec<E>,
    session: DragSession<E>,
    /// Modality whose move/release hooks are installed on the global scope.
    live: Option<Modality>,
}

impl<E> Binding<E> {
    pub fn id(&self) -> BindingId {
        self.id
    }

    /// The scrollable element.
    pub fn target(&self) -> &E {
        self.session.target()
    }

    pub fn handles(&self) -> &[E] {
        &self.handles
    }

    pub fn config(&self) -> &DragScrollConfig {
        &self.config
    }

    pub fn session(&self) -> &DragSession<E> {
        &self.session
    }

    /// Input modality currently driving the drag, if any.
    pub fn live_modality(&self) -> Option<Modality> {
        self.live
    }
}

/// Registry of drag-to-scroll bindings.
///
/// Each binding owns its session, so bindings never share state. The host routes every
/// fired listener back through [`DragScroll::dispatch`].
#[derive(Debug, Clone)]
pub struct DragScroll<E> {
    bindings: Vec<Binding<E>>,
    next_id: u64,
}

impl<E> Default for DragScroll<E> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            next_id: 1,
        }
    }
}

impl<E: Clone + PartialEq + std::fmt::Debug> DragScroll<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every element in `elements` with `config`.
    ///
    /// Each element gets its own session; press hooks go on every handle the selector
    /// resolves to. Binding an element again adds an independent binding.
    pub fn bind<H, I>(&mut self, host: &mut H, elements: I, config: &DragScrollConfig) -> Vec<BindingId>
    where
        H: Host<Element = E>,
        I: IntoIterator<Item = E>,
    {
        elements
            .into_iter()
            .map(|element| self.bind_one(host, element, config))
            .collect()
    }

    fn bind_one<H: Host<Element = E>>(&mut self, host: &mut H, element: E, config: &DragScrollConfig) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;

        let handles = host.find_descendants(&element, &config.handle_selector);
        if handles.is_empty() {
            log::warn!("{:?}: no drag handle matches {:?} in {:?}", id, config.handle_selector, element);
        }
        for handle in &handles {
            let target = ListenTarget::Element(handle.clone());
            for modality in [Modality::Pointer, Modality::Touch] {
                host.add_listener(&target, ListenerId::new(id, modality.press_kind()));
            }
        }
        log::debug!("{:?}: bound {:?} with {} handle(s)", id, element, handles.len());

        self.bindings.push(Binding {
            id,
            config: config.clone(),
            handles,
            session: DragSession::new(element),
            live: None,
        });
        id
    }

    /// Detach every listener of a binding and drop its session.
    pub fn unbind<H: Host<Element = E>>(&mut self, host: &mut H, id: BindingId) -> Result<(), BindError> {
        let Some(index) = self.bindings.iter().position(|b| b.id == id) else {
            log::warn!("Unbind of unknown binding {:?}", id);
            return Err(BindError::UnknownBinding(id));
        };
        let binding = self.bindings.remove(index);
        Self::detach(host, &binding);
        log::debug!("{:?}: unbound", id);
        Ok(())
    }

    /// Detach all bindings.
    pub fn unbind_all<H: Host<Element = E>>(&mut self, host: &mut H) {
        for binding in self.bindings.drain(..) {
            Self::detach(host, &binding);
        }
    }

    fn detach<H: Host<Element = E>>(host: &mut H, binding: &Binding<E>) {
        for handle in &binding.handles {
            let target = ListenTarget::Element(handle.clone());
            for modality in [Modality::Pointer, Modality::Touch] {
                host.remove_listener(&target, ListenerId::new(binding.id, modality.press_kind()));
            }
        }
        if let Some(modality) = binding.live {
            adapter::uninstall(host, binding.id, modality);
        }
    }

    /// Route a fired listener to its hook.
    ///
    /// `attached` is the target the listener was registered on. Listeners of unknown
    /// bindings (for example ones the host has not detached yet) are ignored.
    pub fn dispatch<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        listener: ListenerId,
        attached: &ListenTarget<E>,
        event: &H::Event,
    ) -> EventOutcome {
        let Some(binding) = self.bindings.iter_mut().find(|b| b.id == listener.binding) else {
            return EventOutcome::Ignored;
        };
        let Binding {
            id,
            config,
            session,
            live,
            ..
        } = binding;
        let ctx = HookContext {
            binding: *id,
            config,
            session,
            live,
        };

        match (listener.kind, attached) {
            (EventKind::MouseDown, ListenTarget::Element(handle)) => pointer::press(host, ctx, handle, event),
            (EventKind::TouchStart, ListenTarget::Element(_)) => touch::start(host, ctx, event),
            (EventKind::MouseDown | EventKind::TouchStart, ListenTarget::Global) => EventOutcome::Ignored,
            (EventKind::MouseMove, _) => pointer::motion(host, ctx, event),
            (EventKind::MouseUp, _) => pointer::release(host, ctx, event),
            (EventKind::TouchMove, _) => touch::motion(host, ctx, event),
            (EventKind::TouchEnd, _) => touch::end(host, ctx, event),
        }
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding<E>> {
        self.bindings.iter().find(|b| b.id == id)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding<E>> {
        self.bindings.iter()
    }

    pub fn session(&self, id: BindingId) -> Option<&DragSession<E>> {
        self.binding(id).map(Binding::session)
    }

    pub fn is_dragging(&self, id: BindingId) -> bool {
        self.session(id).is_some_and(DragSession::is_active)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
