use bevy::prelude::*;
use cube_scatter::prelude::{EventSink, ScatterEvent, ScatterEventKind};

/// Bevy message containing the originating request entity and the underlying [`ScatterEvent`].
#[derive(Message, Debug, Clone)]
pub struct ScatterMessage {
    pub request_entity: Entity,
    pub event: ScatterEvent,
}

/// Selects which [`ScatterEvent`] kinds are forwarded as [`ScatterMessage`]s.
///
/// Forwards everything by default. Per-placement events can be numerous; restrict
/// the filter if nothing reads them.
#[derive(Resource, Debug, Clone, Default)]
pub struct ScatterMessageFilter {
    kinds: Option<Vec<ScatterEventKind>>,
}

impl ScatterMessageFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(kinds: impl IntoIterator<Item = ScatterEventKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
        }
    }

    pub fn none() -> Self {
        Self::only([])
    }

    pub fn allows(&self, kind: ScatterEventKind) -> bool {
        self.kinds.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Event sink that buffers events tagged with the request entity until [`MessageSink::flush`].
///
/// The batch runs with the world mutably borrowed by the scene binding, so messages
/// are written afterwards.
pub struct MessageSink {
    request: Entity,
    filter: ScatterMessageFilter,
    pending: Vec<ScatterMessage>,
}

impl MessageSink {
    pub fn new(request: Entity, filter: ScatterMessageFilter) -> Self {
        Self {
            request,
            filter,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Writes buffered messages; returns how many were written. Without registered
    /// [`Messages<ScatterMessage>`] the buffer is dropped.
    pub fn flush(self, world: &mut World) -> usize {
        let Some(mut messages) = world.get_resource_mut::<Messages<ScatterMessage>>() else {
            return 0;
        };
        let written = self.pending.len();
        for message in self.pending {
            messages.write(message);
        }
        written
    }
}

impl EventSink for MessageSink {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        if self.filter.allows(event.kind()) {
            self.pending.push(ScatterMessage {
                request_entity: self.request,
                event,
            });
        }
    }

    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.filter.allows(kind)
    }
}
