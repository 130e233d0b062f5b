use std::time::Duration;

use tracing::{debug, info, trace};

use crate::constants::*;
use crate::host::{HostElement, LayerElement, css_url};
use crate::image_list::ImageList;
use crate::rotation::{self, Layer, LayerUpdate, RotationState};
use crate::timer::{Interval, Timeout};

/// Crossfades the two layers of a host element through its image list.
///
/// The controller owns the host and both timers. Drive it with
/// [`update`](Self::update) from the frame loop; nothing happens between calls.
pub struct SliderController<H: HostElement> {
    host: H,
    images: ImageList,
    state: RotationState,
    interval: Option<Interval>,
    pending_swap: Option<Timeout<LayerUpdate>>,
    ticks: u64,
}

impl<H: HostElement> SliderController<H> {
    /// Sets up the first two images and starts the tick timer.
    ///
    /// Returns `None` without touching the host when the element is missing,
    /// its image list is absent, malformed or empty, or a layer is missing.
    pub fn mount(host: Option<H>) -> Option<Self> {
        let Some(host) = host else {
            debug!("no slider element, nothing to mount");
            return None;
        };
        Self::try_mount(host).ok()
    }

    /// Like [`mount`](Self::mount), but hands the untouched host back when
    /// the slider cannot start.
    pub fn try_mount(mut host: H) -> Result<Self, H> {
        let images = ImageList::from_attribute(host.attribute(IMAGES_ATTRIBUTE));
        let Some((state, updates)) = rotation::init(&images) else {
            debug!("slider has no images, staying idle");
            return Err(host);
        };

        for layer in [Layer::A, Layer::B] {
            if host.query_layer(layer.selector()).is_none() {
                debug!("slider layer {} is missing, staying idle", layer.selector());
                return Err(host);
            }
        }

        let mut slider = Self {
            host,
            images,
            state,
            interval: Some(Interval::new(TICK_INTERVAL)),
            pending_swap: None,
            ticks: 0,
        };
        for update in updates {
            slider.apply(update);
        }

        info!("slider mounted with {} image(s)", slider.images.len());
        Ok(slider)
    }

    /// Advances logical time by `dt`, firing every tick and deferred swap that
    /// falls inside it in order.
    pub fn update(&mut self, dt: Duration) {
        let mut budget = dt;
        while let Some(next) = self.next_event() {
            if next > budget {
                self.advance_timers(budget);
                return;
            }
            budget -= next;
            self.advance_timers(next);
        }
    }

    /// Cancels the tick timer and any pending swap. The layers keep whatever
    /// they show now.
    pub fn stop(&mut self) {
        if self.interval.take().is_some() {
            info!("slider stopped after {} tick(s)", self.ticks);
        }
        self.pending_swap = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn images(&self) -> &ImageList {
        &self.images
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Time left before the outgoing layer receives its next image.
    pub fn pending_swap(&self) -> Option<Duration> {
        self.pending_swap.as_ref().map(Timeout::remaining)
    }

    /// Time left before the next tick.
    pub fn next_tick(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::remaining)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn next_event(&self) -> Option<Duration> {
        let tick = self.next_tick()?;
        Some(match self.pending_swap() {
            Some(swap) => swap.min(tick),
            None => tick,
        })
    }

    fn advance_timers(&mut self, step: Duration) {
        if let Some(swap) = self.pending_swap.as_mut() {
            swap.advance(step);
        }
        if let Some(swap) = self.pending_swap.take_if(|swap| swap.is_due()) {
            self.apply(swap.into_payload());
        }

        let fired = self.interval.as_mut().is_some_and(|interval| interval.advance(step));
        if fired {
            self.tick();
        }
    }

    fn tick(&mut self) {
        let (state, updates) = rotation::tick(self.state);
        self.state = state;
        self.ticks += 1;

        for update in updates.immediate {
            self.apply(update);
        }
        self.pending_swap = Some(Timeout::new(SWAP_DELAY, updates.deferred));

        debug!(
            "tick {}: showing image {} on layer {:?}",
            self.ticks,
            state.index(),
            state.visible_layer()
        );
    }

    fn apply(&mut self, update: LayerUpdate) {
        let layer = match update {
            LayerUpdate::SetImage { layer, .. } | LayerUpdate::Show(layer) | LayerUpdate::Hide(layer) => layer,
        };
        let Some(element) = self.host.query_layer(layer.selector()) else {
            trace!("layer {:?} vanished, dropping {:?}", layer, update);
            return;
        };

        match update {
            LayerUpdate::SetImage { index, .. } => {
                if let Some(reference) = self.images.get(index) {
                    element.set_background_image(&css_url(reference));
                }
            }
            LayerUpdate::Show(_) => element.add_class(VISIBLE_CLASS),
            LayerUpdate::Hide(_) => element.remove_class(VISIBLE_CLASS),
        }
    }
}
