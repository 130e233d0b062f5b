//! Rotation logic of the crossfade, with no element access.
//!
//! [`init`] and [`tick`] only describe what should happen to the two layers;
//! the controller applies the resulting [`LayerUpdate`]s to its host.

use std::num::NonZeroUsize;

use crate::constants::*;
use crate::image_list::ImageList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    A,
    B,
}

impl Layer {
    pub fn other(self) -> Layer {
        match self {
            Layer::A => Layer::B,
            Layer::B => Layer::A,
        }
    }

    pub fn selector(self) -> &'static str {
        match self {
            Layer::A => LAYER_A_SELECTOR,
            Layer::B => LAYER_B_SELECTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerUpdate {
    /// Show `images[index]` as the layer background.
    SetImage { layer: Layer, index: usize },
    Show(Layer),
    Hide(Layer),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickUpdates {
    pub immediate: [LayerUpdate; 3],
    /// Applied once the swap delay has elapsed.
    pub deferred: LayerUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    index: usize,
    showing_a: bool,
    len: NonZeroUsize,
}

impl RotationState {
    pub fn new(len: NonZeroUsize) -> Self {
        Self { index: 0, showing_a: true, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn showing_a(&self) -> bool {
        self.showing_a
    }

    pub fn visible_layer(&self) -> Layer {
        if self.showing_a { Layer::A } else { Layer::B }
    }

    pub fn len(&self) -> NonZeroUsize {
        self.len
    }
}

/// Starting state plus the updates that put the first two images in place.
/// An empty list never starts.
pub fn init(images: &ImageList) -> Option<(RotationState, Vec<LayerUpdate>)> {
    let len = NonZeroUsize::new(images.len())?;
    let state = RotationState::new(len);
    let updates = vec![
        LayerUpdate::SetImage { layer: Layer::A, index: 0 },
        LayerUpdate::SetImage { layer: Layer::B, index: 1 % len.get() },
        LayerUpdate::Show(Layer::A),
    ];
    Some((state, updates))
}

pub fn tick(state: RotationState) -> (RotationState, TickUpdates) {
    let len = state.len.get();
    let index = (state.index + 1) % len;
    let next_index = (index + 1) % len;

    let outgoing = state.visible_layer();
    let incoming = outgoing.other();

    let updates = TickUpdates {
        immediate: [
            LayerUpdate::SetImage { layer: incoming, index },
            LayerUpdate::Show(incoming),
            LayerUpdate::Hide(outgoing),
        ],
        deferred: LayerUpdate::SetImage { layer: outgoing, index: next_index },
    };

    let state = RotationState { index, showing_a: !state.showing_a, len: state.len };
    (state, updates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> ImageList {
        ImageList::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_list_does_not_start() {
        assert!(init(&ImageList::default()).is_none());
    }

    #[test]
    fn init_places_first_two_images() {
        let (state, updates) = init(&list(&["a.jpg", "b.jpg", "c.jpg"])).unwrap();
        assert_eq!(state.index(), 0);
        assert!(state.showing_a());
        assert_eq!(
            updates,
            vec![
                LayerUpdate::SetImage { layer: Layer::A, index: 0 },
                LayerUpdate::SetImage { layer: Layer::B, index: 1 },
                LayerUpdate::Show(Layer::A),
            ]
        );
    }

    #[test]
    fn single_image_reuses_index_zero() {
        let (state, updates) = init(&list(&["x.jpg"])).unwrap();
        assert_eq!(updates[1], LayerUpdate::SetImage { layer: Layer::B, index: 0 });

        let (state, tick_updates) = tick(state);
        assert_eq!(state.index(), 0);
        assert_eq!(state.visible_layer(), Layer::B);
        assert_eq!(tick_updates.immediate[0], LayerUpdate::SetImage { layer: Layer::B, index: 0 });
        assert_eq!(tick_updates.deferred, LayerUpdate::SetImage { layer: Layer::A, index: 0 });
    }

    #[test]
    fn tick_swaps_layers_and_defers_next_image() {
        let (state, _) = init(&list(&["a.jpg", "b.jpg", "c.jpg"])).unwrap();
        let (state, updates) = tick(state);

        assert_eq!(state.index(), 1);
        assert!(!state.showing_a());
        assert_eq!(
            updates.immediate,
            [
                LayerUpdate::SetImage { layer: Layer::B, index: 1 },
                LayerUpdate::Show(Layer::B),
                LayerUpdate::Hide(Layer::A),
            ]
        );
        assert_eq!(updates.deferred, LayerUpdate::SetImage { layer: Layer::A, index: 2 });
    }

    #[test]
    fn index_follows_tick_count() {
        for n in 1..=5 {
            let images = ImageList::new((0..n).map(|i| format!("{}.jpg", i)).collect());
            let (mut state, _) = init(&images).unwrap();
            for k in 1..=13 {
                state = tick(state).0;
                assert_eq!(state.index(), k % n);
                assert_eq!(state.showing_a(), k % 2 == 0);
            }
        }
    }
}
