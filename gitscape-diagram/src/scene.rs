//! Animated visual elements driven by reconciliation diffs.
//!
//! A [`Layer`] holds one sprite per key. Entering sprites start from a given
//! visual state, updating sprites retarget from wherever they currently are,
//! and exiting sprites animate out and are pruned once their tween finishes.
//! A sprite that re-enters while still exiting is revived in place.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::geometry::Point;
use crate::transition::{Interpolate, TransitionConfig, Tween};

/// Where a sprite is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Present,
    Exiting,
}

/// Animated state of a node marker and its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub position: Point,
    pub opacity: f32,
}

impl NodeVisual {
    pub fn shown(position: Point) -> Self {
        Self {
            position,
            opacity: 1.0,
        }
    }

    pub fn hidden(position: Point) -> Self {
        Self {
            position,
            opacity: 0.0,
        }
    }
}

impl Interpolate for NodeVisual {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            position: self.position.interpolate(&to.position, t),
            opacity: self.opacity.interpolate(&to.opacity, t),
        }
    }
}

/// Animated endpoints of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkVisual {
    pub source: Point,
    pub target: Point,
    pub opacity: f32,
}

impl LinkVisual {
    pub fn shown(source: Point, target: Point) -> Self {
        Self {
            source,
            target,
            opacity: 1.0,
        }
    }

    /// Both endpoints folded onto one point.
    pub fn folded(at: Point) -> Self {
        Self {
            source: at,
            target: at,
            opacity: 0.0,
        }
    }
}

impl Interpolate for LinkVisual {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            source: self.source.interpolate(&to.source, t),
            target: self.target.interpolate(&to.target, t),
            opacity: self.opacity.interpolate(&to.opacity, t),
        }
    }
}

/// One keyed visual element.
#[derive(Debug, Clone)]
pub struct Sprite<V, D> {
    pub key: String,
    pub tween: Tween<V>,
    pub phase: Phase,
    /// Non-animated presentation data, refreshed on enter and update.
    pub data: D,
}

/// Keyed sprites in draw order.
#[derive(Debug, Clone)]
pub struct Layer<V, D> {
    sprites: HashMap<String, Sprite<V, D>>,
    order: Vec<String>,
}

impl<V, D> Default for Layer<V, D> {
    fn default() -> Self {
        Self {
            sprites: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<V: Interpolate, D> Layer<V, D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Sprite<V, D>> {
        self.sprites.get(key)
    }

    /// Keys of sprites that are not on their way out, in draw order.
    pub fn live_keys(&self) -> Vec<String> {
        self.iter()
            .filter(|sprite| sprite.phase != Phase::Exiting)
            .map(|sprite| sprite.key.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite<V, D>> {
        self.order.iter().filter_map(|key| self.sprites.get(key))
    }

    pub fn enter(&mut self, key: &str, from: V, to: V, data: D, now: Instant, config: TransitionConfig) {
        match self.sprites.get_mut(key) {
            Some(sprite) => {
                sprite.tween.retarget(to, now, config);
                sprite.phase = Phase::Entering;
                sprite.data = data;
            }
            None => {
                self.sprites.insert(
                    key.to_string(),
                    Sprite {
                        key: key.to_string(),
                        tween: Tween::new(from, to, now, config),
                        phase: Phase::Entering,
                        data,
                    },
                );
            }
        }
    }

    pub fn update(&mut self, key: &str, to: V, data: D, now: Instant, config: TransitionConfig) {
        if let Some(sprite) = self.sprites.get_mut(key) {
            sprite.tween.retarget(to, now, config);
            if sprite.phase == Phase::Exiting {
                sprite.phase = Phase::Entering;
            }
            sprite.data = data;
        }
    }

    pub fn exit(&mut self, key: &str, to: V, now: Instant, config: TransitionConfig) {
        if let Some(sprite) = self.sprites.get_mut(key) {
            sprite.tween.retarget(to, now, config);
            sprite.phase = Phase::Exiting;
        }
    }

    /// Draw live keys in `live` order, then whatever is still exiting.
    pub fn arrange(&mut self, live: &[String]) {
        let live_set: HashSet<&String> = live.iter().collect();
        let exiting: Vec<String> = self
            .order
            .iter()
            .filter(|key| !live_set.contains(key))
            .filter(|key| {
                self.sprites
                    .get(*key)
                    .is_some_and(|sprite| sprite.phase == Phase::Exiting)
            })
            .cloned()
            .collect();
        self.order = live.iter().chain(&exiting).cloned().collect();
        let keep: HashSet<&String> = self.order.iter().collect();
        self.sprites.retain(|key, _| keep.contains(key));
    }

    /// Drop finished exits and settle finished entries.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.sprites.len();
        self.sprites
            .retain(|_, sprite| !(sprite.phase == Phase::Exiting && sprite.tween.is_finished(now)));
        for sprite in self.sprites.values_mut() {
            if sprite.phase == Phase::Entering && sprite.tween.is_finished(now) {
                sprite.phase = Phase::Present;
            }
        }
        let sprites = &self.sprites;
        self.order.retain(|key| sprites.contains_key(key));
        before - self.sprites.len()
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.sprites.values().any(|sprite| !sprite.tween.is_finished(now))
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.order.clear();
    }
}
