// SPDX-License-Identifier: MIT OR Apache-2.0
//! Model animation clip playback.
//!
//! [`AnimationMixer`] is the contract the timeline needs from the host's
//! skeletal/node animation system. [`ClipMixer`] implements it without any
//! scene graph: it only tracks per-clip playback heads, which is all the
//! timeline observes.

use indexmap::IndexMap;

/// A named animation clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    /// Clip name
    pub name: String,
    /// Clip length in seconds
    pub duration: f32,
    /// Names of the scene nodes the clip animates
    pub nodes: Vec<String>,
}

impl ClipInfo {
    /// Create clip info; negative durations become zero
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
            nodes: Vec::new(),
        }
    }

    /// Set the animated node names, deduplicated in first-seen order
    pub fn with_nodes<S: Into<String>>(mut self, nodes: impl IntoIterator<Item = S>) -> Self {
        self.nodes.clear();
        for node in nodes {
            let node = node.into();
            if !self.nodes.contains(&node) {
                self.nodes.push(node);
            }
        }
        self
    }
}

/// What happens when a clip reaches its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play once and hold the last frame
    Once,
    /// Wrap around forever
    #[default]
    Repeat,
}

/// Host animation mixer, addressed by clip index
pub trait AnimationMixer {
    /// Clips available on the loaded model
    fn clips(&self) -> Vec<ClipInfo>;

    /// Start (or restart after a stop) a clip
    fn play(&mut self, clip: usize);

    /// Set the paused flag of a clip
    fn set_paused(&mut self, clip: usize, paused: bool);

    /// Whether a clip is paused
    fn is_paused(&self, clip: usize) -> bool;

    /// Stop a clip and rewind it to zero
    fn stop(&mut self, clip: usize);

    /// Whether a clip is scheduled (playing or paused, not stopped)
    fn is_active(&self, clip: usize) -> bool;

    /// Whether a clip is scheduled and advancing
    fn is_running(&self, clip: usize) -> bool {
        self.is_active(clip) && !self.is_paused(clip)
    }

    /// Playback head of a clip in seconds
    fn time(&self, clip: usize) -> f32;

    /// Move the playback head of a clip
    fn set_time(&mut self, clip: usize, time: f32);

    /// Set the loop mode of a clip
    fn set_loop(&mut self, clip: usize, mode: LoopMode);

    /// Set the speed multiplier of a clip
    fn set_time_scale(&mut self, clip: usize, scale: f32);

    /// Advance all running clips by `delta_seconds`
    fn update(&mut self, delta_seconds: f32);
}

/// Playback state of one clip
#[derive(Debug, Clone, PartialEq)]
struct ClipAction {
    duration: f32,
    nodes: Vec<String>,
    time: f32,
    time_scale: f32,
    loop_mode: LoopMode,
    active: bool,
    paused: bool,
}

impl ClipAction {
    fn new(duration: f32, nodes: Vec<String>) -> Self {
        Self {
            duration,
            nodes,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Repeat,
            active: false,
            paused: false,
        }
    }

    fn advance(&mut self, delta: f32) {
        if !self.active || self.paused {
            return;
        }
        self.time += delta * self.time_scale;

        if self.duration <= 0.0 {
            self.time = 0.0;
            return;
        }

        match self.loop_mode {
            LoopMode::Repeat => {
                self.time = self.time.rem_euclid(self.duration);
            }
            LoopMode::Once => {
                // Clamp when finished: hold the end pose and pause
                if self.time >= self.duration {
                    self.time = self.duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
        }
    }
}

/// Scene-less mixer tracking one action per clip.
///
/// Clip names are made unique on insertion (`walk`, `walk#2`, ...) so
/// clips can also be looked up by name.
#[derive(Debug, Clone, Default)]
pub struct ClipMixer {
    actions: IndexMap<String, ClipAction>,
}

impl ClipMixer {
    /// Create a mixer with one looping action per clip
    pub fn new(clips: impl IntoIterator<Item = ClipInfo>) -> Self {
        let mut mixer = Self::default();
        for clip in clips {
            mixer.add_clip(clip);
        }
        mixer
    }

    /// Add a clip; returns its index
    pub fn add_clip(&mut self, clip: ClipInfo) -> usize {
        let mut name = if clip.name.is_empty() {
            format!("Clip {}", self.actions.len() + 1)
        } else {
            clip.name
        };
        if self.actions.contains_key(&name) {
            let base = name.clone();
            let mut n = 2;
            while self.actions.contains_key(&name) {
                name = format!("{base}#{n}");
                n += 1;
            }
        }
        let (index, _) = self.actions.insert_full(name, ClipAction::new(clip.duration, clip.nodes));
        index
    }

    /// Index of a clip by name
    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.actions.get_index_of(name)
    }

    fn action(&self, clip: usize) -> Option<&ClipAction> {
        self.actions.get_index(clip).map(|(_, a)| a)
    }

    fn action_mut(&mut self, clip: usize) -> Option<&mut ClipAction> {
        self.actions.get_index_mut(clip).map(|(_, a)| a)
    }
}

impl AnimationMixer for ClipMixer {
    fn clips(&self) -> Vec<ClipInfo> {
        self.actions
            .iter()
            .map(|(name, action)| ClipInfo::new(name.clone(), action.duration).with_nodes(action.nodes.iter().cloned()))
            .collect()
    }

    fn play(&mut self, clip: usize) {
        if let Some(action) = self.action_mut(clip) {
            action.active = true;
        }
    }

    fn set_paused(&mut self, clip: usize, paused: bool) {
        if let Some(action) = self.action_mut(clip) {
            action.paused = paused;
        }
    }

    fn is_paused(&self, clip: usize) -> bool {
        self.action(clip).is_some_and(|a| a.paused)
    }

    fn stop(&mut self, clip: usize) {
        if let Some(action) = self.action_mut(clip) {
            action.active = false;
            action.paused = false;
            action.time = 0.0;
        }
    }

    fn is_active(&self, clip: usize) -> bool {
        self.action(clip).is_some_and(|a| a.active)
    }

    fn time(&self, clip: usize) -> f32 {
        self.action(clip).map_or(0.0, |a| a.time)
    }

    fn set_time(&mut self, clip: usize, time: f32) {
        if let Some(action) = self.action_mut(clip) {
            action.time = time.clamp(0.0, action.duration);
        }
    }

    fn set_loop(&mut self, clip: usize, mode: LoopMode) {
        if let Some(action) = self.action_mut(clip) {
            action.loop_mode = mode;
        }
    }

    fn set_time_scale(&mut self, clip: usize, scale: f32) {
        if let Some(action) = self.action_mut(clip) {
            action.time_scale = scale;
        }
    }

    fn update(&mut self, delta_seconds: f32) {
        for action in self.actions.values_mut() {
            action.advance(delta_seconds);
        }
    }
}
