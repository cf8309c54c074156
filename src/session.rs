//! Game session
//!
//! One `GameSession` is created in `main` and passed by reference into
//! scene setup and the frame update. It tracks which scene is active,
//! which scene the current level's exit leads to, and any transition
//! requested this frame. Scene names are validated against the
//! registered roster; assigning an unknown name is a silent no-op, which
//! is also the only failure mode a bad transition request has.

/// Every scene the game can show, in presentation order.
pub const SCENES: &[&str] = &["start", "controls", "level-1", "level-2", "level-3", "end"];

/// The scene a fresh session starts on.
pub const FIRST_SCENE: &str = "start";

pub struct GameSession {
    scenes: Vec<String>,
    current_scene: String,
    next_scene: String,
    /// Transition requested this frame, honored at frame end.
    pending: Option<String>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            scenes: SCENES.iter().map(|s| s.to_string()).collect(),
            current_scene: FIRST_SCENE.to_string(),
            next_scene: String::new(),
            pending: None,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.scenes.iter().any(|s| s == name)
    }

    pub fn current_scene(&self) -> &str {
        &self.current_scene
    }

    /// Where the active level's exit leads. Empty until a level sets it.
    pub fn next_scene(&self) -> &str {
        &self.next_scene
    }

    /// Record the active scene. Unregistered names are ignored.
    pub fn set_current_scene(&mut self, name: &str) {
        if self.is_registered(name) {
            self.current_scene = name.to_string();
        }
    }

    /// Record the exit destination. Unregistered names are ignored.
    pub fn set_next_scene(&mut self, name: &str) {
        if self.is_registered(name) {
            self.next_scene = name.to_string();
        }
    }

    /// Ask for a transition at the end of this frame. Unregistered names
    /// are ignored, leaving any earlier request in place.
    pub fn request_scene(&mut self, name: &str) {
        if self.is_registered(name) {
            self.pending = Some(name.to_string());
        }
    }

    /// Restart the scene we are currently in (death, falling out of the
    /// level).
    pub fn request_restart(&mut self) {
        let current = self.current_scene.clone();
        self.request_scene(&current);
    }

    /// Take the pending transition, if any. Called once per frame.
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
