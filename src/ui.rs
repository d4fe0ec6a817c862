//! HUD and overlay seam
//!
//! The session never touches the DOM. It queues [`GameEvent`]s; [`dispatch`]
//! routes them to a [`Frontend`] and an [`AudioSink`] after each frame.

use crate::audio::AudioSink;
use crate::sim::{GameEvent, HudSnapshot};

pub use crate::sim::Panel;

/// Whatever displays the HUD and overlay panels
pub trait Frontend {
    fn set_hud(&mut self, hud: &HudSnapshot);
    fn show_panel(&mut self, panel: Panel);
    fn hide_panel(&mut self, panel: Panel);
    fn set_level_title(&mut self, title: &str);
    fn set_final_score(&mut self, score: u64);
}

/// Route drained events to their collaborators, in order
pub fn dispatch(
    events: impl IntoIterator<Item = GameEvent>,
    frontend: &mut dyn Frontend,
    audio: &mut dyn AudioSink,
) {
    for event in events {
        match event {
            GameEvent::Sound(cue) => audio.play(cue),
            GameEvent::ShowPanel(panel) => frontend.show_panel(panel),
            GameEvent::HidePanel(panel) => frontend.hide_panel(panel),
            GameEvent::LevelTitle(title) => frontend.set_level_title(&title),
            GameEvent::FinalScore(score) => frontend.set_final_score(score),
            GameEvent::Hud(hud) => frontend.set_hud(&hud),
        }
    }
}

/// Frontend that keeps the latest values, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct TextFrontend {
    pub hud: Option<HudSnapshot>,
    pub visible: Vec<Panel>,
    pub level_title: String,
    pub final_score: Option<u64>,
}

impl TextFrontend {
    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }
}

impl Frontend for TextFrontend {
    fn set_hud(&mut self, hud: &HudSnapshot) {
        self.hud = Some(*hud);
    }

    fn show_panel(&mut self, panel: Panel) {
        if !self.is_visible(panel) {
            self.visible.push(panel);
        }
    }

    fn hide_panel(&mut self, panel: Panel) {
        self.visible.retain(|p| *p != panel);
    }

    fn set_level_title(&mut self, title: &str) {
        self.level_title = title.to_string();
    }

    fn set_final_score(&mut self, score: u64) {
        self.final_score = Some(score);
        log::info!("Final score: {score}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SoundCue;

    #[derive(Default)]
    struct Recorder(Vec<SoundCue>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.push(cue);
        }
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut frontend = TextFrontend::default();
        let mut audio = Recorder::default();
        let hud = HudSnapshot {
            score: 200,
            level: 2,
            enemies_left: 13,
            health_percent: 80.0,
        };
        dispatch(
            vec![
                GameEvent::LevelTitle("LEVEL 2".into()),
                GameEvent::ShowPanel(Panel::LevelBanner),
                GameEvent::Sound(SoundCue::Hit),
                GameEvent::Hud(hud),
                GameEvent::HidePanel(Panel::LevelBanner),
                GameEvent::Sound(SoundCue::LevelUp),
            ],
            &mut frontend,
            &mut audio,
        );
        assert_eq!(frontend.level_title, "LEVEL 2");
        assert!(!frontend.is_visible(Panel::LevelBanner));
        assert_eq!(frontend.hud, Some(hud));
        assert_eq!(audio.0, vec![SoundCue::Hit, SoundCue::LevelUp]);
    }

    #[test]
    fn test_game_over_panel() {
        let mut frontend = TextFrontend::default();
        let mut audio = Recorder::default();
        dispatch(
            vec![
                GameEvent::FinalScore(1200),
                GameEvent::ShowPanel(Panel::GameOver),
                GameEvent::ShowPanel(Panel::GameOver),
            ],
            &mut frontend,
            &mut audio,
        );
        assert_eq!(frontend.final_score, Some(1200));
        assert_eq!(frontend.visible, vec![Panel::GameOver]);
    }
}
