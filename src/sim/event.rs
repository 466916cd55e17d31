/// Events emitted by round and tray operations.
/// The presentation layer turns these into toasts and sound cues.

use crate::domain::catalog::Icon;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    IconToggled { icon: Icon, selected: bool },
    SelectionRejected { selected: usize, min: usize, max: usize },
    RoundStarted { icons: usize },
    ItemLifted { index: usize },
    ItemDropped { from: usize, to: usize },
    MoveCancelled { index: usize },
    GuessScored { attempt: u32, correct: usize, total: usize },
    RoundWon { attempts: u32 },
    GameReset,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A user-facing message derived from an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl GameEvent {
    /// The toast this event should raise, if any.
    pub fn notice(&self) -> Option<Notice> {
        let (level, text) = match self {
            GameEvent::SelectionRejected { min, max, .. } => (
                NoticeLevel::Warning,
                format!("Please select between {min} and {max} icons"),
            ),
            GameEvent::GuessScored { correct, total, .. } if correct < total => (
                NoticeLevel::Info,
                format!("{correct} icons in correct position"),
            ),
            GameEvent::RoundWon { .. } => (
                NoticeLevel::Success,
                "Congratulations! You won! 🎉".to_string(),
            ),
            _ => return None,
        };
        Some(Notice { level, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_warns() {
        let n = GameEvent::SelectionRejected { selected: 2, min: 3, max: 7 }
            .notice()
            .expect("warning");
        assert_eq!(n.level, NoticeLevel::Warning);
        assert_eq!(n.text, "Please select between 3 and 7 icons");
    }

    #[test]
    fn partial_score_informs() {
        let n = GameEvent::GuessScored { attempt: 2, correct: 1, total: 4 }
            .notice()
            .expect("info");
        assert_eq!(n.level, NoticeLevel::Info);
        assert_eq!(n.text, "1 icons in correct position");
    }

    #[test]
    fn full_score_defers_to_win() {
        assert!(GameEvent::GuessScored { attempt: 1, correct: 3, total: 3 }.notice().is_none());
        let n = GameEvent::RoundWon { attempts: 1 }.notice().expect("success");
        assert_eq!(n.level, NoticeLevel::Success);
    }

    #[test]
    fn gestures_are_silent() {
        assert!(GameEvent::ItemLifted { index: 0 }.notice().is_none());
        assert!(GameEvent::ItemDropped { from: 0, to: 1 }.notice().is_none());
        assert!(GameEvent::GameReset.notice().is_none());
    }
}
