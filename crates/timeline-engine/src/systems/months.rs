use crate::components::section::{Section, END};
use crate::config::months::{MonthsConfig, Palette};

/// Start or stop the end-of-timeline arrow nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowToggle {
    Start,
    Stop,
}

/// An active-month change, with everything the palette transition needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTransition {
    pub from: Option<String>,
    pub to: String,
    pub palette: Palette,
    pub arrow: Option<ArrowToggle>,
}

/// Derives the active month from the rendered timeline offset.
#[derive(Debug, Clone, Default)]
pub struct MonthStateMachine {
    active: Option<String>,
    remaining: Vec<String>,
}

impl MonthStateMachine {
    /// Starts in `initial` (normally the first configured month) without a
    /// transition.
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            active: initial.map(str::to_string),
            remaining: Vec::new(),
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.as_deref() == Some(key)
    }

    /// Months whose trigger the timeline has passed, in configuration order.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    /// Every section whose trigger the offset is past is a candidate; the
    /// last candidate in configuration order wins. Returns a transition only
    /// when the winner differs from the current month.
    pub fn evaluate(&mut self, timeline_z: f32, sections: &[Section], months: &MonthsConfig) -> Option<MonthTransition> {
        let candidates: Vec<String> = sections
            .iter()
            .filter(|s| timeline_z > -s.trigger)
            .map(|s| s.key.clone())
            .collect();
        let next = candidates.last()?.clone();
        if self.active.as_deref() == Some(next.as_str()) {
            return None;
        }
        self.remaining = candidates;
        self.transition_to(next, months)
    }

    /// Make `key` active regardless of position, even if it already is.
    pub fn force(&mut self, key: &str, months: &MonthsConfig) -> Option<MonthTransition> {
        self.transition_to(key.to_string(), months)
    }

    fn transition_to(&mut self, to: String, months: &MonthsConfig) -> Option<MonthTransition> {
        let Some(entry) = months.get(&to) else {
            log::error!("no palette for month '{to}'");
            return None;
        };
        let from = self.active.replace(to.clone());

        let was_end = from.as_deref() == Some(END);
        let is_end = to == END;
        let arrow = match (was_end, is_end) {
            (false, true) => Some(ArrowToggle::Start),
            (true, false) => Some(ArrowToggle::Stop),
            _ => None,
        };

        log::debug!("active month: {} -> {to}", from.as_deref().unwrap_or("-"));
        Some(MonthTransition {
            from,
            to,
            palette: entry.palette(),
            arrow,
        })
    }
}
