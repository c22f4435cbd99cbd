//! Result renderer: schools to cards, views to terminal text.

use serde::Serialize;

use crate::messages;
use crate::schools::model::School;
use crate::session::state::{Panel, ViewState};

/// Display model for one recommended school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolCard {
    pub title: String,
    pub description: String,
    pub reason: String,
    pub specialties: Vec<String>,
}

impl From<&School> for SchoolCard {
    fn from(school: &School) -> Self {
        Self {
            title: school.name.clone(),
            description: school.description.clone(),
            reason: school.reason.clone(),
            specialties: school.specialties.clone(),
        }
    }
}

impl SchoolCard {
    fn to_text(&self, position: usize) -> String {
        let mut lines = vec![format!("{position}. {}", self.title)];
        if !self.description.is_empty() {
            lines.push(format!("   {}", self.description));
        }
        if !self.reason.is_empty() {
            lines.push(format!("   {}: {}", messages::REASON_LABEL, self.reason));
        }
        if !self.specialties.is_empty() {
            lines.push(format!(
                "   {}: {}",
                messages::SPECIALTIES_LABEL,
                self.specialties.join(", ")
            ));
        }
        lines.join("\n")
    }
}

/// One card per school, same order.
pub fn render_cards(schools: &[School]) -> Vec<SchoolCard> {
    schools.iter().map(SchoolCard::from).collect()
}

/// Render a view as plain terminal text.
pub fn render_view(view: &ViewState) -> String {
    let mut out = match &view.panel {
        Panel::Welcome => format!("{}\n{}", messages::WELCOME_TITLE, messages::WELCOME_BODY),
        Panel::Loading => messages::LOADING.to_string(),
        Panel::Error { message } => format!("⚠ {message}"),
        Panel::Results { schools } => {
            let cards = render_cards(schools)
                .iter()
                .enumerate()
                .map(|(i, card)| card.to_text(i + 1))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!(
                "{}\n\n{}\n\n{}",
                messages::RESULTS_HEADING,
                cards,
                messages::RESULTS_DISCLAIMER
            )
        }
        Panel::Empty => format!("{}\n{}", messages::EMPTY_TITLE, messages::EMPTY_BODY),
    };

    if view.show_reset {
        out.push_str(&format!("\n\n[{}]", messages::RESET_ACTION));
    }
    out
}
