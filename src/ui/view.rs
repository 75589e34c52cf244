// Pure rendering of the navigator into a screen description; draw.rs paints it
use super::form::Form;
use super::state::{ClusterListing, Navigator, Screen, TokenOutcome};
use std::fmt;

const SELECTED_MARKER: &str = "➜ ";
const UNSELECTED_MARKER: &str = "  ";
const INPUT_CURSOR: char = '█';
const MASK: char = '•';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLine {
    /// Selectable row
    Item { text: String, selected: bool },
    Field {
        label: String,
        value: String,
        focused: bool,
    },
    Text(String),
    Error(String),
    Blank,
}

impl ViewLine {
    fn item(text: impl Into<String>, selected: bool) -> Self {
        ViewLine::Item {
            text: text.into(),
            selected,
        }
    }

    /// Plain-text rendering of the line
    pub fn plain(&self) -> String {
        match self {
            ViewLine::Item { text, selected } => {
                let marker = if *selected {
                    SELECTED_MARKER
                } else {
                    UNSELECTED_MARKER
                };
                format!("{}{}", marker, text)
            }
            ViewLine::Field {
                label,
                value,
                focused,
            } => {
                let marker = if *focused { "➜" } else { " " };
                format!("{} {}: {}", marker, label, value)
            }
            ViewLine::Text(text) => text.clone(),
            ViewLine::Error(message) => format!("[ERROR] {}", message),
            ViewLine::Blank => String::new(),
        }
    }
}

/// Everything shown for one screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub title: String,
    pub lines: Vec<ViewLine>,
    pub hint: String,
    pub notice: Option<String>,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", self.title)?;
        for line in &self.lines {
            writeln!(f, "{}", line.plain())?;
        }
        if let Some(notice) = &self.notice {
            writeln!(f, "\n{}", notice)?;
        }
        write!(f, "\n{}", self.hint)
    }
}

/// Selectable rows; the highlight is clamped into range
fn menu<I, S>(labels: I, cursor: usize) -> Vec<ViewLine>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    let selected = cursor.min(labels.len().saturating_sub(1));
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| ViewLine::item(label, i == selected))
        .collect()
}

fn field_value(value: &str, masked: bool, cursor: Option<usize>) -> String {
    let mut chars: Vec<char> = if masked {
        value.chars().map(|_| MASK).collect()
    } else {
        value.chars().collect()
    };
    if let Some(at) = cursor {
        chars.insert(at.min(chars.len()), INPUT_CURSOR);
    }
    chars.into_iter().collect()
}

fn form_lines(form: &Form) -> Vec<ViewLine> {
    form.fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus();
            ViewLine::Field {
                label: field.label().to_string(),
                value: field_value(
                    field.value(),
                    field.is_masked(),
                    focused.then(|| field.cursor()),
                ),
                focused,
            }
        })
        .collect()
}

pub fn render(nav: &Navigator) -> View {
    let document = nav.document();
    let profile_name = |index: usize| {
        document
            .get(index)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "<unknown>".to_string())
    };
    let profile_names = || document.iter().map(|p| p.name.clone());

    let (title, lines, hint) = match nav.screen() {
        Screen::MainMenu { cursor } => (
            "Camunda CLI - Main Menu".to_string(),
            menu(
                profile_names().chain(
                    ["Add new platform", "Manage platforms", "Quit"]
                        .into_iter()
                        .map(String::from),
                ),
                *cursor,
            ),
            "↑/↓: Move | Enter: Select | q: Quit",
        ),
        Screen::EditProfile { form, target } => (
            if target.is_some() {
                "Edit Platform"
            } else {
                "Add New Platform"
            }
            .to_string(),
            form_lines(form),
            "Tab/Enter: Next field | Enter on last field: Save | Esc: Cancel",
        ),
        Screen::AcquiringToken { profile, .. } => (
            "Access Token".to_string(),
            vec![ViewLine::Text(format!(
                "Acquiring token for '{}'...",
                profile_name(*profile)
            ))],
            "q: Quit",
        ),
        Screen::ShowToken { outcome, .. } => {
            let lines = match outcome {
                TokenOutcome::Token(token) => vec![
                    ViewLine::Text("Access token:".to_string()),
                    ViewLine::Blank,
                    ViewLine::Text(token.as_str().to_string()),
                ],
                TokenOutcome::Failed(message) => vec![ViewLine::Error(message.clone())],
            };
            (
                "Access Token".to_string(),
                lines,
                "Press any key to list clusters.",
            )
        }
        Screen::ListClusters {
            profile,
            cursor,
            listing,
            ..
        } => {
            let lines = match listing {
                ClusterListing::Loading => vec![ViewLine::Text("Loading...".to_string())],
                ClusterListing::Failed(message) => vec![ViewLine::Error(message.clone())],
                ClusterListing::Loaded(clusters) if clusters.is_empty() => {
                    vec![ViewLine::Text("No clusters found.".to_string())]
                }
                ClusterListing::Loaded(clusters) => {
                    menu(clusters.iter().map(|c| c.display_name()), *cursor)
                }
            };
            (
                format!("Clusters on '{}'", profile_name(*profile)),
                lines,
                "↑/↓: Move | q/Esc: Back to main menu",
            )
        }
        Screen::ManageMenu { cursor } => (
            "Manage Platforms".to_string(),
            menu(profile_names().chain(Some("Back".to_string())), *cursor),
            "Enter: Edit/Delete | Esc: Back",
        ),
        Screen::EditOrDelete { profile, cursor } => (
            format!("Platform: {}", profile_name(*profile)),
            menu(["Edit platform", "Delete platform"], *cursor),
            "Enter: Select | Esc: Back",
        ),
        Screen::ConfirmDelete { profile } => (
            "Delete Platform".to_string(),
            vec![ViewLine::Text(format!(
                "Delete platform '{}'? (y/N)",
                profile_name(*profile)
            ))],
            "y: Delete | any other key: Cancel",
        ),
        Screen::Quit => ("Bye!".to_string(), Vec::new(), ""),
    };

    View {
        title,
        lines,
        hint: hint.to_string(),
        notice: nav.notice().map(str::to_string),
    }
}
