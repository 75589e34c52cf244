// Navigation state machine: applies events to the current screen and emits effects
use super::form::Form;
use crate::config::Document;
use crate::models::{AccessToken, Cluster, Profile};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub type RequestId = u64;

/// Rows after the profile list on the main menu: add, manage, quit
const MAIN_MENU_EXTRA_ROWS: usize = 2;

/// Input delivered to the state machine, one at a time
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    TokenAcquired {
        request: RequestId,
        result: Result<AccessToken, String>,
    },
    ClustersFetched {
        request: RequestId,
        result: Result<Vec<Cluster>, String>,
    },
    /// Writing the document failed
    StorageFailed(String),
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AcquireToken {
        request: RequestId,
        profile: Profile,
    },
    FetchClusters {
        request: RequestId,
        base_url: String,
        token: AccessToken,
    },
    /// Flush the document to storage
    Persist,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenOutcome {
    Token(AccessToken),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClusterListing {
    Loading,
    Loaded(Vec<Cluster>),
    Failed(String),
}

impl ClusterListing {
    pub fn clusters(&self) -> &[Cluster] {
        match self {
            ClusterListing::Loaded(clusters) => clusters,
            _ => &[],
        }
    }
}

/// Current screen. Each variant carries only what that screen needs;
/// `profile` is an index into the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    MainMenu {
        cursor: usize,
    },
    /// Add (`target: None`) or edit an existing profile
    EditProfile {
        form: Form,
        target: Option<usize>,
    },
    AcquiringToken {
        profile: usize,
        request: RequestId,
    },
    ShowToken {
        profile: usize,
        outcome: TokenOutcome,
    },
    ListClusters {
        profile: usize,
        request: RequestId,
        cursor: usize,
        listing: ClusterListing,
    },
    ManageMenu {
        cursor: usize,
    },
    EditOrDelete {
        profile: usize,
        cursor: usize,
    },
    ConfirmDelete {
        profile: usize,
    },
    Quit,
}

type Transition = (Screen, Vec<Effect>);

fn stay(screen: Screen) -> Transition {
    (screen, Vec::new())
}

fn cursor_up(cursor: usize) -> usize {
    cursor.saturating_sub(1)
}

fn cursor_down(cursor: usize, max: usize) -> usize {
    cursor.saturating_add(1).min(max)
}

fn is_up(key: &KeyEvent) -> bool {
    key.code == KeyCode::Up
}

fn is_down(key: &KeyEvent) -> bool {
    key.code == KeyCode::Down
}

fn list_clusters_key(
    profile: usize,
    request: RequestId,
    cursor: usize,
    listing: ClusterListing,
    key: KeyEvent,
) -> Transition {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
        return stay(Screen::MainMenu { cursor: 0 });
    }
    let max = listing.clusters().len().saturating_sub(1);
    let cursor = if is_up(&key) {
        cursor_up(cursor)
    } else if is_down(&key) {
        cursor_down(cursor, max)
    } else {
        cursor.min(max)
    };
    stay(Screen::ListClusters {
        profile,
        request,
        cursor,
        listing,
    })
}

/// Owns the profile document and the session state of the running tool
#[derive(Debug, Clone)]
pub struct Navigator {
    document: Document,
    screen: Screen,
    notice: Option<String>,
    next_request: RequestId,
}

impl Navigator {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            screen: Screen::MainMenu { cursor: 0 },
            notice: None,
            next_request: 1,
        }
    }

    /// Start with a one-shot message shown on the first screen
    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }

    /// Cursor of the current screen, if it has one
    pub fn cursor(&self) -> Option<usize> {
        match &self.screen {
            Screen::MainMenu { cursor }
            | Screen::ManageMenu { cursor }
            | Screen::EditOrDelete { cursor, .. }
            | Screen::ListClusters { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    /// Highest valid cursor value for the current screen
    pub fn cursor_bound(&self) -> Option<usize> {
        let count = self.document.len();
        match &self.screen {
            Screen::MainMenu { .. } => Some(count + MAIN_MENU_EXTRA_ROWS),
            Screen::ManageMenu { .. } => Some(count),
            Screen::EditOrDelete { .. } => Some(1),
            Screen::ListClusters { listing, .. } => {
                Some(listing.clusters().len().saturating_sub(1))
            }
            _ => None,
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        if self.should_quit() {
            return Vec::new();
        }

        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return Vec::new();
                }
                self.notice = None;
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    tracing::info!("Ctrl+C pressed - exiting");
                    self.screen = Screen::Quit;
                    return Vec::new();
                }
                self.handle_key(key)
            }
            Event::TokenAcquired { request, result } => {
                self.on_token(request, result);
                Vec::new()
            }
            Event::ClustersFetched { request, result } => {
                self.on_clusters(request, result);
                Vec::new()
            }
            Event::StorageFailed(message) => {
                self.notice = Some(format!("Could not save platforms: {}", message));
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let screen = std::mem::replace(&mut self.screen, Screen::Quit);
        let (next, effects) = match screen {
            Screen::MainMenu { cursor } => self.main_menu_key(cursor, key),
            Screen::EditProfile { form, target } => self.edit_profile_key(form, target, key),
            Screen::AcquiringToken { profile, request } => match key.code {
                KeyCode::Char('q') => stay(Screen::Quit),
                _ => stay(Screen::AcquiringToken { profile, request }),
            },
            Screen::ShowToken { profile, outcome } => self.start_cluster_fetch(profile, outcome),
            Screen::ListClusters {
                profile,
                request,
                cursor,
                listing,
            } => list_clusters_key(profile, request, cursor, listing, key),
            Screen::ManageMenu { cursor } => self.manage_menu_key(cursor, key),
            Screen::EditOrDelete { profile, cursor } => {
                self.edit_or_delete_key(profile, cursor, key)
            }
            Screen::ConfirmDelete { profile } => self.confirm_delete_key(profile, key),
            Screen::Quit => stay(Screen::Quit),
        };
        self.screen = next;
        debug_assert!(self.cursor() <= self.cursor_bound(), "cursor out of range");
        effects
    }

    fn next_request(&mut self) -> RequestId {
        let id = self.next_request;
        self.next_request += 1;
        id
    }

    fn main_menu_key(&mut self, cursor: usize, key: KeyEvent) -> Transition {
        let count = self.document.len();
        let max = count + MAIN_MENU_EXTRA_ROWS;
        let cursor = cursor.min(max);

        if is_up(&key) {
            return stay(Screen::MainMenu {
                cursor: cursor_up(cursor),
            });
        }
        if is_down(&key) {
            return stay(Screen::MainMenu {
                cursor: cursor_down(cursor, max),
            });
        }

        match key.code {
            KeyCode::Char('q') => stay(Screen::Quit),
            KeyCode::Enter if cursor == count => stay(Screen::EditProfile {
                form: Form::blank(),
                target: None,
            }),
            KeyCode::Enter if cursor == count + 1 => stay(Screen::ManageMenu { cursor: 0 }),
            KeyCode::Enter if cursor == count + 2 => stay(Screen::Quit),
            KeyCode::Enter => self.start_token_request(cursor),
            _ => stay(Screen::MainMenu { cursor }),
        }
    }

    fn start_token_request(&mut self, index: usize) -> Transition {
        let Some(profile) = self.document.get(index).cloned() else {
            return stay(Screen::MainMenu { cursor: 0 });
        };
        let request = self.next_request();
        tracing::debug!("Token request {} for profile '{}'", request, profile.name);
        (
            Screen::AcquiringToken {
                profile: index,
                request,
            },
            vec![Effect::AcquireToken { request, profile }],
        )
    }

    fn start_cluster_fetch(&mut self, index: usize, outcome: TokenOutcome) -> Transition {
        let Some(profile) = self.document.get(index) else {
            return stay(Screen::MainMenu { cursor: 0 });
        };
        let base_url = profile.base_url.clone();
        // Without a token the fetch still runs and reports the server's refusal
        let token = match outcome {
            TokenOutcome::Token(token) => token,
            TokenOutcome::Failed(_) => AccessToken::default(),
        };
        let request = self.next_request();
        tracing::debug!("Cluster request {} against {}", request, base_url);
        (
            Screen::ListClusters {
                profile: index,
                request,
                cursor: 0,
                listing: ClusterListing::Loading,
            },
            vec![Effect::FetchClusters {
                request,
                base_url,
                token,
            }],
        )
    }

    fn edit_profile_key(&mut self, mut form: Form, target: Option<usize>, key: KeyEvent) -> Transition {
        match key.code {
            KeyCode::Esc => return stay(Screen::MainMenu { cursor: 0 }),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Enter if form.is_last_focused() => return self.save_form(&form, target),
            KeyCode::Enter => form.focus_next(),
            _ => {
                form.edit_focused(key);
            }
        }
        stay(Screen::EditProfile { form, target })
    }

    fn save_form(&mut self, form: &Form, target: Option<usize>) -> Transition {
        let profile = form.to_profile();
        match target {
            Some(index) if index < self.document.len() => {
                tracing::info!("Updating platform '{}' at {}", profile.name, index);
                self.document.replace(index, profile);
            }
            _ => {
                tracing::info!("Adding platform '{}'", profile.name);
                self.document.push(profile);
            }
        }
        (Screen::MainMenu { cursor: 0 }, vec![Effect::Persist])
    }

    fn manage_menu_key(&mut self, cursor: usize, key: KeyEvent) -> Transition {
        let count = self.document.len();
        let cursor = cursor.min(count);

        if is_up(&key) {
            return stay(Screen::ManageMenu {
                cursor: cursor_up(cursor),
            });
        }
        if is_down(&key) {
            return stay(Screen::ManageMenu {
                cursor: cursor_down(cursor, count),
            });
        }

        match key.code {
            KeyCode::Esc => stay(Screen::MainMenu { cursor: 0 }),
            KeyCode::Enter if cursor == count => stay(Screen::MainMenu { cursor: 0 }),
            KeyCode::Enter => stay(Screen::EditOrDelete {
                profile: cursor,
                cursor: 0,
            }),
            _ => stay(Screen::ManageMenu { cursor }),
        }
    }

    fn edit_or_delete_key(&mut self, profile: usize, cursor: usize, key: KeyEvent) -> Transition {
        if is_up(&key) {
            return stay(Screen::EditOrDelete {
                profile,
                cursor: cursor_up(cursor),
            });
        }
        if is_down(&key) {
            return stay(Screen::EditOrDelete {
                profile,
                cursor: cursor_down(cursor, 1),
            });
        }

        match key.code {
            KeyCode::Esc => stay(Screen::ManageMenu { cursor: 0 }),
            KeyCode::Enter if cursor == 0 => match self.document.get(profile) {
                Some(existing) => stay(Screen::EditProfile {
                    form: Form::from_profile(existing),
                    target: Some(profile),
                }),
                None => stay(Screen::ManageMenu { cursor: 0 }),
            },
            KeyCode::Enter => stay(Screen::ConfirmDelete { profile }),
            _ => stay(Screen::EditOrDelete { profile, cursor }),
        }
    }

    fn confirm_delete_key(&mut self, profile: usize, key: KeyEvent) -> Transition {
        if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            return stay(Screen::ManageMenu { cursor: 0 });
        }
        match self.document.remove(profile) {
            Some(removed) => {
                tracing::info!("Deleted platform '{}'", removed.name);
                (Screen::ManageMenu { cursor: 0 }, vec![Effect::Persist])
            }
            None => stay(Screen::ManageMenu { cursor: 0 }),
        }
    }

    fn on_token(&mut self, request: RequestId, result: Result<AccessToken, String>) {
        match &self.screen {
            Screen::AcquiringToken {
                profile,
                request: expected,
            } if *expected == request => {
                let outcome = match result {
                    Ok(token) => TokenOutcome::Token(token),
                    Err(message) => TokenOutcome::Failed(message),
                };
                self.screen = Screen::ShowToken {
                    profile: *profile,
                    outcome,
                };
            }
            _ => tracing::debug!("Dropping stale token result {}", request),
        }
    }

    fn on_clusters(&mut self, request: RequestId, result: Result<Vec<Cluster>, String>) {
        match &mut self.screen {
            Screen::ListClusters {
                request: expected,
                cursor,
                listing,
                ..
            } if *expected == request => match result {
                Ok(clusters) => {
                    *listing = ClusterListing::Loaded(clusters);
                    *cursor = 0;
                }
                Err(message) => {
                    *listing = ClusterListing::Failed(message);
                    *cursor = 0;
                }
            },
            _ => tracing::debug!("Dropping stale cluster result {}", request),
        }
    }
}
