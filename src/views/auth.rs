use std::fmt;

use crate::service::identity::{derive_identity, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    Login,
    Register,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    LoginForm,
    RegisterForm,
    Profile { username: String, admin_link: bool },
}

/// What the slide-out account panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub title: &'static str,
    pub body: PanelBody,
    pub tabs_visible: bool,
    pub active_tab: Option<PanelTab>,
    pub admin_nav_visible: bool,
}

impl PanelView {
    pub fn login() -> Self {
        Self {
            title: "Login",
            body: PanelBody::LoginForm,
            tabs_visible: true,
            active_tab: Some(PanelTab::Login),
            admin_nav_visible: false,
        }
    }

    pub fn register() -> Self {
        Self {
            title: "Register",
            body: PanelBody::RegisterForm,
            tabs_visible: true,
            active_tab: Some(PanelTab::Register),
            admin_nav_visible: false,
        }
    }

    fn profile(identity: Identity) -> Self {
        Self {
            title: "Account",
            admin_nav_visible: identity.is_admin,
            body: PanelBody::Profile {
                username: identity.username,
                admin_link: identity.is_admin,
            },
            tabs_visible: false,
            active_tab: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.body, PanelBody::Profile { .. })
    }
}

/// The persistent header strip: greeting, logout button and admin nav.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub welcome: Option<String>,
    pub logout_visible: bool,
    pub admin_nav_visible: bool,
}

/// Profile view for a decodable token, the login tab otherwise.
pub fn render_panel_for_auth(token: Option<&str>) -> PanelView {
    match derive_identity(token) {
        Some(identity) => PanelView::profile(identity),
        None => PanelView::login(),
    }
}

/// A stored token that fails to decode still counts as signed in for the
/// header, greeted as the default user without admin affordances.
pub fn update_auth_ui(token: Option<&str>) -> HeaderView {
    let Some(token) = token else {
        return HeaderView {
            welcome: None,
            logout_visible: false,
            admin_nav_visible: false,
        };
    };
    let identity = derive_identity(Some(token)).unwrap_or(Identity {
        username: "user".to_string(),
        is_admin: false,
    });
    HeaderView {
        welcome: Some(format!("Welcome, {}", identity.username)),
        logout_visible: true,
        admin_nav_visible: identity.is_admin,
    }
}

#[derive(Debug, Clone)]
pub struct AuthPanel {
    open: bool,
    view: PanelView,
}

impl Default for AuthPanel {
    fn default() -> Self {
        Self {
            open: false,
            view: PanelView::login(),
        }
    }
}

impl AuthPanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    pub fn render(&mut self, token: Option<&str>) {
        self.view = render_panel_for_auth(token);
    }

    pub fn open(&mut self, token: Option<&str>) {
        self.render(token);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self, token: Option<&str>) {
        if self.open {
            self.close();
        } else {
            self.open(token);
        }
    }

    /// Tabs only switch while signed out.
    pub fn show_tab(&mut self, tab: PanelTab) {
        if self.view.is_authenticated() {
            return;
        }
        self.view = match tab {
            PanelTab::Login => PanelView::login(),
            PanelTab::Register => PanelView::register(),
        };
    }
}

impl fmt::Display for HeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.welcome {
            Some(welcome) => write!(f, "{}", welcome)?,
            None => write!(f, "Not signed in")?,
        }
        if self.admin_nav_visible {
            write!(f, "  [Admin]")?;
        }
        if self.logout_visible {
            write!(f, "  [Logout]")?;
        }
        Ok(())
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        match &self.body {
            PanelBody::LoginForm => write!(f, "Sign in with `login`, or create an account with `register`."),
            PanelBody::RegisterForm => write!(f, "Create an account with `register`."),
            PanelBody::Profile { username, admin_link } => {
                write!(f, "Signed in as {}", username)?;
                if *admin_link {
                    write!(f, "\nAdmin console available under `admin`.")?;
                }
                Ok(())
            }
        }
    }
}
