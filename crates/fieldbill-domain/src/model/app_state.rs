//! Application-wide state (theme and auth flags)
//!
//! Passed explicitly to whoever needs it and persisted through an
//! `AppStateStore`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = fieldbill_types::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(fieldbill_types::Error::Validation(format!(
                "unknown theme: {}",
                other
            ))),
        }
    }
}

/// Session flags mirrored from the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFlags {
    #[serde(default)]
    pub signed_in: bool,
    #[serde(default)]
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub auth: AuthFlags,
}

impl AppState {
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn sign_in(&mut self, email: impl Into<String>) {
        self.auth = AuthFlags {
            signed_in: true,
            user_email: Some(email.into()),
        };
    }

    pub fn sign_out(&mut self) {
        self.auth = AuthFlags::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_theme() {
        let mut state = AppState::default();
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(state.toggle_theme(), Theme::Dark);
        assert_eq!(state.toggle_theme(), Theme::Light);
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut state = AppState::default();
        state.sign_in("tech@example.com");
        assert!(state.auth.signed_in);
        assert_eq!(state.auth.user_email.as_deref(), Some("tech@example.com"));
        state.sign_out();
        assert_eq!(state.auth, AuthFlags::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let state: AppState = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(state.theme, Theme::Dark);
        assert!(!state.auth.signed_in);
    }

    #[test]
    fn test_empty_auth_object_loads() {
        let state: AppState =
            serde_json::from_str(r#"{"theme":"dark","auth":{}}"#).unwrap();
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.auth, AuthFlags::default());
    }
}
