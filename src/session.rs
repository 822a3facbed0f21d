// Per-user session: language preference and sign-in flag.
//
// Loaded once at startup and written back only after an explicit change.
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Mr];

    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिंदी",
            Language::Mr => "मराठी",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(skip)]
    dirty: bool,
}

impl Session {
    /// Read the session file. A missing file yields the default session
    /// (English, signed out).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no session file, using defaults");
            return Ok(Session::default());
        }
        let text = std::fs::read_to_string(path)?;
        let session: Session = serde_json::from_str(&text)?;
        info!(language = session.language.code(), authenticated = session.authenticated, "session loaded");
        Ok(session)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let s = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), s)?;
        self.dirty = false;
        Ok(())
    }

    /// Persist only when something changed since the last load/save.
    /// Returns whether a write happened.
    pub fn save_if_dirty(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(path)?;
        Ok(true)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            self.language = language;
            self.dirty = true;
        }
    }

    pub fn sign_in(&mut self) {
        if !self.authenticated {
            self.authenticated = true;
            self.dirty = true;
        }
    }

    pub fn sign_out(&mut self) {
        if self.authenticated {
            self.authenticated = false;
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_default_session() {
        let dir = tempfile::tempdir().unwrap();
        let s = Session::load(dir.path().join("session.json")).unwrap();
        assert_eq!(s.language, Language::En);
        assert!(!s.authenticated);
        assert!(!s.is_dirty());
    }

    #[test]
    fn save_only_after_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut s = Session::load(&path).unwrap();
        assert!(!s.save_if_dirty(&path).unwrap());
        assert!(!path.exists());

        s.set_language(Language::Mr);
        s.sign_in();
        assert!(s.save_if_dirty(&path).unwrap());
        assert!(!s.is_dirty());

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.language, Language::Mr);
        assert!(reloaded.authenticated);
    }

    #[test]
    fn setting_same_language_is_not_a_change() {
        let mut s = Session::default();
        s.set_language(Language::En);
        s.sign_out();
        assert!(!s.is_dirty());
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("HI"), Some(Language::Hi));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::Hi.display_name(), "हिंदी");
    }
}
