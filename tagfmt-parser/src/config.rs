//! Compiler and loader configuration.

/// Template compiler configuration.
///
/// ```
/// use tagfmt_parser::config::{Config, Reload};
///
/// let conf = Config::default().with_tag("escape").with_reload(Reload::Always);
/// assert_eq!(conf.tag(), "escape");
/// assert_eq!(conf.label(), "template");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    tag: Box<str>,
    label: Box<str>,
    untagged: Vec<Box<str>>,
    templ_dir: Box<str>,
    reload: Reload,
}

impl Config {
    /// Environment variable read by [`Config::from_env`].
    pub const RELOAD_ENV: &str = "TAGFMT_RELOAD";

    /// Default config, with [`Reload`] overridden by `TAGFMT_RELOAD` if set.
    pub fn from_env() -> Self {
        let conf = Self::default();
        match std::env::var(Self::RELOAD_ENV) {
            Ok(value) => match Reload::from_name(&value) {
                Some(reload) => conf.with_reload(reload),
                None => {
                    tracing::warn!(value = %value, "unknown `{}` value, ignored", Self::RELOAD_ENV);
                    conf
                }
            },
            Err(_) => conf,
        }
    }

    /// Macro name that untagged templates are rewritten into.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Label marking the template body.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Macro names considered as untagged templates.
    pub fn untagged(&self) -> &[Box<str>] {
        &self.untagged
    }

    /// Directory relative template paths are resolved from.
    pub fn templ_dir(&self) -> &str {
        &self.templ_dir
    }

    pub fn reload(&self) -> &Reload {
        &self.reload
    }

    pub fn with_tag(mut self, tag: impl Into<Box<str>>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<Box<str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_untagged(mut self, untagged: impl IntoIterator<Item = impl Into<Box<str>>>) -> Self {
        self.untagged = untagged.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_templ_dir(mut self, templ_dir: impl Into<Box<str>>) -> Self {
        self.templ_dir = templ_dir.into();
        self
    }

    pub fn with_reload(mut self, reload: Reload) -> Self {
        self.reload = reload;
        self
    }

    /// Returns `true` if given macro name is an untagged template.
    pub fn is_untagged(&self, name: &str) -> bool {
        self.untagged.iter().any(|e| &**e == name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag: "html".into(),
            label: "template".into(),
            untagged: vec!["format".into()],
            templ_dir: "templates".into(),
            reload: Reload::default(),
        }
    }
}

// ===== Reload =====

/// Runtime template reload behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    /// [`Reload::Modified`] in debug build, [`Reload::Never`] in release build.
    Debug,
    /// Recompile when the file modification time changes.
    Modified,
    /// Recompile on every load.
    Always,
    /// Compile once.
    Never,
}

impl Default for Reload {
    fn default() -> Self {
        if cfg!(feature = "dev-reload") {
            Reload::Debug
        } else {
            Reload::Never
        }
    }
}

impl Reload {
    pub fn from_name(name: &str) -> Option<Reload> {
        match name.trim() {
            "debug" => Some(Reload::Debug),
            "modified" => Some(Reload::Modified),
            "always" => Some(Reload::Always),
            "never" => Some(Reload::Never),
            _ => None,
        }
    }

    /// Returns `true` if a cached template should be checked for modification.
    pub fn check_modified(&self) -> bool {
        match self {
            Reload::Debug => cfg!(debug_assertions),
            Reload::Modified | Reload::Always => true,
            Reload::Never => false,
        }
    }
}
