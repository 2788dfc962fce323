//! Compiled template cache.
use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::SystemTime,
};
use tagfmt_parser::{
    common::path,
    config::{Config, Reload},
};

use crate::{Context, Globals, Result, Template};

/// Load templates from files, compiling each file once.
///
/// A cached template is recompiled according to [`Config::reload`]:
///
/// - [`Reload::Always`], every [`Loader::load`] recompiles
/// - [`Reload::Modified`], recompile when the file modification time changes
/// - [`Reload::Debug`], same as [`Reload::Modified`] in debug build, otherwise never
/// - [`Reload::Never`], compile once
///
/// Relative paths are resolved from [`Config::templ_dir`].
pub struct Loader {
    conf: Config,
    globals: Globals,
    cache: RefCell<HashMap<PathBuf, Entry>>,
}

struct Entry {
    modified: Option<SystemTime>,
    templ: Rc<Template>,
}

impl Loader {
    pub fn new(conf: Config) -> Self {
        Self {
            globals: Globals::with_tag(conf.tag()),
            conf,
            cache: RefCell::default(),
        }
    }

    /// Ambient scope for every loaded template.
    pub fn with_globals(mut self, globals: Globals) -> Self {
        self.globals = globals;
        self.clear();
        self
    }

    pub fn config(&self) -> &Config {
        &self.conf
    }

    /// Cache key of a template path.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path::resolve_at(path, self.conf.templ_dir());
        Ok(fs::canonicalize(path)?)
    }

    /// Get compiled template, compiling it if needed.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Rc<Template>> {
        let path = self.resolve(path)?;

        if let Some(templ) = self.cached(&path)? {
            tracing::trace!(path = %path.display(), "template cache hit");
            return Ok(templ);
        }

        // read time before source, a write in between is picked up by the next load
        let modified = fs::metadata(&path)?.modified().ok();
        let source = fs::read_to_string(&path)?;
        let templ = Template::compile_with(&source, &self.conf)?.with_globals(self.globals.clone());
        let templ = Rc::new(templ);

        tracing::debug!(path = %path.display(), "template compiled");

        self.cache.borrow_mut().insert(path, Entry { modified, templ: templ.clone() });
        Ok(templ)
    }

    fn cached(&self, path: &Path) -> Result<Option<Rc<Template>>> {
        let reload = self.conf.reload();
        if let Reload::Always = reload {
            return Ok(None);
        }

        let cache = self.cache.borrow();
        let Some(entry) = cache.get(path) else {
            return Ok(None);
        };
        if reload.check_modified() && fs::metadata(path)?.modified().ok() != entry.modified {
            tracing::debug!(path = %path.display(), "template modified");
            return Ok(None);
        }
        Ok(Some(entry.templ.clone()))
    }

    /// Load and render template.
    pub fn render(&self, path: impl AsRef<Path>, ctx: &Context) -> Result<String> {
        self.load(path)?.render(ctx)
    }

    /// Remove template from cache, returns `true` if it was cached.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = self.resolve(path)?;
        Ok(self.cache.borrow_mut().remove(&path).is_some())
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(Config::from_env())
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("conf", &self.conf)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
