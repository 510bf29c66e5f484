//! Tera-backed template host.
//!
//! Loads `.twig` files from an ordered list of theme directories at
//! construction time. Earlier directories win name collisions (a child
//! theme shadows its parent), and the loaded set is a fixed snapshot, so
//! resolution stays a pure function of the template name for the life of
//! the host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tera::Tera;

use crate::constants::TEMPLATE_EXT;
use crate::context::RequestContext;
use crate::platform::TemplateHost;

/// Template host rendering `.twig` files through [`tera`].
pub struct TeraHost {
    tera: Tera,
}

impl TeraHost {
    /// Load every `.twig` file under each of `theme_dirs`, in order.
    ///
    /// Template names are paths relative to their theme directory (e.g.
    /// `woocommerce/single-product.twig`). When two directories provide
    /// the same name, the earlier directory's file is kept.
    ///
    /// # Errors
    ///
    /// Fails when a directory cannot be read or a template fails to parse.
    pub fn new<I, P>(theme_dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut tera = Tera::default();

        for dir in theme_dirs {
            let dir = dir.as_ref();
            let pattern = format!("{}/**/*{}", dir.display(), TEMPLATE_EXT);
            let layer = Tera::parse(&pattern)
                .with_context(|| format!("failed to load templates from {}", dir.display()))?;

            // extend() only adds names not already present, so earlier
            // directories shadow later ones.
            tera.extend(&layer)
                .with_context(|| format!("failed to merge templates from {}", dir.display()))?;
        }

        tera.build_inheritance_chains()
            .context("failed to link template inheritance")?;

        tracing::debug!(
            templates = tera.get_template_names().count(),
            "template host ready"
        );

        Ok(Self { tera })
    }

    /// Convenience constructor for a single theme directory.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new([dir.into()])
    }

    /// Names of every loaded template.
    pub fn template_names(&self) -> Vec<&str> {
        self.tera.get_template_names().collect()
    }
}

impl TemplateHost for TeraHost {
    fn locate(&self, relative_name: &str) -> Option<String> {
        self.tera
            .get_template_names()
            .any(|name| name == relative_name)
            .then(|| relative_name.to_string())
    }

    fn render(&self, name: &str, context: &RequestContext) -> Result<String> {
        let engine_context = tera::Context::from_serialize(context)
            .with_context(|| format!("failed to serialize context for '{name}'"))?;

        self.tera
            .render(name, &engine_context)
            .with_context(|| format!("failed to render '{name}'"))
    }
}
