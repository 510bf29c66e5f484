//! Override template resolution.
//!
//! The storefront plugin asks for templates by logical name
//! (`single-product.php`, or a slug/variant pair like
//! `content-product` / `grid`). The resolver transforms that name into a
//! theme override name - subfolder prefix plus the engine's file
//! extension - and asks the template host whether the file exists.
//!
//! "Not found" is a first-class outcome, not an error: the caller falls
//! back to the default template and renders exactly as if the bridge were
//! absent. Nothing is cached between calls; for a fixed host snapshot and
//! configuration, resolution is a pure function of the input name.

use crate::constants::{DEFAULT_TEMPLATE_EXT, TEMPLATE_EXT};
use crate::models::TermRecord;
use crate::platform::TemplateHost;

/// Outcome of a template interception.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateDecision {
    /// An override was found and rendered; the caller must skip its own
    /// rendering. Carries the engine output.
    Rendered(String),
    /// No override exists; the caller renders its original default
    /// template, returned unchanged.
    Default(String),
}

impl TemplateDecision {
    /// Whether an override was rendered.
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

/// Transforms logical template names and checks the theme for overrides.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    /// Subfolder prefix, normalized to end in exactly one `/` (or empty).
    subfolder: String,
}

impl TemplateResolver {
    /// Create a resolver searching under `subfolder` inside the theme's
    /// template directory. Trailing slashes are normalized; an empty
    /// subfolder searches the theme root.
    pub fn new(subfolder: &str) -> Self {
        let trimmed = subfolder.trim_end_matches('/');
        let subfolder = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };

        Self { subfolder }
    }

    /// The normalized subfolder prefix.
    pub fn subfolder(&self) -> &str {
        &self.subfolder
    }

    /// Resolve a logical template name (`single-product.php`) to an
    /// existing override, or `None` when the theme has no override.
    pub fn resolve(&self, host: &dyn TemplateHost, logical_name: &str) -> Option<String> {
        let search = format!("{}{}", self.subfolder, Self::swap_extension(logical_name));
        let found = host.locate(&search);

        tracing::debug!(
            logical = logical_name,
            search = %search,
            hit = found.is_some(),
            "template lookup"
        );

        found
    }

    /// Resolve a slug/variant template part (`content-product` / `grid`
    /// searches `content-product-grid.twig`). An empty variant searches
    /// the bare slug.
    pub fn resolve_part(
        &self,
        host: &dyn TemplateHost,
        slug: &str,
        variant: &str,
    ) -> Option<String> {
        let stem = if variant.is_empty() {
            slug.to_string()
        } else {
            format!("{slug}-{variant}")
        };
        let search = format!("{}{}{}", self.subfolder, stem, TEMPLATE_EXT);
        let found = host.locate(&search);

        tracing::debug!(slug, variant, search = %search, hit = found.is_some(), "part lookup");

        found
    }

    /// Ordered override candidates for a singular product view.
    ///
    /// Most specific first: a per-slug override (when a slug is known),
    /// the plugin's default name, then a generic fallback.
    pub fn singular_candidates(&self, slug: Option<&str>) -> Vec<String> {
        let mut names = Vec::new();

        if let Some(slug) = slug {
            names.push(format!("single-{slug}{TEMPLATE_EXT}"));
        }
        names.push(format!("single-product{TEMPLATE_EXT}"));
        names.push(format!("single{TEMPLATE_EXT}"));

        names
            .into_iter()
            .map(|name| format!("{}{}", self.subfolder, name))
            .collect()
    }

    /// Ordered override candidates for an archive view, optionally
    /// narrowed by the queried taxonomy term.
    pub fn archive_candidates(&self, term: Option<&TermRecord>) -> Vec<String> {
        let mut names = Vec::new();

        if let Some(term) = term {
            names.push(format!("taxonomy-{}-{}{TEMPLATE_EXT}", term.taxonomy, term.slug));
            names.push(format!("taxonomy-{}{TEMPLATE_EXT}", term.taxonomy));
            names.push(format!("taxonomy-{}{TEMPLATE_EXT}", term.slug));
            names.push(format!("taxonomy{TEMPLATE_EXT}"));
        }

        names.push(format!("archive-product{TEMPLATE_EXT}"));
        names.push(format!("archive{TEMPLATE_EXT}"));

        names
            .into_iter()
            .map(|name| format!("{}{}", self.subfolder, name))
            .collect()
    }

    /// Replace the default template extension with the engine's; names
    /// without the default extension get the engine extension appended.
    fn swap_extension(logical_name: &str) -> String {
        let stem = logical_name
            .strip_suffix(DEFAULT_TEMPLATE_EXT)
            .unwrap_or(logical_name);
        format!("{stem}{TEMPLATE_EXT}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use std::collections::BTreeSet;

    /// Host that knows a fixed set of template names.
    struct FixedHost {
        names: BTreeSet<String>,
    }

    impl FixedHost {
        fn with(names: &[&str]) -> Self {
            Self {
                names: names.iter().map(|n| n.to_string()).collect(),
            }
        }
    }

    impl TemplateHost for FixedHost {
        fn locate(&self, relative_name: &str) -> Option<String> {
            self.names
                .contains(relative_name)
                .then(|| relative_name.to_string())
        }

        fn render(&self, name: &str, _context: &RequestContext) -> anyhow::Result<String> {
            Ok(format!("rendered:{name}"))
        }
    }

    #[test]
    fn test_resolve_swaps_extension_and_prefixes_subfolder() {
        let host = FixedHost::with(&["woocommerce/single-product.twig"]);
        let resolver = TemplateResolver::new("woocommerce");

        assert_eq!(
            resolver.resolve(&host, "single-product.php"),
            Some("woocommerce/single-product.twig".to_string())
        );
    }

    #[test]
    fn test_resolve_missing_override_is_none() {
        let host = FixedHost::with(&["woocommerce/cart/cart.twig"]);
        let resolver = TemplateResolver::new("woocommerce");

        assert_eq!(resolver.resolve(&host, "single-product.php"), None);
        // Nested names keep their path segments.
        assert_eq!(
            resolver.resolve(&host, "cart/cart.php"),
            Some("woocommerce/cart/cart.twig".to_string())
        );
    }

    #[test]
    fn test_resolve_is_independent_of_call_order() {
        let host = FixedHost::with(&["woocommerce/archive-product.twig"]);
        let resolver = TemplateResolver::new("woocommerce");

        assert_eq!(resolver.resolve(&host, "single-product.php"), None);
        assert!(resolver.resolve(&host, "archive-product.php").is_some());
        // Asking again for the miss still misses; no hidden caching.
        assert_eq!(resolver.resolve(&host, "single-product.php"), None);
    }

    #[test]
    fn test_resolve_part_joins_slug_and_variant() {
        let host = FixedHost::with(&[
            "woocommerce/content-product-grid.twig",
            "woocommerce/content-product.twig",
        ]);
        let resolver = TemplateResolver::new("woocommerce");

        assert_eq!(
            resolver.resolve_part(&host, "content-product", "grid"),
            Some("woocommerce/content-product-grid.twig".to_string())
        );
        assert_eq!(
            resolver.resolve_part(&host, "content-product", ""),
            Some("woocommerce/content-product.twig".to_string())
        );
        assert_eq!(resolver.resolve_part(&host, "content-widget", "mini"), None);
    }

    #[test]
    fn test_subfolder_normalization() {
        assert_eq!(TemplateResolver::new("woocommerce").subfolder(), "woocommerce/");
        assert_eq!(TemplateResolver::new("woocommerce//").subfolder(), "woocommerce/");
        assert_eq!(TemplateResolver::new("").subfolder(), "");
    }

    #[test]
    fn test_names_without_default_extension_gain_engine_extension() {
        let host = FixedHost::with(&["woocommerce/loop/pagination.twig"]);
        let resolver = TemplateResolver::new("woocommerce");

        assert_eq!(
            resolver.resolve(&host, "loop/pagination"),
            Some("woocommerce/loop/pagination.twig".to_string())
        );
    }

    #[test]
    fn test_singular_candidates_most_specific_first() {
        let resolver = TemplateResolver::new("woocommerce");
        assert_eq!(
            resolver.singular_candidates(Some("hoodie")),
            vec![
                "woocommerce/single-hoodie.twig",
                "woocommerce/single-product.twig",
                "woocommerce/single.twig",
            ]
        );
        assert_eq!(
            resolver.singular_candidates(None),
            vec!["woocommerce/single-product.twig", "woocommerce/single.twig"]
        );
    }

    #[test]
    fn test_archive_candidates_with_term() {
        let resolver = TemplateResolver::new("woocommerce");
        let term = TermRecord {
            id: crate::models::TermId(5),
            taxonomy: "product_cat".to_string(),
            slug: "hoodies".to_string(),
            name: "Hoodies".to_string(),
        };

        assert_eq!(
            resolver.archive_candidates(Some(&term)),
            vec![
                "woocommerce/taxonomy-product_cat-hoodies.twig",
                "woocommerce/taxonomy-product_cat.twig",
                "woocommerce/taxonomy-hoodies.twig",
                "woocommerce/taxonomy.twig",
                "woocommerce/archive-product.twig",
                "woocommerce/archive.twig",
            ]
        );
    }

    #[test]
    fn test_archive_candidates_without_term() {
        let resolver = TemplateResolver::new("woocommerce");
        assert_eq!(
            resolver.archive_candidates(None),
            vec!["woocommerce/archive-product.twig", "woocommerce/archive.twig"]
        );
    }
}
