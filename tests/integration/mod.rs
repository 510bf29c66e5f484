//! End-to-end scenarios driving the bridge the way a theme would:
//! a real Tera host over on-disk templates, in-memory CMS and commerce
//! collaborators, and full intercept/iterate/render flows.

use std::fs;
use std::path::Path;

use shopfront::config::Settings;
use shopfront::constants::{BEFORE_SHOP_LOOP, LOOP_END, LOOP_START, SHOP_LOOP};
use shopfront::context::{ArgValue, TemplateArgs};
use shopfront::models::{CartRef, PostCollection};
use shopfront::platform::{PageKind, Platform, TeraHost};
use shopfront::resolver::TemplateDecision;
use shopfront::session::Session;
use shopfront::test_utils::{
    FixedRoute, MemoryCommerce, MemoryContent, entity, product_item, term_record,
};

/// Route bridge logs through the test harness; `RUST_LOG=shopfront=trace`
/// shows the lifecycle steps when a scenario fails.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn write_template(theme: &Path, relative: &str, body: &str) {
    let path = theme.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn store_content() -> MemoryContent {
    init_tracing();
    MemoryContent::new()
        .with_item(product_item(1, "hoodie"))
        .with_item(product_item(2, "mug"))
        .with_item(product_item(3, "poster"))
        .with_term(term_record(10, "product_cat", "clothing"))
}

fn store_commerce() -> MemoryCommerce {
    MemoryCommerce::new()
        .with_entity(entity(1, &[10]))
        .with_entity(entity(2, &[]))
        .with_entity(entity(3, &[]))
        .with_cart(CartRef {
            item_count: 2,
            total: "34.00".to_string(),
        })
}

#[test]
fn intercept_renders_override_with_live_context() {
    let theme = tempfile::tempdir().unwrap();
    write_template(
        theme.path(),
        "woocommerce/single-product.twig",
        "{{ post.title }} ({{ cart.item_count }} in cart)",
    );

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), FixedRoute::detail(1), host),
        Settings::default(),
    );

    let decision = session
        .intercept_template(
            "/plugin/templates/single-product.php",
            "single-product.php",
            &TemplateArgs::new(),
        )
        .unwrap();

    assert_eq!(
        decision,
        TemplateDecision::Rendered("Hoodie (2 in cart)".to_string())
    );
}

#[test]
fn intercept_without_override_preserves_default_path() {
    let theme = tempfile::tempdir().unwrap();
    write_template(theme.path(), "woocommerce/cart.twig", "unrelated");

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), FixedRoute::detail(1), host),
        Settings::default(),
    );

    let default_path = "/plugin/templates/single-product.php";
    let decision = session
        .intercept_template(default_path, "single-product.php", &TemplateArgs::new())
        .unwrap();

    assert_eq!(decision, TemplateDecision::Default(default_path.to_string()));
}

#[test]
fn converted_entity_arguments_render_as_collections() {
    let theme = tempfile::tempdir().unwrap();
    write_template(
        theme.path(),
        "woocommerce/single-product/related.twig",
        "{% for item in wc.related %}{{ item.slug }};{% endfor %}",
    );

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), FixedRoute::detail(1), host),
        Settings::default(),
    );

    let mut args = TemplateArgs::new();
    args.insert(
        "related".to_string(),
        ArgValue::Entities(vec![entity(3, &[]), entity(2, &[])]),
    );

    let decision = session
        .intercept_template(
            "/plugin/templates/single-product/related.php",
            "single-product/related.php",
            &args,
        )
        .unwrap();

    assert_eq!(decision, TemplateDecision::Rendered("poster;mug;".to_string()));
}

#[test]
fn template_part_lookup_with_and_without_variant() {
    let theme = tempfile::tempdir().unwrap();
    write_template(theme.path(), "woocommerce/content-product-grid.twig", "grid");
    write_template(theme.path(), "woocommerce/content-product.twig", "plain");

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), FixedRoute::detail(1), host),
        Settings::default(),
    );

    let decision = session
        .intercept_template_part("default.php", "content-product", "grid", &TemplateArgs::new())
        .unwrap();
    assert_eq!(decision, TemplateDecision::Rendered("grid".to_string()));

    let decision = session
        .intercept_template_part("default.php", "content-product", "", &TemplateArgs::new())
        .unwrap();
    assert_eq!(decision, TemplateDecision::Rendered("plain".to_string()));
}

#[test]
fn listing_loop_brackets_and_per_item_events() {
    let theme = tempfile::tempdir().unwrap();
    let host = TeraHost::from_dir(theme.path()).unwrap();
    let route = FixedRoute::listing(term_record(10, "product_cat", "clothing"));
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), route, host),
        Settings::default(),
    );

    // The theme fires the pre-loop notification before iterating.
    session.extensions().notifications.emit(BEFORE_SHOP_LOOP);

    let collection = PostCollection::new(vec![
        product_item(1, "hoodie"),
        product_item(2, "mug"),
        product_item(3, "poster"),
    ]);

    let mut slugs = Vec::new();
    collection
        .cursor(&session)
        .for_each(|post| slugs.push(post.item().slug.clone()));

    assert_eq!(slugs, ["hoodie", "mug", "poster"]);

    let notifications = &session.extensions().notifications;
    assert_eq!(notifications.fired(LOOP_START), 1);
    assert_eq!(notifications.fired(LOOP_END), 1);
    assert_eq!(notifications.fired(SHOP_LOOP), 3);
    assert_eq!(session.current_entity_id(), None);
}

#[test]
fn render_default_picks_most_specific_archive_template() {
    let theme = tempfile::tempdir().unwrap();
    write_template(
        theme.path(),
        "woocommerce/taxonomy-product_cat-clothing.twig",
        "{{ title }}: {{ term.name }}",
    );
    write_template(theme.path(), "woocommerce/archive-product.twig", "generic");

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let route =
        FixedRoute::listing(term_record(10, "product_cat", "clothing")).with_title("Clothing");
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), route, host),
        Settings::default(),
    );

    let output = session.render_default(&TemplateArgs::new()).unwrap();
    assert_eq!(output, "Clothing: Clothing");
}

#[test]
fn nested_part_render_keeps_outer_entity_consistent() {
    let theme = tempfile::tempdir().unwrap();
    write_template(
        theme.path(),
        "woocommerce/single-product.twig",
        "page for {{ post.slug }}",
    );
    write_template(theme.path(), "woocommerce/content-upsell.twig", "upsell");

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), FixedRoute::detail(1), host),
        Settings::default(),
    );

    // An inner part render switches the active entity mid-request.
    let inner = session.adapt(product_item(2, "mug"));
    inner.setup(&session);
    session
        .intercept_template_part("default.php", "content-upsell", "", &TemplateArgs::new())
        .unwrap();
    inner.teardown(&session);

    // The outer render re-derives its entity from the queried item and
    // renders the intended product.
    let decision = session
        .intercept_template(
            "/plugin/templates/single-product.php",
            "single-product.php",
            &TemplateArgs::new(),
        )
        .unwrap();

    assert_eq!(decision, TemplateDecision::Rendered("page for hoodie".to_string()));
    assert_eq!(
        session.current_entity_id(),
        Some(shopfront::models::ContentId(1))
    );
}

#[test]
fn child_theme_shadows_parent_templates() {
    let child = tempfile::tempdir().unwrap();
    let parent = tempfile::tempdir().unwrap();
    write_template(child.path(), "woocommerce/single-product.twig", "child");
    write_template(parent.path(), "woocommerce/single-product.twig", "parent");

    let host = TeraHost::new([child.path(), parent.path()]).unwrap();
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), FixedRoute::detail(1), host),
        Settings::default(),
    );

    let decision = session
        .intercept_template("default.php", "single-product.php", &TemplateArgs::new())
        .unwrap();
    assert_eq!(decision, TemplateDecision::Rendered("child".to_string()));
}

#[test]
fn custom_subfolder_changes_search_location() {
    let theme = tempfile::tempdir().unwrap();
    write_template(theme.path(), "shop/single-product.twig", "custom subfolder");

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let session = Session::new(
        Platform::new(store_content(), store_commerce(), FixedRoute::detail(1), host),
        Settings::new("shop"),
    );

    let decision = session
        .intercept_template("default.php", "single-product.php", &TemplateArgs::new())
        .unwrap();
    assert_eq!(
        decision,
        TemplateDecision::Rendered("custom subfolder".to_string())
    );
}

#[test]
fn plain_route_context_carries_only_cart() {
    let theme = tempfile::tempdir().unwrap();
    write_template(
        theme.path(),
        "woocommerce/cart.twig",
        "{{ cart.item_count }} items, {{ cart.total }}",
    );

    let host = TeraHost::from_dir(theme.path()).unwrap();
    let session = Session::new(
        Platform::new(
            store_content(),
            store_commerce(),
            FixedRoute::new(PageKind::Other),
            host,
        ),
        Settings::default(),
    );

    let decision = session
        .intercept_template("default.php", "cart.php", &TemplateArgs::new())
        .unwrap();
    assert_eq!(
        decision,
        TemplateDecision::Rendered("2 items, 34.00".to_string())
    );
}
