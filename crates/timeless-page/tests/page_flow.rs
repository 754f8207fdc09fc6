use timeless_config::{SiteConfig, SplitMode};
use timeless_dom::{LayoutBox, NodeId};
use timeless_page::{
    DrawerState, Handler, NoticeKind, Observer, Page, PageEvent, PageOptions, SubmitError, Submitter,
};

const SITE: &str = r##"<html><body>
    <header class="site-header">
        <a class="logo" href="#inicio">Timeless Partners</a>
        <button class="hamburger" aria-expanded="false"><span class="bar"></span></button>
    </header>
    <nav id="mobile-drawer" aria-hidden="true">
        <ul>
            <li><a href="#servicios">Servicios</a></li>
            <li><a href="#contacto">Contacto</a></li>
        </ul>
    </nav>
    <main>
        <section id="inicio" class="hero">
            <div class="hero__art"><img src="hero.png" alt=""></div>
            <div class="hero__text">
                <h1>Socios que perduran</h1>
                <a class="hero__cta" href="#contacto">Hablemos</a>
            </div>
        </section>
        <section id="servicios" class="features">
            <div class="card">Estrategia</div>
            <div class="card">Operaciones</div>
        </section>
        <section id="productos" class="productos">
            <div class="card">A</div>
            <div class="card">B</div>
            <div class="card">C</div>
        </section>
        <section id="contacto" class="contacto">
            <form id="contactForm">
                <div class="field"><input name="nombre"><small class="error"></small></div>
                <div class="field"><input name="email"><small class="error"></small></div>
                <div class="field"><textarea name="mensaje"></textarea><small class="error"></small></div>
                <button type="submit">Enviar</button>
            </form>
        </section>
    </main>
    <footer><span id="year"></span></footer>
</body></html>"##;

fn node(page: &Page, selector: &str) -> NodeId {
    page.document().select_first(selector).unwrap().unwrap()
}

fn lay_out(page: &mut Page) {
    let boxes = [
        ("header", 0.0, 80.0),
        ("#inicio", 0.0, 800.0),
        ("#servicios", 900.0, 600.0),
        ("#productos", 1600.0, 600.0),
        ("#contacto", 2400.0, 800.0),
    ];
    for (selector, top, height) in boxes {
        let id = node(page, selector);
        page.document_mut().set_layout(id, LayoutBox::new(top, height));
    }
}

fn site() -> Page {
    site_with(SiteConfig::default())
}

fn site_with(config: SiteConfig) -> Page {
    let mut page = Page::from_html(SITE, config).with_options(PageOptions { year: Some(2026) });
    lay_out(&mut page);
    page
}

fn loaded_site() -> Page {
    let mut page = site();
    page.dispatch(PageEvent::DomContentLoaded);
    page.dispatch(PageEvent::Load);
    page
}

fn assert_drawer_consistent(page: &Page) {
    let doc = page.document();
    let open = page.drawer_state().is_open();
    let trigger = node(page, ".hamburger");
    let panel = node(page, "#mobile-drawer");
    let body = doc.body().unwrap();
    assert_eq!(doc.has_class(panel, "open"), open);
    assert_eq!(doc.attr(trigger, "aria-expanded"), Some(if open { "true" } else { "false" }));
    assert_eq!(doc.attr(panel, "aria-hidden"), Some(if open { "false" } else { "true" }));
    assert_eq!(doc.has_class(body, "menu-open"), open);
}

fn fill_form(page: &mut Page, name: &str, email: &str, message: &str) -> NodeId {
    for (field, value) in [("nombre", name), ("email", email), ("mensaje", message)] {
        let control = node(page, &format!("[name={field}]"));
        page.document_mut().set_value(control, value);
    }
    node(page, "#contactForm")
}

fn error_text(page: &Page, field: &str) -> String {
    let control = node(page, &format!("[name={field}]"));
    let doc = page.document();
    let container = doc.closest(control, ".field").unwrap().unwrap();
    let slot = doc.select_in(container, ".error").unwrap()[0];
    doc.text_content(slot)
}

#[test]
fn one_click_toggles_once_after_both_lifecycle_events() {
    let mut page = loaded_site();
    page.init_all();
    assert_eq!(page.listeners().count_handler(Handler::DrawerToggle), 1);

    let trigger = node(&page, ".hamburger");
    page.dispatch(PageEvent::Click { target: trigger });
    assert_eq!(page.drawer_state(), DrawerState::Open);
    page.dispatch(PageEvent::Click { target: trigger });
    assert_eq!(page.drawer_state(), DrawerState::Closed);
}

#[test]
fn drawer_indicators_stay_in_step() {
    let mut page = loaded_site();
    let trigger = node(&page, ".hamburger");
    let panel = node(&page, "#mobile-drawer");
    let link = node(&page, r##"#mobile-drawer a[href="#servicios"]"##);
    assert_drawer_consistent(&page);

    let steps = [
        PageEvent::Click { target: trigger },
        PageEvent::Click { target: link },
        PageEvent::Click { target: trigger },
        PageEvent::KeyDown { key: "Escape".into() },
        PageEvent::KeyDown { key: "Escape".into() },
        PageEvent::Click { target: trigger },
        PageEvent::Click { target: panel },
        PageEvent::Click { target: trigger },
        PageEvent::KeyDown { key: "Enter".into() },
    ];
    let expected = [
        DrawerState::Open,
        DrawerState::Closed,
        DrawerState::Open,
        DrawerState::Closed,
        DrawerState::Closed,
        DrawerState::Open,
        DrawerState::Closed,
        DrawerState::Open,
        DrawerState::Open,
    ];
    for (event, state) in steps.into_iter().zip(expected) {
        page.dispatch(event);
        assert_eq!(page.drawer_state(), state);
        assert_drawer_consistent(&page);
    }
}

#[test]
fn invalid_submission_marks_fields_and_sends_nothing() {
    let mut page = loaded_site();
    let form = fill_form(&mut page, "A", "bad", "short");
    let outcome = page.dispatch(PageEvent::Submit { form });
    assert!(outcome.default_prevented);

    let messages = &page.config().form.messages;
    assert_eq!(error_text(&page, "email"), messages.email);
    assert_eq!(error_text(&page, "mensaje"), messages.message);
    assert_eq!(page.document().focused(), Some(node(&page, "[name=nombre]")));

    page.advance(2000.0);
    assert!(page.notices().is_empty());
}

#[test]
fn valid_submission_confirms_after_the_delay() {
    let mut page = loaded_site();
    let form = fill_form(&mut page, "Alice", "alice@example.com", "Hello, this is long enough.");
    page.dispatch(PageEvent::Submit { form });
    for field in ["nombre", "email", "mensaje"] {
        assert_eq!(error_text(&page, field), "");
    }

    page.advance(599.0);
    assert!(page.notices().is_empty());
    page.advance(1.0);
    assert_eq!(page.notices().len(), 1);
    assert_eq!(page.notices()[0].kind, NoticeKind::Success);
    assert_eq!(page.notices()[0].message, page.config().form.messages.success);

    let doc = page.document();
    for field in ["nombre", "email", "mensaje"] {
        let control = doc.select_first(&format!("[name={field}]")).unwrap().unwrap();
        assert_eq!(doc.value(control).as_deref(), Some(""));
    }
}

#[test]
fn resubmitting_clears_stale_errors() {
    let mut page = loaded_site();
    let form = fill_form(&mut page, "A", "bad", "short");
    page.dispatch(PageEvent::Submit { form });
    assert!(!error_text(&page, "email").is_empty());

    fill_form(&mut page, "Alice", "alice@example.com", "Hello, this is long enough.");
    page.dispatch(PageEvent::Submit { form });
    assert_eq!(error_text(&page, "nombre"), "");
    assert_eq!(error_text(&page, "email"), "");
    assert_eq!(error_text(&page, "mensaje"), "");
}

struct Offline;

impl Submitter for Offline {
    fn submit(&mut self, _: &[(String, String)]) -> Result<(), SubmitError> {
        Err(SubmitError::Network("connection refused".into()))
    }
}

#[test]
fn failed_submission_reports_and_keeps_values() {
    let mut page = site().with_submitter(Offline);
    page.dispatch(PageEvent::DomContentLoaded);
    let form = fill_form(&mut page, "Alice", "alice@example.com", "Hello, this is long enough.");
    page.dispatch(PageEvent::Submit { form });
    page.advance(600.0);

    assert_eq!(page.notices().len(), 1);
    assert_eq!(page.notices()[0].kind, NoticeKind::Failure);
    let name = node(&page, "[name=nombre]");
    assert_eq!(page.document().value(name).as_deref(), Some("Alice"));
}

#[test]
fn load_fragment_lands_below_the_header() {
    let mut page = site();
    page.document_mut().set_fragment(Some("contacto"));
    page.dispatch(PageEvent::DomContentLoaded);
    page.dispatch(PageEvent::Load);

    page.advance(219.0);
    assert_eq!(page.document().viewport().scroll_y(), 0.0);

    page.advance(1.0 + 450.0 + 50.0);
    let doc = page.document();
    assert_eq!(doc.viewport().scroll_y(), 2400.0 - 80.0 - 10.0);
    let contacto = node(&page, "#contacto");
    assert!(page.document().bounding_rect(contacto).top >= 80.0);
}

#[test]
fn anchor_click_closes_drawer_and_scrolls_smoothly() {
    let mut page = loaded_site();
    let trigger = node(&page, ".hamburger");
    let link = node(&page, r##"#mobile-drawer a[href="#servicios"]"##);
    page.dispatch(PageEvent::Click { target: trigger });

    let outcome = page.dispatch(PageEvent::Click { target: link });
    assert!(outcome.default_prevented);
    assert_eq!(page.drawer_state(), DrawerState::Closed);
    // The fragment is left alone when the click is intercepted.
    assert_eq!(page.document().fragment(), None);

    page.advance(100.0);
    let midway = page.document().viewport().scroll_y();
    assert!(midway > 0.0 && midway < 810.0);
    page.advance(500.0);
    assert_eq!(page.document().viewport().scroll_y(), 900.0 - 80.0 - 10.0);
}

#[test]
fn link_to_missing_section_falls_through() {
    let mut page = loaded_site();
    let logo = node(&page, ".logo");
    let section = node(&page, "#inicio");
    page.document_mut().remove_attr(section, "id");

    let outcome = page.dispatch(PageEvent::Click { target: logo });
    assert!(!outcome.default_prevented);
    assert_eq!(page.document().fragment(), Some("inicio"));
}

#[test]
fn section_margins_follow_the_header() {
    let mut page = loaded_site();
    let servicios = node(&page, "#servicios");
    assert_eq!(page.document().style(servicios, "scroll-margin-top"), Some("88px"));

    let header = node(&page, "header");
    page.document_mut().set_layout(header, LayoutBox::new(0.0, 120.0));
    page.dispatch(PageEvent::Resize { width: 800.0, height: 600.0 });
    page.advance(100.0);
    page.dispatch(PageEvent::Resize { width: 700.0, height: 600.0 });
    page.advance(199.0);
    assert_eq!(page.document().style(servicios, "scroll-margin-top"), Some("88px"));
    page.advance(1.0);
    assert_eq!(page.document().style(servicios, "scroll-margin-top"), Some("128px"));
}

#[test]
fn card_groups_reveal_once() {
    let mut page = loaded_site();
    assert!(!page.cards().fired("features"));
    let card = node(&page, ".features .card");
    assert_eq!(page.document().style(card, "opacity"), Some("0"));

    page.dispatch(PageEvent::Scroll { y: 1000.0 });
    assert!(page.cards().fired("features"));
    assert!(page.cards().fired("productos"));
    assert!(!page.cards().fired("contacto"));

    page.dispatch(PageEvent::Scroll { y: 2000.0 });
    assert!(page.cards().fired("contacto"));
    assert_eq!(page.listeners().count_handler(Handler::CardReveal), 0);

    page.advance(3000.0);
    assert_eq!(page.document().style(card, "opacity"), Some("1"));

    page.dispatch(PageEvent::Scroll { y: 0.0 });
    page.dispatch(PageEvent::Scroll { y: 1000.0 });
    page.advance(100.0);
    assert_eq!(page.document().style(card, "opacity"), Some("1"));
}

#[test]
fn hero_plays_through() {
    let mut page = loaded_site();
    assert!(page.hero().has_played());
    let art = node(&page, ".hero__art img");
    let text = node(&page, ".hero__text");
    assert_eq!(page.document().select(".hero__text h1 .word").unwrap().len(), 3);

    page.advance(1200.0);
    assert!(page.hero().pulse().is_some());
    page.advance(8000.0);
    assert!(page.hero().pulse().is_none());

    let doc = page.document();
    assert_eq!(doc.style(art, "display"), Some("none"));
    assert_eq!(doc.attr(art, "aria-hidden"), Some("true"));
    assert!(doc.has_class(text, "visible"));
    let cta = node(&page, ".hero__cta");
    assert_eq!(page.document().style(cta, "opacity"), Some("1"));
}

#[test]
fn hero_letters_split_through_the_page() {
    let mut config = SiteConfig::default();
    config.hero.split = SplitMode::Letters;
    let mut page = site_with(config);
    page.dispatch(PageEvent::DomContentLoaded);

    let doc = page.document();
    assert_eq!(doc.select(".hero__text h1 .word").unwrap().len(), 3);
    let letters = doc.select(".hero__text h1 .word .letter").unwrap();
    assert_eq!(letters.len(), "Sociosqueperduran".len());
    assert_eq!(doc.text_content(letters[0]), "S");
    assert_eq!(doc.style(letters[0], "opacity"), Some("0"));

    page.advance(8000.0);
    let last = *letters.last().unwrap();
    assert_eq!(page.document().style(last, "opacity"), Some("1"));
    let title = node(&page, ".hero__text h1");
    assert_eq!(page.document().text_content(title), "Socios que perduran");
}

#[test]
fn dismiss_starting_before_the_reveal_ends_never_pulses() {
    let mut config = SiteConfig::default();
    config.hero.dismiss_pause_ms = -300.0;
    let mut page = site_with(config);
    page.dispatch(PageEvent::DomContentLoaded);
    page.dispatch(PageEvent::Load);

    for _ in 0..500 {
        page.advance(16.0);
        assert!(page.hero().pulse().is_none());
    }
    assert!(page.hero().is_dismissed());
    let art = node(&page, ".hero__art img");
    let doc = page.document();
    assert_eq!(doc.style(art, "display"), Some("none"));
    assert_eq!(doc.style(art, "transform"), Some("scale(1.5)"));
}

const REVEAL_SITE: &str = r#"<html><body>
    <div id="offset" data-aos="fade-up" data-aos-offset="200"></div>
    <div id="pinned" data-aos="fade-up" data-aos-mirror="false"></div>
    <div id="eased" data-aos="fade" data-aos-easing="ease-in-quad"></div>
</body></html>"#;

#[test]
fn scroll_reveal_honours_element_overrides() {
    let mut page = Page::from_html(REVEAL_SITE, SiteConfig::default());
    for (selector, top) in [("#offset", 1000.0), ("#pinned", 1000.0), ("#eased", 3000.0)] {
        let id = node(&page, selector);
        page.document_mut().set_layout(id, LayoutBox::new(top, 200.0));
    }
    page.dispatch(PageEvent::DomContentLoaded);

    let offset = node(&page, "#offset");
    let pinned = node(&page, "#pinned");
    let eased = node(&page, "#eased");
    let animated = |page: &Page, id: NodeId| page.document().has_class(id, "aos-animate");
    assert_eq!(
        page.document().style(eased, "transition-timing-function"),
        Some("cubic-bezier(0.55, 0.085, 0.68, 0.53)")
    );
    assert!(!animated(&page, offset));
    assert!(!animated(&page, pinned));

    // Default trigger is 1000 - 800 + 40; the override moves it to 400.
    page.dispatch(PageEvent::Scroll { y: 300.0 });
    assert!(animated(&page, pinned));
    assert!(!animated(&page, offset));
    page.dispatch(PageEvent::Scroll { y: 400.0 });
    assert!(animated(&page, offset));

    // Past the bottom edge only the mirrored element hides.
    page.dispatch(PageEvent::Scroll { y: 1300.0 });
    assert!(!animated(&page, offset));
    assert!(animated(&page, pinned));
    page.dispatch(PageEvent::Scroll { y: 2500.0 });
    assert!(animated(&page, pinned));

    page.dispatch(PageEvent::Scroll { y: 600.0 });
    assert!(animated(&page, offset));
    assert!(animated(&page, pinned));
}

#[test]
fn footer_shows_the_year() {
    let page = loaded_site();
    let year = node(&page, "#year");
    assert_eq!(page.document().text_content(year), "2026");
}

#[test]
fn late_drawer_markup_is_bound_by_the_observer() {
    let mut page = Page::from_html(
        "<html><body><main></main></body></html>",
        SiteConfig::default(),
    );
    page.dispatch(PageEvent::DomContentLoaded);
    assert!(page.is_observing(Observer::DrawerBinding));

    let main = node(&page, "main");
    page.mutate(|doc| doc.append_html(main, "<p>Cargando…</p>"));
    assert!(page.is_observing(Observer::DrawerBinding));

    page.mutate(|doc| {
        doc.append_html(
            main,
            r#"<button class="hamburger">Menu</button><nav id="mobile-drawer"></nav>"#,
        )
    });
    assert!(!page.is_observing(Observer::DrawerBinding));

    page.mutate(|doc| doc.append_html(main, "<p>Listo</p>"));
    assert_eq!(page.listeners().count_handler(Handler::DrawerToggle), 1);

    let trigger = node(&page, ".hamburger");
    page.dispatch(PageEvent::Click { target: trigger });
    assert_eq!(page.drawer_state(), DrawerState::Open);
}

#[test]
fn missing_features_do_not_stop_the_rest() {
    let mut page = Page::from_html(
        r#"<html><body><footer><span id="year"></span></footer></body></html>"#,
        SiteConfig::default(),
    )
    .with_options(PageOptions { year: Some(2031) });
    page.dispatch(PageEvent::DomContentLoaded);
    assert!(page.is_initialized());
    let year = node(&page, "#year");
    assert_eq!(page.document().text_content(year), "2031");
    assert!(page.notices().is_empty());
}
