//! Contact form validation and submission.

use std::sync::LazyLock;

use regex::Regex;
use timeless_config::FormConfig;
use timeless_dom::NodeId;
use tracing::{debug, info, warn};

use crate::context::{NoticeKind, PageContext};
use crate::error::{PageError, SubmitError};
use crate::event::{DomEvent, EventKind, Handler, Target};
use crate::timers::Task;

/// Sends validated form data somewhere.
pub trait Submitter {
    fn submit(&mut self, fields: &[(String, String)]) -> Result<(), SubmitError>;
}

/// Accepts every submission; no data leaves the page.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedSubmitter;

impl Submitter for SimulatedSubmitter {
    fn submit(&mut self, fields: &[(String, String)]) -> Result<(), SubmitError> {
        debug!(fields = fields.len(), "simulated submission accepted");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// `name` attribute of the failing control.
    pub field: String,
    pub message: String,
}

/// `local@domain.tld`: no whitespace, one `@`, and a dot with something on
/// each side somewhere after it.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

fn field_value<'a>(fields: &'a [(String, String)], name: &str) -> &'a str {
    fields
        .iter()
        .find(|(n, _)| n == name)
        .map_or("", |(_, v)| v.as_str())
}

/// Validate name, email and message, in that order.
pub fn validate(fields: &[(String, String)], config: &FormConfig) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut fail = |field: &str, message: &str| {
        errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        })
    };

    let name = field_value(fields, &config.name_field);
    if name.trim().chars().count() < config.name_min_len {
        fail(config.name_field.as_str(), config.messages.name.as_str());
    }
    let email = field_value(fields, &config.email_field);
    if !is_valid_email(email) {
        fail(config.email_field.as_str(), config.messages.email.as_str());
    }
    let message = field_value(fields, &config.message_field);
    if message.trim().chars().count() < config.message_min_len {
        fail(config.message_field.as_str(), config.messages.message.as_str());
    }
    errors
}

#[derive(Debug, Default)]
pub struct FormController {
    form: Option<NodeId>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> Option<NodeId> {
        self.form
    }

    pub fn init(&mut self, ctx: &mut PageContext) -> Result<(), PageError> {
        let selector = ctx.config.form.selector.clone();
        let form = ctx
            .doc
            .select_first(&selector)?
            .ok_or_else(|| PageError::missing(selector))?;
        if self.form == Some(form) {
            return Ok(());
        }
        ctx.listen_node(form, EventKind::Submit, Handler::ContactSubmit);
        self.form = Some(form);
        Ok(())
    }

    pub fn on_submit(&mut self, ctx: &mut PageContext, event: &mut DomEvent) -> Result<(), PageError> {
        let Target::Node(form) = event.current else {
            return Ok(());
        };
        event.prevent_default();

        for error in ctx.doc.select_in(form, ".error")? {
            ctx.doc.set_text_content(error, "");
        }

        let fields = ctx.doc.form_values(form);
        let errors = validate(&fields, &ctx.config.form);
        if errors.is_empty() {
            let delay = f64::from(ctx.config.form.submit_delay_ms);
            debug!(delay_ms = delay, "form valid, submitting");
            ctx.set_timeout(delay, Task::SubmitSettled { form, fields });
            return Ok(());
        }

        info!(errors = errors.len(), "form has invalid fields");
        let mut first_invalid = None;
        for error in &errors {
            let Some(field) = show_error(ctx, form, error)? else {
                continue;
            };
            first_invalid.get_or_insert(field);
        }
        if let Some(field) = first_invalid {
            ctx.doc.focus(field);
        }
        Ok(())
    }

    /// Runs when the submission delay has elapsed.
    pub fn settle(
        &mut self,
        ctx: &mut PageContext,
        submitter: &mut dyn Submitter,
        form: NodeId,
        fields: &[(String, String)],
    ) {
        match submitter.submit(fields) {
            Ok(()) => {
                info!("contact form submitted");
                let message = ctx.config.form.messages.success.clone();
                ctx.notify(NoticeKind::Success, message);
                ctx.doc.reset_form(form);
            }
            Err(err) => {
                warn!(error = %PageError::from(err), "contact form submission failed");
                let message = ctx.config.form.messages.failure.clone();
                ctx.notify(NoticeKind::Failure, message);
            }
        }
    }
}

/// Put `error.message` in the `.error` element of the field's `.field`
/// container. Returns the control so the caller can focus it.
fn show_error(
    ctx: &mut PageContext,
    form: NodeId,
    error: &FieldError,
) -> Result<Option<NodeId>, PageError> {
    let selector = format!(r#"[name="{}"]"#, error.field);
    let Some(field) = ctx.doc.select_in(form, &selector)?.into_iter().next() else {
        debug!(field = %error.field, "form control missing");
        return Ok(None);
    };
    if let Some(container) = ctx.doc.closest(field, ".field")? {
        if let Some(slot) = ctx.doc.select_in(container, ".error")?.into_iter().next() {
            ctx.doc.set_text_content(slot, &error.message);
        }
    }
    Ok(Some(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeless_config::SiteConfig;
    use timeless_dom::Document;

    use crate::event::PageEvent;

    const FORM: &str = r#"<html><body><form id="contactForm">
        <div class="field"><input name="nombre"><small class="error"></small></div>
        <div class="field"><input name="email"><small class="error"></small></div>
        <div class="field"><textarea name="mensaje"></textarea><small class="error"></small></div>
        <button type="submit">Enviar</button>
    </form></body></html>"#;

    fn fields(name: &str, email: &str, message: &str) -> Vec<(String, String)> {
        vec![
            ("nombre".into(), name.into()),
            ("email".into(), email.into()),
            ("mensaje".into(), message.into()),
        ]
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.c"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
        assert!(!is_valid_email("a@b@c.d"));
    }

    #[test]
    fn email_accepts_dotted_domains_and_rejects_whitespace() {
        assert!(is_valid_email("ana.perez@mail.timeless.mx"));
        assert!(is_valid_email("a@b.c.d"));
        assert!(!is_valid_email("alice@example.com "));
        assert!(!is_valid_email("alice@exam\tple.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn validation_reports_each_failing_field() {
        let config = FormConfig::default();
        let errors = validate(&fields("A", "bad", "short"), &config);
        let names: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, ["nombre", "email", "mensaje"]);

        let errors = validate(&fields("Al", "bad", "short"), &config);
        let names: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, ["email", "mensaje"]);

        assert!(validate(
            &fields("Alice", "alice@example.com", "Hello, this is long enough."),
            &config
        )
        .is_empty());
    }

    #[test]
    fn trims_before_measuring() {
        let config = FormConfig::default();
        let errors = validate(&fields("  A  ", "a@b.co", "   123456789   "), &config);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn invalid_submit_shows_errors_and_focuses_first() {
        let mut ctx = PageContext::new(Document::parse(FORM), SiteConfig::default());
        let mut controller = FormController::new();
        controller.init(&mut ctx).unwrap();
        let form = controller.form().unwrap();
        let name = ctx.doc.select_first("[name=nombre]").unwrap().unwrap();
        let email = ctx.doc.select_first("[name=email]").unwrap().unwrap();
        ctx.doc.set_value(email, "bad");

        let mut event = DomEvent::new(&PageEvent::Submit { form });
        event.current = Target::Node(form);
        controller.on_submit(&mut ctx, &mut event).unwrap();

        assert!(event.default_prevented());
        let messages: Vec<String> = ctx
            .doc
            .select(".error")
            .unwrap()
            .into_iter()
            .map(|e| ctx.doc.text_content(e))
            .collect();
        assert!(messages.iter().all(|m| !m.is_empty()));
        assert_eq!(ctx.doc.focused(), Some(name));
        assert!(ctx.timers.is_empty());
    }

    struct Offline;

    impl Submitter for Offline {
        fn submit(&mut self, _: &[(String, String)]) -> Result<(), SubmitError> {
            Err(SubmitError::Network("offline".into()))
        }
    }

    #[test]
    fn failed_submission_keeps_values() {
        let mut ctx = PageContext::new(Document::parse(FORM), SiteConfig::default());
        let mut controller = FormController::new();
        controller.init(&mut ctx).unwrap();
        let form = controller.form().unwrap();
        let name = ctx.doc.select_first("[name=nombre]").unwrap().unwrap();
        ctx.doc.set_value(name, "Alice");

        controller.settle(&mut ctx, &mut Offline, form, &fields("Alice", "a@b.co", "long enough text"));
        assert_eq!(ctx.notices.len(), 1);
        assert_eq!(ctx.notices[0].kind, NoticeKind::Failure);
        assert_eq!(ctx.doc.value(name).as_deref(), Some("Alice"));

        controller.settle(&mut ctx, &mut SimulatedSubmitter, form, &fields("Alice", "a@b.co", "long enough text"));
        assert_eq!(ctx.notices[1].kind, NoticeKind::Success);
        assert_eq!(ctx.doc.value(name).as_deref(), Some(""));
    }

    #[test]
    fn missing_form_is_reported() {
        let mut ctx = PageContext::new(Document::parse("<html><body></body></html>"), SiteConfig::default());
        let err = FormController::new().init(&mut ctx).unwrap_err();
        assert!(err.is_missing_element());
    }
}
