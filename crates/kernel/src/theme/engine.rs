//! Theme engine with Tera templates.

use std::path::Path;

use anyhow::{Context, Result};
use tera::Tera;
use tracing::debug;

use crate::form::{FieldDescriptor, FieldKind, FormDefinition, PREFLIGHT_SCRIPT, Section};

/// Templates compiled into the binary. A template directory can override any
/// of them by name.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("page.html", include_str!("../../templates/page.html")),
    ("form/form.html", include_str!("../../templates/form/form.html")),
    (
        "form/section.html",
        include_str!("../../templates/form/section.html"),
    ),
    ("form/text.html", include_str!("../../templates/form/text.html")),
    (
        "form/hidden.html",
        include_str!("../../templates/form/hidden.html"),
    ),
    (
        "form/textarea.html",
        include_str!("../../templates/form/textarea.html"),
    ),
    (
        "form/select.html",
        include_str!("../../templates/form/select.html"),
    ),
    (
        "form/choice_group.html",
        include_str!("../../templates/form/choice_group.html"),
    ),
    (
        "form/submit.html",
        include_str!("../../templates/form/submit.html"),
    ),
];

/// Theme engine for rendering forms and pages.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
}

impl ThemeEngine {
    /// Create a theme engine with only the built-in templates.
    pub fn builtin() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
            .context("failed to load built-in templates")?;
        Ok(Self { tera })
    }

    /// Create a theme engine loading templates from the given directory.
    ///
    /// Templates found there replace built-in templates of the same name.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        let overrides = tera.get_template_names().count();

        let builtin = Self::builtin()?;
        tera.extend(&builtin.tera)
            .context("failed to merge built-in templates")?;

        debug!(
            dir = %template_dir.display(),
            overrides,
            "loaded templates"
        );

        Ok(Self { tera })
    }

    /// Get the underlying Tera instance for custom operations.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Render a form with the given sections.
    ///
    /// The sections are passed separately so the caller can render a copy
    /// that carries protocol fields the definition itself does not hold.
    pub fn render_form(&self, form: &FormDefinition, sections: &[Section]) -> Result<String> {
        let mut sections_html = String::new();
        for section in sections {
            sections_html.push_str(&self.render_section(section)?);
        }

        let mut context = tera::Context::new();
        context.insert("header", form.header_html());
        context.insert("footer", form.footer_html());
        context.insert("action", form.action_url());
        context.insert("method", form.http_method().as_str());
        context.insert("incomplete_message", form.incomplete_message());
        context.insert("sections", &sections_html);

        self.tera
            .render("form/form.html", &context)
            .context("failed to render form template")
    }

    /// Render a section as a fieldset.
    fn render_section(&self, section: &Section) -> Result<String> {
        let mut fields_html = String::new();
        for field in section.fields() {
            fields_html.push_str(&self.render_field(field)?);
        }

        let mut context = tera::Context::new();
        context.insert("title", &section.title());
        context.insert("fields", &fields_html);

        self.tera
            .render("form/section.html", &context)
            .context("failed to render form section")
    }

    /// Render a single field through the template for its kind.
    fn render_field(&self, field: &FieldDescriptor) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("name", &field.wire_name());
        context.insert("field", field);

        let template_name = match &field.kind {
            FieldKind::Text => "form/text.html",
            FieldKind::Hidden => "form/hidden.html",
            FieldKind::Textarea { .. } => "form/textarea.html",
            FieldKind::Select { .. } => "form/select.html",
            FieldKind::CheckboxGroup { .. } => {
                context.insert("input_type", "checkbox");
                "form/choice_group.html"
            }
            FieldKind::RadioGroup { .. } => {
                context.insert("input_type", "radio");
                "form/choice_group.html"
            }
            FieldKind::Submit { .. } => "form/submit.html",
        };

        self.tera
            .render(template_name, &context)
            .with_context(|| format!("failed to render form field: {}", field.identifier))
    }

    /// Render a full page around already rendered content.
    ///
    /// The page carries the preflight script so forms rendered into it can
    /// call it from their submit handler.
    pub fn render_page(&self, title: &str, notice: Option<&str>, content: &str) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("title", title);
        context.insert("notice", &notice);
        context.insert("content", content);
        context.insert("preflight_script", PREFLIGHT_SCRIPT);

        self.tera
            .render("page.html", &context)
            .context("failed to render page template")
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::form::TextareaSize;

    fn render_one(field: FieldDescriptor) -> String {
        let engine = ThemeEngine::builtin().unwrap();
        let section = Section::untitled().field(field).unwrap();
        let form = FormDefinition::new("").section(section.clone());
        engine.render_form(&form, &[section]).unwrap()
    }

    #[test]
    fn test_builtin_templates_load() {
        let engine = ThemeEngine::builtin().unwrap();
        let names: Vec<_> = engine.tera().get_template_names().collect();
        assert_eq!(names.len(), BUILTIN_TEMPLATES.len());
        assert!(names.contains(&"form/form.html"));
    }

    #[test]
    fn test_required_text_field_markup() {
        let html = render_one(FieldDescriptor::text("email", "E-mail").required());
        assert!(html.contains(r#"class="required""#));
        assert!(html.contains(r#"name="tessera_email""#));
        assert!(html.contains("E-mail <em>*</em>"));
    }

    #[test]
    fn test_displayed_text_is_escaped() {
        let html = render_one(FieldDescriptor::text("name", "<b>Name</b>").default_value("\"x\""));
        assert!(html.contains("&lt;b&gt;Name"));
        assert!(!html.contains("<b>Name"));
        assert!(html.contains("&quot;x&quot;"));
    }

    #[test]
    fn test_textarea_size_class() {
        let html = render_one(
            FieldDescriptor::textarea("message", "Message", TextareaSize::Large).required(),
        );
        assert!(html.contains(r#"class="large required""#));
    }

    #[test]
    fn test_choice_group_labels_first_option_only() {
        let html = render_one(
            FieldDescriptor::radio_group("plan", "Plan")
                .option_with_value("a", "Alpha")
                .option_with_value("b", "Beta")
                .default_value("b"),
        );
        assert_eq!(html.matches(r#"type="radio""#).count(), 2);
        assert_eq!(html.matches("Plan").count(), 1);
        assert!(html.contains(r#"checked="checked" name="tessera_plan" value="b""#));
    }

    #[test]
    fn test_select_marks_default_option() {
        let html = render_one(
            FieldDescriptor::select("color", "Color")
                .option("Red")
                .option("Blue")
                .default_value("Blue"),
        );
        assert!(html.contains(r#"<option value="Blue" selected="selected">"#));
        assert!(html.contains(r#"<option value="Red">"#));
    }

    #[test]
    fn test_submit_align_left_omits_label() {
        let html = render_one(FieldDescriptor::submit("Send").align_left());
        assert!(!html.contains("<label"));
        assert!(html.contains(r#"type="submit""#));
    }

    #[test]
    fn test_form_attributes() {
        let engine = ThemeEngine::builtin().unwrap();
        let form = FormDefinition::new("Fill everything in")
            .header("<div class=\"intro\">")
            .footer("</div>")
            .section(Section::new("About you"));
        let html = engine.render_form(&form, form.sections()).unwrap();

        assert!(html.starts_with("<div class=\"intro\"><form"));
        assert!(html.ends_with("</form></div>\n") || html.ends_with("</form></div>"));
        assert!(html.contains(r#"method="post""#));
        assert!(html.contains(r#"data-incomplete-message="Fill everything in""#));
        assert!(html.contains("<legend>About you</legend>"));
        assert!(html.contains("tessera_isComplete"));
    }

    #[test]
    fn test_page_embeds_preflight_script() {
        let engine = ThemeEngine::builtin().unwrap();
        let html = engine
            .render_page("Contact", Some("Thanks"), "<p>body</p>")
            .unwrap();
        assert!(html.contains("function tessera_isComplete"));
        assert!(html.contains(r#"<p class="notice">Thanks</p>"#));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_directory_overrides_builtin() {
        let dir = std::env::temp_dir().join(format!("tessera-theme-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("form")).unwrap();
        std::fs::write(
            dir.join("form/submit.html"),
            "<li class=\"custom\">{{ field.title }}</li>",
        )
        .unwrap();

        let engine = ThemeEngine::new(&dir).unwrap();
        let section = Section::untitled()
            .field(FieldDescriptor::submit("Go"))
            .unwrap();
        let form = FormDefinition::new("").section(section);
        let html = engine.render_form(&form, form.sections()).unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
        assert!(html.contains("<li class=\"custom\">Go</li>"));
        assert!(html.contains("<fieldset>"));
    }
}
