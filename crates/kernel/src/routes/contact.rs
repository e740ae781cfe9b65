//! Contact form routes.
//!
//! `GET /contact` renders a fresh form instance. Submissions arrive as a
//! POST body, or as the query string when the form is described with
//! `method = "get"`. Only the authoritative check decides acceptance.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::form::{self, FormDescription, Method, Submission};
use crate::services::mail::MailMessage;
use crate::state::AppState;

const PAGE_TITLE: &str = "Contact";
const CONFIRMATION: &str = "Thank you, your message has been sent.";

/// Render the contact form, or handle a GET submission.
///
/// The query string only counts as a submission for GET forms. Other query
/// parameters on a POST form's page are ignored.
async fn contact_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    if state.contact_form().method == Method::Get {
        let submission = Submission::from_urlencoded(query.unwrap_or_default().as_bytes());
        if submission.has_response() {
            return handle_submission(&state, &submission).await;
        }
    }

    let page = render_form_page(&state, None)?;
    Ok(Html(page).into_response())
}

/// Handle a POST submission.
async fn submit_contact(State(state): State<AppState>, body: Bytes) -> AppResult<Response> {
    let submission = Submission::from_urlencoded(&body);
    handle_submission(&state, &submission).await
}

async fn handle_submission(state: &AppState, submission: &Submission) -> AppResult<Response> {
    if !form::is_valid(submission) {
        info!(fields = submission.len(), "Contact submission rejected");
        let notice = state.contact_form().incomplete_message.clone();
        let page = render_form_page(state, Some(notice.as_str()))?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
    }

    let config = state.config();
    match state.mailer() {
        Some(mailer) if config.has_contact_recipients() => {
            let message = compose_message(config, state.contact_form(), submission);
            mailer.send(&message).await?;
        }
        _ => warn!("Mail delivery not configured, accepted contact submission was not sent"),
    }

    info!("Contact submission accepted");
    let page = state
        .theme()
        .render_page(PAGE_TITLE, Some(CONFIRMATION), "")?;
    Ok(Html(page).into_response())
}

/// Build a fresh form instance and wrap it in a page.
fn render_form_page(state: &AppState, notice: Option<&str>) -> AppResult<String> {
    let definition = state.contact_form().build()?;
    let rendered = state.assembler().render(&definition)?;
    Ok(state
        .theme()
        .render_page(PAGE_TITLE, notice.filter(|n| !n.is_empty()), &rendered.html)?)
}

/// One `Title: value` line per input field, in form order.
fn compose_message(
    config: &Config,
    description: &FormDescription,
    submission: &Submission,
) -> MailMessage {
    let mut message = MailMessage::new(&config.smtp_from_email, &config.contact_subject)
        .from_name(&config.smtp_from_name);
    for address in &config.contact_recipients {
        message = message.to(address);
    }
    for address in &config.contact_bcc {
        message = message.bcc(address);
    }

    for field in description.input_fields() {
        let title = if field.title.is_empty() {
            &field.identifier
        } else {
            &field.title
        };
        message.push_line(format!("{title}: {}", submission.get_string(&field.identifier)));
    }

    message
}

/// Create the contact router.
pub fn router() -> Router<AppState> {
    Router::new().route("/contact", get(contact_page).post(submit_contact))
}
