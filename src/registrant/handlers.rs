//! Login and profile handlers.

use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use crate::db::AppState;
use crate::views;

use super::model::LoginForm;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// `GET /` - the login form.
pub async fn login_page() -> impl Responder {
    html(views::login_page(None))
}

/// `POST /login` - look the identifier up and show every matching
/// registration, ordered by id ascending.
#[utoipa::path(
    tag = "Registrant Service",
    post,
    path = "/login",
    request_body(
        content = LoginForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Profile page for the matched registrations, or the login page with an error"),
        (status = 500, description = "Registrant store unavailable")
    )
)]
pub async fn login(form: web::Form<LoginForm>, data: web::Data<AppState>) -> impl Responder {
    let identifier = form.identifier.trim();
    if identifier.is_empty() {
        return html(views::login_page(Some(
            "Please enter your registration id, mobile number or email.",
        )));
    }

    match data.find_registrants_by_identifier(identifier).await {
        Ok(users) if users.is_empty() => {
            info!("login found no registrant for the given identifier");
            html(views::login_page(Some("Invalid credentials")))
        }
        Ok(users) => {
            info!("login matched {} registration(s)", users.len());
            html(views::profile_page(&users))
        }
        Err(e) => {
            error!("login lookup failed: {e}");
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body(views::message_page(
                    "Something went wrong",
                    "Database error, please try again later.",
                ))
        }
    }
}
