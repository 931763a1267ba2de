//! Certificate download endpoint.
//!
//! Orchestration only: look the registrant up, pick the template for their
//! attendance, hand off to the configured renderer and stream the result as
//! a download. The three non-success outcomes (unknown registrant, no
//! attendance, generation failure) each get their own response.

use actix_web::{http::header, web, HttpResponse, Responder};
use lazy_static::lazy_static;
use log::{error, info};
use prometheus::IntCounterVec;

use crate::db::AppState;
use crate::views;

use super::{select_template, RenderedCertificate, Renderer};

lazy_static! {
    /// Certificates successfully rendered and streamed, by template kind.
    pub static ref CERTIFICATES_ISSUED: IntCounterVec = IntCounterVec::new(
        prometheus::opts!(
            "certificates_issued_total",
            "Certificates successfully rendered and streamed, by template kind."
        ),
        &["template"],
    )
    .expect("certificates_issued_total definition is valid");
}

/// Stream a finished certificate as a binary attachment.
pub fn certificate_response(cert: RenderedCertificate) -> HttpResponse {
    let mime = mime_guess::from_path(&cert.filename).first_or_octet_stream();
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, mime.essence_str().to_string()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", cert.filename),
        ))
        .body(cert.bytes)
}

fn html_page(status: actix_web::http::StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[utoipa::path(
    tag = "Certificate Service",
    get,
    path = "/certificate/{id}",
    params(
        ("id" = i64, Path, description = "Registrant id")
    ),
    responses(
        (status = 200, description = "Certificate download (application/pdf) or an eligibility notice page"),
        (status = 404, description = "No registrant with this id"),
        (status = 500, description = "Certificate generation failed")
    )
)]
pub async fn download_certificate(
    id: web::Path<i64>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = id.into_inner();

    let registrant = match data.find_registrant_by_id(id).await {
        Ok(Some(registrant)) => registrant,
        Ok(None) => {
            info!("certificate requested for unknown registrant {id}");
            return html_page(
                actix_web::http::StatusCode::NOT_FOUND,
                views::message_page("User not found", "No registration matches this id."),
            );
        }
        Err(e) => {
            error!("registrant lookup failed for {id}: {e}");
            return html_page(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                views::message_page(
                    "Something went wrong",
                    "Unexpected server error while generating the certificate.",
                ),
            );
        }
    };

    let kind = match select_template(registrant.attendance_day1, registrant.attendance_day2) {
        Some(kind) => kind,
        None => {
            info!("registrant {id} has no recorded attendance, no certificate");
            return html_page(
                actix_web::http::StatusCode::OK,
                views::message_page(
                    "Not eligible",
                    "Our records show no attendance for this registration, \
                     so a certificate cannot be provided.",
                ),
            );
        }
    };

    let display_text = format!("{}{}", data.honorific, registrant.name);
    match data.renderer.render(kind, &display_text).await {
        Ok(bytes) => {
            CERTIFICATES_ISSUED
                .with_label_values(&[kind.as_str()])
                .inc();
            info!(
                "issued {} certificate for registrant {id} ({} bytes)",
                kind,
                bytes.len()
            );
            certificate_response(RenderedCertificate::new(&registrant.name, bytes))
        }
        Err(e) => {
            error!("certificate generation failed for registrant {id}: {e}");
            html_page(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                views::message_page("Something went wrong", "Error generating the certificate."),
            )
        }
    }
}
