//! HTML views rendered with Tera.
//!
//! The page set is small (login, profile, info/error message), so the
//! templates are bundled into the binary rather than loaded from disk.

use std::sync::OnceLock;

use log::error;
use tera::{Context, Tera};

use crate::registrant::Registrant;

static TERA: OnceLock<Tera> = OnceLock::new();

fn tera() -> &'static Tera {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("login.html", include_str!("../templates/login.html")),
            ("profile.html", include_str!("../templates/profile.html")),
            ("message.html", include_str!("../templates/message.html")),
        ])
        .expect("bundled templates are valid");
        tera
    })
}

fn render(name: &str, ctx: &Context) -> String {
    tera().render(name, ctx).unwrap_or_else(|e| {
        error!("failed to render {name}: {e}");
        "<!DOCTYPE html><html><body><p>Internal error rendering this page.</p></body></html>"
            .to_string()
    })
}

pub fn login_page(error_message: Option<&str>) -> String {
    let mut ctx = Context::new();
    ctx.insert("error", &error_message);
    render("login.html", &ctx)
}

pub fn profile_page(users: &[Registrant]) -> String {
    let mut ctx = Context::new();
    ctx.insert("users", users);
    render("profile.html", &ctx)
}

pub fn message_page(title: &str, message: &str) -> String {
    let mut ctx = Context::new();
    ctx.insert("title", title);
    ctx.insert("message", message);
    render("message.html", &ctx)
}
