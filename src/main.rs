use anyhow::Context;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    conference_cert_server::run()
        .await
        .context("server terminated abnormally")
}
