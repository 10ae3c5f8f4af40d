use std::sync::Arc;

use datastar::render::{MessageSource, RenderError, TemplateAttributes, TemplateRenderer};
use datastar::Datastar;
use log::*;
use service::config::Config;
use service::logging::Logger;
use service::AppState;
use sse::connection::ConnectionRegistry;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let registry = Arc::new(ConnectionRegistry::new());
    let datastar = Arc::new(Datastar::new(
        demo_renderer(),
        config.template_suffix.clone(),
        demo_messages(),
    ));

    let listen_addr = config.listen_addr();
    let app_state = AppState::new(config, registry, datastar);
    let router = web::router(app_state);

    info!("Server starting on {listen_addr}");

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {listen_addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Built-in demo templates. A real deployment injects its own renderer
/// (any `Fn(&str, &TemplateAttributes)` satisfies the trait).
fn demo_renderer() -> Arc<dyn TemplateRenderer> {
    Arc::new(
        |template: &str, attributes: &TemplateAttributes| -> Result<String, RenderError> {
            // Template names arrive with the configured suffix appended.
            if template.starts_with("notice") {
                let text = attributes
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                let heading = attributes
                    .localizer()
                    .and_then(|l| l.lookup("notice.heading"))
                    .unwrap_or_else(|| "Notice".to_owned());
                Ok(format!(
                    "<div id=\"notice\">\n  <h2>{heading}</h2>\n  <p>{text}</p>\n</div>"
                ))
            } else {
                Err(format!("unknown template: {template}").into())
            }
        },
    )
}

/// Built-in demo message catalog backing template localization.
fn demo_messages() -> Arc<dyn MessageSource> {
    Arc::new(|key: &str, locale: &str| -> Option<String> {
        match (key, locale) {
            ("notice.heading", "de") => Some("Hinweis".to_owned()),
            ("notice.heading", _) => Some("Notice".to_owned()),
            _ => None,
        }
    })
}
