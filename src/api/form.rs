use actix_web::{HttpResponse, Responder, web};

use crate::config::Config;

const TEMPLATE: &str = include_str!("../../templates/index.html");

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(agents: &[String], today: &str, api_prefix: &str) -> String {
    let options = agents
        .iter()
        .map(|a| format!("    <option value=\"{}\"></option>", escape(a)))
        .collect::<Vec<_>>()
        .join("\n");

    // Lands inside <script>, where entities are not decoded.
    let api = serde_json::to_string(api_prefix).unwrap_or_else(|_| "\"\"".to_string());

    TEMPLATE
        .replace("{{agent_options}}", &options)
        .replace("{{today}}", &escape(today))
        .replace("{{api_prefix}}", &api)
}

/// Submission form, pre-filled with the configured roster and today's date.
pub async fn index(config: web::Data<Config>) -> impl Responder {
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render(&config.agents, &today, &config.api_prefix))
}
