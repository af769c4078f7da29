use crate::{
    api::{form, overtime},
    config::Config,
    model::overtime::FailureResponse,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error::InternalError, web};

type Limit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-route limiter settings, built once at startup and shared by workers.
pub struct RateLimits {
    submit: Limit,
    totals: Limit,
}

impl RateLimits {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // Helper to build per-route limiter
        fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limit> {
            let requests_per_min = requests_per_min.max(1);
            let per_ms = 60_000 / u64::from(requests_per_min);
            GovernorConfigBuilder::default()
                .per_millisecond(per_ms.max(1))
                .burst_size(requests_per_min)
                .key_extractor(PeerIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min}/min"))
        }

        Ok(Self {
            submit: build_limiter(config.rate_submit_per_min)?,
            totals: build_limiter(config.rate_totals_per_min)?,
        })
    }
}

/// Bad JSON bodies get the same failure shape as every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = FailureResponse {
            success: false,
            error: "InvalidJson".to_string(),
            message: format!("Invalid request body: {err}"),
        };
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    // Public form
    cfg.service(web::resource("/").route(web::get().to(form::index)));

    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(json_config())
            .service(
                web::resource("/submit")
                    .wrap(Governor::new(&limits.submit))
                    .route(web::post().to(overtime::submit_entry)),
            )
            .service(
                web::resource("/get_totals")
                    .wrap(Governor::new(&limits.totals))
                    .route(web::post().to(overtime::get_totals)),
            ),
    );
}

// BROWSER FORM
//  └─ GET /                  roster + today's date
//
// JSON API ({API_PREFIX}, empty by default)
//  ├─ POST /submit           validate → append one row
//  └─ POST /get_totals       read all rows → filter agent → sum
