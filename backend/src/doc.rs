//! OpenAPI document for the REST surface.

use crate::inbound::http::schemas::{BadRequestBody, InternalErrorBody, MessageBody};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token whose `sub` claim names the caller."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "User causes API",
        description = "Unfollow causes on behalf of authenticated users.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::user_causes::unfollow_cause,
        crate::inbound::http::user_causes::unfollow_cause_missing_id,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(MessageBody, BadRequestBody, InternalErrorBody)),
    tags(
        (name = "user_causes", description = "User to cause associations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
