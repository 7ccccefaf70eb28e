//! OpenAPI documentation for the whole shop API

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "E-commerce backend: accounts, catalog, carts and orders, storefront content",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    modifiers(&BearerAuth),
    nest(
        (path = "/api/auth", api = domain_users::auth_handlers::ApiDoc),
        (path = "/api/users", api = domain_users::handlers::ApiDoc),
        (path = "/api", api = domain_catalog::ApiDoc),
        (path = "/api", api = domain_commerce::ApiDoc),
        (path = "/api", api = domain_content::ApiDoc),
        (path = "/api/admins", api = domain_admins::ApiDoc)
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme the protected operations refer to
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
