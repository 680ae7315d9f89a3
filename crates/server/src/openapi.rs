use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String }

/// Products accept arbitrary extra fields; these are the usual ones.
#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
}

#[derive(ToSchema)]
pub struct RegisterRequest { pub username: String, pub email: String, pub password: String, pub role: String }

#[derive(ToSchema)]
pub struct UserDoc { pub id: i64, pub username: String, pub email: String, pub password: String, pub role: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct TokenResponse { pub token: String }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            ProductDoc,
            RegisterRequest,
            UserDoc,
            LoginRequest,
            TokenResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "products"),
        (name = "users")
    )
)]
pub struct ApiDoc;
