use super::handlers::{auth, courses, feedback, health, me};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(health::ping))
        .routes(routes!(auth::register::register))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::password::forgot_password))
        .routes(routes!(auth::password::reset_password))
        .routes(routes!(auth::admin::admin_login))
        .routes(routes!(me::get_me))
        .routes(routes!(courses::list_courses))
        .routes(routes!(feedback::list_course_feedback))
        .routes(routes!(feedback::submit_feedback))
        .routes(routes!(feedback::admin_list_feedback))
        .routes(routes!(
            feedback::admin_update_feedback,
            feedback::admin_delete_feedback
        ));

    let openapi = router.get_openapi_mut();

    let tags = [
        ("auth", "Registration, login and password reset"),
        ("me", "Current user"),
        ("courses", "Course catalog"),
        ("feedback", "Course feedback"),
        ("admin", "Admin login and feedback moderation"),
        ("health", "Liveness and build info"),
    ];
    openapi.tags = Some(
        tags.into_iter()
            .map(|(name, description)| {
                let mut tag = Tag::new(name);
                tag.description = Some(description.to_string());
                tag
            })
            .collect(),
    );

    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let description = env!("CARGO_PKG_DESCRIPTION").trim();
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description((!description.is_empty()).then_some(description))
        .build();

    info.contact = cargo_contact(env!("CARGO_PKG_AUTHORS"));
    info.license = Some(License::new(env!("CARGO_PKG_LICENSE")));

    OpenApiBuilder::new()
        .info(info)
        .components(Some(utoipa::openapi::Components::new()))
        .build()
}

/// Contact from a single `Name <email>` author entry.
fn cargo_contact(author: &str) -> Option<Contact> {
    let (name, email) = author.split_once('<')?;
    let mut contact = Contact::new();
    contact.name = Some(name.trim().to_string()).filter(|name| !name.is_empty());
    contact.email = Some(email.trim_end_matches('>').trim().to_string());
    Some(contact)
}
