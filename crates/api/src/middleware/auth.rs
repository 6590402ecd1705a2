//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use koperasi_shared::types::KoperasiId;
use koperasi_shared::{Claims, JwtError, RequestContext};

use crate::{AppState, error::ApiError};

/// Validates the bearer token and stores its claims in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        return ApiError::new(
            StatusCode::UNAUTHORIZED,
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        )
        .into_response();
    };

    match state.jwt_service.validate_token(bearer.token()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => {
            ApiError::new(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token has expired")
                .into_response()
        }
        Err(_) => ApiError::new(
            StatusCode::UNAUTHORIZED,
            "INVALID_TOKEN",
            "Invalid or malformed token",
        )
        .into_response(),
    }
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let ctx = auth.scoped(koperasi_id)?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller's own scope.
    #[must_use]
    pub const fn context(&self) -> RequestContext {
        self.0.context()
    }

    /// The caller's scope narrowed to `koperasi_id`.
    ///
    /// # Errors
    ///
    /// Returns 403 unless the koperasi is the caller's own or the caller is a
    /// tenant administrator.
    pub fn scoped(&self, koperasi_id: KoperasiId) -> Result<RequestContext, ApiError> {
        Ok(self.context().scope_to(koperasi_id)?)
    }

    /// The caller's scope, or the one named in a request body.
    ///
    /// # Errors
    ///
    /// Same as [`AuthUser::scoped`].
    pub fn scoped_opt(&self, koperasi_id: Option<KoperasiId>) -> Result<RequestContext, ApiError> {
        koperasi_id.map_or_else(|| Ok(self.context()), |id| self.scoped(id))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required",
                )
            })
    }
}
