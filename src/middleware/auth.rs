use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::jwt;

/// Identity of the authenticated user, extracted from the Bearer token.
/// Using this as a handler parameter makes the route require a valid
/// session token: extraction rejects with 401 before the handler runs,
/// so no ownership check ever sees an unauthenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => return ready(Err(unauthorized("Missing Authorization header"))),
        };

        let auth_str = match header.to_str() {
            Ok(s) => s,
            Err(_) => return ready(Err(unauthorized("Invalid Authorization header"))),
        };

        let token = match auth_str.strip_prefix("Bearer ") {
            Some(token) => token,
            None => {
                return ready(Err(unauthorized(
                    "Invalid Authorization format (expected: Bearer <token>)",
                )));
            }
        };

        match jwt::verify_token(token) {
            Ok(claims) => ready(Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
            })),
            Err(e) => ready(Err(unauthorized(&e))),
        }
    }
}
