use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use crate::common::Error;

/// Token id from `Authorization: Bearer <token>`
pub fn token_id(headers: &HeaderMap) -> Result<Uuid, Error> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Missing authorization header"))?
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Invalid authorization header"))?;

    Uuid::parse_str(token).map_err(|_| Error::unauthorized("Invalid token"))
}
