use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest};

use crate::middleware::auth::Claims;
use crate::models::user::StaffRole;

/// The staff member behind a request, as vouched for by `AuthMiddleware`.
/// Quote handlers take it to stamp authorship and to log who changed what.
#[derive(Clone, Debug, PartialEq)]
pub struct StaffMember {
    pub user_id: String,
    pub email: String,
    pub role: StaffRole,
}

impl StaffMember {
    /// "agent@desk.ae (agent)" for audit lines.
    pub fn audit_name(&self) -> String {
        format!("{} ({})", self.email, self.role.as_str())
    }
}

impl From<&Claims> for StaffMember {
    fn from(claims: &Claims) -> Self {
        StaffMember {
            user_id: claims.user_id.clone(),
            email: claims.sub.clone(),
            role: claims.role,
        }
    }
}

impl FromRequest for StaffMember {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let staff = req.extensions().get::<Claims>().map(StaffMember::from);
        ready(staff.ok_or_else(|| ErrorUnauthorized("Sign in to work on quotes")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn claims(role: StaffRole) -> Claims {
        Claims {
            sub: "nadia@desk.ae".to_string(),
            exp: 0,
            iat: 0,
            user_id: "65f0c0ffee".to_string(),
            role,
        }
    }

    #[actix_rt::test]
    async fn test_extracts_staff_from_claims() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(StaffRole::Admin));

        let staff = StaffMember::extract(&req).await.unwrap();
        assert_eq!(staff.email, "nadia@desk.ae");
        assert_eq!(staff.user_id, "65f0c0ffee");
        assert_eq!(staff.role, StaffRole::Admin);
        assert_eq!(staff.audit_name(), "nadia@desk.ae (admin)");
    }

    #[actix_rt::test]
    async fn test_missing_claims_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = StaffMember::extract(&req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 401);
    }
}
