//! Uniform reply envelope: `{code, message, data}` with `0` for success
//! and a stable non-zero code per failure class. Transport layers
//! serialize this as-is.

use serde::Serialize;

use crate::error::ServiceError;

pub const CODE_OK: u16 = 0;
pub const CODE_VALIDATION: u16 = 1001;
pub const CODE_NOT_FOUND: u16 = 1002;
pub const CODE_INTEGRITY: u16 = 1003;
pub const CODE_STORAGE: u16 = 1004;
pub const CODE_AUTH: u16 = 1005;
pub const CODE_INTERNAL: u16 = 1999;

#[derive(Debug, Clone, Serialize)]
pub struct Reply<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Reply<T> {
    pub fn ok(data: T) -> Self {
        Reply {
            code: CODE_OK,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// Failure reply carrying the error's message and mapped code.
    pub fn failure(err: &ServiceError) -> Self {
        Reply {
            code: code_of(err),
            message: err.to_string(),
            data: None,
        }
    }
}

impl Reply<()> {
    /// Success reply for operations with nothing to return.
    pub fn ok_empty() -> Self {
        Reply {
            code: CODE_OK,
            message: "success".to_string(),
            data: None,
        }
    }
}

/// Maps an error to its envelope code. Database failures are reported
/// as internal without leaking driver detail into the code space.
pub fn code_of(err: &ServiceError) -> u16 {
    match err {
        ServiceError::Validation { .. } => CODE_VALIDATION,
        ServiceError::NotFound { .. } => CODE_NOT_FOUND,
        ServiceError::Integrity { .. } => CODE_INTEGRITY,
        ServiceError::Storage(_) => CODE_STORAGE,
        ServiceError::Auth(_) => CODE_AUTH,
        ServiceError::Database(_) => CODE_INTERNAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::token::TokenError;

    #[test]
    fn test_ok_reply_shape() {
        let reply = Reply::ok(vec!["a", "b"]);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "success");
        assert_eq!(json["data"][1], "b");
    }

    #[test]
    fn test_ok_empty_serializes_null_data() {
        let json = serde_json::to_value(Reply::ok_empty()).unwrap();
        assert_eq!(json["code"], 0);
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(
            code_of(&ServiceError::validation("bad page")),
            CODE_VALIDATION
        );
        assert_eq!(
            code_of(&ServiceError::not_found("Client", "x")),
            CODE_NOT_FOUND
        );
        assert_eq!(
            code_of(&ServiceError::integrity("duplicate segment")),
            CODE_INTEGRITY
        );
        assert_eq!(
            code_of(&ServiceError::Storage(StorageError::InvalidName {
                name: "..".to_string()
            })),
            CODE_STORAGE
        );
        assert_eq!(
            code_of(&ServiceError::Auth(TokenError::Expired)),
            CODE_AUTH
        );
        assert_eq!(
            code_of(&ServiceError::Database(sea_orm::DbErr::Custom(
                "boom".to_string()
            ))),
            CODE_INTERNAL
        );
    }

    #[test]
    fn test_failure_carries_error_message() {
        let err = ServiceError::not_found("Order", "o-42");
        let reply = Reply::<()>::failure(&err);
        assert_eq!(reply.code, CODE_NOT_FOUND);
        assert_eq!(reply.message, "Order not found: o-42");
        assert!(reply.data.is_none());
    }
}
