//! HTTP API definitions.

pub mod score;

use crate::define_error;

define_error! {
    enum RequestError {
        #[code = "INVALID_REQUEST"]
        #[status = BAD_REQUEST]
        #[message = "invalid"]
        Invalid,

        #[code = "SESSION_NOT_FOUND"]
        #[status = BAD_REQUEST]
        #[message = "session not found"]
        SessionNotFound,
    }
}
