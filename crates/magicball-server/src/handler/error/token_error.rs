//! Token validation failure to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::service::TokenError;

impl From<TokenError> for HttpError<'static> {
    #[inline]
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired => ErrorKind::ExpiredAuthToken.into_error(),
            TokenError::Invalid => ErrorKind::MalformedAuthToken.into_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_and_invalid_stay_distinct() {
        assert_eq!(
            HttpError::from(TokenError::Expired).kind(),
            ErrorKind::ExpiredAuthToken
        );
        assert_eq!(
            HttpError::from(TokenError::Invalid).kind(),
            ErrorKind::MalformedAuthToken
        );
    }
}
