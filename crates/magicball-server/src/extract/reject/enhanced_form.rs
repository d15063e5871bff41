use axum::extract::rejection::FormRejection;
use axum::extract::{Form as AxumForm, FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::EXTRACT as TRACING_TARGET;

/// Form data extractor with descriptive `400 Bad Request` rejections.
///
/// Expects `application/x-www-form-urlencoded` data.
///
/// ```rust,no_run
/// use magicball_server::extract::Form;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct LoginForm {
///     username: String,
///     password: String,
/// }
///
/// async fn login(Form(form): Form<LoginForm>) {
///     println!("Login attempt for: {}", form.username);
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    /// Creates a new [`Form`] wrapper around the provided form data.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes the wrapper and returns the inner form data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumForm::<T>::from_request(req, state).await {
            Ok(AxumForm(form)) => Ok(Form(form)),
            Err(rejection) => Err(enhance_form_error(rejection)),
        }
    }
}

/// Converts a form rejection into a bad request naming the offending field.
fn enhance_form_error(rejection: FormRejection) -> Error<'static> {
    tracing::debug!(
        target: TRACING_TARGET,
        error = %rejection,
        "form data parsing failed"
    );

    match &rejection {
        // Query strings fail with `FailedToDeserializeForm`, request bodies with
        // `FailedToDeserializeFormBody`.
        FormRejection::FailedToDeserializeForm(_)
        | FormRejection::FailedToDeserializeFormBody(_) => {
            let error_message = rejection.body_text();

            if error_message.contains("missing field") {
                let field_name = extract_field_name_from_error(&error_message);
                ErrorKind::BadRequest
                    .with_message("Missing required form field")
                    .with_context(format!(
                        "The form field '{}' is required but was not provided",
                        field_name.unwrap_or("unknown")
                    ))
            } else if error_message.contains("duplicate field") {
                let field_name = extract_field_name_from_error(&error_message);
                ErrorKind::BadRequest
                    .with_message("Duplicate form field")
                    .with_context(format!(
                        "The form field '{}' was provided more than once",
                        field_name.unwrap_or("unknown")
                    ))
            } else {
                ErrorKind::BadRequest
                    .with_message("Invalid form data")
                    .with_context(format!("Failed to parse form data: {error_message}"))
            }
        }
        FormRejection::InvalidFormContentType(err) => ErrorKind::BadRequest
            .with_message("Invalid content type for form data")
            .with_context(format!(
                "Expected 'application/x-www-form-urlencoded' content type: {err}"
            )),
        FormRejection::BytesRejection(err) => ErrorKind::BadRequest
            .with_message("Failed to read form data")
            .with_context(err.to_string()),
        _ => ErrorKind::BadRequest.with_message("Invalid form submission"),
    }
}

/// Best-effort extraction of a field name from a serde error message.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    if let Some(start) = error_message.find('`')
        && let Some(end) = error_message[start + 1..].find('`')
    {
        return Some(&error_message[start + 1..start + 1 + end]);
    }

    for pattern in ["missing field ", "duplicate field "] {
        if let Some(start) = error_message.find(pattern) {
            let field_part = &error_message[start + pattern.len()..];
            return Some(match field_part.find(' ') {
                Some(end) => &field_part[..end],
                None => field_part.trim(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use axum::http::{Request as HttpRequest, header};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct LoginForm {
        username: String,
        password: String,
    }

    fn form_request(content_type: &str, body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, content_type)
            .body(axum::body::Body::from(body.to_owned()))
            .expect("valid request")
    }

    #[test]
    fn field_name_from_backticks() {
        assert_eq!(
            extract_field_name_from_error("missing field `username`"),
            Some("username")
        );
    }

    #[test]
    fn field_name_from_plain_patterns() {
        assert_eq!(
            extract_field_name_from_error("missing field password at line 1"),
            Some("password")
        );
        assert_eq!(
            extract_field_name_from_error("duplicate field username"),
            Some("username")
        );
        assert_eq!(extract_field_name_from_error("some other error"), None);
    }

    #[tokio::test]
    async fn parses_urlencoded_form() -> anyhow::Result<()> {
        let request = form_request(
            "application/x-www-form-urlencoded",
            "username=alice&password=wonderland",
        );

        let Form(form) = Form::<LoginForm>::from_request(request, &()).await?;
        assert_eq!(form.username, "alice");
        assert_eq!(form.password, "wonderland");

        Ok(())
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let request = form_request("application/x-www-form-urlencoded", "username=alice");

        let error = Form::<LoginForm>::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("Missing required form field"));
        assert!(error.context().is_some_and(|c| c.contains("'password'")));
    }

    #[tokio::test]
    async fn duplicate_field_names_the_field() {
        let request = form_request(
            "application/x-www-form-urlencoded",
            "username=alice&username=bob&password=wonderland",
        );

        let error = Form::<LoginForm>::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(error.context().is_some_and(|c| c.contains("'username'")));
    }

    #[tokio::test]
    async fn wrong_content_type_is_bad_request() {
        let request = form_request("application/json", r#"{"username":"alice"}"#);

        let error = Form::<LoginForm>::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }
}
