use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};
use crate::error::{ErrorMessage, ErrorPayload, FieldError, HttpError};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static LINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://").unwrap());

fn validate_no_links(comment: &str) -> Result<(), ValidationError> {
    if LINK_REGEX.is_match(comment) {
        return Err(ValidationError::new("links").with_message(ErrorMessage::LinksNotAllowed.to_string().into()));
    }
    Ok(())
}

#[derive(Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(
        required(message = "Movie ID is required"),
        length(min = 1, message = "Movie ID is required")
    )]
    pub movie_id: Option<String>,
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required"),
        regex(path = *EMAIL_REGEX, message = "Invalid email address")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Comment is required"),
        length(min = 1, message = "Comment is required"),
        custom(function = "validate_no_links")
    )]
    pub comment: Option<String>,
}

impl CommentRequest {
    /// Turns a validated request into the record handed to the store.
    pub fn into_new_comment(self, date: DateTime<Utc>) -> Option<NewComment> {
        Some(NewComment {
            movie_id: self.movie_id?,
            name: self.name?,
            email: self.email?,
            comment: self.comment?,
            date,
            approved: true,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct CommentListParams {
    #[validate(
        required(message = "Movie ID is required"),
        length(min = 1, message = "Movie ID is required")
    )]
    pub movie_id: Option<String>,
}

pub struct NewComment {
    pub movie_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub approved: bool,
}

/// A missing field outranks a bad email, which outranks a link in the comment.
pub fn submission_error(errors: ValidationErrors) -> HttpError<ErrorPayload> {
    let message = {
        let field_errors = errors.field_errors();
        let has_code = |code: &str| {
            field_errors.values().any(|errs| errs.iter().any(|e| e.code == code))
        };
        if has_code("required") || has_code("length") {
            ErrorMessage::FieldsRequired
        } else if has_code("regex") {
            ErrorMessage::InvalidEmail
        } else {
            ErrorMessage::LinksNotAllowed
        }
    };
    FieldError::populate_errors(message, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(movie_id: &str, name: &str, email: &str, comment: &str) -> CommentRequest {
        CommentRequest {
            movie_id: Some(movie_id.to_string()),
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            comment: Some(comment.to_string()),
        }
    }

    fn message_for(req: CommentRequest) -> String {
        let errors = req.validate().unwrap_err();
        submission_error(errors).message
    }

    #[test]
    fn valid_request_passes() {
        let req = request("rumble-in-the-bronx", "Ana", "ana@x.com", "Great film!");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut req = request("police-story", "Ana", "ana@x.com", "Great film!");
        req.name = None;
        assert_eq!(message_for(req), "All fields are required");

        let req = request("", "Ana", "ana@x.com", "Great film!");
        assert_eq!(message_for(req), "All fields are required");
    }

    #[test]
    fn missing_field_outranks_other_failures() {
        let mut req = request("police-story", "Ana", "not-an-email", "see http://spam.com");
        req.movie_id = None;
        assert_eq!(message_for(req), "All fields are required");
    }

    #[test]
    fn bad_email_outranks_link() {
        let req = request("police-story", "Ana", "not-an-email", "see http://spam.com");
        let err = submission_error(req.validate().unwrap_err());
        assert_eq!(err.message, "Invalid email address");
        let Some(ErrorPayload::ValidationErrors(fields)) = err.error else {
            panic!("expected field errors");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["comment", "email"]);
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["ana", "ana@x", "@x.com", "ana@@x.com", "ana @x.com", "ana@x.com ", "ana@.com."] {
            let req = request("police-story", "Ana", email, "Great film!");
            assert_eq!(message_for(req), "Invalid email address", "email {email:?}");
        }
    }

    #[test]
    fn well_formed_emails_are_accepted() {
        for email in ["ana@x.com", "a.b+c@mail.example.org", "ana@x.co.uk"] {
            let req = request("police-story", "Ana", email, "Great film!");
            assert!(req.validate().is_ok(), "email {email:?}");
        }
    }

    #[test]
    fn links_are_rejected_in_any_case() {
        for comment in ["see https://spam.com", "HTTP://SPAM.COM", "visit hTtPs://x.y now"] {
            let req = request("police-story", "Ana", "ana@x.com", comment);
            assert_eq!(message_for(req), "Links are not allowed in comments", "comment {comment:?}");
        }
    }

    #[test]
    fn bare_domains_are_not_links() {
        let req = request("police-story", "Ana", "ana@x.com", "jackiechan.com is great, http too");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn into_new_comment_approves_and_stamps() {
        let now = Utc::now();
        let new_comment = request("police-story", "Ana", "ana@x.com", "Great film!")
            .into_new_comment(now)
            .unwrap();
        assert!(new_comment.approved);
        assert_eq!(new_comment.date, now);
        assert_eq!(new_comment.movie_id, "police-story");
    }

    #[test]
    fn list_params_require_movie_id() {
        assert!(CommentListParams { movie_id: None }.validate().is_err());
        assert!(CommentListParams { movie_id: Some(String::new()) }.validate().is_err());
        assert!(CommentListParams { movie_id: Some("drunken-master".to_string()) }.validate().is_ok());
    }
}
