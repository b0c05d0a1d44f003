use validator::Validate;

use crate::error::{AppError, AppResult};

/// Validate a struct and return AppError on failure
///
/// Field errors are reported in field-name order as `field: message`.
pub fn validate_request<T: Validate>(data: &T) -> AppResult<()> {
    data.validate().map_err(|e| {
        let mut fields: Vec<_> = e.field_errors().into_iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error.message.as_deref().unwrap_or("invalid");
                    format!("{field}: {message}")
                })
            })
            .collect();
        AppError::Validation(messages.join(", "))
    })
}

/// Trim a page title and strip control characters other than newline and tab
pub fn sanitize_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
