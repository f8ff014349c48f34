use uuid::Uuid;

use super::ApiError;

/// Parse a path segment as a note id.
pub fn validate_note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_input("invalid noteId"))
}

/// A note title must be present and non-empty.
pub fn validate_note_title(title: Option<&str>) -> Result<&str, ApiError> {
    match title {
        Some(title) if !title.is_empty() => Ok(title),
        _ => Err(ApiError::bad_input("Note must have a title")),
    }
}

/// Every listed field must be present and non-empty.
pub fn require_params<'a, const N: usize>(
    fields: [Option<&'a str>; N],
) -> Result<[&'a str; N], ApiError> {
    let mut out = [""; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        match field {
            Some(value) if !value.is_empty() => *slot = value,
            _ => return Err(ApiError::bad_input("Parameters missing")),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_id_must_be_uuid() {
        assert!(validate_note_id("not-an-id").is_err());
        assert!(validate_note_id("").is_err());

        let id = Uuid::new_v4();
        assert_eq!(validate_note_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn invalid_note_id_message() {
        let err = validate_note_id("not-an-id").unwrap_err();
        assert!(matches!(err, ApiError::BadInput(msg) if msg == "invalid noteId"));
    }

    #[test]
    fn title_required() {
        assert!(validate_note_title(None).is_err());
        assert!(validate_note_title(Some("")).is_err());
        assert_eq!(validate_note_title(Some("A")).unwrap(), "A");
    }

    #[test]
    fn params_missing() {
        assert_eq!(
            require_params([Some("a"), Some("b")]).unwrap(),
            ["a", "b"]
        );
        assert!(require_params([Some("a"), None]).is_err());
        assert!(require_params([Some(""), Some("b")]).is_err());
    }
}
