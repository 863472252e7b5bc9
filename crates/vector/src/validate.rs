//! Local input validation
//!
//! Everything here runs before any network I/O; a failure short-circuits
//! the operation with a validation error and no request is issued.

use vox_core::{Error, Result, VectorPoint};

/// Collection names: non-empty, alphanumeric plus `_` and `-`.
pub fn collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("collection name is empty".to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::Validation(format!(
            "collection name '{name}' contains characters outside [A-Za-z0-9_-]"
        )));
    }
    Ok(())
}

/// Vector dimension must be positive.
pub fn dimension(dim: usize) -> Result<()> {
    if dim == 0 {
        return Err(Error::Validation(
            "vector dimension must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Search limit must be positive.
pub fn limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(Error::Validation("limit must be positive".to_string()));
    }
    Ok(())
}

/// Whole-batch point validation: the first malformed point fails the
/// entire batch, naming its index. No partial application.
pub fn points_batch(points: &[VectorPoint]) -> Result<()> {
    if points.is_empty() {
        return Err(Error::Validation("empty points batch".to_string()));
    }
    for (index, point) in points.iter().enumerate() {
        if point.id.is_empty() {
            return Err(Error::Validation(format!(
                "point at index {index} is missing an id"
            )));
        }
        if point.vector.is_empty() {
            return Err(Error::Validation(format!(
                "point at index {index} is missing a vector"
            )));
        }
        if point.vector.iter().any(|v| !v.is_finite()) {
            return Err(Error::Validation(format!(
                "point at index {index} has a non-finite vector element"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_rule() {
        assert!(collection_name("kb_main-v2").is_ok());
        assert!(collection_name("").is_err());
        assert!(collection_name("has space").is_err());
        assert!(collection_name("dot.dot").is_err());
        assert!(collection_name("émoji").is_err());
    }

    #[test]
    fn test_dimension_and_limit() {
        assert!(dimension(768).is_ok());
        assert!(dimension(0).is_err());
        assert!(limit(1).is_ok());
        assert!(limit(0).is_err());
    }

    #[test]
    fn test_batch_names_first_invalid_index() {
        let points = vec![
            VectorPoint::new("a", vec![0.1]),
            VectorPoint::new("b", vec![]),
            VectorPoint::new("", vec![0.2]),
        ];
        let err = points_batch(&points).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_batch_rejects_non_finite() {
        let points = vec![VectorPoint::new("a", vec![0.1, f32::NAN])];
        let err = points_batch(&points).unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(points_batch(&[]).is_err());
    }
}
