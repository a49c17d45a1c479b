use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building a course review.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating must be between 1 and 5, got {0}")]
    OutOfRange(u8),
}

//
// ─── RATING ───────────────────────────────────────────────────────────────────
//

/// Star rating attached to a course review.
///
/// The backend rejects out-of-range ratings too, but validation happens
/// client-side before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    /// Converts a numeric value to a `Rating`.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` if the value is not in 1..=5.
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    /// Returns the underlying 1..=5 value
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

//
// ─── REVIEW DRAFT ─────────────────────────────────────────────────────────────
//

/// A validated course review, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    rating: Rating,
    text: String,
}

impl ReviewDraft {
    /// Validates rating and normalizes the text.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` for ratings outside 1..=5.
    pub fn new(rating: u8, text: impl Into<String>) -> Result<Self, RatingError> {
        let rating = Rating::new(rating)?;
        Ok(Self {
            rating,
            text: text.into().trim().to_string(),
        })
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_one_through_five() {
        for value in 1..=5 {
            assert_eq!(Rating::new(value).unwrap().value(), value);
        }
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert_eq!(Rating::new(0).unwrap_err(), RatingError::OutOfRange(0));
        assert_eq!(Rating::new(6).unwrap_err(), RatingError::OutOfRange(6));
    }

    #[test]
    fn review_draft_trims_text() {
        let draft = ReviewDraft::new(5, "  great course  ").unwrap();
        assert_eq!(draft.rating().value(), 5);
        assert_eq!(draft.text(), "great course");
    }

    #[test]
    fn review_draft_rejects_invalid_rating_before_anything_else() {
        assert!(ReviewDraft::new(0, "text").is_err());
    }
}
