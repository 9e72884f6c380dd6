use crate::{id::*, time::*, user::*};

/// A single vote on the accuracy of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingValue {
    Up,
    Down,
}

impl RatingValue {
    pub const fn to_i8(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRatingValue(pub i64);

impl TryFrom<i64> for RatingValue {
    type Error = InvalidRatingValue;

    fn try_from(from: i64) -> Result<Self, Self::Error> {
        match from {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            _ => Err(InvalidRatingValue(from)),
        }
    }
}

impl From<RatingValue> for i8 {
    fn from(from: RatingValue) -> Self {
        from.to_i8()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub id: Id,
    pub report_id: Id,
    pub rater: UserId,
    pub value: RatingValue,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plus_and_minus_one_are_valid() {
        assert_eq!(RatingValue::try_from(1), Ok(RatingValue::Up));
        assert_eq!(RatingValue::try_from(-1), Ok(RatingValue::Down));
        assert_eq!(RatingValue::try_from(0), Err(InvalidRatingValue(0)));
        assert_eq!(RatingValue::try_from(2), Err(InvalidRatingValue(2)));
    }
}
