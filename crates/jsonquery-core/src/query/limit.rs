/// Pagination
///
/// Skip-then-take windowing over an already filtered and ordered sequence.
use super::request::Limit;
use crate::error::{Error, Result};
use std::fmt;

/// A validated skip/take window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    skip: usize,
    /// `None` means no upper bound
    take: Option<usize>,
}

impl Window {
    /// Validate a request limit. `0` disables either part.
    pub fn from_limit(limit: &Limit) -> Result<Self> {
        if limit.skip < 0 {
            return Err(Error::Validation(format!(
                "Limit skip must not be negative, got {}",
                limit.skip
            )));
        }
        if limit.take < 0 {
            return Err(Error::Validation(format!(
                "Limit take must not be negative, got {}",
                limit.take
            )));
        }

        let skip = usize::try_from(limit.skip)
            .map_err(|_| Error::Validation(format!("Limit skip {} is too large", limit.skip)))?;
        let take = usize::try_from(limit.take)
            .map_err(|_| Error::Validation(format!("Limit take {} is too large", limit.take)))?;

        Ok(Self {
            skip,
            take: (take > 0).then_some(take),
        })
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn take(&self) -> Option<usize> {
        self.take
    }

    /// Skip first, then take
    pub fn apply<I: Iterator>(&self, iter: I) -> impl Iterator<Item = I::Item> {
        iter.skip(self.skip).take(self.take.unwrap_or(usize::MAX))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.take {
            Some(take) => write!(f, "skip {}, take {}", self.skip, take),
            None => write!(f, "skip {}", self.skip),
        }
    }
}
