use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// This enum contains all error conditions a build can end with. Every fallible
/// operation returns a [`ForgeResult`], and none of these errors is recoverable for
/// the build that produced it: fix the configuration and start a fresh build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForgeError {
    /// The target type needs constructor arguments, but neither the list nor a
    /// declaration covering every position supplies a constructor.
    ///
    /// Detected before any instance is created.
    ConstructionNotSupported {
        /// Name of the type that could not be constructed.
        type_name: &'static str,
    },
    /// A unique-random session was asked for more distinct values than its
    /// sampling space `[lower, upper)` holds.
    ExhaustedSequence {
        /// Inclusive lower bound of the exhausted space.
        lower: usize,
        /// Exclusive upper bound of the exhausted space.
        upper: usize,
    },
    /// A pick was attempted against zero candidates.
    EmptyCollection,
    /// Bounds handed to a section, constraint or generator are unusable.
    InvalidRange(InvalidRangeKind),
}

/// Why a range was rejected.
///
/// Converted into [`ForgeError::InvalidRange`] through `From`, so section openers
/// can `return Err(InvalidRangeKind::... .into())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidRangeKind {
    /// A between-style constraint received `min > max`.
    MinGreaterThanMax {
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },
    /// A section `[start, end)` does not fit in a list of `capacity` objects.
    SectionOutOfBounds {
        /// First position of the section.
        start: usize,
        /// One past the last position of the section.
        end: usize,
        /// Number of objects in the list.
        capacity: usize,
    },
    /// `the_previous` asked for more objects than precede the previous range.
    BeforeFirstPosition {
        /// Requested number of objects.
        count: usize,
        /// Start of the previous range, where the requested section would end.
        end: usize,
    },
    /// `the_next`/`the_previous` was opened before any range section.
    NoPreviousRange {
        /// The opener that needed a previous range.
        opener: &'static str,
    },
    /// A sampling space was requested with `lower > upper`.
    InvertedBounds {
        /// Requested lower bound.
        lower: usize,
        /// Requested upper bound.
        upper: usize,
    },
    /// A generator produced an index outside the list it was picking from.
    IndexOutOfBounds {
        /// The index that was produced.
        index: usize,
        /// Length of the list.
        len: usize,
    },
}

impl Display for InvalidRangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinGreaterThanMax { min, max } => {
                write!(f, "minimum {} is greater than maximum {}", min, max)
            },
            Self::SectionOutOfBounds {
                start,
                end,
                capacity,
            } => {
                write!(
                    f,
                    "section [{}, {}) does not fit in a list of {} objects",
                    start, end, capacity
                )
            },
            Self::BeforeFirstPosition { count, end } => {
                write!(
                    f,
                    "a section of {} objects ending at position {} would start before the first object",
                    count, end
                )
            },
            Self::NoPreviousRange { opener } => {
                write!(f, "{} needs a previously declared range section", opener)
            },
            Self::InvertedBounds { lower, upper } => {
                write!(f, "lower bound {} is above upper bound {}", lower, upper)
            },
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {} is outside a list of length {}", index, len)
            },
        }
    }
}

impl From<InvalidRangeKind> for ForgeError {
    fn from(kind: InvalidRangeKind) -> Self {
        Self::InvalidRange(kind)
    }
}

impl Display for ForgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForgeError::ConstructionNotSupported { type_name } => {
                write!(
                    f,
                    "{} requires constructor arguments; supply a constructor covering every position",
                    type_name
                )
            },
            ForgeError::ExhaustedSequence { lower, upper } => {
                write!(
                    f,
                    "No unique values left in [{}, {}) for this session.",
                    lower, upper
                )
            },
            ForgeError::EmptyCollection => {
                write!(f, "Cannot pick from an empty collection.")
            },
            ForgeError::InvalidRange(kind) => {
                write!(f, "Invalid range: {}", kind)
            },
        }
    }
}

impl Error for ForgeError {}

/// Result alias used throughout the crate.
pub type ForgeResult<T, E = ForgeError> = Result<T, E>;
