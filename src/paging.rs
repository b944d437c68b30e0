//! Page requests, sort specifications, and page envelopes.
//!
//! Page indices are zero-based. A request's sort is parsed from the wire form
//! `field[,asc|desc]`; the direction defaults to descending.

use crate::error::{ClassifiedError, ErrorKind, FieldErrors, field_error};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors returned while building page requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PagingError {
    /// The requested page size was zero.
    #[error("page size must be positive")]
    ZeroPageSize,

    /// The sort field is not sortable for this listing.
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),

    /// The sort direction is neither `asc` nor `desc`.
    #[error("invalid sort direction '{0}', expected asc or desc")]
    InvalidSortDirection(String),
}

impl PagingError {
    /// Returns the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::ZeroPageSize => "size",
            Self::UnknownSortField(_) | Self::InvalidSortDirection(_) => "sort",
        }
    }
}

impl ClassifiedError for PagingError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationFailed
    }

    fn field_errors(&self) -> FieldErrors {
        field_error(self.field(), self)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Parses `asc` or `desc`, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError::InvalidSortDirection`] for any other value.
    pub fn parse(value: &str) -> Result<Self, PagingError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(PagingError::InvalidSortDirection(value.to_owned()))
        }
    }

    /// Orients an ascending comparison result in this direction.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// A field a listing can be sorted by.
pub trait SortField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Resolves a wire field name such as `createdAt`.
    fn from_name(name: &str) -> Option<Self>;

    /// Returns the wire field name.
    fn name(self) -> &'static str;
}

/// Field and direction for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    field: F,
    direction: SortDirection,
}

impl<F: SortField> Sort<F> {
    /// Creates a sort specification.
    #[must_use]
    pub const fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parses the wire form `field[,direction]`.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError`] when the field is unknown or the direction is
    /// malformed.
    pub fn parse(raw: &str) -> Result<Self, PagingError> {
        let mut parts = raw.splitn(2, ',');
        let field_name = parts.next().unwrap_or_default().trim();
        let field = F::from_name(field_name)
            .ok_or_else(|| PagingError::UnknownSortField(field_name.to_owned()))?;
        let direction = match parts.next() {
            Some(direction) => SortDirection::parse(direction)?,
            None => SortDirection::Desc,
        };
        Ok(Self { field, direction })
    }

    /// Returns the sort field.
    #[must_use]
    pub const fn field(&self) -> F {
        self.field
    }

    /// Returns the sort direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl<F: SortField> fmt::Display for Sort<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{},{direction}", self.field.name())
    }
}

/// A zero-based page request with sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    page: u32,
    size: u32,
    sort: Sort<F>,
}

impl<F: SortField> PageRequest<F> {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError::ZeroPageSize`] when `size` is zero.
    pub const fn new(page: u32, size: u32, sort: Sort<F>) -> Result<Self, PagingError> {
        if size == 0 {
            return Err(PagingError::ZeroPageSize);
        }
        Ok(Self { page, size, sort })
    }

    /// Returns the zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the sort specification.
    #[must_use]
    pub const fn sort(&self) -> Sort<F> {
        self.sort
    }

    /// Returns the number of records preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    /// Returns a copy whose size does not exceed `max_size`.
    ///
    /// Serving layers use this to bound caller-supplied sizes; a `max_size`
    /// of zero leaves the request unchanged.
    #[must_use]
    pub fn capped(self, max_size: u32) -> Self {
        if max_size == 0 {
            return self;
        }
        Self {
            size: self.size.min(max_size),
            ..self
        }
    }

    /// Slices already sorted records into this page.
    #[must_use]
    pub fn slice<T>(&self, sorted: Vec<T>) -> Page<T> {
        let total = u64::try_from(sorted.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.size).unwrap_or(usize::MAX);
        let content = sorted.into_iter().skip(skip).take(take).collect();
        Page::new(content, self.page, self.size, total)
    }
}

/// One page of results plus totals for the whole listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: u64,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub const fn new(content: Vec<T>, number: u32, size: u32, total_elements: u64) -> Self {
        Self {
            content,
            number,
            size,
            total_elements,
        }
    }

    /// Returns the records on this page.
    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consumes the page, returning its records.
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Returns the zero-based page index.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the number of records across all pages.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Returns the number of pages in the listing.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size as u64)
    }

    /// Returns the number of records on this page.
    #[must_use]
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` for the first page.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.number == 0
    }

    /// Returns `true` when no page follows this one.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.number as u64 + 1 >= self.total_pages()
    }

    /// Maps each record while keeping the paging totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }

    /// Maps each record with a fallible function.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let content = self.content.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            content,
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        })
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Page", 8)?;
        state.serialize_field("content", &self.content)?;
        state.serialize_field("totalPages", &self.total_pages())?;
        state.serialize_field("totalElements", &self.total_elements)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("first", &self.is_first())?;
        state.serialize_field("last", &self.is_last())?;
        state.serialize_field("numberOfElements", &self.number_of_elements())?;
        state.end()
    }
}
