//! Typed `sort=field:direction` parsing against per-resource allow-lists.
//!
//! Each listable resource declares its sortable fields as an enum through
//! [`sort_fields!`](crate::sort_fields). Only those fields can ever reach an
//! `ORDER BY` clause; the SQL expression for a field is fixed at compile time.

use std::fmt;

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A resource's allow-listed sort field.
pub trait SortField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every accepted field, in declaration order.
    const ALL: &'static [Self];

    /// The token clients pass in `sort=<name>:asc`.
    fn name(self) -> &'static str;

    /// The SQL expression ordered by.
    fn column(self) -> &'static str;

    /// Ordering used when the client sends no (or an unusable) sort token.
    fn default_sort() -> SortSpec<Self>;
}

/// A resolved ordering: one allow-listed field plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

/// Why a sort token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortParseError {
    #[error("empty sort token")]
    Empty,
    #[error("unknown sort field '{0}'")]
    UnknownField(String),
    #[error("unknown sort direction '{0}'")]
    UnknownDirection(String),
}

impl<F: SortField> SortSpec<F> {
    /// Parse a `field[:asc|desc]` token. Direction defaults to ascending.
    pub fn parse(token: &str) -> Result<Self, SortParseError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SortParseError::Empty);
        }

        let (name, direction) = match token.split_once(':') {
            Some((name, dir)) => (name.trim(), parse_direction(dir.trim())?),
            None => (token, SortDirection::Asc),
        };

        let field = F::ALL
            .iter()
            .copied()
            .find(|f| f.name() == name)
            .ok_or_else(|| SortParseError::UnknownField(name.to_string()))?;

        Ok(SortSpec { field, direction })
    }

    /// Resolve an optional client token, falling back to the resource default
    /// when it is absent or rejected.
    pub fn resolve(token: Option<&str>) -> Self {
        match token {
            None => F::default_sort(),
            Some(raw) => Self::parse(raw).unwrap_or_else(|err| {
                tracing::debug!(sort = raw, error = %err, "Ignoring sort token");
                F::default_sort()
            }),
        }
    }

    /// `ORDER BY` fragment (without the keyword), e.g. `p.created_at DESC`.
    pub fn order_by(&self) -> String {
        format!("{} {}", self.field.column(), self.direction.as_sql())
    }
}

fn parse_direction(raw: &str) -> Result<SortDirection, SortParseError> {
    if raw.eq_ignore_ascii_case("asc") {
        Ok(SortDirection::Asc)
    } else if raw.eq_ignore_ascii_case("desc") {
        Ok(SortDirection::Desc)
    } else {
        Err(SortParseError::UnknownDirection(raw.to_string()))
    }
}

/// Declare a resource's sortable fields.
///
/// ```
/// folio_core::sort_fields! {
///     pub enum WidgetSort {
///         Name => ("name", "w.name"),
///         CreatedAt => ("created_at", "w.created_at"),
///     }
///     default = (CreatedAt, Desc);
/// }
///
/// use folio_core::sort::SortSpec;
/// let spec = SortSpec::<WidgetSort>::resolve(Some("name:asc"));
/// assert_eq!(spec.order_by(), "w.name ASC");
/// ```
#[macro_export]
macro_rules! sort_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => ($api:literal, $column:literal)),+ $(,)?
        }
        default = ($default:ident, $direction:ident);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::sort::SortField for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $api),+
                }
            }

            fn column(self) -> &'static str {
                match self {
                    $(Self::$variant => $column),+
                }
            }

            fn default_sort() -> $crate::sort::SortSpec<Self> {
                $crate::sort::SortSpec {
                    field: Self::$default,
                    direction: $crate::sort::SortDirection::$direction,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    crate::sort_fields! {
        enum TestSort {
            Title => ("title", "t.title"),
            CreatedAt => ("created_at", "t.created_at"),
        }
        default = (CreatedAt, Desc);
    }

    #[test]
    fn parses_field_and_direction() {
        let spec = SortSpec::<TestSort>::parse("title:desc").unwrap();
        assert_eq!(spec.field, TestSort::Title);
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn direction_is_case_insensitive_and_optional() {
        let spec = SortSpec::<TestSort>::parse("title:DESC").unwrap();
        assert_eq!(spec.direction, SortDirection::Desc);

        let spec = SortSpec::<TestSort>::parse("title").unwrap();
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn rejects_fields_outside_allow_list() {
        assert_matches!(
            SortSpec::<TestSort>::parse("password_hash:asc"),
            Err(SortParseError::UnknownField(f)) if f == "password_hash"
        );
    }

    #[test]
    fn rejects_unknown_direction() {
        assert_matches!(
            SortSpec::<TestSort>::parse("title:sideways"),
            Err(SortParseError::UnknownDirection(_))
        );
    }

    #[test]
    fn rejects_empty_token() {
        assert_matches!(SortSpec::<TestSort>::parse("  "), Err(SortParseError::Empty));
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let spec = SortSpec::<TestSort>::resolve(Some("title; DROP TABLE users"));
        assert_eq!(spec, TestSort::default_sort());

        let spec = SortSpec::<TestSort>::resolve(None);
        assert_eq!(spec.order_by(), "t.created_at DESC");
    }

    #[test]
    fn order_by_uses_fixed_column_expression() {
        let spec = SortSpec::<TestSort>::resolve(Some("title:asc"));
        assert_eq!(spec.order_by(), "t.title ASC");
    }
}
