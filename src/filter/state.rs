//! Filter snapshot types.
//!
//! [`FilterState`] is an immutable value: every mutation in the store builds a
//! new one. Each dimension (roles, tools) is a [`Selection`], a three-way state
//! that keeps "no constraint" apart from "user deselected everything".

use std::collections::BTreeSet;

// ===== Selection =====

/// Constraint on one filter dimension.
///
/// - `Unconstrained`: every value passes.
/// - `Only(set)` with members: only listed values pass.
/// - `Only(∅)`: nothing passes (explicit "show nothing").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Dimension does not filter.
    #[default]
    Unconstrained,
    /// Only the listed ids pass; empty passes nothing.
    Only(BTreeSet<String>),
}

impl Selection {
    /// Explicit "show nothing" selection.
    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    /// Selection allowing exactly `ids`.
    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(ids.into_iter().map(Into::into).collect())
    }

    /// Whether a single identifier passes this selection.
    pub fn allows(&self, id: &str) -> bool {
        match self {
            Selection::Unconstrained => true,
            Selection::Only(set) => set.contains(id),
        }
    }

    /// Whether any of the identifiers passes this selection.
    pub fn allows_any<'a>(&self, mut ids: impl Iterator<Item = &'a str>) -> bool {
        match self {
            Selection::Unconstrained => true,
            Selection::Only(set) => ids.any(|id| set.contains(id)),
        }
    }

    /// Whether this dimension does not filter.
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Selection::Unconstrained)
    }

    /// True only for the explicit empty selection.
    pub fn is_nothing(&self) -> bool {
        matches!(self, Selection::Only(set) if set.is_empty())
    }
}

// ===== FilterState =====

/// Snapshot of the active role selection, tool selection and search text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    roles: Selection,
    tools: Selection,
    search_text: String,
}

impl FilterState {
    /// State with the given selections and raw search text.
    pub fn new(roles: Selection, tools: Selection, search_text: impl Into<String>) -> Self {
        Self {
            roles,
            tools,
            search_text: search_text.into(),
        }
    }

    /// State that imposes no restriction at all.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Replace the role selection.
    pub fn with_roles(mut self, roles: Selection) -> Self {
        self.roles = roles;
        self
    }

    /// Replace the tool selection.
    pub fn with_tools(mut self, tools: Selection) -> Self {
        self.tools = tools;
        self
    }

    /// Replace the search text.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Role selection.
    pub fn roles(&self) -> &Selection {
        &self.roles
    }

    /// Tool selection.
    pub fn tools(&self) -> &Selection {
        &self.tools
    }

    /// Search text as typed.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Whether a non-empty search is active.
    pub fn has_search(&self) -> bool {
        !self.search_text.is_empty()
    }
}
