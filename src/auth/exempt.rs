// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Routes reachable without authentication.
//!
//! Patterns are either exact paths (`/api/users/login`) or prefixes ending
//! in `/**` (`/health/**` matches `/health` and everything below it, but not
//! `/healthz`). The set is fixed at startup.

use axum::http::Method;

/// Paths that never require a token.
pub const DEFAULT_EXEMPT_ROUTES: &[&str] = &[
    "/api/users/login",
    "/api/users/register",
    "/health",
    "/health/**",
    "/docs",
    "/docs/**",
    "/api-doc/**",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum RoutePattern {
    Exact(String),
    Subtree(String),
}

impl RoutePattern {
    fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(base) => RoutePattern::Subtree(base.to_string()),
            None => RoutePattern::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(exact) => path == exact,
            RoutePattern::Subtree(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// Static allow-list of unauthenticated routes.
#[derive(Debug, Clone)]
pub struct ExemptRoutes {
    patterns: Vec<RoutePattern>,
}

impl ExemptRoutes {
    /// Build from explicit patterns. Blank entries are ignored.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .filter_map(|p| {
                let p = p.as_ref().trim();
                (!p.is_empty()).then(|| RoutePattern::parse(p))
            })
            .collect();
        Self { patterns }
    }

    /// The default routes plus configured public endpoints.
    pub fn with_public<I, S>(public: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut routes = Self::new(DEFAULT_EXEMPT_ROUTES);
        routes.patterns.extend(Self::new(public).patterns);
        routes
    }

    /// Pre-flight `OPTIONS` requests are always exempt.
    pub fn is_exempt(&self, method: &Method, path: &str) -> bool {
        *method == Method::OPTIONS || self.patterns.iter().any(|p| p.matches(path))
    }
}

impl Default for ExemptRoutes {
    /// Just [`DEFAULT_EXEMPT_ROUTES`].
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPT_ROUTES)
    }
}
