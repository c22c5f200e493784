//! Route lookup for the filtered API subtree.
//!
//! # Responsibilities
//! - Compile the OpenAPI contract into an ordered list of routes
//! - Look up the route for a (path, method) pair
//! - Return an explicit decision: allowed, not found, or method not allowed
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - The Vec order IS the matching priority; it is fixed at compile time
//! - O(n) template scan (acceptable for typical spec sizes)

use axum::http::Method;

use crate::config::MatchOrder;
use crate::openapi::ApiContract;
use crate::routing::authorizer::OperationSet;
use crate::routing::matcher::{find_match, PathTemplate};

/// A path template together with its declared operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoute {
    pub template: PathTemplate,
    pub operations: OperationSet,
}

impl AsRef<PathTemplate> for ApiRoute {
    fn as_ref(&self) -> &PathTemplate {
        &self.template
    }
}

/// Outcome of routing one request.
#[derive(Debug, PartialEq, Eq)]
pub enum RouteDecision<'a> {
    /// Template matched and the method is declared.
    Allowed(&'a ApiRoute),
    /// No template matched the path.
    NotFound,
    /// A template matched but does not declare the method.
    MethodNotAllowed(&'a ApiRoute),
}

/// Ordered, immutable set of API routes.
#[derive(Debug, Clone, Default)]
pub struct ApiRouter {
    routes: Vec<ApiRoute>,
}

impl ApiRouter {
    /// Compile the contract, applying the configured priority.
    pub fn compile(contract: &ApiContract, order: MatchOrder) -> Self {
        let mut routes: Vec<ApiRoute> = contract
            .paths
            .iter()
            .map(|declared| ApiRoute {
                template: PathTemplate::parse(&declared.template),
                operations: OperationSet::new(declared.methods.iter().cloned()),
            })
            .collect();

        if order == MatchOrder::Specificity {
            // Fewest placeholders first; within a tier, descending by text.
            routes.sort_by(|a, b| {
                a.template
                    .param_count()
                    .cmp(&b.template.param_count())
                    .then_with(|| b.template.as_str().cmp(a.template.as_str()))
            });
        }

        tracing::debug!(routes = routes.len(), order = ?order, "API routes compiled");

        Self { routes }
    }

    /// Routes in matching priority order.
    pub fn routes(&self) -> &[ApiRoute] {
        &self.routes
    }

    /// First route whose template matches `path`.
    pub fn find(&self, path: &str) -> Option<&ApiRoute> {
        find_match(&self.routes, path)
    }

    /// Match the path, then authorize the method on the matched route.
    pub fn route(&self, path: &str, method: &Method) -> RouteDecision<'_> {
        match self.find(path) {
            None => RouteDecision::NotFound,
            Some(route) if route.operations.is_allowed(method) => RouteDecision::Allowed(route),
            Some(route) => RouteDecision::MethodNotAllowed(route),
        }
    }
}
