//! Method authorization against declared operations.
//!
//! A method is allowed only when the specification declares it for the
//! matched template. Comparison is case-sensitive on the method as received:
//! `get` is not `GET`. There is no implicit HEAD-for-GET or OPTIONS handling.

use axum::http::Method;

/// Methods declared for one path template, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationSet {
    methods: Vec<Method>,
}

impl OperationSet {
    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        let mut set = Self::default();
        for method in methods {
            if !set.methods.contains(&method) {
                set.methods.push(method);
            }
        }
        set
    }

    pub fn is_allowed(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Comma separated list for an `Allow` header.
    pub fn allow_header_value(&self) -> String {
        self.methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
