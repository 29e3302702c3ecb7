//! Route handlers organized by resource

pub mod health;
pub mod orders;

/// Method, path, and summary of every route, for the startup log
pub const ROUTE_TABLE: [(&str, &str, &str); 7] = [
    ("GET", "/", "API root"),
    ("GET", "/api/health", "Health check"),
    ("GET", "/api/test", "Route smoke test"),
    ("GET", "/api/orders", "List orders"),
    ("POST", "/api/orders", "Create order"),
    ("PUT", "/api/orders/{id}", "Update order status"),
    ("DELETE", "/api/orders/{id}", "Delete order"),
];
