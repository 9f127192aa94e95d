use hcl::eval::{Context, Evaluate};
use hcl::{Body, Expression, Map, Number, Value};
use http::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use std::fmt;

const PLACEHOLDER_URL: &str = "https://switchyard.invalid/";

/// Variables and functions available to configuration expressions.
///
/// Only `env` is declared while the document is loaded. The compile pass
/// adds `req`, `bereq` and `beresp` derived from a placeholder exchange so
/// request-dependent expressions can be checked before any request exists.
pub struct EvalContext {
    variables: Map<String, Value>,
    inner: Context<'static>,
}

impl EvalContext {
    pub fn new<I, K, V>(env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env: Map<String, Value> = env
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();

        let mut variables = Map::new();
        variables.insert("env".to_string(), Value::Object(env));
        Self::from_variables(variables)
    }

    pub fn from_env() -> Self {
        Self::new(std::env::vars())
    }

    /// Derives the startup context. The exchange is never sent anywhere.
    pub fn with_placeholder_exchange(&self) -> Self {
        let exchange = PlaceholderExchange::new();

        let mut variables = self.variables.clone();
        variables.insert("req".to_string(), exchange.request_value());
        variables.insert("bereq".to_string(), exchange.request_value());
        variables.insert("beresp".to_string(), exchange.response_value());
        Self::from_variables(variables)
    }

    fn from_variables(variables: Map<String, Value>) -> Self {
        let mut inner = Context::new();
        for (name, value) in &variables {
            inner.declare_var(name.clone(), value.clone());
        }
        Self { variables, inner }
    }

    pub fn evaluate(&self, expr: &Expression) -> Result<Value, hcl::eval::Error> {
        expr.evaluate(&self.inner)
    }

    /// Evaluates to a string, falling back to the literal expression text if
    /// the expression cannot be evaluated yet.
    pub fn attribute_string(&self, expr: &Expression) -> String {
        match self.evaluate(expr) {
            Ok(value) => value_to_string(&value),
            Err(_) => raw_expression(expr),
        }
    }

    /// Looks up and evaluates attribute `name` of `body`. Missing yields `None`.
    pub fn body_attribute(&self, body: &Body, name: &str) -> Option<String> {
        body.attributes()
            .find(|attr| attr.key() == name)
            .map(|attr| self.attribute_string(attr.expr()))
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new(Vec::<(String, String)>::new())
    }
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Scalar values become their textual form; null and collections are empty.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn raw_expression(expr: &Expression) -> String {
    let raw = hcl::format::to_string(expr).unwrap_or_default();
    let raw = raw.trim();
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
        .to_string()
}

struct PlaceholderExchange {
    request: Request<()>,
    response: Response<()>,
}

impl PlaceholderExchange {
    fn new() -> Self {
        let mut request = Request::new(());
        *request.method_mut() = Method::GET;
        *request.uri_mut() = Uri::from_static(PLACEHOLDER_URL);

        let mut response = Response::new(());
        *response.status_mut() = StatusCode::OK;

        Self { request, response }
    }

    fn request_value(&self) -> Value {
        let uri = self.request.uri();

        let mut req = Map::new();
        req.insert(
            "method".to_string(),
            Value::String(self.request.method().to_string()),
        );
        req.insert("url".to_string(), Value::String(uri.to_string()));
        req.insert("path".to_string(), Value::String(uri.path().to_string()));
        req.insert(
            "host".to_string(),
            Value::String(uri.host().unwrap_or_default().to_string()),
        );
        req.insert(
            "headers".to_string(),
            headers_value(self.request.headers()),
        );
        req.insert("query".to_string(), Value::Object(Map::new()));
        req.insert("cookies".to_string(), Value::Object(Map::new()));
        Value::Object(req)
    }

    fn response_value(&self) -> Value {
        let mut resp = Map::new();
        resp.insert(
            "status".to_string(),
            Value::Number(Number::from(self.response.status().as_u16() as u64)),
        );
        resp.insert(
            "headers".to_string(),
            headers_value(self.response.headers()),
        );
        Value::Object(resp)
    }
}

fn headers_value(headers: &HeaderMap) -> Value {
    Value::Object(
        headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    Value::String(value.to_str().unwrap_or_default().to_string()),
                )
            })
            .collect(),
    )
}
