use std::collections::BTreeMap;

use serde_json::{json, Value};

use aegis_mcp_core::ToolDescriptor;

type Handler = Box<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

struct ToolEntry {
    descriptor: ToolDescriptor,
    handler: Handler,
}

/// Named callable capabilities behind the protected endpoint. The built-in
/// set is illustrative; deployments register their own.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        input_schema: Value,
        handler: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) {
        self.tools.insert(
            name.to_string(),
            ToolEntry {
                descriptor: ToolDescriptor {
                    name: name.to_string(),
                    description: description.to_string(),
                    input_schema,
                },
                handler: Box::new(handler),
            },
        );
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            "hello",
            "A protected greeting tool.",
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"],
            }),
            hello,
        );
        registry.register(
            "add_numbers",
            "Add two numbers together.",
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "integer"},
                    "b": {"type": "integer"},
                },
                "required": ["a", "b"],
            }),
            add_numbers,
        );
        registry
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// `None` when no tool is registered under `name`.
    pub fn call(&self, name: &str, arguments: &Value) -> Option<Result<Value, String>> {
        let entry = self.tools.get(name)?;
        Some((entry.handler)(arguments))
    }
}

fn hello(args: &Value) -> Result<Value, String> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing string argument 'name'".to_string())?;
    Ok(Value::String(format!(
        "Hello, {name}! This is a protected endpoint."
    )))
}

fn add_numbers(args: &Value) -> Result<Value, String> {
    let a = args
        .get("a")
        .and_then(Value::as_i64)
        .ok_or_else(|| "missing integer argument 'a'".to_string())?;
    let b = args
        .get("b")
        .and_then(Value::as_i64)
        .ok_or_else(|| "missing integer argument 'b'".to_string())?;
    Ok(json!(a + b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_numbers_sums_integers() {
        let registry = ToolRegistry::builtin();
        let result = registry
            .call("add_numbers", &json!({"a": 2, "b": 3}))
            .unwrap()
            .unwrap();
        assert_eq!(result, json!(5));
    }

    #[test]
    fn hello_formats_greeting() {
        let registry = ToolRegistry::builtin();
        let result = registry
            .call("hello", &json!({"name": "Ada"}))
            .unwrap()
            .unwrap();
        assert_eq!(
            result,
            json!("Hello, Ada! This is a protected endpoint.")
        );
    }

    #[test]
    fn missing_argument_is_a_tool_error() {
        let registry = ToolRegistry::builtin();
        let result = registry.call("add_numbers", &json!({"a": 2})).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn unknown_tool_is_none() {
        let registry = ToolRegistry::builtin();
        assert!(registry.call("does-not-exist", &json!({})).is_none());
    }
}
