//! rmcp server exposing registered runbook tools over MCP

use super::schema::input_schema;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use runbook_application::{ToolRegistrar, ToolRegistration};
use runbook_domain::{InvocationError, ParameterValues, to_identifier};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct PublishedTool {
    tool: Tool,
    registration: ToolRegistration,
}

/// MCP server for a set of runbook tools
///
/// Tools are registered once through [`ToolRegistrar`] before serving.
/// Calls are dispatched concurrently; the server itself holds no mutable
/// state after startup.
pub struct RunbookMcpServer {
    name: String,
    instructions: Option<String>,
    tools: Vec<PublishedTool>,
    index: HashMap<String, usize>,
}

impl RunbookMcpServer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: None,
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool listing in registration order
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    /// Dispatch a call by tool name
    ///
    /// An unknown tool is a protocol error. Every failure after that is
    /// reported in-band as an error result carrying the message.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let Some(&idx) = self.index.get(name) else {
            warn!("Call for unknown tool: {}", name);
            return Err(McpError::invalid_params(
                InvocationError::UnknownTool(name.to_string()).to_string(),
                None,
            ));
        };
        let registration = &self.tools[idx].registration;

        let parameters = arguments.map(parameter_values).unwrap_or_default();
        debug!("MCP call {} with {} argument(s)", name, parameters.len());

        match registration.handler.call(parameters).await {
            Ok(output) => Ok(CallToolResult::success(vec![Content::text(output)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

/// Convert JSON arguments to string parameter values
///
/// Strings are taken as-is, `null` counts as absent and any other value
/// is passed as its JSON text.
fn parameter_values(arguments: JsonObject) -> ParameterValues {
    arguments
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}

impl ToolRegistrar for RunbookMcpServer {
    fn register(&mut self, registration: ToolRegistration) {
        if self.index.contains_key(&registration.name) {
            warn!("Tool '{}' is already registered, ignoring", registration.name);
            return;
        }

        let tool = Tool::new(
            registration.name.clone(),
            registration.description.clone(),
            Arc::new(input_schema(&registration.parameters)),
        );

        let idx = self.tools.len();
        self.index.insert(registration.name.clone(), idx);
        self.index
            .entry(to_identifier(&registration.name))
            .or_insert(idx);
        info!("Published MCP tool: {}", registration.name);

        self.tools.push(PublishedTool { tool, registration });
    }
}

impl ServerHandler for RunbookMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: self.instructions.clone(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rmcp::model::RawContent;
    use runbook_application::ToolHandler;
    use runbook_domain::{BindingError, ParameterDescriptor};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records the parameters it is called with and echoes `message`
    #[derive(Default)]
    struct RecordingHandler {
        calls: Mutex<Vec<ParameterValues>>,
    }

    #[async_trait]
    impl ToolHandler for RecordingHandler {
        async fn call(&self, parameters: ParameterValues) -> Result<String, InvocationError> {
            let message = parameters.get("message").cloned().unwrap_or_default();
            self.calls.lock().unwrap().push(parameters);
            Ok(message)
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        async fn call(&self, _parameters: ParameterValues) -> Result<String, InvocationError> {
            Err(BindingError::MissingParameters(vec!["target".to_string()]).into())
        }
    }

    fn registration(name: &str, handler: Arc<dyn ToolHandler>) -> ToolRegistration {
        ToolRegistration {
            name: name.to_string(),
            description: format!("{} tool", name),
            parameters: vec![ParameterDescriptor {
                name: "message".to_string(),
                description: "Message to echo".to_string(),
                required: false,
                default: Some("hi".to_string()),
            }],
            handler,
        }
    }

    fn text(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_register_publishes_tools_in_order() {
        let mut server = RunbookMcpServer::new("Test");
        server.register(registration("b-tool", Arc::new(RecordingHandler::default())));
        server.register(registration("a-tool", Arc::new(RecordingHandler::default())));
        server.register(registration("b-tool", Arc::new(RecordingHandler::default())));

        let tools = server.tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "b-tool");
        assert_eq!(tools[1].name, "a-tool");
        assert_eq!(tools[0].input_schema["properties"]["message"]["default"], "hi");
    }

    #[test]
    fn test_get_info_uses_server_name() {
        let server = RunbookMcpServer::new("Ops Runbook").with_instructions("Run ops tasks");
        let info = server.get_info();
        assert_eq!(info.server_info.name, "Ops Runbook");
        assert_eq!(info.instructions.as_deref(), Some("Run ops tasks"));
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_dispatch_stringifies_arguments() {
        let handler = Arc::new(RecordingHandler::default());
        let mut server = RunbookMcpServer::new("Test");
        server.register(registration("echo", handler.clone()));

        let arguments = json!({
            "message": "hello",
            "port": 8080,
            "verbose": true,
            "skipped": null,
        });
        let result = server
            .dispatch("echo", arguments.as_object().cloned())
            .await
            .unwrap();

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text(&result), "hello");

        let calls = handler.calls.lock().unwrap();
        let params = &calls[0];
        assert_eq!(params["port"], "8080");
        assert_eq!(params["verbose"], "true");
        assert!(!params.contains_key("skipped"));
    }

    #[tokio::test]
    async fn test_dispatch_without_arguments() {
        let handler = Arc::new(RecordingHandler::default());
        let mut server = RunbookMcpServer::new("Test");
        server.register(registration("echo", handler.clone()));

        server.dispatch("echo", None).await.unwrap();
        assert!(handler.calls.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_by_identifier() {
        let mut server = RunbookMcpServer::new("Test");
        server.register(registration(
            "deploy-app",
            Arc::new(RecordingHandler::default()),
        ));

        assert!(server.dispatch("deploy_app", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_is_error_result() {
        let mut server = RunbookMcpServer::new("Test");
        server.register(registration("broken", Arc::new(FailingHandler)));

        let result = server.dispatch("broken", None).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("missing required parameter(s): target"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_error() {
        let server = RunbookMcpServer::new("Test");
        let err = server.dispatch("nope", None).await.unwrap_err();
        assert!(err.message.contains("Unknown tool: nope"));
    }
}
