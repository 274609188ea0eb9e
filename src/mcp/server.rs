//! MCP server hosting the lending registry.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version agreement
//! 2. **Operation**: Handling tool calls and other requests
//! 3. **Shutdown**: Graceful termination on EOF or signal
//!
//! Each registry operation is exposed as a tool. Messages are handled one at a
//! time, so registry operations never interleave.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, Reply, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::transport::{Frame, LineTransport, StdioTransport};
use crate::registry::{
    BookId, LendingRegistry, LendingResult, Operation, OperationResult, PersonId,
};

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
    /// Behaviour hints for the client.
    pub annotations: ToolAnnotations,
}

/// MCP tool annotations.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// The tool does not modify the registry.
    pub read_only_hint: bool,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Wraps a lending outcome as `{"kind": ..., "message": ...}` text.
    ///
    /// Failures are flagged with `isError`.
    #[must_use]
    pub fn outcome(outcome: &OperationResult) -> Self {
        let text = serde_json::to_string(outcome).unwrap_or_else(|_| outcome.message().to_string());
        if outcome.is_success() {
            Self::text(text)
        } else {
            Self::error(text)
        }
    }
}

/// The MCP server for the lending registry.
#[derive(Debug)]
pub struct McpServer<R = tokio::io::Stdin, W = tokio::io::Stdout> {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: LineTransport<R, W>,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Books, people and loans.
    registry: LendingRegistry,
}

impl McpServer {
    /// Creates a server on stdio around the given registry.
    #[must_use]
    pub fn new(registry: LendingRegistry) -> Self {
        Self::with_transport(registry, StdioTransport::stdio())
    }
}

impl<R, W> McpServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server on an arbitrary transport.
    #[must_use]
    pub fn with_transport(registry: LendingRegistry, transport: LineTransport<R, W>) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport,
            protocol_version: None,
            registry,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Read access to the hosted registry.
    #[must_use]
    pub const fn registry(&self) -> &LendingRegistry {
        &self.registry
    }

    /// Consumes the server, handing back the registry.
    #[must_use]
    pub fn into_registry(self) -> LendingRegistry {
        self.registry
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// Returns when the input closes or a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: io::Result<Option<Frame>>,
    ) -> io::Result<bool> {
        let Some(frame) = line_result? else {
            tracing::debug!("Input closed");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        let reply = match frame {
            Frame::Line(line) => self.handle_line(&line),
            Frame::InvalidUtf8 => {
                tracing::debug!("Rejected line that is not valid UTF-8");
                Some(Reply::Error(JsonRpcError::parse_error()))
            }
        };

        if let Some(reply) = reply {
            self.transport.write_message(&reply).await?;
        }

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles a single line of input and returns the reply to send, if any.
    ///
    /// Blank lines and notifications produce no reply.
    pub fn handle_line(&mut self, line: &str) -> Option<Reply> {
        if line.trim().is_empty() {
            return None;
        }

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => Some(self.handle_request(&req).into()),
            Ok(IncomingMessage::Notification(ref notif)) => {
                self.handle_notification(notif);
                None
            }
            Err(error) => {
                tracing::debug!(code = error.error.code, "Rejected malformed message");
                Some(Reply::Error(error))
            }
        }
    }

    /// Handles an incoming request.
    fn handle_request(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        tracing::trace!(id = %req.id, method = %req.method, "Request");

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "tools/list" => self.handle_tools_list(req),
            "tools/call" => self.handle_tools_call(req),
            "ping" => Ok(Self::handle_ping(req)),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        }
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            tracing::info!("Client initialised, server running");
            self.state = ServerState::Running;
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::invalid_request_with(
                req.id.clone(),
                "Server already initialised",
            ));
        }

        let params: InitializeParams = req.parse_params("initialize")?;
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                requested_version = %params.protocol_version,
                "Client connected"
            );
        }

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();

        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let result = json!({
            "tools": get_tool_definitions(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/call request.
    fn handle_tools_call(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = req.parse_params("tool call")?;

        let result = match params.name.parse::<Operation>() {
            Ok(op) => self.call_operation(op, &params.arguments),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected tools/call");
                ToolCallResult::error(format!("Unknown tool: {}", params.name))
            }
        };

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Handles the ping request.
    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::invalid_request_with(
                id.clone(),
                "Server not initialised",
            ));
        }
        Ok(())
    }

    // ==================== Tool Handlers ====================

    /// Runs one registry operation and wraps its outcome.
    ///
    /// Missing or ill-typed arguments are reported as tool errors without
    /// touching the registry.
    fn call_operation(&mut self, op: Operation, arguments: &Value) -> ToolCallResult {
        let outcome = match self.apply(op, arguments) {
            Ok(result) => OperationResult::from(result),
            Err(message) => {
                tracing::debug!(tool = %op, reason = %message, "Rejected tool arguments");
                return ToolCallResult::error(message);
            }
        };

        if outcome.is_success() {
            tracing::info!(tool = %op, read_only = op.is_read_only(), "{}", outcome.message());
        } else {
            tracing::warn!(tool = %op, read_only = op.is_read_only(), "{}", outcome.message());
        }

        ToolCallResult::outcome(&outcome)
    }

    /// Decodes the arguments for `op` and applies it to the registry.
    fn apply(&mut self, op: Operation, arguments: &Value) -> Result<LendingResult, String> {
        let registry = &mut self.registry;

        let result = match op {
            Operation::AddBook => {
                let title = required_str(arguments, "title")?;
                let author_name = required_str(arguments, "author_name")?;
                let isbn = required_str(arguments, "isbn")?;
                let total_copies = required_u64(arguments, "total_copies")?;
                BookId::new(isbn)
                    .and_then(|id| registry.add_book(title, author_name, id, total_copies))
            }
            Operation::IssueBook => {
                let (isbn, person_id) = book_and_person(arguments)?;
                BookId::new(isbn).and_then(|id| {
                    let person = PersonId::new(person_id)?;
                    registry.issue_book(&id, &person)
                })
            }
            Operation::ReturnBook => {
                let (isbn, person_id) = book_and_person(arguments)?;
                BookId::new(isbn).and_then(|id| {
                    let person = PersonId::new(person_id)?;
                    registry.return_book(&id, &person)
                })
            }
            Operation::IncrementBookCopies => {
                let isbn = required_str(arguments, "isbn")?;
                let additional = required_u64(arguments, "additional_copies")?;
                BookId::new(isbn).and_then(|id| registry.increment_book_copies(&id, additional))
            }
            Operation::GetBookDetails => {
                let isbn = required_str(arguments, "isbn")?;
                BookId::new(isbn).and_then(|id| registry.get_book_details(&id))
            }
            Operation::RegisterPerson => {
                let person_id = required_str(arguments, "person_id")?;
                let name = required_str(arguments, "name")?;
                PersonId::new(person_id).and_then(|id| registry.register_person(id, name))
            }
        };

        Ok(result)
    }
}

/// Fetches a required string argument.
fn required_str<'a>(arguments: &'a Value, name: &str) -> Result<&'a str, String> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(format!("Missing required parameter: {name}")),
        Some(value) => value
            .as_str()
            .ok_or_else(|| format!("Invalid parameter '{name}': expected a string")),
    }
}

/// Fetches a required non-negative integer argument.
fn required_u64(arguments: &Value, name: &str) -> Result<u64, String> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(format!("Missing required parameter: {name}")),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| format!("Invalid parameter '{name}': expected a non-negative integer")),
    }
}

/// Fetches the `isbn` and `person_id` arguments shared by issue and return.
fn book_and_person(arguments: &Value) -> Result<(&str, &str), String> {
    Ok((
        required_str(arguments, "isbn")?,
        required_str(arguments, "person_id")?,
    ))
}

/// Returns the list of available tools, one per registry operation.
fn get_tool_definitions() -> Vec<ToolDefinition> {
    Operation::ALL.into_iter().map(tool_definition).collect()
}

/// Describes one registry operation as a tool.
fn tool_definition(op: Operation) -> ToolDefinition {
    let (description, input_schema) = match op {
        Operation::AddBook => (
            "Add a new book with the given number of copies, all available. \
             Fails if a book with the same ISBN already exists.",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Book title" },
                    "author_name": { "type": "string", "description": "Author name" },
                    "isbn": { "type": "string", "description": "Unique book identifier (ISBN)" },
                    "total_copies": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of copies owned"
                    }
                },
                "required": ["title", "author_name", "isbn", "total_copies"]
            }),
        ),
        Operation::IssueBook => (
            "Issue one copy of a book to a registered person. \
             Fails if the book is unknown, has no copies left, or the person is unknown.",
            book_and_person_schema("Person borrowing the book"),
        ),
        Operation::ReturnBook => (
            "Return one copy of a book held by a person. \
             Fails if the book was not issued to that person.",
            book_and_person_schema("Person returning the book"),
        ),
        Operation::IncrementBookCopies => (
            "Add copies to an existing book. New copies are immediately available.",
            json!({
                "type": "object",
                "properties": {
                    "isbn": { "type": "string", "description": "Book identifier (ISBN)" },
                    "additional_copies": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of copies to add"
                    }
                },
                "required": ["isbn", "additional_copies"]
            }),
        ),
        Operation::GetBookDetails => (
            "Describe a book (title, author) and whether a copy is available.",
            json!({
                "type": "object",
                "properties": {
                    "isbn": { "type": "string", "description": "Book identifier (ISBN)" }
                },
                "required": ["isbn"]
            }),
        ),
        Operation::RegisterPerson => (
            "Register a person who may borrow books. Fails if the id is already taken.",
            json!({
                "type": "object",
                "properties": {
                    "person_id": { "type": "string", "description": "Unique person identifier" },
                    "name": { "type": "string", "description": "Display name" }
                },
                "required": ["person_id", "name"]
            }),
        ),
    };

    let description = if op.is_read_only() {
        format!("Read-only. {description}")
    } else {
        description.to_string()
    };

    ToolDefinition {
        name: op.name().to_string(),
        description: Some(description),
        input_schema,
        annotations: ToolAnnotations {
            read_only_hint: op.is_read_only(),
        },
    }
}

/// Input schema for tools taking a book and a person.
fn book_and_person_schema(person_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "isbn": { "type": "string", "description": "Book identifier (ISBN)" },
            "person_id": { "type": "string", "description": person_description }
        },
        "required": ["isbn", "person_id"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestServer = McpServer<tokio::io::Empty, tokio::io::Sink>;

    fn test_server() -> TestServer {
        let mut registry = LendingRegistry::new();
        registry
            .register_person(PersonId::new("p1").unwrap(), "Paul")
            .unwrap();
        McpServer::with_transport(
            registry,
            LineTransport::new(tokio::io::empty(), tokio::io::sink()),
        )
    }

    fn running_server() -> TestServer {
        let mut server = test_server();
        let init = r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1"}}}"#;
        assert!(matches!(server.handle_line(init), Some(Reply::Response(_))));
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());
        assert_eq!(server.state(), ServerState::Running);
        server
    }

    /// Calls a tool and returns (`is_error`, text).
    fn call(server: &mut TestServer, name: &str, arguments: &Value) -> (bool, String) {
        let line = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        })
        .to_string();

        let Some(Reply::Response(response)) = server.handle_line(&line) else {
            panic!("Expected a response");
        };
        let is_error = response.result["isError"].as_bool().unwrap_or(false);
        let text = response.result["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        (is_error, text)
    }

    #[test]
    fn server_initial_state() {
        let server = test_server();
        assert_eq!(server.state(), ServerState::AwaitingInit);
        assert_eq!(server.protocol_version(), None);
    }

    #[test]
    fn tool_definitions_valid() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), Operation::ALL.len());

        for tool in &tools {
            assert!(!tool.name.is_empty());
            assert!(tool.input_schema.is_object());
            assert!(tool.input_schema["required"].is_array());
        }
    }

    #[test]
    fn read_only_marking_follows_operation() {
        for tool in get_tool_definitions() {
            let op: Operation = tool.name.parse().unwrap();
            let description = tool.description.as_deref().unwrap();
            assert_eq!(tool.annotations.read_only_hint, op.is_read_only(), "{op}");
            assert_eq!(description.starts_with("Read-only."), op.is_read_only(), "{op}");
        }

        let listed = serde_json::to_value(tool_definition(Operation::GetBookDetails)).unwrap();
        assert_eq!(listed["annotations"], json!({ "readOnlyHint": true }));
        let listed = serde_json::to_value(tool_definition(Operation::IssueBook)).unwrap();
        assert_eq!(listed["annotations"], json!({ "readOnlyHint": false }));
    }

    #[test]
    fn tool_call_result_text() {
        let result = ToolCallResult::text("Hello, world!");
        assert!(!result.is_error);
        assert_eq!(result.content.len(), 1);

        match &result.content[0] {
            ToolContent::Text { text } => assert_eq!(text, "Hello, world!"),
        }
    }

    #[test]
    fn tool_call_result_outcome() {
        let failure = ToolCallResult::outcome(&OperationResult::Failure("Book not found.".into()));
        assert!(failure.is_error);
        match &failure.content[0] {
            ToolContent::Text { text } => {
                assert_eq!(text, r#"{"kind":"Failure","message":"Book not found."}"#);
            }
        }
    }

    #[test]
    fn tools_require_initialisation() {
        let mut server = test_server();
        let reply = server.handle_line(r#"{"jsonrpc":"2.0","id":5,"method":"tools/list"}"#);
        let Some(Reply::Error(error)) = reply else {
            panic!("Expected an error");
        };
        assert_eq!(error.error.message, "Server not initialised");
    }

    #[test]
    fn initialise_twice_is_rejected() {
        let mut server = running_server();
        let init = r#"{"jsonrpc":"2.0","id":9,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#;
        assert!(matches!(server.handle_line(init), Some(Reply::Error(_))));
        assert_eq!(server.protocol_version(), Some(MCP_PROTOCOL_VERSION));
    }

    #[test]
    fn unknown_method_and_blank_line() {
        let mut server = running_server();
        assert!(server.handle_line("   ").is_none());

        let Some(Reply::Error(error)) =
            server.handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"books/list"}"#)
        else {
            panic!("Expected an error");
        };
        assert_eq!(error.error.code, -32601);
    }

    #[test]
    fn lending_flow_through_tools() {
        let mut server = running_server();

        let (is_error, text) = call(
            &mut server,
            "add_book",
            &json!({"title": "Dune", "author_name": "Frank Herbert", "isbn": "978-1", "total_copies": 1}),
        );
        assert!(!is_error);
        assert_eq!(
            text,
            r#"{"kind":"Success","message":"Book Dune added successfully"}"#
        );

        let loan = json!({"isbn": "978-1", "person_id": "p1"});

        let (is_error, _) = call(&mut server, "issue_book", &loan);
        assert!(!is_error);

        let (is_error, text) = call(&mut server, "issue_book", &loan);
        assert!(is_error);
        assert!(text.contains("Book not available for issue."));

        let (is_error, _) = call(&mut server, "return_book", &loan);
        assert!(!is_error);

        let book = server.registry().book(&BookId::new("978-1").unwrap()).unwrap();
        assert_eq!(book.available_copies(), 1);
    }

    #[test]
    fn argument_errors_leave_state_untouched() {
        let mut server = running_server();

        let (is_error, text) = call(
            &mut server,
            "add_book",
            &json!({"title": "Dune", "author_name": "Frank Herbert", "isbn": "978-1", "total_copies": -2}),
        );
        assert!(is_error);
        assert_eq!(
            text,
            "Invalid parameter 'total_copies': expected a non-negative integer"
        );

        let (is_error, text) = call(&mut server, "get_book_details", &json!({}));
        assert!(is_error);
        assert_eq!(text, "Missing required parameter: isbn");
        assert_eq!(server.registry().book_count(), 0);
    }

    #[test]
    fn blank_identifier_is_a_failure_outcome() {
        let mut server = running_server();
        let (is_error, text) = call(&mut server, "get_book_details", &json!({"isbn": "  "}));
        assert!(is_error);
        assert!(text.starts_with(r#"{"kind":"Failure""#));
    }

    #[test]
    fn unknown_tool() {
        let mut server = running_server();
        let (is_error, text) = call(&mut server, "delete_book", &json!({}));
        assert!(is_error);
        assert_eq!(text, "Unknown tool: delete_book");
    }
}
