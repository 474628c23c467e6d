//! MCP server: the rhyme engine as tools for editor plugins and assistants.
//!
//! Every tool reads one shared, immutable rhyme bank loaded at startup, and
//! text arguments are checked against the configured input limit before any
//! work happens. Results are JSON text content.
//!
//! | Tool | Core call |
//! |---|---|
//! | `get_info` | package metadata, bank summary, limits |
//! | `get_rhymes` | [`get_rhymes`] |
//! | `search_rhyme_words` | [`search_rhyme_words`] |
//! | `word_at_cursor` | [`word_bounds_at_cursor`] + [`get_rhymes`] |
//! | `lyric_stats` | [`LyricStats::from_lyrics`] |

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use orphan_studio_core::studio::LyricStats;
use orphan_studio_core::{
    DEFAULT_SEARCH_LIMIT, DEFAULT_SUGGESTION_LIMIT, EXPLORE_SUGGESTION_LIMIT, RhymeData,
    RhymeResults, get_rhymes, load_rhyme_data, sanitize_word, search_rhyme_words,
    word_bounds_at_cursor,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `get_rhymes` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetRhymesParams {
    /// The word to find rhymes for.
    pub word: String,
    /// Maximum suggestions per category.
    pub limit: Option<usize>,
    /// Use the larger explore-view limit when `limit` is omitted.
    #[serde(default)]
    pub explore: bool,
}

/// Parameters for the `search_rhyme_words` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchRhymeWordsParams {
    /// Text to look for inside words.
    pub query: String,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

/// Parameters for the `word_at_cursor` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct WordAtCursorParams {
    /// The lyrics text.
    pub text: String,
    /// Caret position in characters. Omit for the end of the text.
    pub cursor: Option<usize>,
    /// Also return suggestions for the word.
    #[serde(default)]
    pub include_rhymes: bool,
}

/// Parameters for the `lyric_stats` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LyricStatsParams {
    /// The lyrics text.
    pub text: String,
}

/// Limits applied to tool calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerLimits {
    /// Default suggestions per category.
    pub suggestion_limit: usize,
    /// Suggestions per category in explore mode.
    pub explore_limit: usize,
    /// Default search results.
    pub search_limit: usize,
    /// Maximum text size in bytes; `None` disables the check.
    pub max_input: Option<usize>,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            explore_limit: EXPLORE_SUGGESTION_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
            max_input: Some(orphan_studio_core::config::DEFAULT_MAX_INPUT_BYTES),
        }
    }
}

#[derive(Serialize)]
struct RhymesReport {
    word: String,
    #[serde(flatten)]
    rhymes: RhymeResults,
}

#[derive(Serialize)]
struct SearchReport {
    query: String,
    results: Vec<String>,
}

#[derive(Serialize)]
struct CursorReport {
    word: String,
    start: usize,
    end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    rhymes: Option<RhymeResults>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

/// MCP server exposing the rhyme engine to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    data: Arc<RhymeData>,
    limits: ServerLimits,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server over the bundled rhyme bank with default limits.
    pub fn new() -> Self {
        Self::with_data(
            Arc::new(load_rhyme_data(None).into_data()),
            ServerLimits::default(),
        )
    }

    /// Create a server over `data`.
    pub fn with_data(data: Arc<RhymeData>, limits: ServerLimits) -> Self {
        Self {
            data,
            limits,
            tool_router: Self::tool_router(),
        }
    }

    fn check_input(&self, text: &str) -> Result<(), McpError> {
        match self.limits.max_input {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Package metadata, the loaded bank and the active limits.
    #[tool(description = "Describe the rhyme engine: version, rhyme bank size and suggestion limits")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let bank = self.data.summary();
        let text = if params.format == "json" {
            to_json(&serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "rhyme_bank": bank,
                "limits": {
                    "suggestion": self.limits.suggestion_limit,
                    "explore": self.limits.explore_limit,
                    "search": self.limits.search_limit,
                    "max_input_bytes": self.limits.max_input,
                },
            }))?
        } else {
            format!(
                "{} v{}\nrhyme bank: {} dictionary entries, {} ending groups, {} words\nlimits: {} live / {} explore / {} search",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                bank.dictionary_entries,
                bank.ending_groups,
                bank.word_bank_words,
                self.limits.suggestion_limit,
                self.limits.explore_limit,
                self.limits.search_limit,
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Rhyme suggestions for one word.
    #[tool(
        description = "Get perfect, near and family rhyme suggestions for a word from the rhyme bank."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", word = %params.word))]
    fn get_rhymes(
        &self,
        Parameters(params): Parameters<GetRhymesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_rhymes", limit = ?params.limit, "executing MCP tool");
        self.check_input(&params.word)?;

        let limit = params.limit.unwrap_or(if params.explore {
            self.limits.explore_limit
        } else {
            self.limits.suggestion_limit
        });
        let report = RhymesReport {
            word: sanitize_word(&params.word),
            rhymes: get_rhymes(&params.word, Some(&self.data), limit),
        };

        tracing::info!(
            tool = "get_rhymes",
            perfect = report.rhymes.perfect.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &report,
        )?)]))
    }

    /// Substring search over the rhyme vocabulary.
    #[tool(
        description = "Search the rhyme vocabulary for words containing a query. Prefix matches and shorter words come first."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", query = %params.query))]
    fn search_rhyme_words(
        &self,
        Parameters(params): Parameters<SearchRhymeWordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "search_rhyme_words", limit = ?params.limit, "executing MCP tool");
        self.check_input(&params.query)?;

        let limit = params.limit.unwrap_or(self.limits.search_limit);
        let report = SearchReport {
            query: sanitize_word(&params.query),
            results: search_rhyme_words(&params.query, Some(&self.data), limit),
        };

        tracing::info!(
            tool = "search_rhyme_words",
            results = report.results.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &report,
        )?)]))
    }

    /// Word under a caret position.
    #[tool(
        description = "Find the word touching a caret position in lyrics text, optionally with its rhyme suggestions."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn word_at_cursor(
        &self,
        Parameters(params): Parameters<WordAtCursorParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "word_at_cursor", cursor = ?params.cursor, "executing MCP tool");
        self.check_input(&params.text)?;

        let cursor = params
            .cursor
            .unwrap_or_else(|| params.text.chars().count());
        let bounds = word_bounds_at_cursor(&params.text, cursor);
        let raw: String = params
            .text
            .chars()
            .skip(bounds.start)
            .take(bounds.len())
            .collect();
        let word = sanitize_word(&raw);
        let rhymes = params
            .include_rhymes
            .then(|| get_rhymes(&word, Some(&self.data), self.limits.suggestion_limit));
        let report = CursorReport {
            word,
            start: bounds.start,
            end: bounds.end,
            rhymes,
        };

        tracing::info!(tool = "word_at_cursor", word = %report.word, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &report,
        )?)]))
    }

    /// Word, line and character counts.
    #[tool(description = "Count words, lines and characters in lyrics text.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn lyric_stats(
        &self,
        Parameters(params): Parameters<LyricStatsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "lyric_stats", "executing MCP tool");
        self.check_input(&params.text)?;

        let stats = LyricStats::from_lyrics(&params.text);

        tracing::info!(tool = "lyric_stats", words = stats.words, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &stats,
        )?)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use tools to look up rhymes, search the rhyme vocabulary and inspect lyrics.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn test_server() -> ProjectServer {
        let data = RhymeData::from_json_str(
            r#"{"dictionary": {"light": {"perfect": ["night", "sight"], "near": ["bright"], "family": ["dark"]}},
                "endings": [{"key": "-ight", "words": ["light", "night", "tight", "flight"]}],
                "wordBank": ["night", "sight", "delight", "lighthouse"]}"#,
        )
        .expect("valid test bank");
        ProjectServer::with_data(Arc::new(data), ServerLimits::default())
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn server_has_tools_capability() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn server_has_instructions() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn extract_json(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("output should be valid JSON")
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = ProjectServer::new();
        let params = Parameters(GetInfoParams {
            format: "text".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");

        assert!(!result.is_error.unwrap_or(false));
        assert!(!result.content.is_empty());

        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains("limits: 18 live / 140 explore / 120 search"));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = test_server();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let json = extract_json(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["rhyme_bank"]["dictionary_entries"], 1);
        assert_eq!(json["limits"]["suggestion"], 18);
        assert_eq!(json["limits"]["max_input_bytes"], 5 * 1024 * 1024);
    }

    #[test]
    fn get_rhymes_tool_uses_dictionary() {
        let server = test_server();
        let params = Parameters(GetRhymesParams {
            word: "Light!".to_string(),
            limit: None,
            explore: false,
        });

        let result = server.get_rhymes(params).expect("get_rhymes should succeed");
        let json = extract_json(&result);
        assert_eq!(json["word"], "light");
        assert_eq!(json["perfect"], serde_json::json!(["night", "sight"]));
        assert_eq!(json["near"], serde_json::json!(["bright"]));
        assert_eq!(json["family"], serde_json::json!(["dark"]));
    }

    #[test]
    fn get_rhymes_tool_falls_back_to_endings() {
        let server = test_server();
        let params = Parameters(GetRhymesParams {
            word: "moonlight".to_string(),
            limit: Some(2),
            explore: false,
        });

        let result = server.get_rhymes(params).expect("get_rhymes should succeed");
        let json = extract_json(&result);
        assert_eq!(json["perfect"], serde_json::json!(["light", "night"]));
    }

    #[test]
    fn search_tool_ranks_prefix_first() {
        let server = test_server();
        let params = Parameters(SearchRhymeWordsParams {
            query: "light".to_string(),
            limit: None,
        });

        let result = server
            .search_rhyme_words(params)
            .expect("search_rhyme_words should succeed");
        let json = extract_json(&result);
        assert_eq!(
            json["results"],
            serde_json::json!(["light", "lighthouse", "delight"])
        );
    }

    #[test]
    fn word_at_cursor_tool_reports_bounds() {
        let server = test_server();
        let params = Parameters(WordAtCursorParams {
            text: "into the light".to_string(),
            cursor: Some(10),
            include_rhymes: true,
        });

        let result = server
            .word_at_cursor(params)
            .expect("word_at_cursor should succeed");
        let json = extract_json(&result);
        assert_eq!(json["word"], "light");
        assert_eq!(json["start"], 9);
        assert_eq!(json["end"], 14);
        assert_eq!(json["rhymes"]["perfect"][0], "night");
    }

    #[test]
    fn word_at_cursor_tool_defaults_to_end() {
        let server = test_server();
        let params = Parameters(WordAtCursorParams {
            text: "end of the line.".to_string(),
            cursor: None,
            include_rhymes: false,
        });

        let result = server
            .word_at_cursor(params)
            .expect("word_at_cursor should succeed");
        let json = extract_json(&result);
        assert_eq!(json["word"], "");
        assert!(json.get("rhymes").is_none());
    }

    #[test]
    fn lyric_stats_tool_counts() {
        let server = test_server();
        let params = Parameters(LyricStatsParams {
            text: "a b\nc".to_string(),
        });

        let result = server
            .lyric_stats(params)
            .expect("lyric_stats should succeed");
        let json = extract_json(&result);
        assert_eq!(json["words"], 3);
        assert_eq!(json["lines"], 2);
        assert_eq!(json["chars"], 5);
    }

    #[test]
    fn oversized_text_is_rejected() {
        let data = Arc::new(RhymeData::empty());
        let limits = ServerLimits {
            max_input: Some(4),
            ..ServerLimits::default()
        };
        let server = ProjectServer::with_data(data, limits);
        let params = Parameters(LyricStatsParams {
            text: "too long".to_string(),
        });

        assert!(server.lyric_stats(params).is_err());

        let params = Parameters(GetRhymesParams {
            word: "moonlight".to_string(),
            limit: None,
            explore: false,
        });
        assert!(server.get_rhymes(params).is_err());

        let params = Parameters(SearchRhymeWordsParams {
            query: "flight".to_string(),
            limit: None,
        });
        assert!(server.search_rhyme_words(params).is_err());

        let params = Parameters(SearchRhymeWordsParams {
            query: "ight".to_string(),
            limit: None,
        });
        assert!(server.search_rhyme_words(params).is_ok());
    }
}
