use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::error::SearchError;
use crate::formatters::{format_history, format_outcome};
use crate::models::{RemoveCityRequest, SearchWeatherRequest};
use crate::orchestrator::Orchestrator;

/// MCP front end over the city search core
#[derive(Clone)]
pub struct WeatherServer {
    core: Arc<Orchestrator>,
    tool_router: ToolRouter<Self>,
}

impl WeatherServer {
    pub fn new(core: Arc<Orchestrator>) -> Result<Self> {
        Ok(Self {
            core,
            tool_router: Self::tool_router(),
        })
    }

    fn to_mcp_error(err: SearchError) -> McpError {
        let message = format!("{} ({})", err.user_message(), err);
        if err.is_user_error() {
            McpError::invalid_params(message, None)
        } else {
            McpError::internal_error(message, None)
        }
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "city-weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Looks up current weather and a 5-day outlook for a city via OpenWeatherMap, \
                and remembers the cities you've searched."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl WeatherServer {
    /// Searches a city and returns current conditions plus the daily outlook
    #[tool(description = "Get current weather and a 5-day forecast for a city. Accepts 'City', 'City, State' or 'City, State, CountryCode' (e.g. 'Tokyo', 'Springfield, IL, US').")]
    async fn search_weather(
        &self,
        Parameters(request): Parameters<SearchWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Searching weather for: {}", request.location);

        let outcome = self
            .core
            .search(&request.location)
            .await
            .map_err(Self::to_mcp_error)?;

        let config = self.core.config();
        let mut text = format_outcome(&outcome, config.units, &config.icon_url);
        text.push('\n');
        text.push_str(&format_history(&self.core.history()));

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Lists previously searched cities
    #[tool(description = "List previously searched cities, oldest first.")]
    async fn list_history(&self) -> Result<CallToolResult, McpError> {
        let text = format_history(&self.core.history());
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Removes a city from the saved list
    #[tool(description = "Remove a city from the saved search history. Matching is case-insensitive.")]
    async fn remove_city(
        &self,
        Parameters(request): Parameters<RemoveCityRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Removing city: {}", request.name);

        let removed = self
            .core
            .remove_from_history(&request.name)
            .map_err(Self::to_mcp_error)?;

        let mut text = if removed {
            format!("Removed {}.\n\n", request.name.trim())
        } else {
            format!("{} was not in the saved list.\n\n", request.name.trim())
        };
        text.push_str(&format_history(&self.core.history()));

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}
