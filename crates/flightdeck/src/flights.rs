pub mod client;

use anyhow::Result;
use async_trait::async_trait;
use indoc::indoc;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall, ToolParameter};
use crate::systems::System;

use self::client::{AviationstackConfig, FlightLookupClient, FlightQuery};

pub const SEARCH_FLIGHTS_TOOL: &str = "search_flights";

/// Exposes flight lookup as the single `search_flights` tool.
pub struct FlightSystem {
    client: FlightLookupClient,
    tools: Vec<Tool>,
}

impl FlightSystem {
    pub fn new(config: AviationstackConfig) -> Result<Self> {
        Ok(Self {
            client: FlightLookupClient::new(config)?,
            tools: vec![search_flights_tool()],
        })
    }
}

fn search_flights_tool() -> Tool {
    Tool::new(
        SEARCH_FLIGHTS_TOOL,
        "Search for real-time and historical flight information using Aviationstack API. \
         Use this when users ask about flight status, flight schedules, or want to search \
         for flights. You can search by flight number, departure/arrival airports, flight \
         date, or airline.",
        vec![
            ToolParameter::string(
                "flight_number",
                "Flight number in IATA format (e.g., 'AA100', 'DL200'). Leave empty if searching by route.",
            ),
            ToolParameter::string(
                "dep_iata",
                "Departure airport IATA code (e.g., 'JFK', 'LAX', 'LHR'). Use 3-letter airport codes.",
            ),
            ToolParameter::string(
                "arr_iata",
                "Arrival airport IATA code (e.g., 'JFK', 'LAX', 'LHR'). Use 3-letter airport codes.",
            ),
            ToolParameter::string(
                "flight_date",
                "Flight date in YYYY-MM-DD format (e.g., '2026-01-29'). Optional, defaults to today if not specified.",
            ),
            ToolParameter::string(
                "airline_iata",
                "Airline IATA code (e.g., 'AA' for American Airlines, 'DL' for Delta). Optional.",
            ),
        ],
    )
}

#[async_trait]
impl System for FlightSystem {
    fn name(&self) -> &str {
        "flights"
    }

    fn description(&self) -> &str {
        "Real-time flight search backed by the Aviationstack API"
    }

    fn instructions(&self) -> &str {
        indoc! {"
            Your primary role is to help users search for flights, check flight status,
            and find flight schedules using real-time flight data from Aviationstack API.

            When users ask about flights, flight schedules, or flight status, you should
            proactively use the search_flights tool to retrieve accurate, up-to-date
            information. You can search by:
            - Flight number (e.g., \"AA100\")
            - Departure and arrival airports (using IATA codes like JFK, LAX, LHR)
            - Flight date (YYYY-MM-DD format)
            - Airline (using IATA codes like AA, DL, UA)

            When presenting flight information, format it in an easy-to-read manner. If
            flight information is unavailable or cannot be found, clearly inform the user.
            Always use the search_flights tool when users ask flight-related questions
            rather than making assumptions.
        "}
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<String> {
        match tool_call.name.as_str() {
            SEARCH_FLIGHTS_TOOL => {
                let query = FlightQuery::from_arguments(&tool_call.arguments);
                Ok(self.client.search(&query).await)
            }
            _ => Err(AgentError::ToolNotFound(tool_call.name)),
        }
    }
}
