//! Weather tools backed by static mock data.

use super::{ArgSpec, InputSchema, McpTool, ToolArguments};
use crate::formatters::ResultCard;

const DEFAULT_CITY: &str = "Paris";
const DEFAULT_COUNTRY: &str = "FR";
const DEFAULT_REGION: &str = "France";

fn city_schema(city_desc: &'static str, country_desc: &'static str) -> InputSchema {
    InputSchema::new()
        .arg(ArgSpec::string("city", city_desc).default_text(DEFAULT_CITY))
        .arg(ArgSpec::string("country_code", country_desc).default_text(DEFAULT_COUNTRY))
}

fn location(args: &ToolArguments) -> (&str, &str) {
    (args.text("city").unwrap_or(DEFAULT_CITY), args.text("country_code").unwrap_or(DEFAULT_COUNTRY))
}

/// Current conditions for a city.
pub struct WeatherForecastTool;

#[async_trait::async_trait]
impl McpTool for WeatherForecastTool {
    fn name(&self) -> &'static str {
        "get_weather_forecast"
    }

    fn description(&self) -> &'static str {
        "Get current weather forecast for a city"
    }

    fn input_schema(&self) -> InputSchema {
        city_schema(
            "Name of the city (e.g., Paris, Lyon, Marseille)",
            "ISO 3166-1 alpha-2 country code (default: FR)",
        )
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let (city, country) = location(args);
        ResultCard::new(format!("Weather for {city}, {country}"))
            .line("Conditions", "Partly cloudy")
            .line("Temperature", "12°C")
            .line("Feels like", "10°C")
            .line("Humidity", "65%")
            .line("Wind", "15 km/h")
            .timestamp("Updated")
            .render()
    }
}

/// Active alerts for a region.
pub struct WeatherAlertsTool;

#[async_trait::async_trait]
impl McpTool for WeatherAlertsTool {
    fn name(&self) -> &'static str {
        "get_weather_alerts"
    }

    fn description(&self) -> &'static str {
        "Get active weather alerts for a region"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new().arg(ArgSpec::string("region", "Region or country name").default_text(DEFAULT_REGION))
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let region = args.text("region").unwrap_or(DEFAULT_REGION);
        let today = chrono::Local::now().format("%Y-%m-%d");
        ResultCard::new(format!("Weather alerts for {region}"))
            .text("Yellow warning - Wind")
            .text("  Regions: Normandy, Brittany")
            .text(format!("  Valid: {today} 06:00 - 18:00"))
            .text("No major alerts")
            .text("  The rest of the territory is on green alert.")
            .timestamp("Last updated")
            .render()
    }
}

/// UV index for a city.
pub struct UvIndexTool;

#[async_trait::async_trait]
impl McpTool for UvIndexTool {
    fn name(&self) -> &'static str {
        "get_uv_index"
    }

    fn description(&self) -> &'static str {
        "Get UV index for a city"
    }

    fn input_schema(&self) -> InputSchema {
        city_schema("Name of the city", "ISO country code")
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let (city, country) = location(args);
        ResultCard::new(format!("UV index for {city}, {country}"))
            .line("UV index", 5)
            .line("Level", "Moderate")
            .line("Advice", "Protection needed: sunglasses, SPF 30+ sunscreen")
            .date("Date")
            .render()
    }
}
