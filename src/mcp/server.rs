//! Gulper MCP Server Implementation
//!
//! Implements the MCP server with all Gulper tools.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{FoodEntryCreate, FoodEntryUpdate, MealType, UserProfileSave};
use crate::planner::{self, ActivityLevel, CalorieProfile, Clock, Gender, UnitSystem};
use crate::tools::status::StatusTracker;
use crate::tools::{meals, plan, profile, progress};

/// Gulper MCP Service
#[derive(Clone)]
pub struct GulperService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<GulperService>,
    clock: Arc<dyn Clock>,
    default_user: String,
}

impl GulperService {
    pub fn new(
        database_path: PathBuf,
        database: Database,
        clock: Arc<dyn Clock>,
        default_user: String,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
            clock,
            default_user,
        }
    }

    fn user_id(&self, user_id: Option<String>) -> String {
        user_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.default_user.clone())
    }

    /// Explicit `today` override, or the clock's date
    fn today(&self, today: Option<&str>) -> Result<NaiveDate, McpError> {
        match today {
            Some(s) => parse_date("today", s),
            None => Ok(self.clock.today()),
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, McpError> {
    planner::parse_date_iso(value)
        .map_err(|e| McpError::invalid_params(format!("{}: {}", field, e), None))
}

fn parse_gender(value: &str) -> Result<Gender, McpError> {
    Gender::from_str(value).ok_or_else(|| {
        McpError::invalid_params(
            format!("gender: expected male, female or other, got '{}'", value),
            None,
        )
    })
}

fn parse_units(value: Option<&str>) -> UnitSystem {
    value.map(UnitSystem::from_str).unwrap_or_default()
}

/// `{"error": message, key: value}` for lookups that found nothing
fn not_found(message: &str, key: &str, value: &str) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("error".to_string(), serde_json::Value::from(message));
    body.insert(key.to_string(), serde_json::Value::from(value));
    serde_json::Value::Object(body)
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Plan Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewPlanParams {
    /// male, female or other
    pub gender: String,
    /// sedentary, light or active
    #[serde(default)]
    pub activity_level: Option<String>,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub target_weight_kg: f64,
    /// kg per week, 0-1.0
    pub progress_rate: f64,
    /// metric or imperial, for display values
    pub units: Option<String>,
    /// YYYY-MM-DD; defaults to the server's local date
    pub today: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PaceForDateParams {
    pub current_weight_kg: f64,
    pub target_weight_kg: f64,
    /// Date the user wants to reach the goal by (YYYY-MM-DD)
    pub target_date: String,
    pub units: Option<String>,
    pub today: Option<String>,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveProfileParams {
    pub user_id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    pub photo_url: Option<String>,
    /// male, female or other
    pub gender: String,
    /// sedentary, light or active
    pub activity_level: Option<String>,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    /// metric or imperial
    pub units: Option<String>,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub target_weight_kg: f64,
    /// kg per week, 0-1.0
    pub progress_rate: f64,
    #[serde(default)]
    pub motivations: Vec<String>,
    pub today: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    /// Defaults to the configured user
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserTodayParams {
    pub user_id: Option<String>,
    pub today: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub user_id: Option<String>,
    /// Weight in `units`, or the profile's units when omitted
    pub weight: f64,
    pub units: Option<String>,
    pub today: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearDataParams {
    pub user_id: Option<String>,
    /// Must be true; deletes the profile, meals and weights
    #[serde(default)]
    pub confirm: bool,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMealParams {
    pub user_id: Option<String>,
    /// Client-chosen ID; generated when omitted
    pub id: Option<String>,
    pub food_name: String,
    pub calories: i64,
    /// breakfast, lunch, dinner or snack
    pub meal_type: Option<String>,
    /// Display time, e.g. "12:30 PM"
    pub time: Option<String>,
    /// YYYY-MM-DD; defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateMealParams {
    pub user_id: Option<String>,
    pub id: String,
    pub food_name: Option<String>,
    pub calories: Option<i64>,
    pub meal_type: Option<String>,
    pub time: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealIdParams {
    pub user_id: Option<String>,
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    pub user_id: Option<String>,
    /// Only meals on this date (YYYY-MM-DD)
    pub date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    pub user_id: Option<String>,
    /// YYYY-MM-DD; defaults to today
    pub date: Option<String>,
}

// ============================================================================
// Progress Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeightChartParams {
    pub user_id: Option<String>,
    /// Where to write the PNG
    pub output_path: String,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

fn default_chart_width() -> u32 { 800 }
fn default_chart_height() -> u32 { 400 }

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl GulperService {
    // --- Status ---

    #[tool(description = "Get the current status of the Gulper service including build info, database status, and process information")]
    async fn gulper_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let conn = self.database.get_conn().map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let status = tracker.get_status(&conn).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        json_result(&status)
    }

    #[tool(description = "Get instructions for onboarding, meal logging and progress tracking. Call this when starting a session or when unsure how to use the tools.")]
    fn gulper_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::GULPER_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(GULPER_INSTRUCTIONS)]))
    }

    // --- Plan ---

    #[tool(description = "Preview a plan without saving: BMI, BMR, TDEE, goal type, daily calorie target, weeks to goal and goal date")]
    fn preview_plan(&self, Parameters(p): Parameters<PreviewPlanParams>) -> Result<CallToolResult, McpError> {
        let today = self.today(p.today.as_deref())?;
        let profile = CalorieProfile {
            gender: parse_gender(&p.gender)?,
            activity_level: p.activity_level.as_deref().map(ActivityLevel::from_str).unwrap_or_default(),
            height: p.height_cm,
            current_weight: p.current_weight_kg,
            date_of_birth: parse_date("date_of_birth", &p.date_of_birth)?,
            target_weight: p.target_weight_kg,
            progress_rate: p.progress_rate,
        };
        let result = plan::preview_plan(&profile, parse_units(p.units.as_deref()), today)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Weekly pace needed to reach the target weight by a chosen date (clamped to 0.1-1.0 kg/week)")]
    fn pace_for_date(&self, Parameters(p): Parameters<PaceForDateParams>) -> Result<CallToolResult, McpError> {
        let today = self.today(p.today.as_deref())?;
        let target_date = parse_date("target_date", &p.target_date)?;
        let result = plan::pace_for_date(
            p.current_weight_kg,
            p.target_weight_kg,
            target_date,
            parse_units(p.units.as_deref()),
            today,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Profile ---

    #[tool(description = "Create or replace the user's profile. The daily calorie target is computed and stored.")]
    fn save_profile(&self, Parameters(p): Parameters<SaveProfileParams>) -> Result<CallToolResult, McpError> {
        let today = self.today(p.today.as_deref())?;
        let data = UserProfileSave {
            user_id: self.user_id(p.user_id),
            display_name: p.display_name,
            email: p.email,
            photo_url: p.photo_url,
            gender: parse_gender(&p.gender)?,
            activity_level: p.activity_level.as_deref().map(ActivityLevel::from_str).unwrap_or_default(),
            height_cm: p.height_cm,
            current_weight_kg: p.current_weight_kg,
            units: parse_units(p.units.as_deref()),
            date_of_birth: parse_date("date_of_birth", &p.date_of_birth)?,
            target_weight_kg: p.target_weight_kg,
            progress_rate: p.progress_rate,
            motivations: p.motivations,
            daily_calorie_target: 0,
        };
        let result = profile::save_profile(&self.database, data, today)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the user's profile with BMI and display values")]
    fn get_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let user_id = self.user_id(p.user_id);
        let result = profile::get_profile(&self.database, &user_id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => json_result(&profile),
            None => json_result(&not_found("Profile not found", "user_id", &user_id)),
        }
    }

    #[tool(description = "Mark onboarding as complete for the user")]
    fn complete_onboarding(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let user_id = self.user_id(p.user_id);
        let result = profile::complete_onboarding(&self.database, &user_id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log today's weight (replaces an earlier reading today). Updates the profile weight and recomputes the calorie target.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let today = self.today(p.today.as_deref())?;
        let user_id = self.user_id(p.user_id);
        let units = p.units.as_deref().map(UnitSystem::from_str);
        let result = profile::log_weight(&self.database, &user_id, p.weight, units, today)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Recompute and store the daily calorie target from the stored profile")]
    fn recalculate_target(&self, Parameters(p): Parameters<UserTodayParams>) -> Result<CallToolResult, McpError> {
        let today = self.today(p.today.as_deref())?;
        let user_id = self.user_id(p.user_id);
        let result = profile::recalculate_target(&self.database, &user_id, today)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete the user's profile, meals and weights. Requires confirm=true. Cannot be undone.")]
    fn clear_data(&self, Parameters(p): Parameters<ClearDataParams>) -> Result<CallToolResult, McpError> {
        if !p.confirm {
            return Err(McpError::invalid_params("clear_data requires confirm=true", None));
        }
        let user_id = self.user_id(p.user_id);
        let result = profile::clear_data(&self.database, &user_id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Meals ---

    #[tool(description = "Log a meal with a name and calories")]
    fn add_meal(&self, Parameters(p): Parameters<AddMealParams>) -> Result<CallToolResult, McpError> {
        let date = match p.date.as_deref() {
            Some(s) => parse_date("date", s)?,
            None => self.clock.today(),
        };
        let data = FoodEntryCreate {
            id: p.id,
            food_name: p.food_name,
            calories: p.calories,
            meal_type: p.meal_type.as_deref().map(MealType::from_str).unwrap_or_default(),
            time: p.time,
            date,
        };
        let user_id = self.user_id(p.user_id);
        let result = meals::add_meal(&self.database, &user_id, data).map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a logged meal. Only provided fields change.")]
    fn update_meal(&self, Parameters(p): Parameters<UpdateMealParams>) -> Result<CallToolResult, McpError> {
        let data = FoodEntryUpdate {
            food_name: p.food_name,
            calories: p.calories,
            meal_type: p.meal_type.as_deref().map(MealType::from_str),
            time: p.time,
            date: p.date.as_deref().map(|s| parse_date("date", s)).transpose()?,
        };
        let user_id = self.user_id(p.user_id);
        let result = meals::update_meal(&self.database, &user_id, &p.id, data)
            .map_err(|e| McpError::invalid_params(e, None))?;
        match result {
            Some(entry) => json_result(&entry),
            None => json_result(&not_found("Meal not found", "id", &p.id)),
        }
    }

    #[tool(description = "Delete a logged meal")]
    fn delete_meal(&self, Parameters(p): Parameters<MealIdParams>) -> Result<CallToolResult, McpError> {
        let user_id = self.user_id(p.user_id);
        let result = meals::delete_meal(&self.database, &user_id, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List meals newest first, or only the meals on a given date")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.as_deref().map(|s| parse_date("date", s)).transpose()?;
        let user_id = self.user_id(p.user_id);
        let result = meals::list_meals(&self.database, &user_id, date, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a day's meals grouped by meal type, with calories consumed and remaining")]
    fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let date = match p.date.as_deref() {
            Some(s) => parse_date("date", s)?,
            None => self.clock.today(),
        };
        let user_id = self.user_id(p.user_id);
        let result = meals::get_day(&self.database, &user_id, date).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Progress ---

    #[tool(description = "Progress overview: BMI, today's calories, 7-day calorie balance, weight trend and journey toward the goal date")]
    fn progress_summary(&self, Parameters(p): Parameters<UserTodayParams>) -> Result<CallToolResult, McpError> {
        let today = self.today(p.today.as_deref())?;
        let user_id = self.user_id(p.user_id);
        let result = progress::progress_summary(&self.database, &user_id, today)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Render logged weights and the goal line to a PNG file")]
    fn generate_weight_chart(&self, Parameters(p): Parameters<WeightChartParams>) -> Result<CallToolResult, McpError> {
        let user_id = self.user_id(p.user_id);
        let path = PathBuf::from(&p.output_path);
        let result = progress::generate_weight_chart(&self.database, &user_id, &path, p.width, p.height)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for GulperService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "gulper".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Gulper calorie & weight planner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Gulper - calorie target planning, meal logging and weight tracking. \
                 IMPORTANT: Call gulper_instructions first. \
                 Plan: preview_plan, pace_for_date. \
                 Profile: save_profile/get_profile/complete_onboarding, log_weight, recalculate_target. \
                 Meals: add_meal/update_meal/delete_meal/list_meals, get_day. \
                 Progress: progress_summary, generate_weight_chart. \
                 clear_data requires confirm=true. \
                 Dates are YYYY-MM-DD; user_id defaults to the configured user."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::planner::FixedClock;

    fn service() -> GulperService {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
        GulperService::new(PathBuf::from(":memory:"), db, clock, "local".to_string())
    }

    #[test]
    fn test_user_id_defaults() {
        let s = service();
        assert_eq!(s.user_id(None), "local");
        assert_eq!(s.user_id(Some("".to_string())), "local");
        assert_eq!(s.user_id(Some("alex".to_string())), "alex");
    }

    #[test]
    fn test_today_override_and_clock() {
        let s = service();
        assert_eq!(s.today(None).unwrap(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(
            s.today(Some("2026-01-02")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
        );
        assert!(s.today(Some("yesterday")).is_err());
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("Female").unwrap(), Gender::Female);
        assert!(parse_gender("robot").is_err());
    }

    #[test]
    fn test_not_found_escapes_client_values() {
        let id = r#"x"}, "injected": "\"#;
        let body = not_found("Meal not found", "id", id);
        let text = serde_json::to_string(&body).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["error"], "Meal not found");
        assert_eq!(parsed["id"], id);
        assert!(parsed.get("injected").is_none());
    }

    #[test]
    fn test_server_info() {
        let info = service().get_info();
        assert_eq!(info.server_info.name, "gulper");
        assert!(info.capabilities.tools.is_some());
    }
}
