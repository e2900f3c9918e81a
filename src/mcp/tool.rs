//! The `get_meal_menu` tool
//!
//! Arguments carry their own JSON schema via `JsonSchema`; the doc comments on
//! [`GetMealMenuArgs`] become the parameter descriptions the LLM sees.
//!
//! Each call fetches a fresh feed from the configured source, then hands it to
//! the pure formatter in [`crate::menu`].

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::protocol::{JsonRpcError, ToolCallResult, ToolInfo};
use crate::menu::{format_menu, MenuError, MenuQuery};
use crate::source::FeedSource;

pub const TOOL_NAME: &str = "get_meal_menu";

pub const TOOL_DESCRIPTION: &str = "\
지정된 날짜(YYYY-MM-DD)의 SSAFY 서울 캠퍼스 식단을 층별로, 요일과 함께 반환합니다. \
날짜를 생략하면 데이터에 있는 가장 최근 날짜의 식단을 보여줍니다.";

/// Floor value that disables the configured default floor
pub const ALL_FLOORS: &str = "all";

/// Arguments of `get_meal_menu`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct GetMealMenuArgs {
    /// 조회할 날짜 (YYYY-MM-DD 형식). '오늘', '내일' 같은 표현은 호출 전에 YYYY-MM-DD로 변환해야 합니다.
    /// 생략하거나 "latest"를 주면 가장 최근 날짜를 사용합니다.
    #[serde(default)]
    pub date: Option<String>,

    /// 조회할 층 (예: "10F", "20F"). 대소문자를 구분하지 않습니다.
    /// 생략하면 기본 층 설정을 따르고, "all"이면 모든 층을 보여줍니다.
    #[serde(default)]
    pub floor: Option<String>,
}

/// `get_meal_menu` bound to a feed source
#[derive(Clone)]
pub struct MenuTool {
    source: Arc<dyn FeedSource>,
    default_floor: Option<String>,
}

/// True for a floor value meaning "no filter": blank or "all" in any case
pub fn selects_all_floors(floor: &str) -> bool {
    let floor = floor.trim();
    floor.is_empty() || floor.eq_ignore_ascii_case(ALL_FLOORS)
}

impl MenuTool {
    pub fn new(source: Arc<dyn FeedSource>, default_floor: Option<String>) -> Self {
        Self {
            source,
            default_floor: default_floor.filter(|f| !selects_all_floors(f)),
        }
    }

    /// Entry for tools/list
    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            input_schema: input_schema(),
        }
    }

    /// Apply the default floor: a missing floor takes the default, "all" or "" clears it
    pub fn query(&self, args: GetMealMenuArgs) -> MenuQuery {
        let floor = match args.floor {
            None => self.default_floor.clone(),
            Some(f) if selects_all_floors(&f) => None,
            Some(f) => Some(f),
        };
        MenuQuery { date: args.date, floor }
    }

    /// Fetch the feed and format the requested menu
    pub async fn call(&self, args: GetMealMenuArgs) -> Result<String, MenuError> {
        let query = self.query(args);
        let feed = self.source.fetch().await.map_err(|e| {
            tracing::warn!(source = %self.source.describe(), error = %e, "feed fetch failed");
            MenuError::from(e)
        })?;
        format_menu(&feed, &query)
    }

    /// tools/call entry point
    ///
    /// Hard failures are returned as `isError` results so the LLM can read
    /// the message and retry with corrected arguments. A floor with no menu
    /// that day is an ordinary answer.
    pub async fn call_json(&self, arguments: Option<Value>) -> Result<ToolCallResult, JsonRpcError> {
        let args: GetMealMenuArgs = match arguments {
            None | Some(Value::Null) => GetMealMenuArgs::default(),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid arguments: {}", e)))?,
        };

        Ok(match self.call(args).await {
            Ok(report) => ToolCallResult::text(report),
            Err(e) if e.is_soft() => ToolCallResult::text(e.to_string()),
            Err(e) => ToolCallResult::error(e.to_string()),
        })
    }
}

/// JSON schema of the tool arguments
pub fn input_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(GetMealMenuArgs).schema).unwrap_or(Value::Null)
}

/// Full tool metadata (printed by `bobmenu menu --schema`)
pub fn metadata() -> Value {
    serde_json::json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "input_schema": input_schema(),
        "output_schema": serde_json::to_value(schemars::schema_for!(String).schema)
            .unwrap_or(Value::Null),
    })
}
