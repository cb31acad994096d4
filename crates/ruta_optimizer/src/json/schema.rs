use schemars::schema_for;

use crate::{json::types, solver::route_plan::RoutePlan};

/// Schema of the optimization request.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonRoutePlanRequest))
}

/// Schema of the rendered plan.
pub fn generate_route_plan_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(RoutePlan))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_schema_lists_top_level_fields() {
        let schema: serde_json::Value =
            serde_json::from_str(&generate_json_schema().unwrap()).unwrap();
        let properties = schema["properties"].as_object().unwrap();

        for field in ["id", "planning_start", "date_range", "vehicles", "visits"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn test_route_plan_schema_is_valid_json() {
        assert!(generate_route_plan_schema().unwrap().contains("RoutePlan"));
    }
}
