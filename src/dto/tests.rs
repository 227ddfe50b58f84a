use super::*;
use serde_json::json;

#[test]
fn test_create_subject_dto_defaults() {
    let dto: CreateSubjectDto = serde_json::from_value(json!({ "name": "Mathematics" })).unwrap();
    assert_eq!(dto.id, None);
    assert_eq!(dto.name, "Mathematics");
    assert_eq!(dto.percentage, 0);
    assert!(dto.attendance.is_empty());
}

#[test]
fn test_create_subject_dto_requires_name() {
    let result = serde_json::from_value::<CreateSubjectDto>(json!({ "percentage": 40 }));
    assert!(result.is_err());
}

#[test]
fn test_update_subject_dto_is_partial() {
    let dto: UpdateSubjectDto = serde_json::from_value(json!({ "percentage": 64 })).unwrap();
    assert_eq!(dto, UpdateSubjectDto { percentage: Some(64), ..Default::default() });

    // Absent fields are not sent back over the wire
    assert_eq!(serde_json::to_value(&dto).unwrap(), json!({ "percentage": 64 }));
}

#[test]
fn test_goal_query_target_is_optional() {
    let query: GoalQuery = serde_json::from_value(json!({})).unwrap();
    assert_eq!(query.target, None);

    let query: GoalQuery = serde_json::from_value(json!({ "target": 80.5 })).unwrap();
    assert_eq!(query.target, Some(80.5));
}

#[test]
fn test_cell_update_dto_shape() {
    let dto = CellUpdateDto {
        week_key: "week-10-2025".to_string(),
        cell_id: "day-1-9:00 AM".to_string(),
        cell: Cell::new(1),
        applied: true,
    };

    let value = serde_json::to_value(&dto).unwrap();
    assert_eq!(value["cell"]["attendance_mark"], "unmarked");
    assert_eq!(value["cell"]["weekday"], 1);
    assert_eq!(value["applied"], true);
}
