use serde::Serialize;

/// Body of `POST /api/records/` and `PATCH /api/records/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordInput {
    pub start: i64,
    pub end: Option<i64>,
    pub name: String,
    pub tags: String,
}
