use anyhow::Context;
use calculator_sdk::{HistoryRecord, Operator};
use chrono::DateTime;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "calculation_history")]
pub struct Model {
    /// Insertion order; breaks ties between equal timestamps.
    #[sea_orm(primary_key)]
    pub seq: i64,
    #[sea_orm(unique)]
    pub id: Uuid,
    /// Operator symbol (`+`, `-`, ...).
    pub operator: String,
    pub operand_a: f64,
    pub operand_b: f64,
    pub result: f64,
    /// Unix microseconds, UTC.
    pub created_at_us: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for HistoryRecord {
    type Error = anyhow::Error;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let operator = Operator::from_symbol(&model.operator).with_context(|| {
            format!(
                "history record {} has unknown operator '{}'",
                model.id, model.operator
            )
        })?;
        let created_at = DateTime::from_timestamp_micros(model.created_at_us).with_context(
            || {
                format!(
                    "history record {} has out-of-range timestamp {}",
                    model.id, model.created_at_us
                )
            },
        )?;

        Ok(HistoryRecord {
            id: model.id,
            operator,
            operand_a: model.operand_a,
            operand_b: model.operand_b,
            result: model.result,
            created_at,
        })
    }
}
