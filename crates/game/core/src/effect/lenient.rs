//! Forward-compatible applicator deserialization.
//!
//! Content may name effect contexts newer than this engine. Those applicators
//! are dropped with a warning instead of failing the whole catalog load.

use serde::{Deserialize, Deserializer};

use super::{Applicator, Condition, EffectContext, ModifierType};

#[derive(Deserialize)]
struct ApplicatorRecord {
    context: String,
    modifier_type: ModifierType,
    value: f64,
    #[serde(default)]
    condition: Condition,
}

pub(crate) fn applicators<'de, D>(deserializer: D) -> Result<Vec<Applicator>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Vec::<ApplicatorRecord>::deserialize(deserializer)?;
    Ok(records
        .into_iter()
        .filter_map(|record| match EffectContext::parse(&record.context) {
            Ok(context) => Some(Applicator {
                context,
                modifier_type: record.modifier_type,
                value: record.value,
                condition: record.condition,
            }),
            Err(err) => {
                tracing::warn!(context = %record.context, "{err}, applicator ignored");
                None
            }
        })
        .collect())
}
