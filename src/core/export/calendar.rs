//! Daily reading calendar
//!
//! Builds `calendar.json`: one object per reading cycle, keyed by `M/D/YYYY`
//! date strings, covering yesterday through the configured horizon.

use crate::adapters::corpus::{CalendarCycle, CalendarRecord, CalendarSource, Corpus};
use crate::domain::{QuireError, Result, TextRef};
use chrono::{Datelike, Duration, NaiveDate};
use serde_json::{json, Map, Value};

const RAMBAM_PREFIX_EN: &str = "Mishneh Torah, ";
const RAMBAM_PREFIX_HE: &str = "משנה תורה, ";

/// Calendar date key, `M/D/YYYY` without zero padding
pub fn date_key(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// First and last day covered by a calendar generated on `today`
pub fn calendar_window(today: NaiveDate, horizon_days: u32) -> (NaiveDate, NaiveDate) {
    let from = today - Duration::days(1);
    (from, from + Duration::days(i64::from(horizon_days)))
}

/// Build the calendar artifact
///
/// Records whose reference cannot be resolved are skipped with a warning.
///
/// # Errors
///
/// Fails if the calendar source fails or the corpus fails for a reason other
/// than an unknown reference.
pub async fn build_calendar(
    corpus: &dyn Corpus,
    source: &dyn CalendarSource,
    today: NaiveDate,
    horizon_days: u32,
) -> Result<Value> {
    let (from, until) = calendar_window(today, horizon_days);
    let mut calendar = Map::new();

    for cycle in CalendarCycle::ALL {
        let mut days = Map::new();
        for record in source.entries(cycle, from, until).await? {
            let Some(reference) = resolve(corpus, cycle, &record).await? else {
                continue;
            };
            let key = date_key(record.date);
            let entry = calendar_entry(cycle, &reference, &record);

            if cycle == CalendarCycle::Mishnah {
                if let Value::Array(list) =
                    days.entry(key).or_insert_with(|| Value::Array(Vec::new()))
                {
                    list.push(entry);
                }
            } else {
                days.insert(key, entry);
            }
        }

        tracing::debug!(cycle = cycle.key(), days = days.len(), "Built calendar cycle");
        calendar.insert(cycle.key().to_string(), Value::Object(days));
    }

    Ok(Value::Object(calendar))
}

async fn resolve(
    corpus: &dyn Corpus,
    cycle: CalendarCycle,
    record: &CalendarRecord,
) -> Result<Option<TextRef>> {
    match corpus.resolve_ref(&record.reference).await {
        Ok(reference) => Ok(Some(reference)),
        Err(QuireError::Resolution(e)) => {
            tracing::warn!(
                cycle = cycle.key(),
                date = %record.date,
                reference = %record.reference,
                error = %e,
                "Skipping calendar entry with unresolvable reference"
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn calendar_entry(cycle: CalendarCycle, reference: &TextRef, record: &CalendarRecord) -> Value {
    let mut entry = Map::new();

    if cycle == CalendarCycle::Parasha {
        for (key, value) in &record.extra {
            entry.insert(key.clone(), value.clone());
        }
    }

    entry.insert(
        "ref".to_string(),
        json!({"en": reference.normal, "he": reference.he_normal}),
    );

    if cycle == CalendarCycle::Rambam {
        entry.insert(
            "displayValue".to_string(),
            json!({
                "en": reference.normal.replace(RAMBAM_PREFIX_EN, ""),
                "he": reference.he_normal.replace(RAMBAM_PREFIX_HE, ""),
            }),
        );
    }

    Value::Object(entry)
}
