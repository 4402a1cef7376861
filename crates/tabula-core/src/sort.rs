// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::{FieldKind, FieldRef, Record, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, order: Ordering) -> Ordering {
        match self {
            Self::Asc => order,
            Self::Desc => order.reverse(),
        }
    }
}

/// The single active sort key. `key: None` keeps the filtered order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Same key flips direction; a new key starts ascending.
    pub fn toggle(&mut self, key: &str) -> SortDirection {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flip();
        } else {
            self.key = Some(key.to_owned());
            self.direction = SortDirection::Asc;
        }
        self.direction
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::Asc;
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some()
    }
}

/// Ascending comparison of two values of a `kind` column. Missing values,
/// and values of another kind, sort lowest.
pub fn compare_fields(
    left: Option<FieldRef<'_>>,
    right: Option<FieldRef<'_>>,
    kind: FieldKind,
) -> Ordering {
    let left = left.filter(|value| value.kind() == kind);
    let right = right.filter(|value| value.kind() == kind);
    match (left, right) {
        (Some(left), Some(right)) => left.cmp_same_kind(&right).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns a new, stably sorted sequence. The input is left untouched and
/// an unset or unknown key returns it in its original order.
pub fn sort_records<'r, R: Record>(
    records: &[&'r R],
    sort: &SortState,
    schema: &Schema,
) -> Vec<&'r R> {
    let Some(key) = sort.key.as_deref() else {
        return records.to_vec();
    };
    let Some(descriptor) = schema.field(key) else {
        tracing::debug!(key, "ignoring unknown sort key");
        return records.to_vec();
    };

    let mut keyed: Vec<(Option<FieldRef<'r>>, &'r R)> = records
        .iter()
        .map(|&record| (record.field(key), record))
        .collect();
    keyed.sort_by(|(left, _), (right, _)| {
        sort.direction
            .apply(compare_fields(*left, *right, descriptor.kind))
    });
    keyed.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, SortState, compare_fields, sort_records};
    use crate::ids::RecordId;
    use crate::model::{FieldDescriptor, FieldKind, FieldRef, Record, Schema};
    use std::cmp::Ordering;
    use time::{Date, Month};

    struct Row {
        id: i64,
        name: &'static str,
        score: Option<f64>,
        due: Date,
    }

    impl Record for Row {
        fn id(&self) -> RecordId {
            RecordId::new(self.id)
        }

        fn field(&self, name: &str) -> Option<FieldRef<'_>> {
            match name {
                "id" => Some(FieldRef::Number(self.id as f64)),
                "name" => Some(FieldRef::Text(self.name)),
                "score" => self.score.map(FieldRef::Number),
                "due" => Some(FieldRef::Date(self.due)),
                _ => None,
            }
        }
    }

    const FIELDS: [FieldDescriptor; 4] = [
        FieldDescriptor::new("id", "ID", FieldKind::Number),
        FieldDescriptor::new("name", "Name", FieldKind::Text),
        FieldDescriptor::new("score", "Score", FieldKind::Number),
        FieldDescriptor::new("due", "Due", FieldKind::Date),
    ];
    const SCHEMA: Schema = Schema::new(&FIELDS, &[]);

    fn due(day: u8) -> Date {
        Date::from_calendar_date(2025, Month::June, day).expect("valid date")
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                name: "delta",
                score: Some(2.0),
                due: due(5),
            },
            Row {
                id: 2,
                name: "Bravo",
                score: None,
                due: due(1),
            },
            Row {
                id: 3,
                name: "alpha",
                score: Some(2.0),
                due: due(9),
            },
            Row {
                id: 4,
                name: "Charlie",
                score: Some(-1.5),
                due: due(5),
            },
        ]
    }

    fn sorted_ids(rows: &[Row], sort: &SortState) -> Vec<i64> {
        let refs: Vec<&Row> = rows.iter().collect();
        sort_records(&refs, sort, &SCHEMA)
            .into_iter()
            .map(|row| row.id)
            .collect()
    }

    #[test]
    fn no_key_keeps_input_order() {
        assert_eq!(sorted_ids(&rows(), &SortState::unsorted()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn unknown_key_keeps_input_order() {
        let sort = SortState::by("nope", SortDirection::Desc);
        assert_eq!(sorted_ids(&rows(), &sort), vec![1, 2, 3, 4]);
    }

    #[test]
    fn strings_sort_case_sensitively() {
        let sort = SortState::by("name", SortDirection::Asc);
        // uppercase sorts before lowercase
        assert_eq!(sorted_ids(&rows(), &sort), vec![2, 4, 3, 1]);
    }

    #[test]
    fn numbers_sort_numerically_with_missing_lowest() {
        let asc = SortState::by("score", SortDirection::Asc);
        assert_eq!(sorted_ids(&rows(), &asc), vec![2, 4, 1, 3]);

        let desc = SortState::by("score", SortDirection::Desc);
        assert_eq!(sorted_ids(&rows(), &desc), vec![1, 3, 4, 2]);
    }

    #[test]
    fn dates_sort_chronologically_and_ties_keep_input_order() {
        let asc = SortState::by("due", SortDirection::Asc);
        assert_eq!(sorted_ids(&rows(), &asc), vec![2, 1, 4, 3]);

        let desc = SortState::by("due", SortDirection::Desc);
        assert_eq!(sorted_ids(&rows(), &desc), vec![3, 1, 4, 2]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let data = rows();
        let sort = SortState::by("score", SortDirection::Desc);
        let refs: Vec<&Row> = data.iter().collect();
        let once = sort_records(&refs, &sort, &SCHEMA);
        let twice = sort_records(&once, &sort, &SCHEMA);
        let once_ids: Vec<i64> = once.iter().map(|row| row.id).collect();
        let twice_ids: Vec<i64> = twice.iter().map(|row| row.id).collect();
        assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn toggle_flips_same_key_and_resets_new_key() {
        let mut sort = SortState::unsorted();
        assert_eq!(sort.toggle("name"), SortDirection::Asc);
        assert_eq!(sort.toggle("name"), SortDirection::Desc);
        assert_eq!(sort.toggle("name"), SortDirection::Asc);
        sort.toggle("name");
        assert_eq!(sort.toggle("due"), SortDirection::Asc);
        assert_eq!(sort.key.as_deref(), Some("due"));

        sort.clear();
        assert_eq!(sort, SortState::unsorted());
    }

    #[test]
    fn mismatched_kind_compares_as_missing() {
        assert_eq!(
            compare_fields(
                Some(FieldRef::Text("9")),
                Some(FieldRef::Number(1.0)),
                FieldKind::Number
            ),
            Ordering::Less
        );
        assert_eq!(compare_fields(None, None, FieldKind::Text), Ordering::Equal);
    }
}
