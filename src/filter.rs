use crate::JdValue;
use crate::store::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a per-field pattern is compared against a candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMode {
    #[default]
    Substring,
    Exact,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldFilter {
    pub pattern: String,
    pub mode: MatchMode,
}

impl FieldFilter {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// The explorer's filter state: one global query plus per-field filters.
/// Owned by the presentation layer and passed explicitly; the store never
/// mutates it, so it survives collection reloads (see DESIGN.md).
///
/// A record passes iff it matches the global query in ANY known field and
/// matches EVERY non-empty per-field filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    query: String,
    field_filters: IndexMap<String, FieldFilter>,
}

impl FilterState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query_mut(&mut self) -> &mut String {
        &mut self.query
    }

    pub fn set_field_filter(&mut self, field: impl Into<String>, pattern: impl Into<String>, mode: MatchMode) {
        self.field_filters.insert(
            field.into(),
            FieldFilter {
                pattern: pattern.into(),
                mode,
            },
        );
    }

    pub fn field_filter(&self, field: &str) -> Option<&FieldFilter> {
        self.field_filters.get(field)
    }

    /// In-place access for UI widgets; inserts an empty filter on first
    /// use. Empty patterns are inert, so stray entries don't filter.
    pub fn field_filter_mut(&mut self, field: &str) -> &mut FieldFilter {
        self.field_filters.entry(field.to_string()).or_default()
    }

    pub fn clear_field_filter(&mut self, field: &str) {
        self.field_filters.shift_remove(field);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.field_filters.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.field_filters.values().any(|f| !f.is_empty())
    }

    /// The overall predicate over one record, given the collection's
    /// known-field universe (the global query probes every known field,
    /// not just the fields this record happens to carry).
    pub fn matches(&self, record: &Record, known_fields: &[String]) -> bool {
        if !self.query.is_empty() {
            let hit = known_fields.iter().any(|field| {
                record
                    .get(field)
                    .is_some_and(|v| value_matches(v, &self.query, MatchMode::Substring))
            });
            if !hit {
                return false;
            }
        }

        self.field_filters.iter().all(|(field, filter)| {
            if filter.is_empty() {
                return true;
            }
            match record.get(field) {
                Some(v) => value_matches(v, &filter.pattern, filter.mode),
                // Absent behaves like null: never matches a non-empty pattern.
                None => false,
            }
        })
    }
}

/// Per-type matching semantics:
/// - null never matches a non-empty pattern
/// - arrays: substring over elements joined with a single space; exact if
///   any element equals the pattern
/// - objects: compared against their compact canonical JSON text
/// - scalars: compared against their display text
/// All comparisons are case-insensitive.
pub fn value_matches(value: &JdValue, pattern: &str, mode: MatchMode) -> bool {
    if pattern.is_empty() {
        return true;
    }
    match value {
        JdValue::Null => false,
        JdValue::Array(items) => match mode {
            MatchMode::Substring => {
                let joined = items
                    .iter()
                    .map(JdValue::display_text)
                    .collect::<Vec<_>>()
                    .join(" ");
                text_matches(&joined, pattern, mode)
            }
            MatchMode::Exact => items
                .iter()
                .any(|item| text_matches(&item.display_text(), pattern, mode)),
        },
        JdValue::Object(_) => text_matches(&value.to_compact(), pattern, mode),
        scalar => text_matches(&scalar.display_text(), pattern, mode),
    }
}

fn text_matches(candidate: &str, pattern: &str, mode: MatchMode) -> bool {
    let candidate = candidate.to_lowercase();
    let pattern = pattern.to_lowercase();
    match mode {
        MatchMode::Substring => candidate.contains(&pattern),
        MatchMode::Exact => candidate == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterState, MatchMode, value_matches};
    use crate::JdValue;

    fn val(text: &str) -> JdValue {
        JdValue::parse(text).unwrap()
    }

    #[test]
    fn null_never_matches_non_empty_pattern() {
        assert!(!value_matches(&JdValue::Null, "x", MatchMode::Substring));
        assert!(!value_matches(&JdValue::Null, "x", MatchMode::Exact));
        assert!(value_matches(&JdValue::Null, "", MatchMode::Substring));
    }

    #[test]
    fn scalar_matching_is_case_insensitive() {
        let v = val(r#""Tier One""#);
        assert!(value_matches(&v, "tier", MatchMode::Substring));
        assert!(value_matches(&v, "TIER ONE", MatchMode::Exact));
        assert!(!value_matches(&v, "tier two", MatchMode::Exact));
    }

    #[test]
    fn number_matching_uses_stringified_value() {
        let v = val("10");
        assert!(value_matches(&v, "1", MatchMode::Substring));
        assert!(!value_matches(&v, "1", MatchMode::Exact));
        assert!(value_matches(&v, "10", MatchMode::Exact));
    }

    #[test]
    fn array_substring_joins_elements_with_single_space() {
        let v = val(r#"["land", "tenure"]"#);
        assert!(value_matches(&v, "land tenure", MatchMode::Substring));
        assert!(value_matches(&v, "d ten", MatchMode::Substring));
    }

    #[test]
    fn array_exact_requires_one_equal_element() {
        let v = val(r#"["land", "tenure"]"#);
        assert!(value_matches(&v, "tenure", MatchMode::Exact));
        assert!(!value_matches(&v, "land tenure", MatchMode::Exact));
        assert!(!value_matches(&v, "ten", MatchMode::Exact));
    }

    #[test]
    fn object_matching_uses_canonical_text() {
        let v = val(r#"{"source": "EO", "year": 2020}"#);
        assert!(value_matches(&v, r#""source":"eo""#, MatchMode::Substring));
        assert!(value_matches(
            &v,
            r#"{"source":"EO","year":2020}"#,
            MatchMode::Exact
        ));
    }

    #[test]
    fn global_query_ors_across_known_fields() {
        let record = val(r#"{"a": "alpha", "b": "beta"}"#);
        let record = record.as_object().unwrap().clone();
        let fields = vec!["a".to_string(), "b".to_string()];

        let mut state = FilterState::default();
        state.set_query("bet");
        assert!(state.matches(&record, &fields));

        state.set_query("gamma");
        assert!(!state.matches(&record, &fields));
    }

    #[test]
    fn field_filters_and_together() {
        let record = val(r#"{"tier": "1", "title": "Land use"}"#);
        let record = record.as_object().unwrap().clone();
        let fields = vec!["tier".to_string(), "title".to_string()];

        let mut state = FilterState::default();
        state.set_field_filter("tier", "1", MatchMode::Exact);
        state.set_field_filter("title", "land", MatchMode::Substring);
        assert!(state.matches(&record, &fields));

        state.set_field_filter("title", "water", MatchMode::Substring);
        assert!(!state.matches(&record, &fields));
    }

    #[test]
    fn filter_on_absent_field_rejects_record() {
        let record = val(r#"{"a": 1}"#).as_object().unwrap().clone();
        let fields = vec!["a".to_string(), "b".to_string()];

        let mut state = FilterState::default();
        state.set_field_filter("b", "x", MatchMode::Substring);
        assert!(!state.matches(&record, &fields));
    }

    #[test]
    fn clear_resets_query_and_field_filters() {
        let mut state = FilterState::default();
        state.set_query("q");
        state.set_field_filter("a", "x", MatchMode::Exact);
        assert!(state.is_active());

        state.clear();
        assert!(!state.is_active());
        assert_eq!(state.query(), "");
        assert!(state.field_filter("a").is_none());
    }
}
