//! Cross-reference matching between two sources.
//!
//! Each entity class has one match rule:
//! - characters share a numeric identity across AniList and MAL, so they are
//!   paired by exact `source_id` equality;
//! - creators and companies have unrelated ids per source, so they are paired
//!   by [`normalize`]d name equality (never substring or fuzzy).
//!
//! Matching is 1:1 per key. When several records on one side share a key, the
//! first in input order is paired and the collision is reported as an
//! [`AmbiguousMatch`].

use std::collections::HashMap;

use watchlist_catalog::normalize::normalize;
use watchlist_catalog::types::{CharacterPayload, EntityClass, SourceRecord};

/// How two records are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Exact equality of the source-native id.
    SourceId,
    /// Equality of the normalized name.
    NormalizedName,
}

impl MatchRule {
    pub fn for_class(class: EntityClass) -> Self {
        match class {
            EntityClass::Character => Self::SourceId,
            EntityClass::Creator | EntityClass::Company => Self::NormalizedName,
        }
    }

    /// The match key for a record, or `None` if the record cannot match
    /// anything (empty name).
    pub fn key(&self, record: &SourceRecord) -> Option<String> {
        let key = match self {
            Self::SourceId => record.source_id.key(),
            Self::NormalizedName => normalize(&record.raw_name),
        };
        if key.is_empty() { None } else { Some(key) }
    }
}

/// Two records, one per source, that denote the same entity.
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidatePair<'a> {
    pub left: &'a SourceRecord,
    pub right: &'a SourceRecord,
}

/// Several records on one side shared a match key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousMatch {
    pub class: EntityClass,
    pub key: String,
    pub left_candidates: usize,
    pub right_candidates: usize,
}

/// Result of matching one class for one franchise entry.
#[derive(Debug, Default)]
pub struct MatchOutcome<'a> {
    pub pairs: Vec<MatchCandidatePair<'a>>,
    pub ambiguities: Vec<AmbiguousMatch>,
}

/// Match two record lists using the rule for `class`.
///
/// Pairs come back in left-side input order.
pub fn match_records<'a>(
    class: EntityClass,
    left: &'a [SourceRecord],
    right: &'a [SourceRecord],
) -> MatchOutcome<'a> {
    match_with_rule(MatchRule::for_class(class), class, left, right)
}

/// Match two record sequences with an explicit rule.
pub fn match_with_rule<'a, L, R>(
    rule: MatchRule,
    class: EntityClass,
    left: L,
    right: R,
) -> MatchOutcome<'a>
where
    L: IntoIterator<Item = &'a SourceRecord>,
    R: IntoIterator<Item = &'a SourceRecord>,
{
    let left_groups = group_by_key(rule, left);
    let right_groups = group_by_key(rule, right);

    let right_index: HashMap<&str, usize> = right_groups
        .iter()
        .enumerate()
        .map(|(i, (key, _))| (key.as_str(), i))
        .collect();

    let mut outcome = MatchOutcome::default();
    for (key, left_records) in &left_groups {
        let Some(&ri) = right_index.get(key.as_str()) else {
            continue;
        };
        let right_records = &right_groups[ri].1;

        if left_records.len() > 1 || right_records.len() > 1 {
            outcome.ambiguities.push(AmbiguousMatch {
                class,
                key: key.clone(),
                left_candidates: left_records.len(),
                right_candidates: right_records.len(),
            });
        }

        outcome.pairs.push(MatchCandidatePair {
            left: left_records[0],
            right: right_records[0],
        });
    }

    outcome
}

/// Match the voice actors of two matched characters.
///
/// Only Japanese-language credits are candidates on either side; dub actors
/// are excluded before matching, not merely left unmatched.
pub fn match_voice_actors<'a>(
    left: &'a CharacterPayload,
    right: &'a CharacterPayload,
) -> MatchOutcome<'a> {
    let japanese = |payload: &'a CharacterPayload| {
        payload
            .voice_actors
            .iter()
            .filter(|credit| credit.is_japanese())
            .map(|credit| &credit.person)
    };
    match_with_rule(
        MatchRule::NormalizedName,
        EntityClass::Creator,
        japanese(left),
        japanese(right),
    )
}

/// Group records by match key, keeping first-occurrence order of keys and
/// input order within a key.
fn group_by_key<'a, I>(rule: MatchRule, records: I) -> Vec<(String, Vec<&'a SourceRecord>)>
where
    I: IntoIterator<Item = &'a SourceRecord>,
{
    let mut groups: Vec<(String, Vec<&'a SourceRecord>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(key) = rule.key(record) else {
            continue;
        };
        match positions.get(&key) {
            Some(&i) => groups[i].1.push(record),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![record]));
            }
        }
    }

    groups
}
