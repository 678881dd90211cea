//! # Grouping Aggregator
//! Partitions sorted postings by company. Keys iterate in ascending order no
//! matter which way the postings themselves were sorted.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::posting::NormalizedJobPosting;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResult<'a> {
    groups: BTreeMap<&'a str, Vec<&'a NormalizedJobPosting>>,
}

impl<'a> GroupedResult<'a> {
    /// Group keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.keys().copied()
    }

    pub fn get(&self, company: &str) -> Option<&[&'a NormalizedJobPosting]> {
        self.groups.get(company).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a NormalizedJobPosting])> + '_ {
        self.groups.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn posting_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Concatenate groups in key order.
    pub fn flatten(&self) -> Vec<&'a NormalizedJobPosting> {
        self.groups.values().flatten().copied().collect()
    }
}

/// Single pass; each posting is appended to its company's bucket so the
/// sorter's order survives inside every group.
pub fn group_by_company<'a>(postings: &[&'a NormalizedJobPosting]) -> GroupedResult<'a> {
    let mut groups: BTreeMap<&'a str, Vec<&'a NormalizedJobPosting>> = BTreeMap::new();
    for &p in postings {
        groups.entry(p.company_key()).or_default().push(p);
    }
    GroupedResult { groups }
}

#[derive(serde::Serialize)]
struct GroupOut<'g, 'a> {
    company: &'a str,
    count: usize,
    postings: Vec<crate::posting::JobCard<'g>>,
}

impl Serialize for GroupedResult<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.groups.len()))?;
        for (company, postings) in &self.groups {
            seq.serialize_element(&GroupOut {
                company,
                count: postings.len(),
                postings: postings.iter().map(|p| p.card()).collect(),
            })?;
        }
        seq.end()
    }
}
